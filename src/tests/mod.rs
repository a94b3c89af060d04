use crate::{
    error::BuildError,
    network::{Network, NetworkConfig},
    wire::WireId,
};


/// `sig(dot(sig(dot(x, y)), sig(dot(x, y))))`
pub struct Example {
    pub network: Network,
    pub x: WireId,
    pub y: WireId,
    pub out: WireId,
}
impl Example {
    pub fn new(config: NetworkConfig) -> Result<Self, BuildError> {
        let mut network = Network::with_config(config)?;
        let x = network.input();
        let y = network.input();
        let left = network.affine(&[x, y])?;
        let left = network.sigmoid(left)?;
        let right = network.affine(&[x, y])?;
        let right = network.sigmoid(right)?;
        let joined = network.affine(&[left, right])?;
        let out = network.sigmoid(joined)?;
        Ok(Self {
            network,
            x,
            y,
            out,
        })
    }
}
