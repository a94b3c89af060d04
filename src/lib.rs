pub mod error;
pub mod gate;
pub mod gates;
pub mod network;
pub mod param;
pub mod parallel;
pub mod trace;
pub mod wire;
#[cfg(test)]
mod tests;

pub use error::{
    BackwardError, BuildError, ConfigError, ForwardError, GateError, NotEvaluatedError,
    UnknownWireError,
};
pub use gate::{Gate, GateId, GateKind};
pub use network::{ForwardState, Network, NetworkConfig};
pub use param::ParamInit;
pub use wire::{Wire, WireId};
