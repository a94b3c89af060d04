use crate::{error::BuildError, gate::GateKind, network::Network, wire::WireId};

/// ```math
/// f(x) = \frac{1}{1 + e^{-x}}
/// ```
pub fn sigmoid_gate(network: &mut Network, operand: WireId) -> Result<WireId, BuildError> {
    network.register(GateKind::Sigmoid, vec![operand], Vec::new())
}

/// Same as [`sigmoid_gate`] for callers holding a slice of operands.
pub fn sigmoid_gate_checked(
    network: &mut Network,
    operands: &[WireId],
) -> Result<WireId, BuildError> {
    let &[operand] = operands else {
        return Err(BuildError::ArityMismatch {
            kind: GateKind::Sigmoid.name(),
            expected: "exactly 1",
            got: operands.len(),
        });
    };
    sigmoid_gate(network, operand)
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

pub fn sigmoid_derivative(x: f64) -> f64 {
    let sigmoid = sigmoid(x);
    (1.0 - sigmoid) * sigmoid
}
