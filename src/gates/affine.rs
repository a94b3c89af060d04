use crate::{
    error::BuildError,
    gate::GateKind,
    network::Network,
    wire::{Wire, WireId},
};

/// ```math
/// f_{w,b} (x) = wx + b
/// ```
///
/// Parameters are drawn from the network's [`crate::param::ParamInit`].
pub fn affine_gate(network: &mut Network, operands: &[WireId]) -> Result<WireId, BuildError> {
    check_arity(operands)?;
    let params = network.param_source_mut().wires(operands.len() + 1);
    network.register(GateKind::Affine, operands.to_vec(), params)
}

pub fn affine_gate_with_params(
    network: &mut Network,
    operands: &[WireId],
    weights: &[f64],
    bias: f64,
) -> Result<WireId, BuildError> {
    check_arity(operands)?;
    if weights.len() != operands.len() {
        return Err(BuildError::ParameterSizeMismatch {
            expected: operands.len(),
            got: weights.len(),
        });
    }
    let params = weights
        .iter()
        .copied()
        .chain([bias])
        .map(Wire::new)
        .collect();
    network.register(GateKind::Affine, operands.to_vec(), params)
}

fn check_arity(operands: &[WireId]) -> Result<(), BuildError> {
    if operands.is_empty() {
        return Err(BuildError::ArityMismatch {
            kind: GateKind::Affine.name(),
            expected: "at least 1",
            got: 0,
        });
    }
    Ok(())
}

/// `params`: weights followed by the bias
pub fn affine(x: impl Iterator<Item = f64>, params: &[Wire]) -> f64 {
    assert!(!params.is_empty());
    let (w, bias) = params.split_at(params.len() - 1);
    let weighted: f64 = x.zip(w).map(|(x, w)| x * w.value).sum();
    weighted + bias[0].value
}

/// ```math
/// \frac{\partial f}{\partial x_i} = w_i
/// ```
pub fn gradient_of_this_at_operand(params: &[Wire]) -> impl Iterator<Item = f64> + '_ {
    params[..params.len() - 1].iter().map(|w| w.value)
}

/// ```math
/// \frac{\partial f}{\partial w_i} = x_i, \quad \frac{\partial f}{\partial b} = 1
/// ```
pub fn gradient_of_this_at_parameter(x: &[f64]) -> impl Iterator<Item = f64> + '_ {
    x.iter().copied().chain([1.0])
}

#[cfg(test)]
mod tests {
    use crate::{
        error::BuildError,
        network::{Network, NetworkConfig},
        param::ParamInit,
        wire::Wire,
    };

    use super::{affine, affine_gate, affine_gate_with_params};

    #[test]
    fn evaluate() {
        let params = [3.0, 2.0, 1.0, 4.0].map(Wire::new);
        let ret = affine([1.0, 2.0, 3.0].into_iter(), &params);
        assert_eq!(ret, (3.0 * 1.0 + 2.0 * 2.0 + 1.0 * 3.0) + 4.0);
    }

    #[test]
    fn gate_evaluate() {
        let mut network = Network::new();
        let xs = network.inputs(3);
        let out = affine_gate_with_params(&mut network, &xs, &[3.0, 2.0, 1.0], -20.0).unwrap();
        for (x, v) in xs.iter().zip([1.0, 2.0, 3.0]) {
            network.set_value(*x, v).unwrap();
        }
        network.forward().unwrap();
        assert_eq!(network.value(out).unwrap(), -10.0);
    }

    #[test]
    fn deterministic_params() {
        let config = NetworkConfig::default().with_param_init(ParamInit::deterministic());
        let mut network = Network::with_config(config).unwrap();
        let xs = network.inputs(2);
        let out = affine_gate(&mut network, &xs).unwrap();
        let gate = network.producing_gate(out).unwrap();
        assert_eq!(gate.params(), &[Wire::new(1.0); 3]);
    }

    #[test]
    fn uniform_params_in_unit_interval() {
        let config = NetworkConfig::default().with_seed(7);
        let mut network = Network::with_config(config).unwrap();
        let xs = network.inputs(16);
        let out = affine_gate(&mut network, &xs).unwrap();
        let gate = network.producing_gate(out).unwrap();
        assert_eq!(gate.params().len(), 17);
        assert!(gate.params().iter().all(|p| (0.0..1.0).contains(&p.value)));
    }

    #[test]
    fn gradients() {
        let mut network = Network::new();
        let xs = network.inputs(2);
        let out = affine_gate_with_params(&mut network, &xs, &[3.0, -2.0], 0.5).unwrap();
        network.set_value(xs[0], 5.0).unwrap();
        network.set_value(xs[1], 7.0).unwrap();
        network.forward().unwrap();
        network.backward_from(&[(out, 2.0)]).unwrap();
        assert_eq!(network.grad(xs[0]).unwrap(), 3.0 * 2.0);
        assert_eq!(network.grad(xs[1]).unwrap(), -2.0 * 2.0);
        let gate = network.producing_gate(out).unwrap();
        let param_grads: Vec<f64> = gate.params().iter().map(|p| p.grad).collect();
        assert_eq!(param_grads, vec![5.0 * 2.0, 7.0 * 2.0, 2.0]);
    }

    #[test]
    fn parameter_size_not_matched() {
        let mut network = Network::new();
        let xs = network.inputs(3);
        let err = affine_gate_with_params(&mut network, &xs, &[1.0], 0.0).unwrap_err();
        assert_eq!(
            err,
            BuildError::ParameterSizeMismatch {
                expected: 3,
                got: 1
            }
        );
        assert_eq!(network.num_gates(), 0);
    }

    #[test]
    fn no_operands() {
        let mut network = Network::new();
        let err = affine_gate(&mut network, &[]).unwrap_err();
        assert!(matches!(err, BuildError::ArityMismatch { got: 0, .. }));
    }
}
