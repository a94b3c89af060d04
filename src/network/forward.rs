use std::time::Instant;

use crate::{
    error::ForwardError,
    trace::{LayerTrace, Pass},
};

use super::{ForwardState, Network};

impl Network {
    /// Evaluates every layer in order and returns the values of [`Network::outputs`].
    ///
    /// Gates of one layer run concurrently; the next layer starts only after
    /// all of them have written their outputs. A failing gate aborts the pass
    /// and leaves the network in [`ForwardState::Failed`].
    pub fn forward(&mut self) -> Result<Vec<f64>, ForwardError> {
        if self.layers.is_empty() {
            self.state = ForwardState::Failed;
            return Err(ForwardError::EmptyNetwork);
        }
        self.state = ForwardState::Pending;
        self.tracer.begin();
        for layer_index in 0..self.layers.len() {
            let start = Instant::now();
            let layer = &self.layers[layer_index];
            let gates = &self.gates;
            let wires = &self.wires;
            let results = self.executor.try_map(layer, |&gate_id| {
                let gate = &gates[gate_id.index()];
                match gate.forward(wires) {
                    Ok(value) => Ok((gate.out(), value)),
                    Err(source) => Err(ForwardError::WorkerFailure {
                        gate: gate_id,
                        layer: gate.layer(),
                        source,
                    }),
                }
            });
            let results = match results {
                Ok(x) => x,
                Err(e) => {
                    self.state = ForwardState::Failed;
                    return Err(e);
                }
            };
            let num_gates = results.len();
            for (out, value) in results {
                self.wires[out.index()].wire.value = value;
            }
            self.tracer.record(LayerTrace {
                pass: Pass::Forward,
                layer: layer_index + 1,
                gates: num_gates,
                elapsed: start.elapsed(),
            });
        }
        self.tracer.finish(Pass::Forward);
        self.state = ForwardState::Complete;
        Ok(self.read_outputs())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::{ForwardError, GateError, NotEvaluatedError},
        gates::affine::affine_gate_with_params,
        network::{ForwardState, Network, NetworkConfig},
    };

    #[test]
    fn empty_network() {
        let mut network = Network::new();
        let x = network.input();
        network.set_value(x, 1.0).unwrap();
        let err = network.forward().unwrap_err();
        assert!(matches!(err, ForwardError::EmptyNetwork));
        assert_eq!(network.state(), ForwardState::Failed);
        assert!(network.outputs().is_empty());
    }

    #[test]
    fn overflow_aborts_pass() {
        let mut network = Network::with_config(NetworkConfig::deterministic()).unwrap();
        let x = network.input();
        let big = affine_gate_with_params(&mut network, &[x], &[f64::MAX], 0.0).unwrap();
        let s = network.sigmoid(big).unwrap();
        network.set_value(x, 10.0).unwrap();
        let err = network.forward().unwrap_err();
        match err {
            ForwardError::WorkerFailure { gate, layer, source } => {
                assert_eq!(network.gate(gate).unwrap().out(), big);
                assert_eq!(layer, 1);
                assert!(matches!(source, GateError::NonFiniteOutput { .. }));
            }
            e => panic!("unexpected error: {e}"),
        }
        assert_eq!(network.state(), ForwardState::Failed);
        // layer 2 never ran
        assert_eq!(network.value(s).unwrap(), 0.0);
        assert_eq!(
            network.output_values(),
            Err(NotEvaluatedError {
                state: ForwardState::Failed
            })
        );

        network.set_value(x, 1.0).unwrap();
        let values = network.forward().unwrap();
        assert_eq!(network.state(), ForwardState::Complete);
        assert_eq!(values.len(), 1);
        assert_eq!(network.output_values(), Ok(values));
    }

    #[test]
    fn output_values_need_current_pass() {
        let mut network = Network::with_config(NetworkConfig::deterministic()).unwrap();
        let x = network.input();
        network.sigmoid(x).unwrap();
        assert!(network.output_values().is_err());
        network.forward().unwrap();
        assert!(network.output_values().is_ok());
        network.set_value(x, 2.0).unwrap();
        assert_eq!(
            network.output_values(),
            Err(NotEvaluatedError {
                state: ForwardState::Pending
            })
        );
    }

    #[test]
    fn trace_per_layer() {
        let mut network = Network::with_config(NetworkConfig::deterministic()).unwrap();
        let xs = network.inputs(2);
        let a = network.affine(&xs).unwrap();
        let b = network.affine(&xs).unwrap();
        let sa = network.sigmoid(a).unwrap();
        let sb = network.sigmoid(b).unwrap();
        network.affine(&[sa, sb]).unwrap();
        network.forward().unwrap();
        let gates: Vec<usize> = network.last_trace().iter().map(|t| t.gates).collect();
        assert_eq!(gates, vec![2, 2, 1]);
    }
}
