use std::time::Instant;

use crate::{
    error::{BackwardError, UnknownWireError},
    trace::{LayerTrace, Pass},
    wire::WireId,
};

use super::{ForwardState, Network};

impl Network {
    /// [`Network::backward_from`] with every output wire seeded at `1.0`.
    pub fn backward(&mut self) -> Result<(), BackwardError> {
        let seeds = self
            .outputs()
            .iter()
            .map(|&wire| (wire, 1.0))
            .collect::<Vec<_>>();
        self.backward_from(&seeds)
    }

    /// Zeroes every wire and parameter grad, adds `seeds` to the given wires,
    /// then walks the layers from the top down.
    ///
    /// A wire can feed several gates, so the addends of one layer are computed
    /// in parallel but summed into the grads on the calling thread.
    pub fn backward_from(&mut self, seeds: &[(WireId, f64)]) -> Result<(), BackwardError> {
        if self.state != ForwardState::Complete {
            return Err(BackwardError::NotEvaluated);
        }
        for &(wire, _) in seeds {
            self.slot(wire).ok_or(UnknownWireError { wire })?;
        }

        for slot in &mut self.wires {
            slot.wire.grad = 0.0;
        }
        for gate in &mut self.gates {
            gate.params_mut().iter_mut().for_each(|p| p.grad = 0.0);
        }
        for &(wire, seed) in seeds {
            self.wires[wire.index()].wire.grad += seed;
        }

        self.tracer.begin();
        for layer_index in (0..self.layers.len()).rev() {
            let start = Instant::now();
            let layer = &self.layers[layer_index];
            let gates = &self.gates;
            let wires = &self.wires;
            let addends = self.executor.map(layer, |&gate_id| {
                (gate_id, gates[gate_id.index()].backward(wires))
            });
            let num_gates = addends.len();
            for (gate_id, addends) in addends {
                let gate = &mut self.gates[gate_id.index()];
                for (operand, addend) in gate.ins().iter().zip(&addends.operands) {
                    self.wires[operand.index()].wire.grad += addend;
                }
                for (param, addend) in gate.params_mut().iter_mut().zip(&addends.params) {
                    param.grad += addend;
                }
            }
            self.tracer.record(LayerTrace {
                pass: Pass::Backward,
                layer: layer_index + 1,
                gates: num_gates,
                elapsed: start.elapsed(),
            });
        }
        self.tracer.finish(Pass::Backward);
        Ok(())
    }
}
