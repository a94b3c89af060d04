//! # Terminologies
//!
//! - $f$: the function represented by the gate
//! - $z$: the input wires (operands) of the gate
//! - $w$: the owned parameters of $f$
//! - $E$: whatever the output wires were seeded with on the backward pass

use strict_num::FiniteF64;

use crate::{
    error::GateError,
    gates::{affine, sigmoid},
    wire::{NetworkId, Wire, WireId, WireSlot},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GateId {
    network: NetworkId,
    index: usize,
}
impl GateId {
    pub(crate) fn new(network: NetworkId, index: usize) -> Self {
        Self { network, index }
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    /// Unary, no parameters
    Sigmoid,
    /// n-ary, one weight per input followed by a bias
    Affine,
}
impl GateKind {
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::Sigmoid => "sigmoid",
            GateKind::Affine => "affine",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Gate {
    kind: GateKind,
    ins: Vec<WireId>,
    params: Vec<Wire>,
    out: WireId,
    /// `1 + max(layer of ins)`
    layer: usize,
}
impl Gate {
    pub(crate) fn new(
        kind: GateKind,
        ins: Vec<WireId>,
        params: Vec<Wire>,
        out: WireId,
        layer: usize,
    ) -> Self {
        Self {
            kind,
            ins,
            params,
            out,
            layer,
        }
    }

    pub fn kind(&self) -> GateKind {
        self.kind
    }
    pub fn ins(&self) -> &[WireId] {
        &self.ins
    }
    pub fn params(&self) -> &[Wire] {
        &self.params
    }
    pub fn out(&self) -> WireId {
        self.out
    }
    pub fn layer(&self) -> usize {
        self.layer
    }

    pub(crate) fn params_mut(&mut self) -> &mut [Wire] {
        &mut self.params
    }

    /// Value this gate would write to its output wire.
    ///
    /// Only reads `wires`; the caller owns the write-back.
    pub(crate) fn forward(&self, wires: &[WireSlot]) -> Result<f64, GateError> {
        let value = match self.kind {
            GateKind::Sigmoid => sigmoid::sigmoid(operand_value(wires, self.ins[0])),
            GateKind::Affine => {
                affine::affine(self.ins.iter().map(|&x| operand_value(wires, x)), &self.params)
            }
        };
        match FiniteF64::new(value) {
            Some(value) => Ok(value.get()),
            None => Err(GateError::NonFiniteOutput { value }),
        }
    }

    /// ```math
    /// \frac{\partial E}{\partial f} \cdot \frac{\partial f}{\partial z},
    /// \frac{\partial E}{\partial f} \cdot \frac{\partial f}{\partial w}
    /// ```
    ///
    /// The addends this gate contributes to the grads of its inputs and parameters.
    pub(crate) fn backward(&self, wires: &[WireSlot]) -> GateGradients {
        let out_grad = wires[self.out.index()].wire.grad;
        let mut operands = Vec::with_capacity(self.ins.len());
        let mut params = Vec::with_capacity(self.params.len());
        match self.kind {
            GateKind::Sigmoid => {
                let x = operand_value(wires, self.ins[0]);
                operands.push(sigmoid::sigmoid_derivative(x) * out_grad);
            }
            GateKind::Affine => {
                let operand_values: Vec<f64> =
                    self.ins.iter().map(|&x| operand_value(wires, x)).collect();
                operands.extend(
                    affine::gradient_of_this_at_operand(&self.params).map(|d| d * out_grad),
                );
                params.extend(
                    affine::gradient_of_this_at_parameter(&operand_values).map(|d| d * out_grad),
                );
            }
        }
        GateGradients { operands, params }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GateGradients {
    /// `operands[i]` is added to the grad of `ins[i]`
    pub operands: Vec<f64>,
    /// `params[i]` is added to the grad of `params[i]`
    pub params: Vec<f64>,
}

fn operand_value(wires: &[WireSlot], wire: WireId) -> f64 {
    wires[wire.index()].wire.value
}
