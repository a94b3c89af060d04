use crate::{
    error::{BuildError, NotEvaluatedError, UnknownWireError},
    gate::{Gate, GateId, GateKind},
    gates::{affine::affine_gate, sigmoid::sigmoid_gate},
    param::ParamSource,
    parallel::LayerExecutor,
    trace::{LayerTrace, Tracer},
    wire::{NetworkId, Producer, Wire, WireId, WireSlot},
};

pub mod backward;
pub mod config;
pub mod forward;

pub use config::NetworkConfig;

const _: fn() = || {
    fn assert_send<T: Sync + Send + 'static>() {}
    assert_send::<Network>();
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardState {
    /// Built or mutated since the last successful forward pass
    Pending,
    Complete,
    Failed,
}

/// Wire arena plus the layered gate registry.
///
/// Gates are registered as they are constructed, so construction must be
/// bottom-up: every input of a gate is either an external input or the output
/// of a gate constructed earlier.
#[derive(Debug)]
pub struct Network {
    id: NetworkId,
    /// Indexed by [`WireId::index`]; each slot records the wire's layer
    wires: Vec<WireSlot>,
    gates: Vec<Gate>,
    /// `layers[i]` holds the gates of layer `i + 1`; layer 0 is external inputs
    layers: Vec<Vec<GateId>>,
    outs: Option<Vec<WireId>>,
    state: ForwardState,
    params: ParamSource,
    executor: LayerExecutor,
    tracer: Tracer,
}
impl Network {
    /// Only looks at the most recently registered gate.
    fn check_rep(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        let Some(gate) = self.gates.last() else {
            assert!(self.layers.is_empty());
            return;
        };
        assert!(gate.layer() <= self.layers.len());
        assert!(self.layers.last().is_some_and(|layer| !layer.is_empty()));
        assert_eq!(self.wires[gate.out().index()].layer, gate.layer());
        for input in gate.ins() {
            assert!(self.wires[input.index()].layer < gate.layer());
        }
    }

    /// Unseeded `[0, 1)` parameters on rayon's global pool
    pub fn new() -> Network {
        Self::assemble(ParamSource::standard(), LayerExecutor::global(), false)
    }

    pub fn with_config(config: NetworkConfig) -> Result<Network, BuildError> {
        let params = ParamSource::new(config.param_init, config.seed)?;
        let executor = LayerExecutor::new(&config.parallel)?;
        Ok(Self::assemble(params, executor, config.trace))
    }

    fn assemble(params: ParamSource, executor: LayerExecutor, trace: bool) -> Network {
        let this = Self {
            id: NetworkId::next(),
            wires: vec![],
            gates: vec![],
            layers: vec![],
            outs: None,
            state: ForwardState::Pending,
            params,
            executor,
            tracer: Tracer::new(trace),
        };
        this.check_rep();
        this
    }

    pub fn id(&self) -> NetworkId {
        self.id
    }

    /// Allocates an external input wire at layer 0.
    pub fn input(&mut self) -> WireId {
        let wire = WireId::new(self.id, self.wires.len());
        self.wires.push(WireSlot::external());
        self.invalidate();
        wire
    }

    pub fn inputs(&mut self, n: usize) -> Vec<WireId> {
        (0..n).map(|_| self.input()).collect()
    }

    /// ```math
    /// f(x) = \frac{1}{1 + e^{-x}}
    /// ```
    pub fn sigmoid(&mut self, operand: WireId) -> Result<WireId, BuildError> {
        sigmoid_gate(self, operand)
    }

    /// ```math
    /// f_{w,b} (x) = wx + b
    /// ```
    pub fn affine(&mut self, operands: &[WireId]) -> Result<WireId, BuildError> {
        affine_gate(self, operands)
    }

    /// Creates the gate and assigns it a layer in one step.
    ///
    /// The gate lands on `1 + max(layer of operands)`; its output wire is
    /// recorded at that same layer. Operands keep the layer they were first
    /// recorded at.
    pub(crate) fn register(
        &mut self,
        kind: GateKind,
        operands: Vec<WireId>,
        params: Vec<Wire>,
    ) -> Result<WireId, BuildError> {
        let mut max_operand_layer = None;
        for &operand in &operands {
            let slot = self
                .slot(operand)
                .ok_or(BuildError::ConstructionOrderViolation { wire: operand })?;
            max_operand_layer = max_operand_layer.max(Some(slot.layer));
        }
        let layer = max_operand_layer.map_or(1, |x| x + 1);

        let gate = GateId::new(self.id, self.gates.len());
        let out = WireId::new(self.id, self.wires.len());
        self.wires.push(WireSlot::gate_output(gate, layer));
        for operand in &operands {
            self.wires[operand.index()].consumers += 1;
        }
        if self.layers.len() < layer {
            self.layers.resize_with(layer, Vec::new);
        }
        self.layers[layer - 1].push(gate);
        self.gates.push(Gate::new(kind, operands, params, out, layer));

        self.invalidate();
        self.check_rep();
        Ok(out)
    }

    /// Wires recorded at the topmost layer, in creation order.
    ///
    /// Computed once and cached until the next gate is registered.
    pub fn outputs(&mut self) -> &[WireId] {
        let top = self.layers.len();
        let wires = &self.wires;
        let id = self.id;
        self.outs.get_or_insert_with(|| {
            if top == 0 {
                return vec![];
            }
            wires
                .iter()
                .enumerate()
                .filter(|(_, slot)| slot.layer == top)
                .map(|(i, _)| WireId::new(id, i))
                .collect()
        })
    }

    /// Values of [`Network::outputs`] from the last forward pass.
    ///
    /// Fails unless that pass completed and nothing changed since.
    pub fn output_values(&mut self) -> Result<Vec<f64>, NotEvaluatedError> {
        if self.state != ForwardState::Complete {
            return Err(NotEvaluatedError { state: self.state });
        }
        Ok(self.read_outputs())
    }

    fn read_outputs(&mut self) -> Vec<f64> {
        let outs = self.outputs().to_vec();
        outs.iter()
            .map(|wire| self.wires[wire.index()].wire.value)
            .collect()
    }

    pub fn set_value(&mut self, wire: WireId, value: f64) -> Result<(), UnknownWireError> {
        let slot = self.slot_mut(wire).ok_or(UnknownWireError { wire })?;
        slot.wire.value = value;
        self.state = ForwardState::Pending;
        Ok(())
    }

    pub fn wire(&self, wire: WireId) -> Result<&Wire, UnknownWireError> {
        self.slot(wire)
            .map(|slot| &slot.wire)
            .ok_or(UnknownWireError { wire })
    }
    /// Raw wire value; check [`Network::state`] before trusting gate outputs.
    pub fn value(&self, wire: WireId) -> Result<f64, UnknownWireError> {
        self.wire(wire).map(|w| w.value)
    }
    pub fn grad(&self, wire: WireId) -> Result<f64, UnknownWireError> {
        self.wire(wire).map(|w| w.grad)
    }
    pub fn layer_of(&self, wire: WireId) -> Result<usize, UnknownWireError> {
        self.slot(wire)
            .map(|slot| slot.layer)
            .ok_or(UnknownWireError { wire })
    }
    pub fn producer(&self, wire: WireId) -> Result<Producer, UnknownWireError> {
        self.slot(wire)
            .map(|slot| slot.producer)
            .ok_or(UnknownWireError { wire })
    }
    /// Number of operand slots reading `wire`; a gate taking it twice counts twice
    pub fn consumers(&self, wire: WireId) -> Result<usize, UnknownWireError> {
        self.slot(wire)
            .map(|slot| slot.consumers)
            .ok_or(UnknownWireError { wire })
    }
    pub fn producing_gate(&self, wire: WireId) -> Option<&Gate> {
        match self.slot(wire)?.producer {
            Producer::External => None,
            Producer::Gate(gate) => self.gate(gate),
        }
    }

    pub fn gate(&self, gate: GateId) -> Option<&Gate> {
        if gate.network() != self.id {
            return None;
        }
        self.gates.get(gate.index())
    }
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }
    pub fn num_wires(&self) -> usize {
        self.wires.len()
    }
    /// `layers()[i]` holds the gates of layer `i + 1`
    pub fn layers(&self) -> &[Vec<GateId>] {
        &self.layers
    }
    /// Workers available to each layer
    pub fn threads(&self) -> usize {
        self.executor.threads()
    }
    pub fn state(&self) -> ForwardState {
        self.state
    }
    /// Per-layer timings of the most recent forward or backward pass
    pub fn last_trace(&self) -> &[LayerTrace] {
        self.tracer.records()
    }

    pub(crate) fn param_source_mut(&mut self) -> &mut ParamSource {
        &mut self.params
    }

    fn invalidate(&mut self) {
        self.outs = None;
        self.state = ForwardState::Pending;
    }

    fn slot(&self, wire: WireId) -> Option<&WireSlot> {
        if wire.network() != self.id {
            return None;
        }
        self.wires.get(wire.index())
    }
    fn slot_mut(&mut self, wire: WireId) -> Option<&mut WireSlot> {
        if wire.network() != self.id {
            return None;
        }
        self.wires.get_mut(wire.index())
    }
}
impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}
