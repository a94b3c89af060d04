use std::sync::atomic::{AtomicU64, Ordering};

use crate::gate::GateId;

/// A scalar edge of the graph.
///
/// `grad` is only ever accumulated into; the backward pass zeroes it before
/// each sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Wire {
    pub value: f64,
    pub grad: f64,
}
impl Wire {
    pub fn new(value: f64) -> Self {
        Self { value, grad: 0.0 }
    }
}

/// Identifies the network a [`WireId`] or [`crate::gate::GateId`] was minted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkId(u64);
impl NetworkId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Opaque handle into a network's wire arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WireId {
    network: NetworkId,
    index: usize,
}
impl WireId {
    pub(crate) fn new(network: NetworkId, index: usize) -> Self {
        Self { network, index }
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }
    /// Creation order within the owning network
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Producer {
    /// Allocated by the caller
    External,
    Gate(GateId),
}

/// Arena slot: the wire itself plus what the registry knows about it.
#[derive(Debug, Clone)]
pub(crate) struct WireSlot {
    pub wire: Wire,
    pub layer: usize,
    pub producer: Producer,
    pub consumers: usize,
}
impl WireSlot {
    pub fn external() -> Self {
        Self {
            wire: Wire::default(),
            layer: 0,
            producer: Producer::External,
            consumers: 0,
        }
    }

    pub fn gate_output(gate: GateId, layer: usize) -> Self {
        Self {
            wire: Wire::default(),
            layer,
            producer: Producer::Gate(gate),
            consumers: 0,
        }
    }
}
