use thiserror::Error;

use crate::{gate::GateId, network::ForwardState, wire::WireId};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    #[error("Input wire {wire:?} was never produced by this network")]
    ConstructionOrderViolation { wire: WireId },
    #[error("{kind} gate expects {expected} inputs, got {got}")]
    ArityMismatch {
        kind: &'static str,
        expected: &'static str,
        got: usize,
    },
    #[error("Parameter size not matched: expected {expected}, got {got}")]
    ParameterSizeMismatch { expected: usize, got: usize },
    #[error("Invalid parameter initialisation: {reason}")]
    InvalidParamInit { reason: String },
    #[error("Failed to build the worker pool: {reason}")]
    ThreadPool { reason: String },
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("Unknown wire {wire:?}")]
pub struct UnknownWireError {
    pub wire: WireId,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("Output values need a completed forward pass; network is {state:?}")]
pub struct NotEvaluatedError {
    pub state: ForwardState,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GateError {
    #[error("Gate produced a non-finite output: {value}")]
    NonFiniteOutput { value: f64 },
}

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("Network has no registered gates")]
    EmptyNetwork,
    #[error("Gate {gate:?} failed on layer {layer}: {source}")]
    WorkerFailure {
        gate: GateId,
        layer: usize,
        #[source]
        source: GateError,
    },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BackwardError {
    #[error("Backward pass requires a completed forward pass")]
    NotEvaluated,
    #[error(transparent)]
    UnknownWire(#[from] UnknownWireError),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Environment variable {var} has an invalid value {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}
