//! Request definitions
//!
//! The read-only view of an in-flight request that the translator needs.

use super::Completion;
use crate::protocol::Opcode;

/// Identifies the application call that originated a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppHandle(pub u64);

/// Descriptor of the protocol stage a request is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSpec {
    /// Position within a multi-stage operation (0-based)
    pub stage: u8,

    /// Whether this stage produces the operation's result
    pub terminal: bool,
}

impl StageSpec {
    /// The result-producing stage at the given position
    pub fn terminal(stage: u8) -> Self {
        Self {
            stage,
            terminal: true,
        }
    }

    /// An intermediate stage at the given position
    pub fn intermediate(stage: u8) -> Self {
        Self {
            stage,
            terminal: false,
        }
    }
}

/// A request whose backend exchange has finished
#[derive(Debug, Clone)]
pub struct Request {
    /// Operation requested by the application
    pub opcode: Opcode,

    /// Originating application call
    pub app: AppHandle,

    /// Current protocol stage (None if the request never entered one)
    pub step: Option<StageSpec>,

    /// Completion produced by an earlier stage, if any
    pub completion: Option<Completion>,

    /// Target namespace for namespace opcodes
    pub namespace: Option<String>,
}

impl Request {
    /// Create a request in its terminal single stage
    pub fn new(opcode: Opcode, app: AppHandle) -> Self {
        Self {
            opcode,
            app,
            step: Some(StageSpec::terminal(0)),
            completion: None,
            namespace: None,
        }
    }

    /// Replace the stage descriptor
    pub fn with_step(mut self, step: Option<StageSpec>) -> Self {
        self.step = step;
        self
    }

    /// Attach a completion produced by an earlier stage
    pub fn with_completion(mut self, completion: Completion) -> Self {
        self.completion = Some(completion);
        self
    }

    /// Set the target namespace name
    pub fn with_namespace(mut self, name: impl Into<String>) -> Self {
        self.namespace = Some(name.into());
        self
    }
}
