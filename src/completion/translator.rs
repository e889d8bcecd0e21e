//! Completion translator
//!
//! Opcode-aware mapping of backend return codes and replies to completions.

use super::{Completion, Request, StageSpec};
use crate::config::Config;
use crate::error::{BrokerError, Result};
use crate::protocol::{codes, Opcode, Reply, Status};

/// Translates finished backend exchanges into completions
///
/// Translation is pure: requests and replies are only read, and the only
/// product is the returned [`Completion`].
#[derive(Debug, Clone, Default)]
pub struct Translator {
    /// Leave non-terminal DIRECTORY completions unrefined
    strict_stage_checks: bool,
}

impl Translator {
    /// Create a translator with default behavior
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a translator honoring the given config
    pub fn from_config(config: &Config) -> Self {
        Self {
            strict_stage_checks: config.strict_stage_checks,
        }
    }

    /// Convert a request in its result stage into a completion
    ///
    /// Steps:
    /// 1. Return the completion of an earlier stage if there is one
    /// 2. Require a stage descriptor and an integer reply
    /// 3. Map `rc` to a baseline status and value
    /// 4. Refine per opcode
    ///
    /// Backend failures come back as a non-success completion. `Err` is
    /// reserved for requests that cannot be completed at all.
    pub fn translate(&self, request: &Request, reply: &Reply, rc: i64) -> Result<Completion> {
        // A completion from an earlier stage is final
        if let Some(completion) = request.completion {
            return Ok(completion);
        }

        let step = request.step.ok_or_else(|| {
            BrokerError::Protocol(format!(
                "{} request is not in a result stage",
                request.opcode
            ))
        })?;

        let (status, value) = baseline(rc);

        let payload = match reply.as_integer() {
            Some(payload) => payload,
            None => {
                tracing::error!(
                    "Invalid result type while creating completion: {}; opcode {}, rc={}",
                    reply.kind(),
                    request.opcode,
                    rc
                );
                return Err(BrokerError::UnexpectedReply {
                    opcode: request.opcode,
                    kind: reply.kind(),
                    rc,
                });
            }
        };

        let (status, value) = self.refine(request.opcode, step, rc, payload, status, value);

        tracing::trace!(
            "Completed {} request {:?}: rc={} -> {:?}/{}",
            request.opcode,
            request.app,
            rc,
            status,
            value
        );

        Ok(Completion::new(request.app, status, value))
    }

    /// Wrap an error detected before the backend exchange
    pub fn translate_error(&self, request: &Request, status: Status, value: i64) -> Completion {
        Completion::new(request.app, status, value)
    }

    /// Complete a request that was abandoned
    pub fn translate_cancel(&self, request: &Request) -> Completion {
        Completion::new(request.app, Status::Cancelled, 0)
    }

    /// Apply opcode-specific rules on top of the baseline
    fn refine(
        &self,
        opcode: Opcode,
        step: StageSpec,
        rc: i64,
        payload: i64,
        status: Status,
        value: i64,
    ) -> (Status, i64) {
        match opcode {
            Opcode::Put => match rc {
                codes::OK => (status, 1),
                _ => (status, value),
            },

            Opcode::Get | Opcode::Read => match rc {
                codes::OK if payload < 0 => (Status::InProgress, value),
                codes::OK => (Status::Success, payload),
                codes::NO_SPACE => (Status::OutOfUserBuffer, payload),
                _ => (status, value),
            },

            Opcode::Move => match rc {
                codes::NO_DATA => (Status::BackendGeneral, 0),
                codes::STALE => (Status::NoFile, 0),
                _ => (status, value),
            },

            Opcode::Directory => {
                if step.terminal {
                    match rc {
                        codes::OK if payload == 0 => (Status::InProgress, value),
                        codes::OK => (Status::Success, payload),
                        _ => (status, value),
                    }
                } else if status == Status::InProgress {
                    // Not expected in practice: directory listings only
                    // complete in their terminal stage.
                    tracing::warn!(
                        "Directory completion in non-terminal stage {} (payload={})",
                        step.stage,
                        payload
                    );
                    if !self.strict_stage_checks && payload != 0 {
                        (Status::Success, payload)
                    } else {
                        (status, value)
                    }
                } else {
                    (status, value)
                }
            }

            Opcode::NsCreate | Opcode::NsAttach => {
                if rc == codes::OK {
                    (status, payload)
                } else if opcode == Opcode::NsAttach {
                    (Status::NamespaceInvalid, 0)
                } else {
                    (Status::Exists, 0)
                }
            }

            // NSDELETE may complete in an earlier stage; only the terminal
            // stage is evaluated here.
            Opcode::NsDetach | Opcode::NsDelete => {
                if step.terminal && codes::is_busy(rc) {
                    (Status::NamespaceBusy, payload)
                } else {
                    (status, value)
                }
            }

            Opcode::NsQuery => {
                if step.terminal && rc == codes::OK {
                    (status, payload)
                } else {
                    (status, value)
                }
            }

            // The payload is an opaque iterator handle
            Opcode::Iterator => {
                if rc == codes::OK {
                    (status, payload)
                } else {
                    (status, value)
                }
            }

            Opcode::Remove => (status, value),
        }
    }
}

/// Opcode-independent mapping of a return code to status and value
fn baseline(rc: i64) -> (Status, i64) {
    let value = rc.max(0);
    match rc {
        codes::OK => (Status::Success, 0),
        codes::NO_ENTRY => (Status::Unavailable, value),
        codes::EXISTS => (Status::Exists, value),
        codes::PROTOCOL => (Status::BackendGeneral, value),
        codes::NO_MEMORY => (Status::NoMemory, value),
        codes::BAD_MESSAGE | codes::INVALID => (Status::Invalid, value),
        codes::WOULD_BLOCK => (Status::InProgress, value),
        rc if rc < 0 => (Status::BackendGeneral, rc.saturating_neg()),
        _ => (Status::Success, value),
    }
}
