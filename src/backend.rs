//! Backend Module
//!
//! The facade request-processing workers call once a backend exchange has
//! finished.
//!
//! ## Responsibilities
//! - Translate (request, reply, rc) into a completion
//! - Keep local namespace bookkeeping in step with successful namespace
//!   completions
//! - Track the active namespaces in a registry

use crate::completion::{Completion, Request, Translator};
use crate::config::Config;
use crate::error::{BrokerError, Result};
use crate::namespace::{Namespace, NamespaceRegistry};
use crate::protocol::{Opcode, Reply, Status};

/// Completion and namespace front end of the broker backend
///
/// ## Concurrency
/// All methods take `&self`. Each namespace completion is applied through a
/// single registry operation that looks the name up and changes refcount and
/// membership under one write lock, so one `Backend` can be shared (e.g.
/// behind an `Arc`) by a pool of workers.
pub struct Backend {
    /// Backend configuration
    config: Config,

    /// Opcode-aware completion translator
    translator: Translator,

    /// Currently active namespaces
    registry: NamespaceRegistry,
}

impl Backend {
    /// Create a backend with the given config
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let translator = Translator::from_config(&config);
        let registry = NamespaceRegistry::with_capacity(config.registry_capacity);

        tracing::debug!(
            "Backend ready (max_name_len={}, strict_stage_checks={})",
            config.max_name_len,
            config.strict_stage_checks
        );

        Ok(Self {
            config,
            translator,
            registry,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &NamespaceRegistry {
        &self.registry
    }

    /// Complete a request whose backend exchange has finished
    ///
    /// Successful namespace completions also update the local namespace
    /// state:
    /// - NSCREATE: create and register
    /// - NSATTACH: attach (creating the local entry on first use)
    /// - NSDETACH: detach, unregister when the last holder leaves
    /// - NSDELETE: destroy and unregister
    pub fn complete(&self, request: &Request, reply: &Reply, rc: i64) -> Result<Completion> {
        // Completions from an earlier stage were already applied then
        if let Some(completion) = request.completion {
            return Ok(completion);
        }

        let completion = self.translator.translate(request, reply, rc)?;
        if !completion.is_success() || !request.opcode.is_namespace_op() {
            return Ok(completion);
        }

        match request.namespace.as_deref() {
            Some(name) => self.apply_namespace_effect(request.opcode, name, completion),
            None => Ok(completion),
        }
    }

    /// Complete a request that failed before reaching the backend
    pub fn complete_error(&self, request: &Request, status: Status, value: i64) -> Completion {
        self.translator.translate_error(request, status, value)
    }

    /// Complete an abandoned request
    pub fn complete_cancel(&self, request: &Request) -> Completion {
        self.translator.translate_cancel(request)
    }

    fn apply_namespace_effect(
        &self,
        opcode: Opcode,
        name: &str,
        completion: Completion,
    ) -> Result<Completion> {
        let max_name_len = self.config.max_name_len;
        let create = || Namespace::create_with_limit(name, max_name_len);

        match opcode {
            Opcode::NsCreate => {
                let (_, inserted) = self.registry.get_or_insert_with(name, create)?;
                if !inserted {
                    tracing::warn!("Namespace '{}' created remotely but already registered", name);
                }
                Ok(completion)
            }

            Opcode::NsAttach => {
                self.registry.attach_or_insert_with(name, create)?;
                Ok(completion)
            }

            Opcode::NsDetach => {
                self.registry.detach_named(name)?;
                Ok(completion)
            }

            Opcode::NsDelete => match self.registry.destroy_named(name) {
                Ok(_) => Ok(completion),
                Err(BrokerError::Busy { refcount, .. }) => {
                    tracing::debug!(
                        "Namespace '{}' deleted remotely but still held locally ({} holders)",
                        name,
                        refcount
                    );
                    Ok(Completion::new(
                        completion.app,
                        Status::NamespaceBusy,
                        i64::from(refcount),
                    ))
                }
                Err(e) => Err(e),
            },

            _ => Ok(completion),
        }
    }

    /// Look up an active namespace by name
    pub fn namespace(&self, name: &str) -> Option<Namespace> {
        self.registry.find(name)
    }

    pub fn namespace_count(&self) -> usize {
        self.registry.len()
    }

    /// Forget all tracked namespaces; returns how many were dropped
    pub fn shutdown(&self) -> usize {
        let released = self.registry.clean();
        tracing::debug!("Backend shut down, {} namespaces unregistered", released);
        released
    }
}
