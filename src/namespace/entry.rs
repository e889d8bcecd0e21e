//! Namespace entity
//!
//! Reference count and validity token live together in one atomic word:
//! ```text
//! ┌────────────────────────┬────────────────────────┐
//! │   refcount (32 bits)   │  CRC-32 token (32 bits)│
//! └────────────────────────┴────────────────────────┘
//! ```
//! The token is computed over the name bytes followed by the refcount, so a
//! refcount changed behind the API no longer matches its token. An all-zero
//! word marks a released namespace.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::MAX_KEY_LEN;
use crate::error::{BrokerError, Result};

/// Source of process-unique namespace identities
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a namespace, independent of its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespaceId(u64);

impl NamespaceId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Unpacked view of the refcount/token word
///
/// Exported and restored when a handle crosses into shared memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawState {
    pub refcount: u32,
    pub token: u32,
}

impl RawState {
    const RELEASED: u64 = 0;

    fn pack(self) -> u64 {
        (u64::from(self.refcount) << 32) | u64::from(self.token)
    }

    fn unpack(word: u64) -> Self {
        Self {
            refcount: (word >> 32) as u32,
            token: word as u32,
        }
    }
}

/// Compute the validity token for a name at a given refcount
fn compute_token(name: &str, refcount: u32) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(name.as_bytes());
    hasher.update(&refcount.to_le_bytes());
    hasher.finalize()
}

struct Inner {
    id: NamespaceId,
    name: String,
    state: AtomicU64,
}

/// Handle to a reference-counted namespace
///
/// Cloning the handle does not change the refcount; only [`attach`],
/// [`detach`] and [`destroy`] do. Every mutator validates the token and
/// updates the word in a single compare-and-swap, so a concurrent attach can
/// never revive a namespace that a detach just released.
///
/// [`attach`]: Namespace::attach
/// [`detach`]: Namespace::detach
/// [`destroy`]: Namespace::destroy
#[derive(Clone)]
pub struct Namespace {
    inner: Arc<Inner>,
}

impl Namespace {
    /// Create a namespace with refcount 1 (name limit MAX_KEY_LEN)
    pub fn create(name: &str) -> Result<Self> {
        Self::create_with_limit(name, MAX_KEY_LEN)
    }

    /// Create a namespace with refcount 1, enforcing `max_len` on the name
    pub fn create_with_limit(name: &str, max_len: usize) -> Result<Self> {
        if name.is_empty() {
            return Err(BrokerError::InvalidArgument(
                "namespace name must not be empty".to_string(),
            ));
        }
        if name.len() > max_len {
            return Err(BrokerError::NameTooLong {
                len: name.len(),
                max: max_len,
            });
        }

        let state = RawState {
            refcount: 1,
            token: compute_token(name, 1),
        };
        let namespace = Self {
            inner: Arc::new(Inner {
                id: NamespaceId::next(),
                name: name.to_string(),
                state: AtomicU64::new(state.pack()),
            }),
        };

        tracing::debug!("Created namespace '{}' ({:?})", name, namespace.id());
        Ok(namespace)
    }

    /// Add a holder; returns the new refcount
    pub fn attach(&self) -> Result<u32> {
        self.update("attach", |refcount| {
            refcount
                .checked_add(1)
                .ok_or_else(|| BrokerError::RefcountOverflow {
                    name: self.inner.name.clone(),
                })
        })
    }

    /// Drop a holder; returns the new refcount
    ///
    /// Dropping the last holder releases the namespace and returns 0.
    pub fn detach(&self) -> Result<u32> {
        let refcount = self.update("detach", |refcount| Ok(refcount - 1))?;
        if refcount == 0 {
            tracing::debug!("Namespace '{}' released on last detach", self.inner.name);
        }
        Ok(refcount)
    }

    /// Release the namespace; the caller must be the only holder
    pub fn destroy(&self) -> Result<u32> {
        self.update("destroy", |refcount| {
            if refcount > 1 {
                Err(BrokerError::Busy {
                    name: self.inner.name.clone(),
                    refcount,
                })
            } else {
                Ok(0)
            }
        })?;
        tracing::debug!("Destroyed namespace '{}'", self.inner.name);
        Ok(0)
    }

    /// Validate the word and swap in the refcount produced by `f`
    fn update<F>(&self, op: &str, f: F) -> Result<u32>
    where
        F: Fn(u32) -> Result<u32>,
    {
        let mut current = self.inner.state.load(Ordering::Acquire);
        loop {
            let raw = RawState::unpack(current);
            if !self.is_valid(raw) {
                tracing::error!(
                    "Namespace '{}' failed validation on {} (refcount={}, token={:#010x})",
                    self.inner.name,
                    op,
                    raw.refcount,
                    raw.token
                );
                return Err(BrokerError::Corrupted {
                    name: self.inner.name.clone(),
                });
            }

            let refcount = f(raw.refcount)?;
            let next = if refcount == 0 {
                RawState::RELEASED
            } else {
                RawState {
                    refcount,
                    token: compute_token(&self.inner.name, refcount),
                }
                .pack()
            };

            match self.inner.state.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(refcount),
                Err(actual) => current = actual,
            }
        }
    }

    fn is_valid(&self, raw: RawState) -> bool {
        raw.refcount > 0 && raw.token == compute_token(&self.inner.name, raw.refcount)
    }

    // =========================================================================
    // Accessors (no validation)
    // =========================================================================

    pub fn id(&self) -> NamespaceId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn name_len(&self) -> usize {
        self.inner.name.len()
    }

    /// Current refcount as stored, even if the token does not match
    pub fn refcount(&self) -> u32 {
        RawState::unpack(self.inner.state.load(Ordering::Acquire)).refcount
    }

    /// Whether the namespace is active and its word validates
    pub fn is_live(&self) -> bool {
        self.is_valid(self.raw_state())
    }

    /// Whether two handles refer to the same namespace
    pub fn same_as(&self, other: &Namespace) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // =========================================================================
    // Shared-memory boundary
    // =========================================================================

    /// Export the refcount/token word
    pub fn raw_state(&self) -> RawState {
        RawState::unpack(self.inner.state.load(Ordering::Acquire))
    }

    /// Overwrite the refcount/token word with one read back from outside
    ///
    /// No validation happens here; the next mutator checks the token.
    pub fn restore_raw_state(&self, state: RawState) {
        self.inner.state.store(state.pack(), Ordering::Release);
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("refcount", &self.refcount())
            .finish()
    }
}
