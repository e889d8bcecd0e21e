//! Namespace registry
//!
//! Circular list of namespace handles kept in an index-addressed arena.
//!
//! ```text
//!   anchor
//!     │
//!     ▼
//!   ┌────┐ next ┌────┐ next ┌────┐
//!   │ s0 │ ───► │ s3 │ ───► │ s1 │ ──┐
//!   └────┘ ◄─── └────┘ ◄─── └────┘   │
//!     ▲   prev         prev          │
//!     └──────────────────────────────┘
//! ```
//! `index` maps a namespace identity to its slot, which keeps insertion
//! idempotent and removal O(1). `names` maps a name to the slots registered
//! under it, oldest first.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::{Namespace, NamespaceId};
use crate::error::{BrokerError, Result};

struct Node {
    namespace: Namespace,
    prev: usize,
    next: usize,
}

#[derive(Default)]
struct Ring {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    index: HashMap<NamespaceId, usize>,
    names: HashMap<String, Vec<usize>>,
    anchor: Option<usize>,
}

impl Ring {
    fn node(&self, slot: usize) -> Option<&Node> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    fn node_mut(&mut self, slot: usize) -> Option<&mut Node> {
        self.slots.get_mut(slot).and_then(|s| s.as_mut())
    }

    fn alloc(&mut self, node: Node) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn insert(&mut self, namespace: &Namespace) -> bool {
        if self.index.contains_key(&namespace.id()) {
            return false;
        }

        let slot = match self.anchor {
            None => {
                // First member links to itself
                let slot = self.alloc(Node {
                    namespace: namespace.clone(),
                    prev: 0,
                    next: 0,
                });
                if let Some(node) = self.node_mut(slot) {
                    node.prev = slot;
                    node.next = slot;
                }
                self.anchor = Some(slot);
                slot
            }
            Some(anchor) => {
                let after = self.node(anchor).map(|n| n.next).unwrap_or(anchor);
                let slot = self.alloc(Node {
                    namespace: namespace.clone(),
                    prev: anchor,
                    next: after,
                });
                if let Some(node) = self.node_mut(anchor) {
                    node.next = slot;
                }
                if let Some(node) = self.node_mut(after) {
                    node.prev = slot;
                }
                slot
            }
        };

        self.index.insert(namespace.id(), slot);
        self.names
            .entry(namespace.name().to_string())
            .or_default()
            .push(slot);
        true
    }

    fn remove(&mut self, namespace: &Namespace) -> bool {
        let slot = match self.index.remove(&namespace.id()) {
            Some(slot) => slot,
            None => return false,
        };
        let node = match self.slots.get_mut(slot).and_then(|s| s.take()) {
            Some(node) => node,
            None => return false,
        };

        if node.next == slot {
            // Last member: the ring disappears entirely
            self.reset();
            return true;
        }

        if let Some(slots) = self.names.get_mut(namespace.name()) {
            slots.retain(|&s| s != slot);
            if slots.is_empty() {
                self.names.remove(namespace.name());
            }
        }
        if let Some(prev) = self.node_mut(node.prev) {
            prev.next = node.next;
        }
        if let Some(next) = self.node_mut(node.next) {
            next.prev = node.prev;
        }
        if self.anchor == Some(slot) {
            self.anchor = Some(node.next);
        }
        self.free.push(slot);
        true
    }

    fn reset(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.index.clear();
        self.names.clear();
        self.anchor = None;
    }

    /// Oldest registered member with the given name
    fn find(&self, name: &str) -> Option<Namespace> {
        let slot = *self.names.get(name)?.first()?;
        self.node(slot).map(|node| node.namespace.clone())
    }

    /// Walk the ring from the anchor
    fn members(&self) -> Vec<Namespace> {
        let mut members = Vec::with_capacity(self.index.len());
        let Some(anchor) = self.anchor else {
            return members;
        };

        let mut slot = anchor;
        loop {
            match self.node(slot) {
                Some(node) => {
                    members.push(node.namespace.clone());
                    slot = node.next;
                }
                None => break,
            }
            if slot == anchor || members.len() >= self.index.len() {
                break;
            }
        }
        members
    }
}

/// Tracks the currently active namespaces
///
/// ## Concurrency:
/// - Mutations (insert/remove/clean) take the write lock
/// - Lookups take the read lock
/// - The `*_named` operations look a name up and change refcount and
///   membership under one write lock, so no worker observes a namespace
///   that another worker is in the middle of releasing
/// - All methods use `&self`
pub struct NamespaceRegistry {
    ring: RwLock<Ring>,
}

impl NamespaceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty registry with room for `capacity` members
    pub fn with_capacity(capacity: usize) -> Self {
        let ring = Ring {
            slots: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            names: HashMap::with_capacity(capacity),
            ..Ring::default()
        };
        Self {
            ring: RwLock::new(ring),
        }
    }

    /// Add a namespace next to the anchor
    ///
    /// Returns `false` if it was already a member.
    pub fn insert(&self, namespace: &Namespace) -> bool {
        let inserted = self.ring.write().insert(namespace);
        if inserted {
            tracing::trace!("Registered namespace '{}'", namespace.name());
        }
        inserted
    }

    /// Unlink a namespace
    ///
    /// Returns `false` if it was not a member.
    pub fn remove(&self, namespace: &Namespace) -> bool {
        let removed = self.ring.write().remove(namespace);
        if removed {
            tracing::trace!("Unregistered namespace '{}'", namespace.name());
        }
        removed
    }

    /// Drop every node; returns how many were released
    ///
    /// Member namespaces keep their refcounts.
    pub fn clean(&self) -> usize {
        let mut ring = self.ring.write();
        let released = ring.index.len();
        ring.reset();
        released
    }

    // =========================================================================
    // Name-based operations (single write lock)
    // =========================================================================

    /// Return the member registered under `name`, or register a new one
    ///
    /// The flag is `true` when `create` ran and its namespace was inserted.
    pub fn get_or_insert_with<F>(&self, name: &str, create: F) -> Result<(Namespace, bool)>
    where
        F: FnOnce() -> Result<Namespace>,
    {
        let mut ring = self.ring.write();
        if let Some(namespace) = ring.find(name) {
            return Ok((namespace, false));
        }

        let namespace = create()?;
        ring.insert(&namespace);
        tracing::trace!("Registered namespace '{}'", name);
        Ok((namespace, true))
    }

    /// Attach the member registered under `name`, or register a new one
    ///
    /// A member found already released (refcount 0) is unregistered and
    /// replaced by a fresh namespace from `create`.
    pub fn attach_or_insert_with<F>(&self, name: &str, create: F) -> Result<Namespace>
    where
        F: FnOnce() -> Result<Namespace>,
    {
        let mut ring = self.ring.write();
        if let Some(namespace) = ring.find(name) {
            match namespace.attach() {
                Ok(_) => return Ok(namespace),
                Err(BrokerError::Corrupted { .. }) if namespace.refcount() == 0 => {
                    tracing::debug!("Replacing released namespace '{}'", name);
                    ring.remove(&namespace);
                }
                Err(e) => return Err(e),
            }
        }

        let namespace = create()?;
        ring.insert(&namespace);
        tracing::trace!("Registered namespace '{}'", name);
        Ok(namespace)
    }

    /// Detach the member registered under `name`
    ///
    /// Unregisters it when the last holder leaves. Returns the new refcount,
    /// or `None` if no member has that name.
    pub fn detach_named(&self, name: &str) -> Result<Option<u32>> {
        let mut ring = self.ring.write();
        let Some(namespace) = ring.find(name) else {
            return Ok(None);
        };

        let refcount = namespace.detach()?;
        if refcount == 0 {
            ring.remove(&namespace);
            tracing::trace!("Unregistered namespace '{}'", name);
        }
        Ok(Some(refcount))
    }

    /// Destroy and unregister the member registered under `name`
    ///
    /// Returns `false` if no member has that name. A namespace with other
    /// holders fails `Busy` and stays registered.
    pub fn destroy_named(&self, name: &str) -> Result<bool> {
        let mut ring = self.ring.write();
        let Some(namespace) = ring.find(name) else {
            return Ok(false);
        };

        namespace.destroy()?;
        ring.remove(&namespace);
        tracing::trace!("Unregistered namespace '{}'", name);
        Ok(true)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn contains(&self, namespace: &Namespace) -> bool {
        self.ring.read().index.contains_key(&namespace.id())
    }

    /// Oldest registered member with the given name
    pub fn find(&self, name: &str) -> Option<Namespace> {
        self.ring.read().find(name)
    }

    /// Number of members registered under `name`
    pub fn count_named(&self, name: &str) -> usize {
        self.ring.read().names.get(name).map_or(0, |slots| slots.len())
    }

    pub fn len(&self) -> usize {
        self.ring.read().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.read().anchor.is_none()
    }

    /// Number of occupied arena slots
    pub fn node_count(&self) -> usize {
        self.ring.read().slots.iter().filter(|s| s.is_some()).count()
    }

    /// Member the ring is currently anchored at
    pub fn anchor(&self) -> Option<Namespace> {
        let ring = self.ring.read();
        ring.anchor
            .and_then(|slot| ring.node(slot))
            .map(|node| node.namespace.clone())
    }

    /// Successor of a member in ring order
    pub fn next_of(&self, namespace: &Namespace) -> Option<Namespace> {
        let ring = self.ring.read();
        let slot = *ring.index.get(&namespace.id())?;
        let next = ring.node(slot)?.next;
        ring.node(next).map(|node| node.namespace.clone())
    }

    /// Snapshot of all members in ring order, starting at the anchor
    pub fn members(&self) -> Vec<Namespace> {
        self.ring.read().members()
    }
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
