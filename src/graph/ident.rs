//! Identity generation for graph entities
//!
//! The graph assigns identities through an injected generator so that
//! production code gets globally unique random identities while tests can
//! substitute a deterministic sequence.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of globally unique, comparable entity identities.
pub trait IdGenerator: Send + Sync {
    /// Produce the next identity. Must never repeat for the lifetime of the
    /// generator.
    fn next_id(&self) -> Uuid;
}

/// Random version-4 identities for production use.
#[derive(Debug, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic sequential identities, mainly for tests.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> Uuid {
        // Start at 1 so no entity ever carries the nil uuid.
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        Uuid::from_u128(n as u128)
    }
}
