//! Movement ledger persistence interface.

use async_trait::async_trait;

use crate::domain::{Movement, MovementKind, NewMovement, Page, PageRequest};
use crate::errors::Result;

/// Append-only creation and query access to the movement ledger.
#[async_trait]
pub trait MovementStore: Send + Sync {
    /// Append a ledger entry and apply its stock delta to the owning
    /// product in the same transaction. An outbound or negative-adjust
    /// movement that would take stock below zero aborts the whole unit
    /// with `InsufficientStock`; a missing product aborts with `NotFound`.
    async fn create(&self, new: NewMovement) -> Result<Movement>;

    /// All movements, newest first.
    async fn find_all(&self, page: PageRequest) -> Result<Page<Movement>>;

    /// Movements for one product, newest first.
    async fn find_by_product(&self, product_id: &str, page: PageRequest)
        -> Result<Page<Movement>>;

    /// Movements of one kind, newest first.
    async fn find_by_kind(&self, kind: MovementKind, page: PageRequest) -> Result<Page<Movement>>;

    /// Remove a ledger entry. Deletion does not reverse the entry's stock
    /// effect. Returns whether a row was actually removed.
    async fn delete(&self, id: &str) -> Result<bool>;
}
