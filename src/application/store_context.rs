//! Store identity, resolved once and read-only afterwards.

use std::sync::OnceLock;
use serde::Serialize;
use thiserror::Error;
use crate::domain::value_objects::StoreId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreContextError {
    #[error("Store id already resolved to {0}")]
    AlreadyResolved(StoreId),
}

/// Handed to whatever needs the store id. `id()` is `None` until [`StoreContext::resolve`] runs.
#[derive(Debug, Default)]
pub struct StoreContext {
    id: OnceLock<StoreId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreIdentity {
    pub id: Option<StoreId>,
}

impl StoreContext {
    pub fn unresolved() -> Self { Self::default() }

    pub fn resolved(id: StoreId) -> Self {
        let ctx = Self::default();
        let _ = ctx.id.set(id);
        ctx
    }

    pub fn resolve(&self, id: StoreId) -> Result<(), StoreContextError> {
        self.id.set(id).map_err(|_| StoreContextError::AlreadyResolved(self.id.get().copied().unwrap_or(id)))?;
        tracing::info!(store_id = %id, "store identity resolved");
        Ok(())
    }

    pub fn id(&self) -> Option<StoreId> { self.id.get().copied() }
    pub fn is_resolved(&self) -> bool { self.id.get().is_some() }
    pub fn identity(&self) -> StoreIdentity { StoreIdentity { id: self.id() } }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE_ID: &str = "c0530f4d-68dd-43b8-9867-580a8e101056";

    #[test]
    fn test_absent_until_resolved() {
        let ctx = StoreContext::unresolved();
        assert_eq!(ctx.id(), None);
        assert!(!ctx.is_resolved());
        let id: StoreId = TEMPLATE_ID.parse().unwrap();
        ctx.resolve(id).unwrap();
        assert_eq!(ctx.identity(), StoreIdentity { id: Some(id) });
    }

    #[test]
    fn test_second_resolve_is_refused() {
        let first: StoreId = TEMPLATE_ID.parse().unwrap();
        let ctx = StoreContext::resolved(first);
        let other: StoreId = "00000000-0000-0000-0000-000000000001".parse().unwrap();
        assert_eq!(ctx.resolve(other), Err(StoreContextError::AlreadyResolved(first)));
        assert_eq!(ctx.id(), Some(first));
    }

    #[test]
    fn test_identity_serializes_null_before_resolution() {
        let json = serde_json::to_value(StoreContext::unresolved().identity()).unwrap();
        assert_eq!(json, serde_json::json!({ "id": null }));
    }
}
