use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single policy module: one code blob keyed by id.
/// A store holds at most one blob per id.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyModule {
    pub id: String,
    pub code: String,
}

/// A full policy set, replacing whatever the store currently holds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyBundle {
    #[serde(default)]
    pub version: Option<String>,
    pub modules: Vec<PolicyModule>,
}

/// Errors surfaced by a policy data store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no data at path {path:?}")]
    NotFound { path: String },

    #[error("policy not found: {id}")]
    PolicyNotFound { id: String },

    #[error("evaluation failed: {0}")]
    Evaluation(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// A store of policy modules and policy-relevant data.
///
/// Policies are keyed by id. Data lives in a tree addressed by
/// `/`-separated paths; the empty path is the root and denotes the whole
/// tree. Implementations may perform I/O, so every operation is async.
///
/// The store performs no local recovery: every failure surfaces to the
/// immediate caller with its kind intact.
#[async_trait::async_trait]
pub trait DataStoreClient: Send + Sync {
    async fn set_policy(&self, id: &str, code: &str) -> Result<(), StoreError>;

    async fn get_policy(&self, id: &str) -> Result<Option<String>, StoreError>;

    /// Remove a policy. Fails with `PolicyNotFound` for unknown ids.
    async fn delete_policy(&self, id: &str) -> Result<(), StoreError>;

    async fn list_policy_ids(&self) -> Result<Vec<String>, StoreError>;

    /// All stored policies, keyed by id.
    async fn get_policies(&self) -> Result<HashMap<String, String>, StoreError>;

    /// Replace the full policy set with the bundle's modules.
    ///
    /// Partial-failure semantics are implementation-defined; each
    /// realization documents whether a failed bulk write can leave a
    /// partial set behind.
    async fn set_policies(&self, bundle: &PolicyBundle) -> Result<(), StoreError>;

    async fn get_policy_version(&self) -> Result<Option<String>, StoreError>;

    /// Upsert the subtree at `path`. Writing at the root replaces the
    /// whole tree.
    async fn set_policy_data(&self, value: Value, path: &str) -> Result<(), StoreError>;

    /// Read the subtree at `path`. The root returns the full tree; a
    /// missing non-root path fails with `NotFound`.
    async fn get_data(&self, path: &str) -> Result<Value, StoreError>;

    /// Evaluate the data at `path` against an input document. Delegated to
    /// the store's evaluation engine; fails with `Evaluation` when the
    /// engine rejects the query.
    async fn get_data_with_input(&self, path: &str, input: &Value) -> Result<Value, StoreError>;

    /// Delete the subtree at `path`. Deleting the root clears the whole
    /// tree and is idempotent; a missing non-root path fails with
    /// `NotFound`.
    async fn delete_policy_data(&self, path: &str) -> Result<(), StoreError>;

    /// Whether the store has received data and can serve reads.
    async fn is_ready(&self) -> bool;

    async fn is_healthy(&self) -> bool;
}
