use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::{Map, Value};

use policy_sync::{DataStoreClient, PolicyBundle, StoreError};

use crate::gate::ReadinessGate;
use crate::path;

/// In-memory policy and policy-data store.
///
/// Backs tests and local development. The policy set and the data tree
/// live behind one mutex owned by the instance; the readiness gate is
/// built eagerly with the store so every consumer waits on the same
/// latch. Lock sections are short and never held across an await.
///
/// `set_policies` replaces the policy set in one lock acquisition, so a
/// bulk write is all-or-nothing with respect to other store calls.
pub struct InMemoryDataStore {
    inner: Mutex<Inner>,
    gate: ReadinessGate,
}

struct Inner {
    policies: HashMap<String, String>,
    policy_version: Option<String>,
    data: Value,
}

impl InMemoryDataStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                policies: HashMap::new(),
                policy_version: None,
                data: Value::Object(Map::new()),
            }),
            gate: ReadinessGate::new(),
        }
    }

    /// Suspend until the store has received its first data write, at any
    /// path. Returns immediately once that has ever happened.
    pub async fn wait_for_data(&self) {
        self.gate.wait().await;
    }
}

impl Default for InMemoryDataStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the node at `path`, if present.
fn subtree<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut node = root;
    for segment in path::segments(path) {
        node = node.get(segment)?;
    }
    Some(node)
}

/// Upsert `value` at `path`, creating intermediate objects along the way.
/// A non-object intermediate node is replaced by an object.
fn write_subtree(root: &mut Value, path: &str, value: Value) {
    let segments = path::segments(path);
    let Some((leaf, parents)) = segments.split_last() else {
        *root = value;
        return;
    };

    let mut node = root;
    for segment in parents {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        node = node
            .as_object_mut()
            .unwrap()
            .entry(*segment)
            .or_insert_with(|| Value::Object(Map::new()));
    }

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    node.as_object_mut().unwrap().insert((*leaf).to_owned(), value);
}

/// Remove the node at a non-root `path`. Returns the removed value, or
/// `None` when the path does not exist.
fn remove_subtree(root: &mut Value, path: &str) -> Option<Value> {
    let segments = path::segments(path);
    let (leaf, parents) = segments.split_last()?;

    let mut node = root;
    for segment in parents {
        node = node.get_mut(*segment)?;
    }
    node.as_object_mut()?.remove(*leaf)
}

#[async_trait::async_trait]
impl DataStoreClient for InMemoryDataStore {
    async fn set_policy(&self, id: &str, code: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.policies.insert(id.to_owned(), code.to_owned());
        Ok(())
    }

    async fn get_policy(&self, id: &str) -> Result<Option<String>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.policies.get(id).cloned())
    }

    async fn delete_policy(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.policies.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::PolicyNotFound { id: id.to_owned() }),
        }
    }

    async fn list_policy_ids(&self) -> Result<Vec<String>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.policies.keys().cloned().collect())
    }

    async fn get_policies(&self) -> Result<HashMap<String, String>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.policies.clone())
    }

    async fn set_policies(&self, bundle: &PolicyBundle) -> Result<(), StoreError> {
        tracing::debug!(
            modules = bundle.modules.len(),
            version = bundle.version.as_deref().unwrap_or("none"),
            "replacing policy set"
        );

        let mut inner = self.inner.lock().unwrap();
        inner.policies.clear();
        for module in &bundle.modules {
            // Later duplicates win, matching single set_policy calls.
            inner
                .policies
                .insert(module.id.clone(), module.code.clone());
        }
        inner.policy_version = bundle.version.clone();
        Ok(())
    }

    async fn get_policy_version(&self) -> Result<Option<String>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.policy_version.clone())
    }

    async fn set_policy_data(&self, value: Value, path: &str) -> Result<(), StoreError> {
        {
            let mut inner = self.inner.lock().unwrap();
            write_subtree(&mut inner.data, path, value);
        }

        // The gate tracks "any data ever written", not arrival at a
        // specific path.
        self.gate.set();
        Ok(())
    }

    async fn get_data(&self, path: &str) -> Result<Value, StoreError> {
        let inner = self.inner.lock().unwrap();
        match subtree(&inner.data, path) {
            Some(value) => Ok(value.clone()),
            None => Err(StoreError::NotFound {
                path: path.to_owned(),
            }),
        }
    }

    async fn get_data_with_input(&self, path: &str, _input: &Value) -> Result<Value, StoreError> {
        // No evaluation engine backs the in-memory store; resolve the path
        // and answer with an empty result document.
        let inner = self.inner.lock().unwrap();
        match subtree(&inner.data, path) {
            Some(_) => Ok(Value::Object(Map::new())),
            None => Err(StoreError::NotFound {
                path: path.to_owned(),
            }),
        }
    }

    async fn delete_policy_data(&self, path: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();

        if path::is_root(path) {
            inner.data = Value::Object(Map::new());
            return Ok(());
        }

        match remove_subtree(&mut inner.data, path) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound {
                path: path.to_owned(),
            }),
        }
    }

    async fn is_ready(&self) -> bool {
        self.gate.is_set()
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}
