//! Test helpers for aacdb-core tests
//!
//! [`MemoryServer`] is an in-memory stand-in for a database server. It
//! rejects duplicate creates with the same server codes a real deployment
//! uses and runs them through [`classify`], so tests exercise the real
//! outcome mapping.

use parking_lot::Mutex;
use std::collections::HashMap;

use async_trait::async_trait;

use crate::{
    models::{
        classify, CollectionSpec, CredentialSpec, IndexSpec, OperationKind, Outcome, RoleGrant,
        INDEX_ALREADY_EXISTS, NAMESPACE_EXISTS, USER_ALREADY_EXISTS,
    },
    provisioner::Provisioner,
    Result,
};

/// Server-side objects, comparable between runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerState {
    pub users: HashMap<String, Vec<RoleGrant>>,
    pub collections: Vec<String>,
    pub indexes: HashMap<String, Vec<IndexSpec>>,
}

#[derive(Default)]
pub struct MemoryServer {
    state: Mutex<ServerState>,
    failures: Mutex<HashMap<(OperationKind, String), (i32, String)>>,
}

impl MemoryServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the create of `target` fail with the given server code
    pub fn fail(&self, kind: OperationKind, target: &str, code: i32, message: &str) {
        self.failures
            .lock()
            .insert((kind, target.to_string()), (code, message.to_string()));
    }

    /// Provision a user out of band
    pub fn add_user(&self, username: &str, roles: Vec<RoleGrant>) {
        self.state.lock().users.insert(username.to_string(), roles);
    }

    pub fn users(&self) -> HashMap<String, Vec<RoleGrant>> {
        self.state.lock().users.clone()
    }

    pub fn collections(&self) -> Vec<String> {
        self.state.lock().collections.clone()
    }

    pub fn indexes(&self, namespace: &str) -> Vec<IndexSpec> {
        self.state
            .lock()
            .indexes
            .get(namespace)
            .cloned()
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> ServerState {
        self.state.lock().clone()
    }

    fn injected(&self, kind: OperationKind, target: &str) -> Option<Outcome> {
        self.failures
            .lock()
            .get(&(kind, target.to_string()))
            .map(|(code, message)| classify(kind, Some(*code), message.clone()))
    }
}

#[async_trait]
impl Provisioner for MemoryServer {
    async fn ensure_user(&self, credential: &CredentialSpec) -> Outcome {
        if let Some(outcome) = self.injected(OperationKind::User, &credential.username) {
            return outcome;
        }
        let mut state = self.state.lock();
        if state.users.contains_key(&credential.username) {
            return classify(
                OperationKind::User,
                Some(USER_ALREADY_EXISTS),
                "User already exists",
            );
        }
        state
            .users
            .insert(credential.username.clone(), credential.roles.clone());
        Outcome::Created
    }

    async fn ensure_collection(&self, collection: &CollectionSpec) -> Outcome {
        let namespace = collection.namespace();
        if let Some(outcome) = self.injected(OperationKind::Collection, &namespace) {
            return outcome;
        }
        let mut state = self.state.lock();
        if state.collections.contains(&namespace) {
            return classify(
                OperationKind::Collection,
                Some(NAMESPACE_EXISTS),
                "Collection already exists",
            );
        }
        state.collections.push(namespace);
        Outcome::Created
    }

    async fn ensure_index(&self, collection: &CollectionSpec, index: &IndexSpec) -> Outcome {
        if let Some(outcome) = self.injected(OperationKind::Index, &index.index_name()) {
            return outcome;
        }
        let namespace = collection.namespace();
        let mut state = self.state.lock();
        // createIndexes implicitly creates the collection
        if !state.collections.contains(&namespace) {
            state.collections.push(namespace.clone());
        }
        let indexes = state.indexes.entry(namespace).or_default();
        if indexes
            .iter()
            .any(|existing| existing.index_name() == index.index_name())
        {
            return classify(
                OperationKind::Index,
                Some(INDEX_ALREADY_EXISTS),
                "Index already exists",
            );
        }
        indexes.push(index.clone());
        Outcome::Created
    }

    async fn user_exists(&self, credential: &CredentialSpec) -> Result<bool> {
        Ok(self.state.lock().users.contains_key(&credential.username))
    }

    async fn collection_exists(&self, collection: &CollectionSpec) -> Result<bool> {
        Ok(self
            .state
            .lock()
            .collections
            .contains(&collection.namespace()))
    }

    async fn index_names(&self, collection: &CollectionSpec) -> Result<Vec<String>> {
        let mut names = vec!["_id_".to_string()];
        names.extend(
            self.indexes(&collection.namespace())
                .iter()
                .map(IndexSpec::index_name),
        );
        Ok(names)
    }
}
