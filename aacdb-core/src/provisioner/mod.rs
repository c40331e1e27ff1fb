//! Server-side provisioning operations
//!
//! A [`Provisioner`] performs single create operations and answers
//! read-only questions about what already exists. Create operations never
//! return errors: server failures are translated into an [`Outcome`] by
//! [`classify`](crate::models::classify) so callers branch on the tag, not on
//! server codes.

pub mod mongo;

use async_trait::async_trait;

use crate::{
    models::{CollectionSpec, CredentialSpec, IndexSpec, Outcome},
    Result,
};

pub use mongo::MongoProvisioner;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Create the principal with exactly the declared roles
    async fn ensure_user(&self, credential: &CredentialSpec) -> Outcome;

    async fn ensure_collection(&self, collection: &CollectionSpec) -> Outcome;

    async fn ensure_index(&self, collection: &CollectionSpec, index: &IndexSpec) -> Outcome;

    async fn user_exists(&self, credential: &CredentialSpec) -> Result<bool>;

    async fn collection_exists(&self, collection: &CollectionSpec) -> Result<bool>;

    /// Names of every index on the collection, including `_id_`
    async fn index_names(&self, collection: &CollectionSpec) -> Result<Vec<String>>;
}
