//! `MongoDB` implementation of [`Provisioner`]

use async_trait::async_trait;
use mongodb::{
    bson::{doc, Bson, Document},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Client, Collection, IndexModel,
};
use tracing::debug;

use super::Provisioner;
use crate::{
    models::{classify, CollectionSpec, CredentialSpec, IndexSpec, OperationKind, Outcome},
    Result,
};

/// Server code `NamespaceNotFound`
const NAMESPACE_NOT_FOUND: i32 = 26;

/// Provisions objects through a single administrative client.
///
/// Every operation resolves its own database handle from the collection or
/// credential it is given; no handle is shared between the admin and
/// application databases.
#[derive(Clone, Debug)]
pub struct MongoProvisioner {
    client: Client,
}

impl MongoProvisioner {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    fn collection(&self, spec: &CollectionSpec) -> Collection<Document> {
        self.client
            .database(&spec.database)
            .collection::<Document>(&spec.name)
    }
}

/// Numeric server code carried by a driver error, if the server answered
fn server_code(err: &mongodb::error::Error) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(command) => Some(command.code),
        ErrorKind::Write(WriteFailure::WriteError(write)) => Some(write.code),
        _ => None,
    }
}

fn outcome_of<T>(kind: OperationKind, result: mongodb::error::Result<T>) -> Outcome {
    match result {
        Ok(_) => Outcome::Created,
        Err(err) => classify(kind, server_code(&err), err.to_string()),
    }
}

fn create_user_command(credential: &CredentialSpec) -> Document {
    let roles: Vec<Bson> = credential
        .roles
        .iter()
        .map(|grant| {
            Bson::Document(doc! {
                "role": grant.role.as_str(),
                "db": grant.database.as_str(),
            })
        })
        .collect();

    doc! {
        "createUser": credential.username.as_str(),
        "pwd": credential.password.as_str(),
        "roles": roles,
    }
}

fn index_model(index: &IndexSpec) -> IndexModel {
    let options = IndexOptions::builder()
        .name(index.index_name())
        .unique(index.unique.then_some(true))
        .build();

    let mut keys = Document::new();
    keys.insert(index.field.clone(), index.direction.as_key());

    IndexModel::builder()
        .keys(keys)
        .options(options)
        .build()
}

#[async_trait]
impl Provisioner for MongoProvisioner {
    async fn ensure_user(&self, credential: &CredentialSpec) -> Outcome {
        let result = self
            .client
            .database(&credential.database)
            .run_command(create_user_command(credential))
            .await;
        outcome_of(OperationKind::User, result)
    }

    async fn ensure_collection(&self, collection: &CollectionSpec) -> Outcome {
        // Newer servers accept createCollection on an existing namespace, so
        // look first to report the skip accurately.
        match self.collection_exists(collection).await {
            Ok(true) => return Outcome::AlreadyExists,
            Ok(false) => {}
            Err(e) => debug!("Could not list collections in {}: {}", collection.database, e),
        }

        let result = self
            .client
            .database(&collection.database)
            .create_collection(&collection.name)
            .await;
        outcome_of(OperationKind::Collection, result)
    }

    async fn ensure_index(&self, collection: &CollectionSpec, index: &IndexSpec) -> Outcome {
        // createIndexes is a silent no-op for an identical index.
        match self.index_names(collection).await {
            Ok(names) if names.contains(&index.index_name()) => return Outcome::AlreadyExists,
            Ok(_) => {}
            Err(e) => debug!("Could not list indexes on {}: {}", collection.namespace(), e),
        }

        let result = self.collection(collection).create_index(index_model(index)).await;
        outcome_of(OperationKind::Index, result)
    }

    async fn user_exists(&self, credential: &CredentialSpec) -> Result<bool> {
        let reply = self
            .client
            .database(&credential.database)
            .run_command(doc! {
                "usersInfo": {
                    "user": credential.username.as_str(),
                    "db": credential.database.as_str(),
                },
            })
            .await?;

        Ok(reply
            .get_array("users")
            .is_ok_and(|users| !users.is_empty()))
    }

    async fn collection_exists(&self, collection: &CollectionSpec) -> Result<bool> {
        let names = self
            .client
            .database(&collection.database)
            .list_collection_names()
            .filter(doc! { "name": collection.name.as_str() })
            .await?;
        Ok(names.iter().any(|name| name == &collection.name))
    }

    async fn index_names(&self, collection: &CollectionSpec) -> Result<Vec<String>> {
        match self.collection(collection).list_index_names().await {
            Ok(names) => Ok(names),
            Err(e) if server_code(&e) == Some(NAMESPACE_NOT_FOUND) => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}
