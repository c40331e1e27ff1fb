//! Read-only inspection of provisioned objects

use std::fmt;
use tracing::info;

use crate::{models::BootstrapPlan, provisioner::Provisioner, Result};

/// What the server already has for a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub username: String,
    pub namespace: String,
    pub user_exists: bool,
    pub collection_exists: bool,
    /// Planned index names present on the collection
    pub present_indexes: Vec<String>,
    /// Planned index names not found on the collection
    pub missing_indexes: Vec<String>,
}

impl Inspection {
    /// Whether a bootstrap pass would create nothing
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.user_exists && self.collection_exists && self.missing_indexes.is_empty()
    }
}

impl fmt::Display for Inspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let present = |yes: bool| if yes { "present" } else { "missing" };

        writeln!(f, "User {}: {}", self.username, present(self.user_exists))?;
        writeln!(
            f,
            "Collection {}: {}",
            self.namespace,
            present(self.collection_exists)
        )?;
        writeln!(f, "Indexes present: {}", self.present_indexes.join(", "))?;
        if self.missing_indexes.is_empty() {
            write!(f, "Indexes missing: none")
        } else {
            write!(f, "Indexes missing: {}", self.missing_indexes.join(", "))
        }
    }
}

/// Inspect the server for the objects a plan provisions, without mutating it
pub async fn inspect(provisioner: &dyn Provisioner, plan: &BootstrapPlan) -> Result<Inspection> {
    let user_exists = provisioner.user_exists(&plan.credential).await?;
    let collection_exists = provisioner.collection_exists(&plan.collection).await?;

    let existing = if collection_exists {
        provisioner.index_names(&plan.collection).await?
    } else {
        Vec::new()
    };

    let (present_indexes, missing_indexes): (Vec<_>, Vec<_>) = plan
        .indexes
        .iter()
        .map(crate::models::IndexSpec::index_name)
        .partition(|name| existing.contains(name));

    let inspection = Inspection {
        username: plan.credential.username.clone(),
        namespace: plan.collection.namespace(),
        user_exists,
        collection_exists,
        present_indexes,
        missing_indexes,
    };

    for line in inspection.to_string().lines() {
        info!("{line}");
    }

    Ok(inspection)
}
