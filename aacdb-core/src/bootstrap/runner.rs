//! The provisioning pass

use tracing::{error, info};

use crate::{
    models::{BootstrapPlan, OperationKind, Outcome, Report},
    provisioner::Provisioner,
};

/// Runs the fixed provisioning sequence for a plan
///
/// Steps run strictly in order: user, collection, then each index. A failed
/// step is recorded and logged, and the pass continues; nothing is retried
/// or rolled back. Running the same plan again leaves the server unchanged.
#[derive(Debug, Clone)]
pub struct Bootstrapper {
    plan: BootstrapPlan,
}

impl Bootstrapper {
    #[must_use]
    pub const fn new(plan: BootstrapPlan) -> Self {
        Self { plan }
    }

    #[must_use]
    pub const fn plan(&self) -> &BootstrapPlan {
        &self.plan
    }

    pub async fn run(&self, provisioner: &dyn Provisioner) -> Report {
        let plan = &self.plan;
        let mut report = Report {
            database: plan.collection.database.clone(),
            collection: plan.collection.name.clone(),
            username: plan.credential.username.clone(),
            indexed_fields: plan.indexed_fields(),
            documented_fields: plan.documented_fields.clone(),
            ..Report::default()
        };

        let outcome = provisioner.ensure_user(&plan.credential).await;
        log_outcome(OperationKind::User, &plan.credential.username, &outcome);
        report.record(OperationKind::User, &plan.credential.username, outcome);

        let namespace = plan.collection.namespace();
        let outcome = provisioner.ensure_collection(&plan.collection).await;
        log_outcome(OperationKind::Collection, &namespace, &outcome);
        report.record(OperationKind::Collection, namespace, outcome);

        for index in &plan.indexes {
            let outcome = provisioner.ensure_index(&plan.collection, index).await;
            let name = index.index_name();
            log_outcome(OperationKind::Index, &name, &outcome);
            report.record(OperationKind::Index, name, outcome);
        }

        for line in report.to_string().lines() {
            info!("{line}");
        }

        report
    }
}

fn log_outcome(kind: OperationKind, target: &str, outcome: &Outcome) {
    match outcome {
        Outcome::Created => {
            info!(kind = %kind, object = target, "Created {kind} {target}");
        }
        Outcome::AlreadyExists => {
            info!(
                kind = %kind,
                object = target,
                "{kind} {target} already exists, skipping creation"
            );
        }
        Outcome::Failed(detail) => {
            error!(
                kind = %kind,
                object = target,
                "Error creating {kind} {target}: {detail}"
            );
        }
    }
}
