use std::fmt;

use super::outcome::{OperationKind, Outcome};

/// Outcome of a single step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub kind: OperationKind,
    /// What the step acted on (username, namespace or index name)
    pub target: String,
    pub outcome: Outcome,
}

/// Record of one bootstrap pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub database: String,
    pub collection: String,
    pub username: String,
    pub steps: Vec<StepReport>,
    pub indexed_fields: Vec<String>,
    pub documented_fields: Vec<String>,
}

impl Report {
    pub fn record(&mut self, kind: OperationKind, target: impl Into<String>, outcome: Outcome) {
        self.steps.push(StepReport {
            kind,
            target: target.into(),
            outcome,
        });
    }

    pub fn created(&self) -> impl Iterator<Item = &StepReport> {
        self.steps
            .iter()
            .filter(|s| s.outcome == Outcome::Created)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &StepReport> {
        self.steps
            .iter()
            .filter(|s| s.outcome == Outcome::AlreadyExists)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|s| s.outcome.is_failed())
    }

    /// Steps of one kind, in the order they ran
    pub fn steps_of(&self, kind: OperationKind) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(move |s| s.kind == kind)
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Bootstrap finished: {} created, {} already present, {} failed",
            self.created().count(),
            self.skipped().count(),
            self.failures().count()
        )?;
        writeln!(f, "Database: {}", self.database)?;
        writeln!(f, "Collection: {}", self.collection)?;
        writeln!(f, "User: {}", self.username)?;
        writeln!(f, "Indexes created for: {}", self.indexed_fields.join(", "))?;
        write!(f, "Fields supported: {}", self.documented_fields.join(", "))?;

        for step in self.failures() {
            if let Outcome::Failed(detail) = &step.outcome {
                write!(f, "\nFailed {} '{}': {}", step.kind, step.target, detail)?;
            }
        }
        Ok(())
    }
}
