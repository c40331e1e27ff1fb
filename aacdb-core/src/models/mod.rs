pub mod outcome;
pub mod report;
pub mod spec;

pub use outcome::{
    classify, OperationKind, Outcome, INDEX_ALREADY_EXISTS, NAMESPACE_EXISTS, USER_ALREADY_EXISTS,
};
pub use report::{Report, StepReport};
pub use spec::{
    BootstrapPlan, CollectionSpec, CredentialSpec, IndexSpec, RoleGrant, SortDirection,
    DOCUMENTED_FIELDS,
};
