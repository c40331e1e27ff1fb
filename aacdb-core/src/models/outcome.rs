use std::fmt;

/// Server code for `createUser` on an existing principal
pub const USER_ALREADY_EXISTS: i32 = 51003;
/// Server code `NamespaceExists` for `createCollection`
pub const NAMESPACE_EXISTS: i32 = 48;
/// Server code `IndexOptionsConflict` for `createIndexes`
pub const INDEX_ALREADY_EXISTS: i32 = 85;

/// Kind of provisioning operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    User,
    Collection,
    Index,
}

impl OperationKind {
    /// The one server code that means "already exists" for this kind
    #[must_use]
    pub const fn benign_code(self) -> i32 {
        match self {
            Self::User => USER_ALREADY_EXISTS,
            Self::Collection => NAMESPACE_EXISTS,
            Self::Index => INDEX_ALREADY_EXISTS,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Collection => "collection",
            Self::Index => "index",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one provisioning attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    AlreadyExists,
    Failed(String),
}

impl Outcome {
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Translate a server error into an outcome.
///
/// `code` is `None` for errors that never reached the server (network,
/// server selection, auth handshake). Only the benign code of `kind` maps to
/// [`Outcome::AlreadyExists`]; every other code is a genuine failure.
#[must_use]
pub fn classify(kind: OperationKind, code: Option<i32>, message: impl Into<String>) -> Outcome {
    match code {
        Some(code) if code == kind.benign_code() => Outcome::AlreadyExists,
        _ => Outcome::Failed(message.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benign_code_per_kind() {
        assert_eq!(
            classify(OperationKind::User, Some(51003), "exists"),
            Outcome::AlreadyExists
        );
        assert_eq!(
            classify(OperationKind::Collection, Some(48), "exists"),
            Outcome::AlreadyExists
        );
        assert_eq!(
            classify(OperationKind::Index, Some(85), "exists"),
            Outcome::AlreadyExists
        );
    }

    #[test]
    fn test_other_kinds_code_is_not_benign() {
        assert!(classify(OperationKind::User, Some(48), "x").is_failed());
        assert!(classify(OperationKind::Collection, Some(85), "x").is_failed());
        assert!(classify(OperationKind::Index, Some(51003), "x").is_failed());
    }

    #[test]
    fn test_permission_denied_is_failure() {
        let outcome = classify(OperationKind::User, Some(13), "not authorized on admin");
        assert_eq!(
            outcome,
            Outcome::Failed("not authorized on admin".to_string())
        );
    }

    #[test]
    fn test_missing_code_is_failure() {
        assert!(classify(OperationKind::Index, None, "connection reset").is_failed());
    }
}
