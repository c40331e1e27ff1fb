//! Declarative specs for the objects the bootstrapper provisions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A role bound to a specific database, e.g. `readWrite@aac`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleGrant {
    pub role: String,
    #[serde(alias = "db")]
    pub database: String,
}

impl RoleGrant {
    pub fn new(role: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            database: database.into(),
        }
    }
}

impl fmt::Display for RoleGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.role, self.database)
    }
}

/// Application principal to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSpec {
    pub username: String,
    pub password: String,
    /// Authentication database the user is created in
    pub database: String,
    pub roles: Vec<RoleGrant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionSpec {
    pub database: String,
    pub name: String,
}

impl CollectionSpec {
    pub fn new(database: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            name: name.into(),
        }
    }

    /// Fully qualified namespace (`db.collection`)
    #[must_use]
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "ascending")]
    Asc,
    #[serde(alias = "descending")]
    Desc,
}

impl SortDirection {
    /// Key value used in an index key document
    #[must_use]
    pub const fn as_key(self) -> i32 {
        match self {
            Self::Asc => 1,
            Self::Desc => -1,
        }
    }
}

/// Single-field secondary index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
    #[serde(default)]
    pub unique: bool,
}

impl IndexSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
            unique: false,
        }
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Name the server assigns when none is given (`animal_id_1`)
    #[must_use]
    pub fn index_name(&self) -> String {
        format!("{}_{}", self.field, self.direction.as_key())
    }

    /// The default index set for the animals collection
    #[must_use]
    pub fn shelter_defaults() -> Vec<Self> {
        vec![
            Self::asc("animal_id").unique(),
            Self::asc("rec_num"),
            Self::asc("name"),
            Self::asc("animal_type"),
            Self::asc("breed"),
            Self::asc("outcome_type"),
            Self::asc("datetime"),
        ]
    }
}

/// Fields present in the shelter outcomes dataset. Documentation only.
pub const DOCUMENTED_FIELDS: [&str; 16] = [
    "rec_num",
    "age_upon_outcome",
    "animal_id",
    "animal_type",
    "breed",
    "color",
    "date_of_birth",
    "datetime",
    "monthyear",
    "name",
    "outcome_subtype",
    "outcome_type",
    "sex_upon_outcome",
    "location_lat",
    "location_long",
    "age_upon_outcome_in_weeks",
];

/// Everything one bootstrap pass provisions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapPlan {
    pub credential: CredentialSpec,
    pub collection: CollectionSpec,
    pub indexes: Vec<IndexSpec>,
    pub documented_fields: Vec<String>,
}

impl BootstrapPlan {
    #[must_use]
    pub fn indexed_fields(&self) -> Vec<String> {
        self.indexes.iter().map(|i| i.field.clone()).collect()
    }
}
