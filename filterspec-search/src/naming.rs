//! Index field naming.

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

/// How model field names map to index field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldNaming {
    /// Use the model field name unchanged.
    #[default]
    AsIs,
    /// `created_at` becomes `createdAt`.
    CamelCase,
}

impl FieldNaming {
    pub fn apply(&self, name: &str) -> String {
        match self {
            Self::AsIs => name.to_string(),
            Self::CamelCase => name.to_case(Case::Camel),
        }
    }
}
