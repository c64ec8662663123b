use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A project reference as it appears in sharing documents. `id` is the opaque platform
/// identifier and `name` the human label. An empty `id` means the name has not been resolved yet.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ProjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
}

impl ProjectMeta {
    pub fn new<S1, S2>(id: S1, name: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// A reference that only carries a name, e.g. one read from a desired document.
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.id.is_empty()
    }
}

impl Display for ProjectMeta {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.id.is_empty() {
            write!(f, "'{}'", self.name)
        } else {
            write!(f, "'{}' ({})", self.name, self.id)
        }
    }
}
