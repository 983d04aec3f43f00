use derive_more::{Display, From};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
pub struct VersionId(u64);

/// A release of the underlying program that can be selected as current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    id: VersionId,
    /// Release label, e.g. `v0.12.0`
    revision: String,
    installed: bool,
}

impl Version {
    pub fn new(id: VersionId, revision: &str, installed: bool) -> Self {
        Self {
            id,
            revision: revision.into(),
            installed,
        }
    }

    pub fn id(&self) -> VersionId {
        self.id
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    pub fn installed(&self) -> bool {
        self.installed
    }
}
