use derive_more::{Display, From};

/// Identity of a [`Mod`], unique within its list for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
pub struct ModId(u64);

/// A mod shown in the panel.
///
/// The canonical list in the store owns these records. Views hand out copies, so changing
/// one has no effect on the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mod {
    id: ModId,
    /// A human friendly display name
    name: String,
    enabled: bool,
}

impl Mod {
    pub fn new(id: ModId, name: &str, enabled: bool) -> Self {
        Self {
            id,
            name: name.into(),
            enabled,
        }
    }

    pub fn id(&self) -> ModId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }
}
