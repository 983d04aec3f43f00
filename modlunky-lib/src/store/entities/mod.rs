//! Records displayed by the mod panel.

use std::marker::PhantomData;

mod mod_;
mod version;

pub use mod_::{Mod, ModId};
pub use version::{Version, VersionId};

/// Allocates monotonically increasing identities for one list of records.
#[derive(Debug)]
pub struct IdCounter<I> {
    next: u64,
    _marker: PhantomData<I>,
}

impl<I: From<u64>> IdCounter<I> {
    pub fn new() -> Self {
        Self {
            next: 0,
            _marker: PhantomData,
        }
    }

    pub fn allocate(&mut self) -> I {
        let id = self.next;
        self.next += 1;
        I::from(id)
    }
}

impl<I: From<u64>> Default for IdCounter<I> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use crate::store::entities::{IdCounter, ModId, VersionId};

    #[test]
    fn test_counters_are_independent() {
        let mut mods = IdCounter::<ModId>::new();
        let mut versions = IdCounter::<VersionId>::new();

        assert_eq!(mods.allocate(), ModId::from(0));
        assert_eq!(mods.allocate(), ModId::from(1));
        assert_eq!(versions.allocate(), VersionId::from(0));
    }
}
