use crate::store::entities::{IdCounter, Mod, ModId, Version, VersionId};

/// The records a store starts with.
#[derive(Debug, Clone, PartialEq)]
pub struct Seed {
    pub mods: Vec<Mod>,
    pub versions: Vec<Version>,
}

impl Seed {
    /// Build seed records from `(name, enabled)` and `(revision, installed)` pairs, numbering
    /// mods and versions independently from zero.
    pub fn new<'a, M, V>(mods: M, versions: V) -> Self
    where
        M: IntoIterator<Item = (&'a str, bool)>,
        V: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut mod_ids = IdCounter::<ModId>::new();
        let mut version_ids = IdCounter::<VersionId>::new();

        Self {
            mods: mods
                .into_iter()
                .map(|(name, enabled)| Mod::new(mod_ids.allocate(), name, enabled))
                .collect(),
            versions: versions
                .into_iter()
                .map(|(revision, installed)| {
                    Version::new(version_ids.allocate(), revision, installed)
                })
                .collect(),
        }
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self::new(
            [
                ("Backpack", true),
                ("Tele-trainer", true),
                ("Randomizer", false),
            ],
            [
                ("v0.12.0", true),
                ("v0.11.1", true),
                ("v0.11.0", true),
                ("v0.10.1", false),
                ("v0.10.0", false),
            ],
        )
    }
}

#[cfg(test)]
mod test {
    use crate::store::{
        Seed,
        entities::{ModId, VersionId},
    };

    #[test]
    fn test_default_ids() {
        let seed = Seed::default();

        let mod_ids: Vec<_> = seed.mods.iter().map(|m| m.id()).collect();
        assert_eq!(mod_ids, vec![ModId::from(0), ModId::from(1), ModId::from(2)]);

        let last = seed.versions.last().unwrap();
        assert_eq!(last.id(), VersionId::from(4));
        assert_eq!(last.revision(), "v0.10.0");
        assert!(!last.installed());
    }
}
