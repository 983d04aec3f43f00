use crate::store::entities::Mod;

/// Case-insensitive substring match of `query` against a mod name.
///
/// An empty query matches every name. A non-empty query never matches an empty name.
pub fn matches(name: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    name.to_lowercase().contains(&query.to_lowercase())
}

/// Mods whose name matches `query`, in their original order.
pub fn filter(mods: &[Mod], query: &str) -> Vec<Mod> {
    mods.iter()
        .filter(|m| matches(m.name(), query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod test {
    use crate::store::{
        Seed,
        search::{filter, matches},
    };

    #[test]
    fn test_matches() {
        assert!(matches("Backpack", "pack"));
        assert!(matches("Backpack", "PACK"));
        assert!(!matches("Backpack", "xyz"));
        assert!(matches("Backpack", ""));
    }

    #[test]
    fn test_empty_name() {
        assert!(!matches("", "a"));
        assert!(matches("", ""));
    }

    #[test]
    fn test_filter_keeps_order() {
        let mods = Seed::default().mods;

        let names: Vec<_> = filter(&mods, "R")
            .iter()
            .map(|m| m.name().to_owned())
            .collect();

        assert_eq!(names, vec!["Tele-trainer", "Randomizer"]);
    }
}
