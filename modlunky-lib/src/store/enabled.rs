use std::collections::HashSet;

use crate::store::entities::Mod;

/// Bring the enabled list in line with the canonical `mods` while keeping `previous`'s order.
///
/// Mods that stayed enabled keep their slot and pick up their latest record, newly enabled
/// mods are appended in canonical order, and anything no longer enabled is dropped. A mod
/// that is disabled and enabled again therefore moves to the end.
pub(crate) fn reconcile(previous: &[Mod], mods: &[Mod]) -> Vec<Mod> {
    let mut next = previous.to_vec();
    let mut enabled = HashSet::new();

    for mod_ in mods.iter().filter(|m| m.enabled()) {
        enabled.insert(mod_.id());

        match next.iter_mut().find(|entry| entry.id() == mod_.id()) {
            Some(entry) => *entry = mod_.clone(),
            None => next.push(mod_.clone()),
        }
    }

    next.retain(|entry| enabled.contains(&entry.id()));
    next
}

#[cfg(test)]
mod test {
    use crate::store::{
        Seed,
        enabled::reconcile,
        entities::{Mod, ModId},
    };

    fn ids(mods: &[Mod]) -> Vec<ModId> {
        mods.iter().map(Mod::id).collect()
    }

    fn abc() -> Vec<Mod> {
        Seed::new([("A", true), ("B", true), ("C", false)], [("v1", true)]).mods
    }

    fn set_enabled(mods: &mut [Mod], id: u64, enabled: bool) {
        for m in mods.iter_mut().filter(|m| m.id() == ModId::from(id)) {
            if m.enabled() != enabled {
                m.toggle();
            }
        }
    }

    #[test]
    fn test_initial_order_is_canonical() {
        let mods = abc();

        assert_eq!(ids(&reconcile(&[], &mods)), vec![ModId::from(0), ModId::from(1)]);
    }

    #[test]
    fn test_reenabled_moves_to_end() {
        let mut mods = abc();
        let mut enabled = reconcile(&[], &mods);

        set_enabled(&mut mods, 0, false);
        enabled = reconcile(&enabled, &mods);
        assert_eq!(ids(&enabled), vec![ModId::from(1)]);

        set_enabled(&mut mods, 0, true);
        enabled = reconcile(&enabled, &mods);
        assert_eq!(ids(&enabled), vec![ModId::from(1), ModId::from(0)]);
    }

    #[test]
    fn test_positions_are_sticky() {
        let mut mods = abc();
        let mut enabled = reconcile(&[], &mods);

        // Enabling C appends it, B then keeps its slot across an unrelated change
        set_enabled(&mut mods, 2, true);
        enabled = reconcile(&enabled, &mods);
        set_enabled(&mut mods, 0, false);
        enabled = reconcile(&enabled, &mods);

        assert_eq!(ids(&enabled), vec![ModId::from(1), ModId::from(2)]);
    }

    #[test]
    fn test_records_are_refreshed() {
        let mods = abc();
        let stale = vec![Mod::new(ModId::from(1), "Old name", true)];

        let enabled = reconcile(&stale, &mods);

        assert_eq!(enabled.first().unwrap().name(), "B");
        assert_eq!(ids(&enabled), vec![ModId::from(1), ModId::from(0)]);
    }

    #[test]
    fn test_removed_mods_are_dropped() {
        let previous = abc();

        let enabled = reconcile(&previous, &[]);

        assert!(enabled.is_empty());
    }
}
