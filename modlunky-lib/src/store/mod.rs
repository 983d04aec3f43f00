//! The mod panel's state.

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::{
    config::{AccentColor, Cfg, StoreConfig, Theme},
    reactive::{Derived, Readable, Signal, Subscription},
};

mod enabled;
mod seed;

pub mod entities;
pub mod search;

pub use entities::{Mod, ModId, Version, VersionId};
pub use seed::Seed;

/// How long a preference change waits for the configuration handle before it is dropped.
const CFG_WRITE_TIMEOUT: Duration = Duration::from_millis(100);

/// Owns the canonical mod list and the panel's preferences, and derives the views the UI
/// renders from them.
///
/// Writes go through [`toggle_mod`](Self::toggle_mod), [`select_version`](Self::select_version)
/// or the writable cells handed out by the accessors. Every derived view is recomputed
/// synchronously on each write, so a read right after a write always sees it.
#[derive(Debug)]
pub struct ModListStore {
    cfg: Cfg,
    mods: Signal<Vec<Mod>>,
    /// Enabled mods in the order they were enabled
    enabled_mods: Derived<Vec<Mod>>,
    /// Disabled mods in canonical order
    installed_mods: Derived<Vec<Mod>>,
    filtered_enabled_mods: Derived<Vec<Mod>>,
    filtered_installed_mods: Derived<Vec<Mod>>,
    search_input: Signal<String>,
    versions: Vec<Version>,
    version: Signal<Option<Version>>,
    theme: Signal<Theme>,
    color_key: Signal<AccentColor>,
    active_tab: Signal<usize>,
    /// Write preference changes back into `cfg`
    _preferences: Vec<Subscription>,
}

impl ModListStore {
    pub fn new(seed: Seed, cfg: Cfg) -> Self {
        let Seed { mods, versions } = seed;

        let mods = Signal::new(mods);
        let search_input = Signal::new(String::new());

        let enabled_mods = Derived::fold(
            &mods,
            Vec::new(),
            |previous: &Vec<Mod>, mods: &Vec<Mod>| enabled::reconcile(previous, mods),
        );
        let installed_mods = Derived::map(&mods, |mods: &Vec<Mod>| {
            mods.iter().filter(|m| !m.enabled()).cloned().collect()
        });
        let filtered_enabled_mods = Derived::map2(
            &enabled_mods,
            &search_input,
            |mods: &Vec<Mod>, query: &String| search::filter(mods, query),
        );
        let filtered_installed_mods = Derived::map2(
            &installed_mods,
            &search_input,
            |mods: &Vec<Mod>, query: &String| search::filter(mods, query),
        );

        let version = Signal::new(versions.first().cloned());

        let StoreConfig {
            theme,
            accent_color,
            active_tab,
        } = cfg.read().clone();
        let theme = Signal::new(theme);
        let color_key = Signal::new(accent_color);
        let active_tab = Signal::new(active_tab);

        let preferences = vec![
            theme.subscribe({
                let cfg = cfg.clone();
                move |theme| {
                    debug!("Theme changed to {theme}");
                    write_back(&cfg, "theme", |cfg| cfg.theme = *theme);
                }
            }),
            color_key.subscribe({
                let cfg = cfg.clone();
                move |color| {
                    debug!("Accent color changed to {color}");
                    write_back(&cfg, "accent color", |cfg| cfg.accent_color = *color);
                }
            }),
            active_tab.subscribe({
                let cfg = cfg.clone();
                move |tab| {
                    debug!("Active tab changed to {tab}");
                    write_back(&cfg, "active tab", |cfg| cfg.active_tab = *tab);
                }
            }),
        ];

        Self {
            cfg,
            mods,
            enabled_mods,
            installed_mods,
            filtered_enabled_mods,
            filtered_installed_mods,
            search_input,
            versions,
            version,
            theme,
            color_key,
            active_tab,
            _preferences: preferences,
        }
    }

    // Mods

    /// The canonical mod list.
    pub fn mods(&self) -> &impl Readable<Vec<Mod>> {
        &self.mods
    }

    pub fn find_mod(&self, id: ModId) -> Option<Mod> {
        self.mods.with(|mods| mods.iter().find(|m| m.id() == id).cloned())
    }

    /// Invert the `enabled` flag of the mod with the given id. Does nothing if there is no
    /// such mod.
    pub fn toggle_mod(&self, id: ModId) {
        let mut toggled = None;

        self.mods.update(|mods| {
            if let Some(mod_) = mods.iter_mut().find(|m| m.id() == id) {
                mod_.toggle();
                toggled = Some(mod_.enabled());
            }
        });

        match toggled {
            Some(enabled) => debug!("Toggled mod {id}, enabled: {enabled}"),
            None => trace!("No mod with id {id} to toggle"),
        }
    }

    pub fn enabled_mods(&self) -> &Derived<Vec<Mod>> {
        &self.enabled_mods
    }

    /// Mods that are installed but not enabled.
    pub fn installed_mods(&self) -> &Derived<Vec<Mod>> {
        &self.installed_mods
    }

    pub fn filtered_enabled_mods(&self) -> &Derived<Vec<Mod>> {
        &self.filtered_enabled_mods
    }

    pub fn filtered_installed_mods(&self) -> &Derived<Vec<Mod>> {
        &self.filtered_installed_mods
    }

    pub fn search_input(&self) -> &Signal<String> {
        &self.search_input
    }

    // Versions

    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    pub fn installed_versions(&self) -> Vec<Version> {
        self.versions
            .iter()
            .filter(|v| v.installed())
            .cloned()
            .collect()
    }

    /// The currently selected version, `None` only if there are no versions at all.
    pub fn version(&self) -> &Signal<Option<Version>> {
        &self.version
    }

    /// Make the version with the given id current. Does nothing if there is no such version.
    pub fn select_version(&self, id: VersionId) {
        match self.versions.iter().find(|v| v.id() == id) {
            Some(version) => {
                debug!("Selected version {}", version.revision());
                self.version.set(Some(version.clone()));
            }
            None => trace!("No version with id {id} to select"),
        }
    }

    // Preferences

    pub fn theme(&self) -> &Signal<Theme> {
        &self.theme
    }

    pub fn color_key(&self) -> &Signal<AccentColor> {
        &self.color_key
    }

    pub fn active_tab(&self) -> &Signal<usize> {
        &self.active_tab
    }

    /// Handle to the preferences, kept up to date with the preference cells.
    ///
    /// Preference writes take the handle's write lock. A change made while the calling
    /// thread holds a guard on it can't be written back: it still reaches the cell, but the
    /// handle keeps its old value and a warning is logged.
    pub fn cfg(&self) -> &Cfg {
        &self.cfg
    }
}

fn write_back(cfg: &Cfg, name: &str, apply: impl FnOnce(&mut StoreConfig)) {
    match cfg.try_write_for(CFG_WRITE_TIMEOUT) {
        Some(mut cfg) => apply(&mut cfg),
        None => warn!("Configuration is locked, {name} change was not written back"),
    }
}

impl Default for ModListStore {
    fn default() -> Self {
        Self::new(Seed::default(), StoreConfig::default().into_handle())
    }
}
