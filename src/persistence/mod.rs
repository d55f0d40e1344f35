//! Named level slots
//!
//! Levels are stored as their encoded text, so a slot can be pasted back
//! into a share link unchanged. Persisted to LocalStorage on the web; kept in
//! memory elsewhere.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maximum number of saved levels
pub const MAX_SLOTS: usize = 32;

/// One saved level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLevel {
    /// Encoded level text
    pub text: String,
    /// Unix timestamp (ms) of the last save
    pub saved_at: f64,
}

/// Saved levels by name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelStore {
    slots: BTreeMap<String, SavedLevel>,
}

impl LevelStore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "laser_bounce_levels";

    pub fn new() -> Self {
        Self::default()
    }

    /// Store `text` under `name`, replacing any previous save
    ///
    /// Returns false when the store is full and `name` is new.
    pub fn put(&mut self, name: &str, text: String, saved_at: f64) -> bool {
        if !self.slots.contains_key(name) && self.slots.len() >= MAX_SLOTS {
            log::warn!("Level store full ({} slots), not saving {:?}", MAX_SLOTS, name);
            return false;
        }
        self.slots
            .insert(name.to_string(), SavedLevel { text, saved_at });
        true
    }

    pub fn get(&self, name: &str) -> Option<&SavedLevel> {
        self.slots.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<SavedLevel> {
        self.slots.remove(name)
    }

    /// Slot names, alphabetical
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// Most recently saved slot
    pub fn latest(&self) -> Option<(&str, &SavedLevel)> {
        self.slots
            .iter()
            .max_by(|a, b| a.1.saved_at.total_cmp(&b.1.saved_at))
            .map(|(name, level)| (name.as_str(), level))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Load saved levels from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<LevelStore>(&json) {
                    Ok(store) => {
                        log::info!("Loaded {} saved levels", store.len());
                        return store;
                    }
                    Err(e) => log::warn!("Saved levels unreadable ({}), starting fresh", e),
                }
            }
        }

        log::info!("No saved levels found, starting fresh");
        Self::new()
    }

    /// Save levels to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Saved levels stored ({} slots)", self.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{ExportMode, Level};
    use crate::sim::Scene;

    #[test]
    fn test_put_get_replace() {
        let mut store = LevelStore::new();
        assert!(store.put("first", "&size=300,300".to_string(), 1.0));
        assert!(store.put("first", "&size=400,400".to_string(), 2.0));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("first").unwrap().text, "&size=400,400");
    }

    #[test]
    fn test_full_store_rejects_new_names() {
        let mut store = LevelStore::new();
        for i in 0..MAX_SLOTS {
            assert!(store.put(&format!("level{i}"), String::new(), i as f64));
        }
        assert!(!store.put("extra", String::new(), 0.0));
        // Overwriting an existing slot still works
        assert!(store.put("level0", "x".to_string(), 99.0));
        assert_eq!(store.latest().unwrap().0, "level0");
    }

    #[test]
    fn test_saved_level_restores_scene() {
        let mut scene = Scene::new(640.0, 480.0);
        scene.scatter(3, 7);
        let mut store = LevelStore::new();
        store.put("draft", Level::from_scene(&scene, ExportMode::Editor).encode(), 0.0);

        let json = serde_json::to_string(&store).unwrap();
        let store: LevelStore = serde_json::from_str(&json).unwrap();
        let restored = Level::decode(&store.get("draft").unwrap().text).to_scene();
        assert_eq!(restored.obstacles().len(), 3);
        assert_eq!(restored.width(), 640.0);
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["draft"]);
    }
}
