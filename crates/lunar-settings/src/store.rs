//! Settings store over the SQLite database

use lunar_storage::Database;

use crate::bookmark::Bookmark;
use crate::keys;
use crate::Result;

pub struct SettingsStore {
    db: Database,
}

impl SettingsStore {
    /// Open the store, seeding the defaults table on first use.
    pub fn new(db: Database) -> Result<Self> {
        let store = Self { db };
        store.ensure_seeded()?;
        Ok(store)
    }

    /// First open is detected by the absence of the engine key, the same
    /// probe the settings page uses.
    fn ensure_seeded(&self) -> Result<()> {
        if self.db.get_setting(keys::ENGINE)?.is_some() {
            return Ok(());
        }

        for (key, value) in keys::defaults() {
            self.db.set_setting(key, value)?;
        }

        tracing::info!("Seeded default settings");

        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.db.get_setting(key)?)
    }

    /// Stored value, or the static default for keys cleared out-of-band.
    pub fn get_or_default(&self, key: &str) -> Result<String> {
        if let Some(value) = self.db.get_setting(key)? {
            return Ok(value);
        }
        Ok(keys::default_for(key).unwrap_or_default().to_string())
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        Ok(self.db.set_setting(key, value)?)
    }

    pub fn enable(&self, key: &str) -> Result<()> {
        self.set(key, "on")
    }

    pub fn disable(&self, key: &str) -> Result<()> {
        self.set(key, "off")
    }

    /// Flip an on/off switch and return the new value.
    pub fn toggle(&self, key: &str) -> Result<String> {
        let new_value = if self.get(key)?.as_deref() == Some("on") {
            "off"
        } else {
            "on"
        };
        self.set(key, new_value)?;
        Ok(new_value.to_string())
    }

    pub fn is_enabled(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.as_deref() == Some("on"))
    }

    /// Wipe everything and reseed the defaults.
    pub fn reset(&self) -> Result<()> {
        self.db.clear_settings()?;
        self.ensure_seeded()
    }

    pub fn get_all(&self) -> Result<Vec<(String, String)>> {
        Ok(self.db.all_settings()?)
    }

    pub fn bookmarks(&self) -> Result<Vec<Bookmark>> {
        let raw = self.get_or_default(keys::BOOKMARKS)?;
        Ok(serde_json::from_str(&raw).unwrap_or_default())
    }

    pub fn set_bookmarks(&self, bookmarks: &[Bookmark]) -> Result<()> {
        let raw = serde_json::to_string(bookmarks)?;
        self.set(keys::BOOKMARKS, &raw)
    }
}

impl Clone for SettingsStore {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
