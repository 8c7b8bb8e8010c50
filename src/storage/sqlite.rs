use crate::model::{Profile, StorageError};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info};

pub const FILTER_KEY: &str = "filterEnabled";
pub const PROFILE_KEY: &str = "autofillProfile";

pub type SharedStore = Arc<Mutex<SettingsStore>>;

/// Published after a setting is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsChange {
    FilterEnabled(bool),
    Profile(Profile),
}

/// Key/value extension settings. Values are stored as JSON text.
pub struct SettingsStore {
    conn: Connection,
    changes: broadcast::Sender<SettingsChange>,
}

impl SettingsStore {
    /// Opens the database and creates the settings table if needed
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        Self::from_connection(Connection::open(db_path)?)
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;
        let (changes, _) = broadcast::channel(32);
        Ok(Self { conn, changes })
    }

    pub fn shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SettingsChange> {
        self.changes.subscribe()
    }

    pub fn filter_enabled(&self) -> Result<bool, StorageError> {
        Ok(self.get(FILTER_KEY)?.unwrap_or(true))
    }

    pub fn set_filter_enabled(&self, enabled: bool) -> Result<(), StorageError> {
        self.put(FILTER_KEY, &enabled)?;
        info!("💾 Saved {} = {}", FILTER_KEY, enabled);
        self.publish(SettingsChange::FilterEnabled(enabled));
        Ok(())
    }

    pub fn profile(&self) -> Result<Profile, StorageError> {
        Ok(self.get(PROFILE_KEY)?.unwrap_or_default())
    }

    pub fn set_profile(&self, profile: &Profile) -> Result<(), StorageError> {
        self.put(PROFILE_KEY, profile)?;
        info!("💾 Saved {}", PROFILE_KEY);
        self.publish(SettingsChange::Profile(profile.clone()));
        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
            params![key, raw],
        )?;
        Ok(())
    }

    fn publish(&self, change: SettingsChange) {
        if self.changes.send(change).is_err() {
            debug!("No settings subscribers");
        }
    }
}
