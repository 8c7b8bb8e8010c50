pub mod sqlite;

pub use sqlite::{SettingsChange, SettingsStore, SharedStore};
