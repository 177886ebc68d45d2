//! Settings persistence layer
//!
//! Settings are stored as a versioned JSON document. Loading is strict
//! (`deserialize_settings`) or forgiving (`load_settings_safe`, which falls
//! back to defaults so a broken file never disables the overlay).

use crate::{NavigatorSettings, SettingsError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Serializable container for settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsData {
    /// Version of the settings format (for future migrations)
    pub version: u32,
    #[serde(default)]
    pub settings: NavigatorSettings,
}

impl SettingsData {
    /// Current version of the settings format
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new(settings: NavigatorSettings) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            settings,
        }
    }
}

impl Default for SettingsData {
    fn default() -> Self {
        Self::new(NavigatorSettings::default())
    }
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors that can occur during persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize settings: {0}")]
    SerializationFailed(serde_json::Error),

    #[error("Failed to deserialize settings: {0}")]
    DeserializationFailed(serde_json::Error),

    #[error("Unsupported settings version: {0}")]
    UnsupportedVersion(u32),

    #[error("Invalid settings: {0}")]
    Invalid(#[from] SettingsError),
}

/// Serializes settings to pretty-printed JSON bytes
pub fn serialize_settings(data: &SettingsData) -> PersistenceResult<Vec<u8>> {
    serde_json::to_vec_pretty(data).map_err(PersistenceError::SerializationFailed)
}

/// Deserializes and validates settings from JSON bytes
pub fn deserialize_settings(bytes: &[u8]) -> PersistenceResult<SettingsData> {
    let data: SettingsData =
        serde_json::from_slice(bytes).map_err(PersistenceError::DeserializationFailed)?;

    if data.version != SettingsData::CURRENT_VERSION {
        return Err(PersistenceError::UnsupportedVersion(data.version));
    }

    data.settings.validate()?;
    Ok(data)
}

/// Attempts to load settings from bytes, falling back to defaults on error
pub fn load_settings_safe(bytes: &[u8]) -> NavigatorSettings {
    match deserialize_settings(bytes) {
        Ok(data) => data.settings,
        Err(err) => {
            tracing::warn!("Ignoring settings file: {}", err);
            NavigatorSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScanOrder;

    #[test]
    fn test_settings_data_creation() {
        let data = SettingsData::default();
        assert_eq!(data.version, SettingsData::CURRENT_VERSION);
        assert_eq!(data.settings, NavigatorSettings::default());
    }

    #[test]
    fn test_serialize_deserialize() {
        let mut settings = NavigatorSettings::default();
        settings.alphabet = "asdf".to_string();
        settings.scan_order = ScanOrder::DocumentOrder;
        let data = SettingsData::new(settings);

        let bytes = serialize_settings(&data).unwrap();
        let deserialized = deserialize_settings(&bytes).unwrap();

        assert_eq!(data, deserialized);
    }

    #[test]
    fn test_deterministic_serialization() {
        let data = SettingsData::default();
        let bytes1 = serialize_settings(&data).unwrap();
        let bytes2 = serialize_settings(&data).unwrap();
        assert_eq!(bytes1, bytes2);
    }

    #[test]
    fn test_missing_settings_section_uses_defaults() {
        let data = deserialize_settings(br#"{ "version": 1 }"#).unwrap();
        assert_eq!(data.settings, NavigatorSettings::default());
    }

    #[test]
    fn test_deserialize_invalid_json() {
        let result = deserialize_settings(b"{ invalid json }");
        assert!(matches!(
            result,
            Err(PersistenceError::DeserializationFailed(_))
        ));
    }

    #[test]
    fn test_deserialize_unsupported_version() {
        let result = deserialize_settings(br#"{ "version": 999, "settings": {} }"#);
        assert!(matches!(
            result,
            Err(PersistenceError::UnsupportedVersion(999))
        ));
    }

    #[test]
    fn test_deserialize_rejects_invalid_values() {
        let result = deserialize_settings(br#"{ "version": 1, "settings": { "scroll_amount": -5 } }"#);
        assert!(matches!(
            result,
            Err(PersistenceError::Invalid(SettingsError::InvalidScrollAmount(_)))
        ));
    }

    #[test]
    fn test_load_settings_safe_with_valid_data() {
        let loaded = load_settings_safe(br#"{ "version": 1, "settings": { "alphabet": "xy" } }"#);
        assert_eq!(loaded.alphabet, "xy");
    }

    #[test]
    fn test_load_settings_safe_falls_back() {
        assert_eq!(load_settings_safe(b"garbage"), NavigatorSettings::default());
        assert_eq!(
            load_settings_safe(br#"{ "version": 2 }"#),
            NavigatorSettings::default()
        );
    }
}
