use std::collections::BTreeMap;

use thiserror::Error;

use super::builder::{MS_TOKEN, WEBID};

/// Browser/device fields sent with every request.
pub const DEFAULT_FINGERPRINT: [(&str, &str); 18] = [
    ("device_platform", "webapp"),
    ("aid", "6383"),
    ("channel", "channel_pc_web"),
    ("cookie_enabled", "true"),
    ("browser_language", "zh-CN"),
    ("browser_platform", "Win32"),
    ("browser_name", "Chrome"),
    ("browser_version", "120.0.0.0"),
    ("browser_online", "true"),
    ("engine_name", "Blink"),
    ("engine_version", "120.0.0.0"),
    ("os_name", "Windows"),
    ("os_version", "10"),
    ("cpu_core_num", "12"),
    ("device_memory", "8"),
    ("platform", "PC"),
    ("version_code", "170400"),
    ("version_name", "17.4.0"),
];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("fingerprint field '{0}' must not be empty")]
    EmptyField(String),

    #[error("fingerprint field '{0}' is generated per request and cannot be fixed")]
    ReservedField(String),
}

/// Ordered fingerprint catalog: the built-in fields with configured overrides
/// applied in place, followed by any extra configured fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintCatalog {
    fields: Vec<(String, String)>,
}

impl FingerprintCatalog {
    pub fn from_overrides(overrides: &BTreeMap<String, String>) -> Result<Self, CatalogError> {
        let mut fields: Vec<(String, String)> = DEFAULT_FINGERPRINT
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        for (key, value) in overrides {
            if key == MS_TOKEN || key == WEBID {
                return Err(CatalogError::ReservedField(key.clone()));
            }
            if value.trim().is_empty() {
                return Err(CatalogError::EmptyField(key.clone()));
            }

            match fields.iter_mut().find(|(k, _)| k == key) {
                Some(slot) => slot.1 = value.clone(),
                None => fields.push((key.clone(), value.clone())),
            }
        }

        Ok(Self { fields })
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for FingerprintCatalog {
    fn default() -> Self {
        Self {
            fields: DEFAULT_FINGERPRINT
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}
