//! Attribute limits configuration.

use serde::{Deserialize, Serialize};

use crate::EventError;

/// Default maximum key length in bytes.
pub const DEFAULT_MAX_KEY_LEN: usize = 256;

/// Default maximum value length in bytes.
pub const DEFAULT_MAX_VALUE_LEN: usize = 64 * 1024; // 64 KiB

/// Default maximum number of attributes per event.
pub const DEFAULT_MAX_ATTRIBUTES: usize = 256;

/// Limits applied by `put_attribute` before the attribute bag is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeLimits {
    /// Maximum key length in bytes.
    pub max_key_len: usize,

    /// Maximum value length in bytes.
    pub max_value_len: usize,

    /// Maximum number of distinct keys.
    pub max_attributes: usize,
}

impl Default for AttributeLimits {
    fn default() -> Self {
        Self {
            max_key_len: DEFAULT_MAX_KEY_LEN,
            max_value_len: DEFAULT_MAX_VALUE_LEN,
            max_attributes: DEFAULT_MAX_ATTRIBUTES,
        }
    }
}

impl AttributeLimits {
    /// Load limits from environment variables, falling back to defaults.
    ///
    /// - `DRM_EVENT_MAX_KEY_LEN`
    /// - `DRM_EVENT_MAX_VALUE_LEN`
    /// - `DRM_EVENT_MAX_ATTRIBUTES`
    pub fn from_env() -> Result<Self, EventError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, EventError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |name: &str, default: usize| -> Result<usize, EventError> {
            lookup(name)
                .map(|v| v.trim().parse::<usize>())
                .transpose()
                .map_err(|_| EventError::Config(format!("{name} must be a non-negative integer")))
                .map(|v| v.unwrap_or(default))
        };

        let limits = Self {
            max_key_len: read("DRM_EVENT_MAX_KEY_LEN", defaults.max_key_len)?,
            max_value_len: read("DRM_EVENT_MAX_VALUE_LEN", defaults.max_value_len)?,
            max_attributes: read("DRM_EVENT_MAX_ATTRIBUTES", defaults.max_attributes)?,
        };

        limits.validate()?;
        Ok(limits)
    }

    /// Reject limits under which no attribute could ever be stored.
    pub fn validate(&self) -> Result<(), EventError> {
        if self.max_key_len == 0 {
            return Err(EventError::Config(
                "max_key_len must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub(crate) fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Check a key/value pair against these limits.
    pub(crate) fn check(&self, key: &str, value: &str) -> Result<(), EventError> {
        if key.is_empty() {
            return Err(EventError::invalid_argument(key, "key cannot be empty"));
        }

        if key.len() > self.max_key_len {
            return Err(EventError::invalid_argument(
                truncate_key(key, self.max_key_len),
                format!("key exceeds maximum length of {} bytes", self.max_key_len),
            ));
        }

        if value.len() > self.max_value_len {
            return Err(EventError::invalid_argument(
                key,
                format!("value exceeds maximum length of {} bytes", self.max_value_len),
            ));
        }

        Ok(())
    }
}

/// Cut an oversized key down to `max` bytes on a char boundary for reporting.
fn truncate_key(key: &str, max: usize) -> &str {
    let mut end = max.min(key.len());
    while !key.is_char_boundary(end) {
        end -= 1;
    }
    &key[..end]
}
