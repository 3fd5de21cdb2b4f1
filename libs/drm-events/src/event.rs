//! The DRM error event record.

use std::cell::RefCell;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use drm_types::{ErrorType, SessionId};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::attributes::AttributeBag;
use crate::{AttributeLimits, EventError, KeyCursor, ValueCursor};

/// An error reported by a DRM session to its error listener.
///
/// Session ID, error type and message are fixed at construction. The binary
/// payload is replaced through [`ErrorEvent::set_payload`], which always
/// copies. Attributes live in their own cell so they can be added through a
/// shared reference while cursors borrow the event.
///
/// The event is single-threaded: it is `Send` but not `Sync`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEvent {
    session_id: SessionId,
    error_type: ErrorType,
    message: String,
    payload: Vec<u8>,
    attributes: RefCell<AttributeBag>,
    limits: AttributeLimits,
}

impl ErrorEvent {
    /// Creates an event with no attributes and an empty payload.
    pub fn new(
        session_id: impl Into<SessionId>,
        error_type: ErrorType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            error_type,
            message: message.into(),
            payload: Vec::new(),
            attributes: RefCell::new(AttributeBag::default()),
            limits: AttributeLimits::default(),
        }
    }

    /// Creates an event carrying a copy of `payload`.
    pub fn with_payload(
        session_id: impl Into<SessionId>,
        error_type: ErrorType,
        message: impl Into<String>,
        payload: &[u8],
    ) -> Self {
        let mut event = Self::new(session_id, error_type, message);
        event.set_payload(payload);
        event
    }

    /// Creates a new event builder.
    pub fn builder() -> ErrorEventBuilder {
        ErrorEventBuilder::new()
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Limits applied to attributes of this event.
    pub fn limits(&self) -> &AttributeLimits {
        &self.limits
    }

    /// Number of attributes currently stored.
    pub fn attribute_count(&self) -> usize {
        self.attributes.borrow().len()
    }

    pub fn has_attributes(&self) -> bool {
        !self.attributes.borrow().is_empty()
    }

    /// Adds `key = value`, or overwrites the value of an existing key in place.
    ///
    /// Fails with [`EventError::InvalidArgument`] for an empty key, a key or
    /// value over the configured length, or a new key beyond the attribute
    /// limit. A rejected call leaves the event unchanged.
    ///
    /// Any cursor created before a successful call becomes stale.
    pub fn put_attribute(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), EventError> {
        let key = key.into();
        let value = value.into();

        if let Err(err) = self.check_attribute(&key, &value) {
            warn!(
                session_id = %self.session_id,
                error_type = %self.error_type,
                error = %err,
                "Rejected error event attribute"
            );
            return Err(err);
        }

        let inserted = self.attributes.borrow_mut().insert(key, value);
        debug!(
            session_id = %self.session_id,
            position = inserted.position,
            overwritten = inserted.overwritten,
            "Stored error event attribute"
        );
        Ok(())
    }

    fn check_attribute(&self, key: &str, value: &str) -> Result<(), EventError> {
        self.limits.check(key, value)?;

        let bag = self.attributes.borrow();
        if bag.position_of(key).is_none() && bag.len() >= self.limits.max_attributes {
            return Err(EventError::invalid_argument(
                key,
                format!(
                    "event already holds the maximum of {} attributes",
                    self.limits.max_attributes
                ),
            ));
        }

        Ok(())
    }

    /// Returns the value of `key`, or an empty string if it is absent.
    pub fn attribute(&self, key: &str) -> String {
        self.get_attribute(key).unwrap_or_default()
    }

    /// Returns the value of `key`, or `None` if it is absent.
    pub fn get_attribute(&self, key: &str) -> Option<String> {
        self.attributes.borrow().get(key).map(str::to_string)
    }

    pub fn contains_attribute(&self, key: &str) -> bool {
        self.attributes.borrow().position_of(key).is_some()
    }

    /// Returns a fresh cursor over attribute keys.
    pub fn key_cursor(&self) -> KeyCursor<'_> {
        KeyCursor::new(self)
    }

    /// Returns a fresh cursor over attribute values.
    pub fn value_cursor(&self) -> ValueCursor<'_> {
        ValueCursor::new(self)
    }

    /// Copies the attributes out as `(key, value)` pairs in iteration order.
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.attributes
            .borrow()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Binary diagnostic data owned by this event.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Replaces the payload with a copy of `payload`.
    pub fn set_payload(&mut self, payload: &[u8]) {
        trace!(
            session_id = %self.session_id,
            len = payload.len(),
            "Replacing error event payload"
        );
        self.payload = payload.to_vec();
    }

    /// Serializes the event to JSON.
    pub fn to_json(&self) -> Result<String, EventError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses an event from JSON, validating the error type and attributes.
    pub fn from_json(json: &str) -> Result<Self, EventError> {
        let wire: ErrorEventWire = serde_json::from_str(json)?;
        Self::try_from(wire)
    }

    pub(crate) fn modifications(&self) -> u64 {
        self.attributes.borrow().modifications()
    }

    pub(crate) fn key_at(&self, position: usize) -> Option<String> {
        self.attributes.borrow().key_at(position).map(str::to_string)
    }

    pub(crate) fn value_at(&self, position: usize) -> Option<String> {
        self.attributes.borrow().value_at(position).map(str::to_string)
    }
}

impl std::fmt::Display for ErrorEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} {}] session={}: {}",
            self.error_type.code(),
            self.error_type,
            self.session_id,
            self.message
        )
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for constructing error events with custom limits or initial attributes.
#[derive(Debug, Default)]
pub struct ErrorEventBuilder {
    session_id: Option<SessionId>,
    error_type: Option<ErrorType>,
    message: Option<String>,
    payload: Vec<u8>,
    attributes: Vec<(String, String)>,
    limits: AttributeLimits,
}

impl ErrorEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_id(mut self, id: impl Into<SessionId>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn error_type(mut self, error_type: ErrorType) -> Self {
        self.error_type = Some(error_type);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn payload(mut self, payload: &[u8]) -> Self {
        self.payload = payload.to_vec();
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn limits(mut self, limits: AttributeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Builds the event.
    ///
    /// Attributes are applied in the order given, with the same rules as
    /// [`ErrorEvent::put_attribute`].
    pub fn build(self) -> Result<ErrorEvent, EventError> {
        let session_id = self.session_id.ok_or(EventError::MissingField("session_id"))?;
        let error_type = self.error_type.ok_or(EventError::MissingField("error_type"))?;
        let message = self.message.ok_or(EventError::MissingField("message"))?;
        self.limits.validate()?;

        let mut event = ErrorEvent::new(session_id, error_type, message);
        event.limits = self.limits;
        event.payload = self.payload;
        for (key, value) in self.attributes {
            event.put_attribute(key, value)?;
        }

        Ok(event)
    }
}

// =============================================================================
// Wire format
// =============================================================================

/// JSON shape shared with the non-native counterpart.
#[derive(Debug, Serialize, Deserialize)]
struct ErrorEventWire {
    session_id: SessionId,
    error_type: ErrorType,
    message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    payload: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<AttributeWire>,
    #[serde(default, skip_serializing_if = "AttributeLimits::is_default")]
    limits: AttributeLimits,
}

#[derive(Debug, Serialize, Deserialize)]
struct AttributeWire {
    key: String,
    value: String,
}

impl From<&ErrorEvent> for ErrorEventWire {
    fn from(event: &ErrorEvent) -> Self {
        Self {
            session_id: event.session_id,
            error_type: event.error_type,
            message: event.message.clone(),
            payload: STANDARD.encode(&event.payload),
            attributes: event
                .attributes()
                .into_iter()
                .map(|(key, value)| AttributeWire { key, value })
                .collect(),
            limits: event.limits,
        }
    }
}

impl TryFrom<ErrorEventWire> for ErrorEvent {
    type Error = EventError;

    fn try_from(wire: ErrorEventWire) -> Result<Self, Self::Error> {
        let payload = STANDARD
            .decode(wire.payload.as_bytes())
            .map_err(|e| EventError::Serialization(format!("invalid payload: {e}")))?;

        wire.attributes
            .into_iter()
            .fold(
                ErrorEvent::builder()
                    .session_id(wire.session_id)
                    .error_type(wire.error_type)
                    .message(wire.message)
                    .payload(&payload)
                    .limits(wire.limits),
                |builder, attr| builder.attribute(attr.key, attr.value),
            )
            .build()
    }
}

impl Serialize for ErrorEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ErrorEventWire::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ErrorEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let wire = ErrorEventWire::deserialize(deserializer)?;
        Self::try_from(wire).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_event_is_empty() {
        let event = ErrorEvent::new(42, ErrorType::RightsNotInstalled, "rights install failed");
        assert_eq!(event.session_id(), SessionId::new(42));
        assert_eq!(event.error_type(), ErrorType::RightsNotInstalled);
        assert_eq!(event.message(), "rights install failed");
        assert_eq!(event.attribute_count(), 0);
        assert!(!event.has_attributes());
        assert!(event.payload().is_empty());
    }

    #[test]
    fn test_put_and_get() {
        let event = ErrorEvent::new(42, ErrorType::RightsNotInstalled, "rights install failed");
        event.put_attribute("scheme", "widevine").unwrap();
        event.put_attribute("code", "7").unwrap();

        assert_eq!(event.attribute_count(), 2);
        assert_eq!(event.attribute("scheme"), "widevine");
        assert_eq!(event.get_attribute("code").as_deref(), Some("7"));
        assert!(event.contains_attribute("code"));
    }

    #[test]
    fn test_missing_attribute_is_empty() {
        let event = ErrorEvent::new(1, ErrorType::NotSupported, "x");
        assert_eq!(event.attribute("nope"), "");
        assert_eq!(event.get_attribute("nope"), None);
    }

    #[test]
    fn test_overwrite_keeps_count() {
        let event = ErrorEvent::new(1, ErrorType::NotSupported, "x");
        event.put_attribute("k", "v1").unwrap();
        event.put_attribute("other", "o").unwrap();
        event.put_attribute("k", "v2").unwrap();

        assert_eq!(event.attribute_count(), 2);
        assert_eq!(event.attribute("k"), "v2");
        assert_eq!(event.attributes()[0], ("k".to_string(), "v2".to_string()));
    }

    #[test]
    fn test_empty_key_rejected() {
        let event = ErrorEvent::new(1, ErrorType::NotSupported, "x");
        let err = event.put_attribute("", "value").unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(event.attribute_count(), 0);
    }

    #[test]
    fn test_attribute_limit() {
        let event = ErrorEvent::builder()
            .session_id(3)
            .error_type(ErrorType::NoInternetConnection)
            .message("offline")
            .limits(AttributeLimits {
                max_attributes: 1,
                ..AttributeLimits::default()
            })
            .attribute("a", "1")
            .build()
            .unwrap();

        assert!(event.put_attribute("b", "2").unwrap_err().is_invalid_argument());
        // Overwriting an existing key is still allowed at the limit.
        event.put_attribute("a", "3").unwrap();
        assert_eq!(event.attribute("a"), "3");
        assert_eq!(event.attribute_count(), 1);
    }

    #[test]
    fn test_payload_is_copied() {
        let mut buffer = vec![0xde, 0xad, 0xbe, 0xef];
        let mut event = ErrorEvent::with_payload(
            9,
            ErrorType::ProcessDrmInfoFailed,
            "bad drm info",
            &buffer,
        );
        buffer[0] = 0x00;
        assert_eq!(event.payload(), &[0xde_u8, 0xad, 0xbe, 0xef]);

        event.set_payload(&buffer);
        buffer.clear();
        assert_eq!(event.payload(), &[0x00_u8, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_clone_is_deep() {
        let event = ErrorEvent::with_payload(5, ErrorType::OutOfMemory, "oom", b"heap");
        event.put_attribute("k", "v").unwrap();

        let copy = event.clone();
        copy.put_attribute("k2", "v2").unwrap();
        assert_eq!(event.attribute_count(), 1);
        assert_eq!(copy.attribute_count(), 2);
        assert_eq!(copy.payload(), b"heap");
    }

    #[test]
    fn test_builder_rejects_unusable_limits() {
        let result = ErrorEvent::builder()
            .session_id(1)
            .error_type(ErrorType::NotSupported)
            .message("m")
            .limits(AttributeLimits {
                max_key_len: 0,
                ..AttributeLimits::default()
            })
            .build();
        assert!(matches!(result, Err(EventError::Config(_))));
    }

    #[test]
    fn test_builder_missing_field() {
        let result = ErrorEvent::builder()
            .session_id(1)
            .message("no type")
            .build();
        let err = result.unwrap_err();
        assert_eq!(err, EventError::MissingField("error_type"));
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn test_unknown_code_converts_to_event_error() {
        fn from_code(code: i32) -> Result<ErrorEvent, EventError> {
            Ok(ErrorEvent::new(1, ErrorType::try_from(code)?, "m"))
        }

        assert!(from_code(2005).is_ok());
        assert!(matches!(
            from_code(7),
            Err(EventError::Type(drm_types::TypeError::UnknownErrorType(7)))
        ));
    }

    #[test]
    fn test_display() {
        let event = ErrorEvent::new(42, ErrorType::RightsNotInstalled, "rights install failed");
        assert_eq!(
            event.to_string(),
            "[2001 rights_not_installed] session=42: rights install failed"
        );
    }

    #[test]
    fn test_json_shape() {
        let event = ErrorEvent::with_payload(
            42,
            ErrorType::AcquireDrmInfoFailed,
            "acquire failed",
            b"\x01\x02",
        );
        event.put_attribute("scheme", "widevine").unwrap();

        let value: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "session_id": 42,
                "error_type": 2008,
                "message": "acquire failed",
                "payload": "AQI=",
                "attributes": [{"key": "scheme", "value": "widevine"}],
            })
        );
    }

    #[test]
    fn test_json_roundtrip_preserves_order() {
        let event = ErrorEvent::with_payload(1, ErrorType::RemoveAllRightsFailed, "rm", b"xyz");
        event.put_attribute("z", "1").unwrap();
        event.put_attribute("a", "2").unwrap();

        let parsed = ErrorEvent::from_json(&event.to_json().unwrap()).unwrap();
        assert_eq!(parsed, event);
        assert_eq!(
            parsed.attributes(),
            vec![
                ("z".to_string(), "1".to_string()),
                ("a".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_json_roundtrip_keeps_custom_limits() {
        let limits = AttributeLimits {
            max_value_len: 1 << 20,
            ..AttributeLimits::default()
        };
        let event = ErrorEvent::builder()
            .session_id(11)
            .error_type(ErrorType::ProcessDrmInfoFailed)
            .message("oversized diagnostics")
            .limits(limits)
            .attribute("blob", "x".repeat(100_000))
            .build()
            .unwrap();

        let json = event.to_json().unwrap();
        let parsed = ErrorEvent::from_json(&json).unwrap();
        assert_eq!(parsed.limits(), &limits);
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_json_default_limits_are_omitted() {
        let event = ErrorEvent::new(1, ErrorType::NotSupported, "m");
        let value: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert!(value.get("limits").is_none());
    }

    #[test]
    fn test_json_rejects_zero_key_len() {
        let result = ErrorEvent::from_json(
            r#"{"session_id": 1, "error_type": 2003, "message": "m",
                "limits": {"max_key_len": 0}}"#,
        );
        assert!(matches!(result, Err(EventError::Config(_))));
    }

    #[test]
    fn test_json_rejects_unknown_error_type() {
        let result = ErrorEvent::from_json(r#"{"session_id": 1, "error_type": 1000, "message": "m"}"#);
        assert!(matches!(result, Err(EventError::Serialization(_))));
    }

    #[test]
    fn test_json_rejects_bad_payload() {
        let result = ErrorEvent::from_json(
            r#"{"session_id": 1, "error_type": 2003, "message": "m", "payload": "!!"}"#,
        );
        assert!(matches!(result, Err(EventError::Serialization(_))));
    }

    #[test]
    fn test_json_rejects_empty_key() {
        let result = ErrorEvent::from_json(
            r#"{"session_id": 1, "error_type": 2003, "message": "m",
                "attributes": [{"key": "", "value": "v"}]}"#,
        );
        assert!(result.unwrap_err().is_invalid_argument());
    }
}
