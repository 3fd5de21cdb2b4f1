//! Session and error-type identifiers.
//!
//! Error-type codes must stay in sync with the non-native counterpart of the
//! error event, which exchanges the same numeric values.

use crate::TypeError;

// =============================================================================
// Error Type Constants
// =============================================================================

/// All error-type codes as raw integer constants.
pub mod error_types {
    /// Something went wrong installing the rights.
    pub const RIGHTS_NOT_INSTALLED: i32 = 2001;
    /// The server rejected renewal of rights.
    pub const RIGHTS_RENEWAL_NOT_ALLOWED: i32 = 2002;
    /// The server response cannot be handled by the native agent.
    pub const NOT_SUPPORTED: i32 = 2003;
    /// Memory allocation failed during renewal.
    pub const OUT_OF_MEMORY: i32 = 2004;
    /// No connectivity, so no attempt can be made to renew rights.
    pub const NO_INTERNET_CONNECTION: i32 = 2005;
    /// Processing DRM info failed.
    pub const PROCESS_DRM_INFO_FAILED: i32 = 2006;
    /// Removing the rights objects of all DRM schemes failed.
    pub const REMOVE_ALL_RIGHTS_FAILED: i32 = 2007;
    /// Acquiring DRM info failed.
    pub const ACQUIRE_DRM_INFO_FAILED: i32 = 2008;
}

// =============================================================================
// Error Type
// =============================================================================

/// Kind of DRM error carried by an error event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum ErrorType {
    RightsNotInstalled = error_types::RIGHTS_NOT_INSTALLED,
    RightsRenewalNotAllowed = error_types::RIGHTS_RENEWAL_NOT_ALLOWED,
    NotSupported = error_types::NOT_SUPPORTED,
    OutOfMemory = error_types::OUT_OF_MEMORY,
    NoInternetConnection = error_types::NO_INTERNET_CONNECTION,
    ProcessDrmInfoFailed = error_types::PROCESS_DRM_INFO_FAILED,
    RemoveAllRightsFailed = error_types::REMOVE_ALL_RIGHTS_FAILED,
    AcquireDrmInfoFailed = error_types::ACQUIRE_DRM_INFO_FAILED,
}

impl ErrorType {
    /// Every error type, in code order.
    pub const ALL: [ErrorType; 8] = [
        ErrorType::RightsNotInstalled,
        ErrorType::RightsRenewalNotAllowed,
        ErrorType::NotSupported,
        ErrorType::OutOfMemory,
        ErrorType::NoInternetConnection,
        ErrorType::ProcessDrmInfoFailed,
        ErrorType::RemoveAllRightsFailed,
        ErrorType::AcquireDrmInfoFailed,
    ];

    /// Returns the stable wire code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Looks up an error type by its wire code.
    pub fn from_code(code: i32) -> Result<Self, TypeError> {
        match code {
            error_types::RIGHTS_NOT_INSTALLED => Ok(ErrorType::RightsNotInstalled),
            error_types::RIGHTS_RENEWAL_NOT_ALLOWED => Ok(ErrorType::RightsRenewalNotAllowed),
            error_types::NOT_SUPPORTED => Ok(ErrorType::NotSupported),
            error_types::OUT_OF_MEMORY => Ok(ErrorType::OutOfMemory),
            error_types::NO_INTERNET_CONNECTION => Ok(ErrorType::NoInternetConnection),
            error_types::PROCESS_DRM_INFO_FAILED => Ok(ErrorType::ProcessDrmInfoFailed),
            error_types::REMOVE_ALL_RIGHTS_FAILED => Ok(ErrorType::RemoveAllRightsFailed),
            error_types::ACQUIRE_DRM_INFO_FAILED => Ok(ErrorType::AcquireDrmInfoFailed),
            other => Err(TypeError::UnknownErrorType(other)),
        }
    }

    /// Returns the snake_case name used in logs and display.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ErrorType::RightsNotInstalled => "rights_not_installed",
            ErrorType::RightsRenewalNotAllowed => "rights_renewal_not_allowed",
            ErrorType::NotSupported => "not_supported",
            ErrorType::OutOfMemory => "out_of_memory",
            ErrorType::NoInternetConnection => "no_internet_connection",
            ErrorType::ProcessDrmInfoFailed => "process_drm_info_failed",
            ErrorType::RemoveAllRightsFailed => "remove_all_rights_failed",
            ErrorType::AcquireDrmInfoFailed => "acquire_drm_info_failed",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ErrorType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| TypeError::UnknownErrorTypeName(s.to_string()))
    }
}

impl TryFrom<i32> for ErrorType {
    type Error = TypeError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<ErrorType> for i32 {
    fn from(t: ErrorType) -> Self {
        t.code()
    }
}

impl serde::Serialize for ErrorType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.code())
    }
}

impl<'de> serde::Deserialize<'de> for ErrorType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = i32::deserialize(deserializer)?;
        Self::from_code(code).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Session ID
// =============================================================================

/// Unique identifier of the DRM session an event originated from.
///
/// A plain integer assigned by the DRM framework, not generated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(i32);

impl SessionId {
    /// Creates a new SessionId from an i32.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the underlying i32 value.
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SessionId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i32>()
            .map(Self)
            .map_err(|_| TypeError::InvalidSessionId(s.to_string()))
    }
}

impl From<i32> for SessionId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<SessionId> for i32 {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl serde::Serialize for SessionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for SessionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self(id))
    }
}

// =============================================================================
// Tests
// =============================================================================
