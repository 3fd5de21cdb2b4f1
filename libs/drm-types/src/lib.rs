//! # drm-types
//!
//! Stable identifier types for DRM error events.
//!
//! ## Design Principles
//!
//! - Error-type codes are a closed set and never change value
//! - Codes are shared with a non-native counterpart, so the wire form is the
//!   bare integer, not a name
//! - Session IDs are opaque integers handed out by the DRM framework
//!
//! ## Error Types
//!
//! | name                         | code |
//! |------------------------------|------|
//! | `RIGHTS_NOT_INSTALLED`       | 2001 |
//! | `RIGHTS_RENEWAL_NOT_ALLOWED` | 2002 |
//! | `NOT_SUPPORTED`              | 2003 |
//! | `OUT_OF_MEMORY`              | 2004 |
//! | `NO_INTERNET_CONNECTION`     | 2005 |
//! | `PROCESS_DRM_INFO_FAILED`    | 2006 |
//! | `REMOVE_ALL_RIGHTS_FAILED`   | 2007 |
//! | `ACQUIRE_DRM_INFO_FAILED`    | 2008 |

mod error;
mod types;

pub use error::TypeError;
pub use types::*;
