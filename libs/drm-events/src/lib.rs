//! # drm-events
//!
//! The error event record a DRM session hands to its error listener.
//!
//! ## Design Principles
//!
//! - Session ID, error type and message never change after construction
//! - The binary payload is owned by the event and copied on every set
//! - Attributes are an insertion-ordered string map with unique keys
//! - Keys and values are traversed by two separate cursors that agree on order
//!
//! ## Example
//!
//! ```
//! use drm_events::ErrorEvent;
//! use drm_types::ErrorType;
//!
//! let event = ErrorEvent::new(42, ErrorType::RightsNotInstalled, "rights install failed");
//! event.put_attribute("scheme", "widevine")?;
//! event.put_attribute("code", "7")?;
//!
//! let mut keys = event.key_cursor();
//! let mut values = event.value_cursor();
//! while keys.has_next() {
//!     println!("{} = {}", keys.next()?, values.next()?);
//! }
//! # Ok::<(), drm_events::EventError>(())
//! ```

mod attributes;
mod config;
mod cursor;
mod error;
mod event;

pub use config::*;
pub use cursor::{KeyCursor, ValueCursor};
pub use error::EventError;
pub use event::{ErrorEvent, ErrorEventBuilder};

/// Re-export identifier types for consumers that only depend on this crate
pub use drm_types::{error_types, ErrorType, SessionId, TypeError};
