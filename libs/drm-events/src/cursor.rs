//! Key and value cursors over an error event's attributes.
//!
//! Both cursors walk the same ordered attribute sequence, so the key at
//! position `i` and the value at position `i` always belong to the same pair.
//! Cursors hold a shared reference to the event and read its *current*
//! attributes on every step; they do not snapshot.
//!
//! Adding or overwriting attributes while a cursor is in use is unsupported.
//! A cursor remembers the event's modification count at creation and
//! `next()` fails with [`EventError::StaleCursor`] once it no longer matches.
//! Call `reset()` to resynchronize and start over.

use crate::{ErrorEvent, EventError};

/// Defines a cursor type yielding one side of each attribute pair.
macro_rules! define_cursor {
    ($name:ident, $accessor:ident, $what:literal) => {
        #[doc = concat!("Single-pass cursor yielding attribute ", $what, "s in insertion order.")]
        ///
        /// Cloning copies the current position; the clone advances
        /// independently of the original.
        #[derive(Debug, Clone)]
        pub struct $name<'a> {
            event: &'a ErrorEvent,
            position: usize,
            modifications: u64,
        }

        impl<'a> $name<'a> {
            pub(crate) fn new(event: &'a ErrorEvent) -> Self {
                Self {
                    event,
                    position: 0,
                    modifications: event.modifications(),
                }
            }

            /// Returns true while the position is below the current attribute count.
            #[must_use]
            pub fn has_next(&self) -> bool {
                self.position < self.event.attribute_count()
            }

            #[doc = concat!("Returns the ", $what, " at the current position and advances.")]
            ///
            /// Fails with [`EventError::OutOfBounds`] when `has_next()` is false
            /// and with [`EventError::StaleCursor`] when the attributes were
            /// modified since this cursor was created.
            #[allow(clippy::should_implement_trait)]
            pub fn next(&mut self) -> Result<String, EventError> {
                let count = self.event.attribute_count();
                if self.position >= count {
                    return Err(EventError::OutOfBounds {
                        position: self.position,
                        count,
                    });
                }

                if self.modifications != self.event.modifications() {
                    return Err(EventError::StaleCursor {
                        position: self.position,
                    });
                }

                let item = self.event.$accessor(self.position).ok_or(
                    EventError::OutOfBounds {
                        position: self.position,
                        count,
                    },
                )?;
                self.position += 1;
                Ok(item)
            }

            /// Current position, starting at 0.
            #[must_use]
            pub fn position(&self) -> usize {
                self.position
            }

            /// Number of items left before the cursor is exhausted.
            #[must_use]
            pub fn remaining(&self) -> usize {
                self.event.attribute_count().saturating_sub(self.position)
            }

            /// Rewinds to position 0 and accepts the event's current attributes.
            pub fn reset(&mut self) {
                self.position = 0;
                self.modifications = self.event.modifications();
            }

            /// Returns true if the event's attributes changed after this cursor was created.
            #[must_use]
            pub fn is_stale(&self) -> bool {
                self.modifications != self.event.modifications()
            }
        }
    };
}

define_cursor!(KeyCursor, key_at, "key");
define_cursor!(ValueCursor, value_at, "value");
