//! GPIO pin assignments for the button board.
//!
//! Single source of truth: the firmware binary references this module
//! rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// User button
// ---------------------------------------------------------------------------

/// Momentary push-button input.
pub const BUTTON_GPIO: i32 = 16;
/// The button shorts to GND, so a pressed button reads LOW.
pub const BUTTON_ACTIVE_HIGH: bool = false;
