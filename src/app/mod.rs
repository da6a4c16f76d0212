//! Application core: gesture classification, zero direct I/O.
//!
//! The classifier talks to the pin, the clock, the task scheduler and the
//! diagnostic output only through the traits in [`ports`] (plus
//! `embedded_hal`'s `InputPin`), keeping this layer fully testable without
//! real peripherals.

pub mod classifier;
pub mod events;
pub mod ports;
