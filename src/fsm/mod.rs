//! Polled gesture state machine.
//!
//! One `step()` per sampling tick turns a stream of instantaneous
//! pressed/released samples into at most one [`Gesture`] per press cycle:
//!
//! ```text
//!            pressed                    released (press_count ≥ 1)
//!   ┌──────┐ ───────▶ ┌──────────────┐ ─────────▶ ┌─────────────────┐
//!   │ Idle │          │ PressPending │            │ ReleasedPending │
//!   └──────┘ ◀─────── └──────────────┘ ◀───────── └─────────────────┘
//!      ▲     bounce          │ long press       pressed   │ single / double
//!      │                     ▼                            ▼
//!      │   released   ┌──────────┐                        │
//!      └───────────── │ Resolved │ ◀──────────────────────┘
//!                     └──────────┘
//! ```
//!
//! The machine is pure: no clock, no pin, no handlers.  The caller reads
//! the input, the clock and the set of registered handlers into a
//! [`TickContext`] and acts on the returned gesture.
//!
//! Timestamps use wrapping arithmetic; a gesture is assumed to be much
//! shorter than the clock's wrap period.

pub mod context;

use context::{Thresholds, TickContext};

use crate::app::events::Gesture;

/// Coarse view of where the current press cycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No gesture in progress.
    Idle,
    /// Button is down; waiting for release or the long-press threshold.
    PressPending,
    /// Button is up after at least one press; waiting for the debounce
    /// verdict, the double-press gap, or a second press.
    ReleasedPending,
    /// A gesture was reported; waiting for the button to be released.
    Resolved,
}

/// Transient per-cycle state plus the thresholds it is judged against.
#[derive(Debug, Clone)]
pub struct GestureMachine {
    thresholds: Thresholds,
    was_pressed: bool,
    last_press_ms: u64,
    last_release_ms: u64,
    press_count: u8,
    resolved: bool,
}

impl GestureMachine {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            was_pressed: false,
            last_press_ms: 0,
            last_release_ms: 0,
            press_count: 0,
            resolved: false,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.resolved {
            Phase::Resolved
        } else if self.was_pressed {
            Phase::PressPending
        } else if self.press_count > 0 {
            Phase::ReleasedPending
        } else {
            Phase::Idle
        }
    }

    /// Completed press/release pairs in the current cycle.
    pub fn press_count(&self) -> u8 {
        self.press_count
    }

    /// Discard the current cycle.
    pub fn reset(&mut self) {
        self.was_pressed = false;
        self.last_press_ms = 0;
        self.last_release_ms = 0;
        self.press_count = 0;
        self.resolved = false;
    }

    /// Advance by one sample.  Returns the gesture resolved on this tick.
    pub fn step(&mut self, ctx: &TickContext) -> Option<Gesture> {
        if self.resolved {
            // Hold off until the button is let go, whatever happens meanwhile.
            if !ctx.pressed {
                self.reset();
            }
            return None;
        }

        if ctx.pressed {
            self.on_pressed(ctx)
        } else {
            self.on_released(ctx)
        }
    }

    fn on_pressed(&mut self, ctx: &TickContext) -> Option<Gesture> {
        if !self.was_pressed {
            self.was_pressed = true;
            self.last_press_ms = ctx.now_ms;
            self.last_release_ms = 0;
            return None;
        }

        // press_count == 0: a hold that follows a completed press belongs
        // to a double press, not a long press.
        let held_ms = ctx.now_ms.wrapping_sub(self.last_press_ms);
        if ctx.armed.long && self.press_count == 0 && held_ms >= self.thresholds.long_press_ms {
            return Some(self.resolve(Gesture::LongPress));
        }

        None
    }

    fn on_released(&mut self, ctx: &TickContext) -> Option<Gesture> {
        if self.was_pressed {
            self.was_pressed = false;
            self.last_release_ms = ctx.now_ms;
            self.press_count = self.press_count.saturating_add(1);
        }

        if self.press_count == 0 {
            return None;
        }

        let press_len_ms = self.last_release_ms.wrapping_sub(self.last_press_ms);
        if press_len_ms <= self.thresholds.debounce_ms {
            self.press_count -= 1;
            self.last_press_ms = 0;
            self.last_release_ms = 0;
            return None;
        }

        self.classify_release(ctx)
    }

    fn classify_release(&mut self, ctx: &TickContext) -> Option<Gesture> {
        let gap_ms = ctx.now_ms.wrapping_sub(self.last_release_ms);

        if ctx.armed.single && (!ctx.armed.double || gap_ms > self.thresholds.double_press_gap_ms) {
            return Some(self.resolve(Gesture::SinglePress));
        }

        if ctx.armed.double && self.press_count >= 2 {
            return Some(self.resolve(Gesture::DoublePress));
        }

        None
    }

    fn resolve(&mut self, gesture: Gesture) -> Gesture {
        self.resolved = true;
        gesture
    }
}

impl Default for GestureMachine {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
