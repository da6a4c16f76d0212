//! Port traits: the boundary between the gesture classifier and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ GestureClassifier (domain)
//! ```
//!
//! The input pin itself is not a port of ours: the classifier consumes any
//! `embedded_hal::digital::InputPin`, so every HAL in the ecosystem plugs in
//! directly.  Everything else it needs from the platform is listed here.

use core::fmt;

use log::Level;

use crate::error::Result;

// ───────────────────────────────────────────────────────────────
// Scheduling port (driven adapter: domain → task runtime)
// ───────────────────────────────────────────────────────────────

/// Body of one sampling tick.  Runs on the scheduler's task.
pub type Tick = Box<dyn FnMut() + Send + 'static>;

/// Periodic-task primitive the classifier uses to drive its sampling step.
///
/// Implementations must never overlap two invocations of the same tick, and
/// [`cancel`](TickScheduler::cancel) must not return while a tick is still
/// executing (unless it is called from inside that very tick).
pub trait TickScheduler {
    type Handle;

    /// Start invoking `tick` every `interval_ms` on a task named `name`
    /// with roughly `stack_budget` bytes of stack.
    fn schedule_repeating(
        &mut self,
        interval_ms: u32,
        stack_budget: usize,
        name: &str,
        tick: Tick,
    ) -> Result<Self::Handle>;

    /// Stop the task behind `handle`.
    fn cancel(&mut self, handle: Self::Handle);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock read once per tick.
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed epoch.  Never decreases.
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Diagnostic sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// Leveled text messages from the classifier.  Purely a side channel:
/// whatever the sink does has no effect on classification.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, level: Level, message: fmt::Arguments<'_>);
}

/// Sink used when no logger is supplied.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&self, _level: Level, _message: fmt::Arguments<'_>) {}
}

// ───────────────────────────────────────────────────────────────
// Task registry port
// ───────────────────────────────────────────────────────────────

/// Optional bookkeeping of live sampling tasks, e.g. for a diagnostics
/// dump of every task in the firmware.
pub trait TaskRegistry: Send + Sync {
    fn register(&self, name: &str, stack_budget: usize);
    fn unregister(&self, name: &str);
}
