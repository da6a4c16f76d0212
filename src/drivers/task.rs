//! Thread-backed periodic task scheduler.
//!
//! Each scheduled task gets its own thread (a FreeRTOS task on target,
//! pinned through [`spawn_on_core`]).  The thread runs the tick, then parks
//! until `interval` has elapsed since the tick started, so a slow tick
//! shortens the following sleep instead of shifting every later tick.
//!
//! Cancellation is synchronous: [`TaskScheduler::cancel`] raises the stop
//! flag, unparks the thread and joins it.  A tick already in flight runs to
//! completion first; none starts afterwards.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::app::ports::{Tick, TickScheduler};
use crate::drivers::task_pin::{Core, spawn_on_core};
use crate::error::Result;

/// Handle to one running periodic task.
pub struct TaskHandle {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

/// [`TickScheduler`] that spawns one pinned thread per task.
#[derive(Debug, Clone, Copy)]
pub struct TaskScheduler {
    core: Core,
    priority: u8,
}

impl TaskScheduler {
    pub fn new(core: Core, priority: u8) -> Self {
        Self { core, priority }
    }
}

impl Default for TaskScheduler {
    fn default() -> Self {
        Self::new(Core::App, 1)
    }
}

impl TickScheduler for TaskScheduler {
    type Handle = TaskHandle;

    fn schedule_repeating(
        &mut self,
        interval_ms: u32,
        stack_budget: usize,
        name: &str,
        mut tick: Tick,
    ) -> Result<TaskHandle> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let interval = Duration::from_millis(interval_ms as u64);

        let thread = spawn_on_core(self.core, self.priority, stack_budget, name, move || {
            run_periodic(&flag, interval, &mut tick);
        })?;

        Ok(TaskHandle { stop, thread })
    }

    fn cancel(&mut self, handle: TaskHandle) {
        handle.stop.store(true, Ordering::Release);

        // Cancelled from inside its own tick: the loop sees the flag as soon
        // as the tick returns, and a thread cannot join itself.
        if handle.thread.thread().id() == std::thread::current().id() {
            return;
        }

        handle.thread.thread().unpark();
        if handle.thread.join().is_err() {
            log::error!("task: periodic task panicked before cancellation");
        }
    }
}

fn run_periodic(stop: &AtomicBool, interval: Duration, tick: &mut dyn FnMut()) {
    while !stop.load(Ordering::Acquire) {
        let deadline = Instant::now() + interval;
        tick();

        loop {
            if stop.load(Ordering::Acquire) {
                return;
            }
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            std::thread::park_timeout(deadline - now);
        }
    }
}
