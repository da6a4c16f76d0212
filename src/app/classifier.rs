//! Gesture classifier service, the single entry point for one button.
//!
//! Owns the input pin, the three gesture handlers and the sampling task.
//! Each `start_sampling` hands the scheduler a fresh closure that carries
//! its own [`GestureMachine`], so a restart can never inherit half a
//! gesture from the previous run.
//!
//! ```text
//!  TickScheduler ──tick──▶ Shared::sample ──▶ GestureMachine::step
//!                              │  ▲                    │
//!                      InputPin┘  └Clock               ▼
//!                                             Handler (single/double/long)
//! ```
//!
//! Handlers are cloned out of their lock before they run, so a handler may
//! replace or clear handlers (including itself) without deadlocking.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use embedded_hal::digital::InputPin;
use log::Level;

use crate::app::events::Gesture;
use crate::app::ports::{Clock, DiagnosticSink, NullSink, TaskRegistry, Tick, TickScheduler};
use crate::config::{Polarity, SamplingConfig};
use crate::diagnostics::{self, STACK_HEADROOM_WARN_BYTES};
use crate::fsm::context::{Armed, Thresholds, TickContext};
use crate::fsm::{GestureMachine, Phase};

/// Gesture callback.  Captures whatever context it needs.
pub type Handler = Arc<dyn Fn() + Send + Sync + 'static>;

#[derive(Default)]
struct Handlers {
    single: Option<Handler>,
    double: Option<Handler>,
    long: Option<Handler>,
}

impl Handlers {
    fn armed(&self) -> Armed {
        Armed {
            single: self.single.is_some(),
            double: self.double.is_some(),
            long: self.long.is_some(),
        }
    }

    fn slot(&mut self, gesture: Gesture) -> &mut Option<Handler> {
        match gesture {
            Gesture::SinglePress => &mut self.single,
            Gesture::DoublePress => &mut self.double,
            Gesture::LongPress => &mut self.long,
        }
    }
}

/// State reachable from both the owner and the sampling task.
struct Shared<P, C> {
    pin: Mutex<P>,
    polarity: Polarity,
    clock: C,
    handlers: Mutex<Handlers>,
    sink: Arc<dyn DiagnosticSink>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<P: InputPin, C: Clock> Shared<P, C> {
    fn is_pressed(&self) -> bool {
        match lock(&self.pin).is_high() {
            Ok(level) => self.polarity.is_pressed(level),
            Err(e) => {
                self.sink
                    .record(Level::Warn, format_args!("button input read failed: {:?}", e));
                false
            }
        }
    }

    /// One sampling tick.
    fn sample(&self, machine: &mut GestureMachine) {
        let pressed = self.is_pressed();
        let armed = lock(&self.handlers).armed();
        let ctx = TickContext {
            pressed,
            now_ms: self.clock.now_ms(),
            armed,
        };

        let was_resolved = machine.phase() == Phase::Resolved;

        match machine.step(&ctx) {
            Some(gesture) => {
                self.sink
                    .record(Level::Debug, format_args!("{} detected", gesture));
                let handler = lock(&self.handlers).slot(gesture).clone();
                if let Some(handler) = handler {
                    handler();
                }
            }
            None if was_resolved && machine.phase() == Phase::Idle => self.report_headroom(),
            None => {}
        }
    }

    fn report_headroom(&self) {
        match diagnostics::stack_high_water_mark() {
            Some(free) if free < STACK_HEADROOM_WARN_BYTES => self.sink.record(
                Level::Warn,
                format_args!("button task stack nearly exhausted: {} B free", free),
            ),
            Some(free) => self.sink.record(
                Level::Trace,
                format_args!("button re-armed, {} B stack free", free),
            ),
            None => self.sink.record(Level::Trace, format_args!("button re-armed")),
        }
    }
}

struct RunningTask<H> {
    handle: H,
    name: heapless::String<16>,
}

/// Classifies one button's press cycles into single, double and long
/// presses and calls the matching handler.
///
/// Inert until [`start_sampling`](Self::start_sampling).  Dropping the
/// classifier stops sampling before any of its state is torn down.
pub struct GestureClassifier<P, S: TickScheduler, C> {
    shared: Arc<Shared<P, C>>,
    scheduler: S,
    task: Option<RunningTask<S::Handle>>,
    registry: Option<Arc<dyn TaskRegistry>>,
}

impl<P, S, C> GestureClassifier<P, S, C>
where
    P: InputPin + Send + 'static,
    S: TickScheduler,
    C: Clock + Send + Sync + 'static,
{
    /// Wrap `pin`, already configured as an input.  Without a `sink` all
    /// diagnostics are discarded.
    pub fn new(
        pin: P,
        polarity: Polarity,
        scheduler: S,
        clock: C,
        sink: Option<Arc<dyn DiagnosticSink>>,
    ) -> Self {
        let sink = sink.unwrap_or_else(|| Arc::new(NullSink) as Arc<dyn DiagnosticSink>);
        sink.record(
            Level::Debug,
            format_args!("button created (polarity={:?})", polarity),
        );
        Self {
            shared: Arc::new(Shared {
                pin: Mutex::new(pin),
                polarity,
                clock,
                handlers: Mutex::new(Handlers::default()),
                sink,
            }),
            scheduler,
            task: None,
            registry: None,
        }
    }

    /// Report sampling-task start/stop to `registry`.
    pub fn with_task_registry(mut self, registry: Arc<dyn TaskRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn polarity(&self) -> Polarity {
        self.shared.polarity
    }

    /// Instantaneous, undebounced read of the button.
    pub fn is_pressed(&self) -> bool {
        self.shared.is_pressed()
    }

    pub fn is_sampling(&self) -> bool {
        self.task.is_some()
    }

    pub fn set_single_press_callback(&self, handler: Option<Handler>) {
        self.set_handler(Gesture::SinglePress, handler);
    }

    pub fn set_double_press_callback(&self, handler: Option<Handler>) {
        self.set_handler(Gesture::DoublePress, handler);
    }

    pub fn set_long_press_callback(&self, handler: Option<Handler>) {
        self.set_handler(Gesture::LongPress, handler);
    }

    pub fn on_single_press(&self, f: impl Fn() + Send + Sync + 'static) {
        self.set_single_press_callback(Some(Arc::new(f)));
    }

    pub fn on_double_press(&self, f: impl Fn() + Send + Sync + 'static) {
        self.set_double_press_callback(Some(Arc::new(f)));
    }

    pub fn on_long_press(&self, f: impl Fn() + Send + Sync + 'static) {
        self.set_long_press_callback(Some(Arc::new(f)));
    }

    fn set_handler(&self, gesture: Gesture, handler: Option<Handler>) {
        let action = if handler.is_some() { "set" } else { "cleared" };
        *lock(&self.shared.handlers).slot(gesture) = handler;
        self.shared
            .sink
            .record(Level::Trace, format_args!("{} callback {}", gesture, action));
    }

    /// (Re)start sampling with `config`.  Any running task is stopped first
    /// and the new task starts from an idle cycle.
    ///
    /// If the scheduler cannot start the task the failure is reported to
    /// the diagnostic sink and the classifier stays stopped.
    pub fn start_sampling(&mut self, config: &SamplingConfig) {
        self.stop_sampling();

        self.shared.sink.record(
            Level::Debug,
            format_args!(
                "sampling start: interval={}ms debounce={}ms long={}ms gap={}ms",
                config.check_interval_ms,
                config.debounce_ms,
                config.long_press_ms,
                config.double_press_gap_ms
            ),
        );

        let shared = Arc::clone(&self.shared);
        let mut machine = GestureMachine::new(Thresholds::from(config));
        let tick: Tick = Box::new(move || shared.sample(&mut machine));

        match self.scheduler.schedule_repeating(
            config.check_interval_ms,
            config.stack_budget,
            &config.task_name,
            tick,
        ) {
            Ok(handle) => {
                if let Some(registry) = &self.registry {
                    registry.register(&config.task_name, config.stack_budget);
                }
                self.task = Some(RunningTask {
                    handle,
                    name: config.task_name.clone(),
                });
            }
            Err(e) => self
                .shared
                .sink
                .record(Level::Error, format_args!("sampling not started: {}", e)),
        }
    }
}

impl<P, S: TickScheduler, C> GestureClassifier<P, S, C> {
    /// Stop sampling.  No handler runs after this returns.  No-op when not
    /// sampling.
    pub fn stop_sampling(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        self.scheduler.cancel(task.handle);
        if let Some(registry) = &self.registry {
            registry.unregister(&task.name);
        }
        self.shared
            .sink
            .record(Level::Debug, format_args!("sampling stopped"));
    }
}

impl<P, S: TickScheduler, C> Drop for GestureClassifier<P, S, C> {
    fn drop(&mut self) {
        self.stop_sampling();
        self.shared
            .sink
            .record(Level::Debug, format_args!("button destroyed"));
    }
}
