//! Integration tests: GestureClassifier driven through mock adapters.
//!
//! Each test builds a [`Rig`] (classifier, mock pin, fake clock and a
//! hand-cranked scheduler), then feeds it pressed/released segments at
//! the default 30 ms sampling period.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use button_gesture::app::ports::{DiagnosticSink, TaskRegistry};
use button_gesture::diagnostics::TaskTracker;
use button_gesture::drivers::task::TaskScheduler;
use button_gesture::{GestureClassifier, Polarity, SamplingConfig};
use log::Level;

use crate::mock_hw::{Counters, FakeClock, ManualScheduler, MockPin, RecordingSink};

const TICK_MS: u64 = 30;

struct Rig {
    button: GestureClassifier<MockPin, ManualScheduler, FakeClock>,
    pin: MockPin,
    clock: FakeClock,
    sched: ManualScheduler,
    sink: RecordingSink,
    polarity: Polarity,
    counters: Counters,
    config: SamplingConfig,
}

impl Rig {
    fn new(polarity: Polarity) -> Self {
        let pin = MockPin::new(!polarity.active_level());
        let clock = FakeClock::starting_at(10_000);
        let sched = ManualScheduler::new();
        let sink = RecordingSink::default();
        let button = GestureClassifier::new(
            pin.clone(),
            polarity,
            sched.clone(),
            clock.clone(),
            Some(Arc::new(sink.clone()) as Arc<dyn DiagnosticSink>),
        );
        Self {
            button,
            pin,
            clock,
            sched,
            sink,
            polarity,
            counters: Counters::default(),
            config: SamplingConfig::default(),
        }
    }

    fn arm_single(&self) {
        let c = Arc::clone(&self.counters.single);
        self.button.on_single_press(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
    }

    fn arm_double(&self) {
        let c = Arc::clone(&self.counters.double);
        self.button.on_double_press(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
    }

    fn arm_long(&self) {
        let c = Arc::clone(&self.counters.long);
        self.button.on_long_press(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
    }

    fn arm_all(&self) -> &Self {
        self.arm_single();
        self.arm_double();
        self.arm_long();
        self
    }

    fn start(&mut self) -> &mut Self {
        let config = self.config.clone();
        self.button.start_sampling(&config);
        self
    }

    /// Hold the button in one state for `ms`, sampling every tick.
    fn hold(&self, pressed: bool, ms: u64) -> &Self {
        let level = if pressed {
            self.polarity.active_level()
        } else {
            !self.polarity.active_level()
        };
        self.pin.set_high(level);
        for _ in 0..ms / TICK_MS {
            self.sched.fire();
            self.clock.advance(TICK_MS);
        }
        self
    }

    fn fired(&self) -> (usize, usize, usize) {
        self.counters.get()
    }
}

fn rig() -> Rig {
    Rig::new(Polarity::ActiveLow)
}

// ── Concrete timelines ────────────────────────────────────────

#[test]
fn short_press_fires_single_on_release_tick() {
    let mut rig = rig();
    rig.arm_single();
    rig.start();

    rig.hold(true, 150);
    assert_eq!(rig.fired(), (0, 0, 0));
    rig.hold(false, 30);
    assert_eq!(rig.fired(), (1, 0, 0));
    rig.hold(false, 670);
    assert_eq!(rig.fired(), (1, 0, 0));
}

#[test]
fn single_press_with_double_armed_waits_for_gap() {
    let mut rig = rig();
    rig.arm_all();
    rig.start();

    rig.hold(true, 150).hold(false, 480);
    assert_eq!(rig.fired(), (0, 0, 0), "must not resolve inside the gap");
    rig.hold(false, 60);
    assert_eq!(rig.fired(), (1, 0, 0));
    rig.hold(false, 1000);
    assert_eq!(rig.fired(), (1, 0, 0));
}

#[test]
fn two_quick_presses_fire_double_only() {
    let mut rig = rig();
    rig.arm_all();
    rig.start();

    rig.hold(true, 150)
        .hold(false, 150)
        .hold(true, 150)
        .hold(false, 700);
    assert_eq!(rig.fired(), (0, 1, 0));
}

#[test]
fn long_hold_fires_long_once() {
    let mut rig = rig();
    rig.arm_all();
    rig.start();

    rig.hold(true, 1200);
    assert_eq!(rig.fired(), (0, 0, 1));
    rig.hold(true, 3000);
    assert_eq!(rig.fired(), (0, 0, 1), "long press must not repeat");
    rig.hold(false, 600);
    assert_eq!(rig.fired(), (0, 0, 1));

    // Back to idle: the next short press is an ordinary single.
    rig.hold(true, 150).hold(false, 700);
    assert_eq!(rig.fired(), (1, 0, 1));
}

#[test]
fn bounce_fires_nothing() {
    let mut rig = rig();
    rig.arm_all();
    rig.start();

    rig.hold(true, 60).hold(false, 1000);
    // Exactly at the debounce threshold still counts as bounce.
    rig.hold(true, 90).hold(false, 1000);
    assert_eq!(rig.fired(), (0, 0, 0));
}

#[test]
fn lone_press_waits_for_a_partner_when_only_double_is_armed() {
    let mut rig = rig();
    rig.arm_double();
    rig.start();

    rig.hold(true, 150).hold(false, 1000);
    assert_eq!(rig.fired(), (0, 0, 0));

    // The pending press pairs with the next one, however late.
    rig.hold(true, 150).hold(false, 150);
    assert_eq!(rig.fired(), (0, 1, 0));
}

#[test]
fn long_only_cycle_stays_pending_until_restart() {
    let mut rig = rig();
    rig.arm_long();
    rig.start();

    rig.hold(true, 150).hold(false, 700);
    rig.hold(true, 1500).hold(false, 300);
    assert_eq!(rig.fired(), (0, 0, 0));

    rig.start();
    rig.hold(true, 1200);
    assert_eq!(rig.fired(), (0, 0, 1));
}

#[test]
fn cleared_callback_stops_firing() {
    let mut rig = rig();
    rig.arm_single();
    rig.start();

    rig.hold(true, 150).hold(false, 100);
    assert_eq!(rig.fired(), (1, 0, 0));

    rig.button.set_single_press_callback(None);
    rig.hold(true, 150).hold(false, 700);
    assert_eq!(rig.fired(), (1, 0, 0));
}

#[test]
fn replaced_callback_takes_effect_on_next_gesture() {
    let mut rig = rig();
    rig.arm_single();
    rig.start();

    let replacement = Arc::new(AtomicUsize::new(0));
    let r = Arc::clone(&replacement);
    rig.button.on_single_press(move || {
        r.fetch_add(1, Ordering::SeqCst);
    });

    rig.hold(true, 150).hold(false, 100);
    assert_eq!(rig.fired(), (0, 0, 0));
    assert_eq!(replacement.load(Ordering::SeqCst), 1);
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn nothing_is_sampled_before_start() {
    let rig = rig();
    rig.arm_all();
    assert!(!rig.button.is_sampling());
    assert!(!rig.sched.is_active());

    rig.hold(true, 150).hold(false, 700);
    assert_eq!(rig.fired(), (0, 0, 0));
}

#[test]
fn stop_is_idempotent() {
    let mut rig = rig();
    rig.arm_all();

    rig.button.stop_sampling();
    rig.start();
    rig.button.stop_sampling();
    rig.button.stop_sampling();

    assert!(!rig.button.is_sampling());
    assert_eq!(rig.sched.cancels(), 1);
    assert!(!rig.sched.fire());

    rig.hold(true, 150).hold(false, 700);
    assert_eq!(rig.fired(), (0, 0, 0));
}

#[test]
fn stop_mid_gesture_drops_it() {
    let mut rig = rig();
    rig.arm_all();
    rig.start();

    rig.hold(true, 150).hold(false, 60);
    rig.button.stop_sampling();
    rig.hold(false, 1000);
    assert_eq!(rig.fired(), (0, 0, 0));
}

#[test]
fn restart_discards_partial_gesture() {
    let mut rig = rig();
    rig.arm_all();
    rig.start();

    // One press registered, still inside the double-press gap.
    rig.hold(true, 150).hold(false, 60);
    rig.start();
    assert_eq!(rig.sched.cancels(), 1);
    assert_eq!(rig.sched.calls().len(), 2);

    rig.hold(true, 150).hold(false, 700);
    assert_eq!(rig.fired(), (1, 0, 0), "restart must not pair into a double");
}

#[test]
fn restart_applies_new_timing() {
    let mut rig = rig();
    rig.arm_long();
    rig.start();

    rig.config = SamplingConfig::default().with_timing(30, 90, 300, 500);
    rig.start();
    rig.hold(true, 390);
    assert_eq!(rig.fired(), (0, 0, 1));

    let call = rig.sched.calls().pop().unwrap();
    assert_eq!(call.interval_ms, 30);
}

#[test]
fn start_passes_task_parameters_to_scheduler() {
    let mut rig = rig();
    rig.config = SamplingConfig::default().with_task_name("front-button");
    rig.config.stack_budget = 3000;
    rig.start();

    let calls = rig.sched.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].interval_ms, 30);
    assert_eq!(calls[0].stack_budget, 3000);
    assert_eq!(calls[0].name, "front-button");
}

#[test]
fn scheduler_failure_is_reported_and_leaves_classifier_stopped() {
    let mut rig = rig();
    rig.sched.fail_next();
    rig.start();

    assert!(!rig.button.is_sampling());
    assert!(rig.sink.contains(Level::Error, "sampling not started"));

    rig.start();
    assert!(rig.button.is_sampling());
}

#[test]
fn drop_stops_sampling() {
    let mut rig = rig();
    let sched = rig.sched.clone();
    let counters = rig.counters.clone();
    let pin = rig.pin.clone();

    rig.arm_all();
    rig.start();
    rig.hold(true, 150);
    drop(rig);

    assert!(!sched.is_active());
    assert_eq!(sched.cancels(), 1);
    pin.set_high(true);
    assert!(!sched.fire());
    assert_eq!(counters.get(), (0, 0, 0));
}

#[test]
fn registry_tracks_the_sampling_task() {
    let pin = MockPin::new(true);
    let sched = ManualScheduler::new();
    let tracker = Arc::new(TaskTracker::new());
    let mut button = GestureClassifier::new(
        pin,
        Polarity::ActiveLow,
        sched.clone(),
        FakeClock::default(),
        None,
    )
    .with_task_registry(Arc::clone(&tracker) as Arc<dyn TaskRegistry>);

    let config = SamplingConfig::default().with_task_name("btn-test");
    button.start_sampling(&config);
    assert!(tracker.contains("btn-test"));
    assert_eq!(tracker.live_count(), 1);

    // Restart re-registers under the same name, never twice.
    button.start_sampling(&config);
    assert_eq!(tracker.live_count(), 1);

    button.stop_sampling();
    assert_eq!(tracker.live_count(), 0);
}

// ── Input ─────────────────────────────────────────────────────

#[test]
fn is_pressed_follows_polarity() {
    let low = Rig::new(Polarity::ActiveLow);
    low.pin.set_high(false);
    assert!(low.button.is_pressed());
    low.pin.set_high(true);
    assert!(!low.button.is_pressed());

    let high = Rig::new(Polarity::ActiveHigh);
    high.pin.set_high(true);
    assert!(high.button.is_pressed());
    high.pin.set_high(false);
    assert!(!high.button.is_pressed());
    assert_eq!(high.button.polarity(), Polarity::ActiveHigh);
}

#[test]
fn active_high_button_classifies_the_same() {
    let mut rig = Rig::new(Polarity::ActiveHigh);
    rig.arm_all();
    rig.start();

    rig.hold(true, 150)
        .hold(false, 150)
        .hold(true, 150)
        .hold(false, 700);
    assert_eq!(rig.fired(), (0, 1, 0));
}

#[test]
fn read_failure_counts_as_released() {
    let mut rig = rig();
    rig.arm_single();
    rig.start();

    rig.pin.set_failing(true);
    assert!(!rig.button.is_pressed());
    assert!(rig.sink.contains(Level::Warn, "read failed"));

    // A press hidden by a failing pin is never seen.
    rig.pin.set_high(false);
    for _ in 0..10 {
        rig.sched.fire();
        rig.clock.advance(TICK_MS);
    }
    rig.pin.set_failing(false);
    rig.hold(false, 600);
    assert_eq!(rig.fired(), (0, 0, 0));
}

// ── Diagnostics ───────────────────────────────────────────────

#[test]
fn classification_does_not_depend_on_the_sink() {
    let run = |sink: Option<Arc<dyn DiagnosticSink>>| {
        let pin = MockPin::new(true);
        let sched = ManualScheduler::new();
        let clock = FakeClock::default();
        let count = Arc::new(AtomicUsize::new(0));
        let mut button = GestureClassifier::new(
            pin.clone(),
            Polarity::ActiveLow,
            sched.clone(),
            clock.clone(),
            sink,
        );
        let c = Arc::clone(&count);
        button.on_double_press(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        button.start_sampling(&SamplingConfig::default());

        for (pressed, ticks) in [(true, 5), (false, 5), (true, 5), (false, 25)] {
            pin.set_high(!pressed);
            for _ in 0..ticks {
                sched.fire();
                clock.advance(TICK_MS);
            }
        }
        count.load(Ordering::SeqCst)
    };

    let recorded = run(Some(Arc::new(RecordingSink::default())));
    let silent = run(None);
    assert_eq!(recorded, 1);
    assert_eq!(silent, recorded);
}

#[test]
fn gestures_are_logged_at_debug() {
    let mut rig = rig();
    rig.arm_all();
    rig.start();
    rig.hold(true, 1200);

    assert!(rig.sink.contains(Level::Debug, "long press detected"));
    assert!(rig.sink.contains(Level::Debug, "sampling start"));
}

// ── Real scheduler ────────────────────────────────────────────

#[test]
fn thread_scheduler_stops_before_returning() {
    let pin = MockPin::new(false); // held down (active low)
    let count = Arc::new(AtomicUsize::new(0));
    let mut button = GestureClassifier::new(
        pin,
        Polarity::ActiveLow,
        TaskScheduler::default(),
        button_gesture::adapters::time::MonotonicClock::new(),
        None,
    );
    let c = Arc::clone(&count);
    button.on_long_press(move || {
        c.fetch_add(1, Ordering::SeqCst);
    });

    let config = SamplingConfig::default().with_timing(5, 10, 40, 50);
    button.start_sampling(&config);
    assert!(button.is_sampling());

    std::thread::sleep(Duration::from_millis(300));
    button.stop_sampling();
    assert_eq!(count.load(Ordering::SeqCst), 1, "held button fires long exactly once");

    let after = count.load(Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(count.load(Ordering::SeqCst), after);
}
