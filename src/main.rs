//! Button Gesture Firmware: main entry point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  GpioInput        MonotonicClock   LogSink   TaskTracker │
//! │  (InputPin)       (Clock)          (Sink)    (Registry)  │
//! │  TaskScheduler (pinned FreeRTOS task per button)         │
//! │                                                          │
//! │  ──────────────── Port Trait Boundary ─────────────────  │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │        GestureClassifier → GestureMachine          │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::info;

use button_gesture::adapters::gpio::{GpioInput, Pull};
use button_gesture::adapters::log_sink::LogSink;
use button_gesture::adapters::time::MonotonicClock;
use button_gesture::app::ports::DiagnosticSink;
use button_gesture::diagnostics::TaskTracker;
use button_gesture::drivers::task::TaskScheduler;
use button_gesture::drivers::task_pin::Core;
use button_gesture::{GestureClassifier, Polarity, SamplingConfig, pins};

/// Seconds between two task-table summaries.
const SUMMARY_PERIOD_SECS: u64 = 60;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Button gesture v{}               ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Input pin ──────────────────────────────────────────
    let polarity = Polarity::from_active_high(pins::BUTTON_ACTIVE_HIGH);
    let pin = GpioInput::configure(pins::BUTTON_GPIO, Pull::for_polarity(polarity))?;
    let gpio = pin.gpio();

    // ── 3. Classifier ─────────────────────────────────────────
    let tracker = Arc::new(TaskTracker::new());
    let sink: Arc<dyn DiagnosticSink> = Arc::new(LogSink::new("button"));
    let mut button = GestureClassifier::new(
        pin,
        polarity,
        TaskScheduler::new(Core::App, 1),
        MonotonicClock::new(),
        Some(sink),
    )
    .with_task_registry(tracker.clone());

    button.on_single_press(|| info!("Single press"));
    button.on_double_press(|| info!("Double press"));
    button.on_long_press(|| info!("Long press"));

    let config = SamplingConfig::default();
    button.start_sampling(&config);
    if !button.is_sampling() {
        anyhow::bail!("button sampling task failed to start");
    }

    info!(
        "Button on GPIO{} ready ({:?}, every {} ms)",
        gpio,
        polarity,
        config.check_interval_ms
    );

    // ── 4. Idle loop ──────────────────────────────────────────
    loop {
        std::thread::sleep(Duration::from_secs(SUMMARY_PERIOD_SECS));
        tracker.log_summary();
    }
}
