//! Fuzz target: `GestureMachine::step`
//!
//! The first four bytes pick the armed set and the thresholds; every
//! remaining byte is one tick: bit 0 is the pressed level, the upper bits
//! the time advanced since the previous tick.
//!
//! Invariants checked:
//! - No panics under any byte sequence (including clock wrap-around)
//! - Only armed gestures are reported
//! - A second gesture is never reported before the machine returns to Idle
//!
//! cargo fuzz run fuzz_gesture_machine

#![no_main]

use button_gesture::Gesture;
use button_gesture::fsm::context::{Armed, Thresholds, TickContext};
use button_gesture::fsm::{GestureMachine, Phase};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let [flags, debounce, long, gap, ticks @ ..] = data else {
        return;
    };

    let armed = Armed {
        single: flags & 0b001 != 0,
        double: flags & 0b010 != 0,
        long: flags & 0b100 != 0,
    };
    let mut machine = GestureMachine::new(Thresholds {
        debounce_ms: *debounce as u64,
        long_press_ms: *long as u64 * 10,
        double_press_gap_ms: *gap as u64 * 5,
    });

    // Start close to the wrap point so wrapping arithmetic is exercised.
    let mut now = u64::MAX - 2_000;
    let mut may_fire = true;

    for &b in ticks {
        now = now.wrapping_add((b >> 1) as u64);
        let ctx = TickContext {
            pressed: b & 1 != 0,
            now_ms: now,
            armed,
        };

        if let Some(g) = machine.step(&ctx) {
            let allowed = match g {
                Gesture::SinglePress => armed.single,
                Gesture::DoublePress => armed.double,
                Gesture::LongPress => armed.long,
            };
            assert!(allowed, "{g} reported without a handler");
            assert!(may_fire, "{g} reported twice in one cycle");
            may_fire = false;
        }
        if machine.phase() == Phase::Idle {
            may_fire = true;
        }
    }
});
