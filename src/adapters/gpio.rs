//! Raw-GPIO input pin adapter.
//!
//! Configures a pin as a plain input (chosen pull, interrupts disabled)
//! with a single `gpio_config` call and exposes it as an
//! `embedded_hal::digital::InputPin`, which is all the classifier needs.
//!
//! - **`target_os = "espidf"`**: `gpio_config()` / `gpio_get_level()`.
//! - **`not(target_os = "espidf")`**: a simulated bank of 64 levels held
//!   in an atomic, driven by [`set_sim_level`].

use embedded_hal::digital::{ErrorType, InputPin};

use crate::config::Polarity;
use crate::error::GpioError;

/// Highest GPIO number on the ESP32-S3.
pub const MAX_GPIO: i32 = 48;

/// Internal bias resistor applied when the pin is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull {
    Up,
    Down,
    Floating,
}

impl Pull {
    /// Bias that holds the pin at its released level.
    pub const fn for_polarity(polarity: Polarity) -> Self {
        match polarity {
            Polarity::ActiveHigh => Self::Down,
            Polarity::ActiveLow => Self::Up,
        }
    }
}

/// A GPIO configured as a digital input.
#[derive(Debug)]
pub struct GpioInput {
    gpio: i32,
}

impl GpioInput {
    /// Configure `gpio` as an input with the given pull.
    pub fn configure(gpio: i32, pull: Pull) -> Result<Self, GpioError> {
        if !(0..=MAX_GPIO).contains(&gpio) {
            return Err(GpioError::InvalidPin(gpio));
        }
        configure_input(gpio, pull)?;
        Ok(Self { gpio })
    }

    /// GPIO number this input reads.
    pub fn gpio(&self) -> i32 {
        self.gpio
    }
}

impl ErrorType for GpioInput {
    type Error = GpioError;
}

impl InputPin for GpioInput {
    fn is_high(&mut self) -> Result<bool, GpioError> {
        Ok(read_level(self.gpio))
    }

    fn is_low(&mut self) -> Result<bool, GpioError> {
        Ok(!read_level(self.gpio))
    }
}

// ── ESP-IDF ───────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn configure_input(gpio: i32, pull: Pull) -> Result<(), GpioError> {
    use esp_idf_svc::sys::*;

    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << gpio,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: if pull == Pull::Up {
            gpio_pullup_t_GPIO_PULLUP_ENABLE
        } else {
            gpio_pullup_t_GPIO_PULLUP_DISABLE
        },
        pull_down_en: if pull == Pull::Down {
            gpio_pulldown_t_GPIO_PULLDOWN_ENABLE
        } else {
            gpio_pulldown_t_GPIO_PULLDOWN_DISABLE
        },
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: gpio_config only touches the IO-MUX / GPIO registers of the
    // pins in `pin_bit_mask`; `gpio` was range-checked by the caller.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(GpioError::ConfigFailed(ret));
    }

    log::info!("gpio: GPIO{} configured as input ({:?})", gpio, pull);
    Ok(())
}

#[cfg(target_os = "espidf")]
fn read_level(gpio: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin.
    (unsafe { esp_idf_svc::sys::gpio_get_level(gpio) }) != 0
}

// ── Simulation ────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
static SIM_LEVELS: core::sync::atomic::AtomicU64 = core::sync::atomic::AtomicU64::new(0);

/// Drive the simulated level of `gpio`.
#[cfg(not(target_os = "espidf"))]
pub fn set_sim_level(gpio: i32, high: bool) {
    use core::sync::atomic::Ordering;

    let mask = 1u64 << gpio;
    if high {
        SIM_LEVELS.fetch_or(mask, Ordering::AcqRel);
    } else {
        SIM_LEVELS.fetch_and(!mask, Ordering::AcqRel);
    }
}

#[cfg(not(target_os = "espidf"))]
fn configure_input(gpio: i32, pull: Pull) -> Result<(), GpioError> {
    match pull {
        Pull::Up => set_sim_level(gpio, true),
        Pull::Down => set_sim_level(gpio, false),
        Pull::Floating => {}
    }
    log::info!("gpio(sim): GPIO{} configured as input ({:?})", gpio, pull);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn read_level(gpio: i32) -> bool {
    SIM_LEVELS.load(core::sync::atomic::Ordering::Acquire) & (1u64 << gpio) != 0
}
