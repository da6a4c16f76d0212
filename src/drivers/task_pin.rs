//! Core-pinned thread spawning for ESP32-S3 dual-core.
//!
//! Wraps `esp_pthread_set_cfg()` so that `std::thread::spawn` creates a
//! FreeRTOS task pinned to a specific CPU core with explicit priority
//! and stack size. On non-ESP targets, falls back to plain thread spawn.
//!
//! # ESP-IDF Threading Model
//!
//! ESP-IDF implements `std::thread` via pthreads, which are thin wrappers
//! around FreeRTOS tasks. `esp_pthread_set_cfg()` sets thread-local
//! configuration that applies to the *next* `pthread_create()` call from
//! the calling thread. This means the config→spawn pair must not be
//! interleaved with other thread creation on the same thread.

use std::thread::JoinHandle;

use crate::error::TaskError;

/// CPU core identifiers for the ESP32-S3 Xtensa LX7 dual-core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU): protocol stacks (WiFi, BLE, lwIP).
    Pro = 0,
    /// Core 1 (APP_CPU): application logic, button sampling.
    App = 1,
}

/// Spawn a thread pinned to a specific core with explicit priority and stack.
///
/// On ESP-IDF, uses `esp_pthread_set_cfg()` to configure core affinity,
/// priority, and stack size (bytes) before `std::thread::spawn`.
#[cfg(target_os = "espidf")]
pub fn spawn_on_core(
    core: Core,
    priority: u8,
    stack_bytes: usize,
    name: &str,
    f: impl FnOnce() + Send + 'static,
) -> Result<JoinHandle<()>, TaskError> {
    // FreeRTOS copies the name into the TCB during pthread_create(). The
    // thread-local config keeps pointing at it until `restore` resets it.
    let c_name = std::ffi::CString::new(name).map_err(|_| TaskError::SpawnFailed)?;

    // SAFETY: the cfg struct is copied by esp_pthread_set_cfg; `c_name`
    // outlives both the spawn and the config reset below.
    unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = core as i32;
        cfg.prio = priority as i32;
        cfg.stack_size = stack_bytes as _;
        cfg.thread_name = c_name.as_ptr() as *const _;
        let ret = esp_idf_sys::esp_pthread_set_cfg(&cfg);
        if ret != esp_idf_sys::ESP_OK as i32 {
            return Err(TaskError::ConfigRejected(ret));
        }
    }

    let restore = DefaultCfgOnDrop;

    log::info!(
        "Spawning '{}' on {:?} (pri={}, stack={}B)",
        name,
        core,
        priority,
        stack_bytes
    );

    let handle = std::thread::Builder::new()
        .name(name.into())
        .spawn(f)
        .map_err(|_| TaskError::SpawnFailed);
    drop(restore);
    drop(c_name);
    handle
}

/// Puts the calling thread's pthread config back to the ESP-IDF default,
/// so no later `pthread_create` sees a freed task name.
#[cfg(target_os = "espidf")]
struct DefaultCfgOnDrop;

#[cfg(target_os = "espidf")]
impl Drop for DefaultCfgOnDrop {
    fn drop(&mut self) {
        // SAFETY: the default config holds only static data.
        let ret = unsafe {
            let cfg = esp_idf_sys::esp_create_default_pthread_config();
            esp_idf_sys::esp_pthread_set_cfg(&cfg)
        };
        if ret != esp_idf_sys::ESP_OK as i32 {
            log::warn!("task_pin: pthread config reset failed (rc={})", ret);
        }
    }
}

/// Host threads need far more stack than a firmware task budget.
#[cfg(not(target_os = "espidf"))]
const SIM_MIN_STACK_BYTES: usize = 64 * 1024;

/// Simulation fallback. Ignores core affinity and priority.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_on_core(
    _core: Core,
    _priority: u8,
    stack_bytes: usize,
    name: &str,
    f: impl FnOnce() + Send + 'static,
) -> Result<JoinHandle<()>, TaskError> {
    log::info!(
        "Spawning '{}' (sim, no core pinning, stack={}B)",
        name,
        stack_bytes
    );

    std::thread::Builder::new()
        .name(name.into())
        .stack_size(stack_bytes.max(SIM_MIN_STACK_BYTES))
        .spawn(f)
        .map_err(|_| TaskError::SpawnFailed)
}
