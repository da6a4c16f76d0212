//! Task runtime drivers: core-pinned spawning and the periodic sampler.

pub mod task;
pub mod task_pin;
