//! Platform abstractions: named threads, the UI dispatch queue and path helpers.

pub mod path;
pub mod thread;

pub use thread::{Dispatcher, SerialQueue, Task, run_sync, spawn_named_thread};
