//! Task scheduling on the host's tick loop.

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub trait SchedulerPort: Send + Sync {
    /// Run `task` on the main loop after `ticks` ticks.
    fn run_after(&self, ticks: u32, task: Task);

    /// Run `task` off the main loop. Reserved for work that touches no
    /// engine state.
    fn run_async(&self, task: Task);
}
