//! Cooperative tick scheduler.
//!
//! The host drives time by calling [`TickScheduler::advance`] once per game
//! tick. Deferred tasks run on the caller's thread in (due tick, submission
//! order). The queue lock is released before each task runs, so tasks may
//! schedule further work.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;

use crate::infrastructure::ports::{SchedulerPort, Task};

pub struct TickScheduler {
    state: Mutex<QueueState>,
    runtime: Option<Handle>,
}

#[derive(Default)]
struct QueueState {
    current_tick: u64,
    next_seq: u64,
    queue: BTreeMap<(u64, u64), Task>,
}

impl TickScheduler {
    /// Off-loop work goes to the ambient tokio runtime when there is one,
    /// otherwise to a dedicated thread.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            runtime: Handle::try_current().ok(),
        }
    }

    fn state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current_tick(&self) -> u64 {
        self.state().current_tick
    }

    /// Tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.state().queue.len()
    }

    /// Advance the clock by `ticks`, running every task that falls due.
    /// Returns the number of tasks run.
    pub fn advance(&self, ticks: u32) -> usize {
        let mut ran = 0;
        for _ in 0..ticks {
            let now = {
                let mut state = self.state();
                state.current_tick += 1;
                state.current_tick
            };
            while let Some(task) = self.pop_due(now) {
                task();
                ran += 1;
            }
        }
        ran
    }

    fn pop_due(&self, now: u64) -> Option<Task> {
        let mut state = self.state();
        let (&key, _) = state.queue.first_key_value()?;
        if key.0 > now {
            return None;
        }
        state.queue.remove(&key)
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerPort for TickScheduler {
    /// Zero is treated as one: deferred work never runs inline.
    fn run_after(&self, ticks: u32, task: Task) {
        let mut state = self.state();
        let due = state.current_tick + u64::from(ticks.max(1));
        let seq = state.next_seq;
        state.next_seq += 1;
        state.queue.insert((due, seq), task);
    }

    fn run_async(&self, task: Task) {
        match &self.runtime {
            Some(runtime) => {
                runtime.spawn_blocking(task);
            }
            None => {
                if let Err(e) = std::thread::Builder::new()
                    .name("moblevels-async".to_string())
                    .spawn(task)
                {
                    tracing::warn!(error = %e, "Failed to start async worker");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, impl Fn(&'static str) -> Task) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let make = move |name: &'static str| -> Task {
            let sink = sink.clone();
            Box::new(move || sink.lock().unwrap_or_else(PoisonError::into_inner).push(name))
        };
        (log, make)
    }

    fn snapshot(log: &Arc<Mutex<Vec<&'static str>>>) -> Vec<&'static str> {
        log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[test]
    fn tasks_wait_for_their_tick() {
        let scheduler = TickScheduler::new();
        let (log, task) = recorder();
        scheduler.run_after(2, task("a"));

        assert_eq!(scheduler.advance(1), 0);
        assert!(snapshot(&log).is_empty());
        assert_eq!(scheduler.advance(1), 1);
        assert_eq!(snapshot(&log), ["a"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn runs_in_due_then_submission_order() {
        let scheduler = TickScheduler::new();
        let (log, task) = recorder();
        scheduler.run_after(2, task("late"));
        scheduler.run_after(1, task("first"));
        scheduler.run_after(1, task("second"));

        scheduler.advance(3);
        assert_eq!(snapshot(&log), ["first", "second", "late"]);
    }

    #[test]
    fn zero_delay_still_defers() {
        let scheduler = TickScheduler::new();
        let (log, task) = recorder();
        scheduler.run_after(0, task("now"));

        assert!(snapshot(&log).is_empty());
        scheduler.advance(1);
        assert_eq!(snapshot(&log), ["now"]);
    }

    #[test]
    fn tasks_can_schedule_more_work() {
        let scheduler = Arc::new(TickScheduler::new());
        let (log, task) = recorder();
        let inner = scheduler.clone();
        let follow_up = task("follow-up");
        scheduler.run_after(
            1,
            Box::new(move || inner.run_after(1, follow_up)),
        );

        assert_eq!(scheduler.advance(1), 1);
        assert_eq!(scheduler.pending(), 1);
        scheduler.advance(1);
        assert_eq!(snapshot(&log), ["follow-up"]);
        assert_eq!(scheduler.current_tick(), 2);
    }

    #[tokio::test]
    async fn async_work_runs_off_loop() {
        let scheduler = TickScheduler::new();
        let (tx, rx) = tokio::sync::oneshot::channel();
        scheduler.run_async(Box::new(move || {
            let _ = tx.send(std::thread::current().id());
        }));

        let worker = rx.await;
        assert!(matches!(worker, Ok(id) if id != std::thread::current().id()));
    }
}
