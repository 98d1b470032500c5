//! Latest-wins delayed task
//!
//! Scheduling a task aborts whichever task is still waiting. Each schedule
//! bumps a generation counter that is handed to the task, so a task that
//! fired just before being aborted can still be recognised as outdated.

use std::time::Duration;
use tokio::task::JoinHandle;

pub struct Debouncer {
    pending: Option<JoinHandle<()>>,
    generation: u64,
}

impl Debouncer {
    pub fn new() -> Self {
        Self {
            pending: None,
            generation: 0,
        }
    }

    /// Run `task` once `delay` has passed without another call to `schedule`.
    /// Returns the generation passed to `task`.
    pub fn schedule<F>(&mut self, delay: Duration, task: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task(generation);
        }));

        generation
    }

    /// Abort the waiting task, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether `generation` belongs to the most recent schedule
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
