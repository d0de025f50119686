use crate::sched::timer::{Scheduler, TimerId};

/// At most one pending timer; re-arming replaces the previous one.
#[derive(Debug, Default)]
pub struct Debounce {
    pending: Option<TimerId>,
}

impl Debounce {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm<T>(&mut self, scheduler: &mut Scheduler<T>, delay_ms: u64, task: T) -> TimerId {
        self.disarm(scheduler);
        let id = scheduler.schedule(delay_ms, task);
        self.pending = Some(id);
        id
    }

    /// Cancel the pending timer. Returns whether one was pending.
    pub fn disarm<T>(&mut self, scheduler: &mut Scheduler<T>) -> bool {
        match self.pending.take() {
            Some(id) => scheduler.cancel(id),
            None => false,
        }
    }

    /// Forget `id` after it fired. Ignored if it is not the pending timer.
    pub fn fired(&mut self, id: TimerId) {
        if self.pending == Some(id) {
            self.pending = None;
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}
