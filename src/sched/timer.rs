/// Handle for a scheduled single-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Timer<T> {
    id: TimerId,
    due_ms: u64,
    task: T,
}

/// Single-threaded, single-shot timers on a virtual millisecond clock.
///
/// Nothing fires on its own: the owner moves the clock with
/// [`Scheduler::advance`] and pulls due work with [`Scheduler::pop_due`].
/// Timers due at the same instant fire in scheduling order.
#[derive(Debug)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_id: u64,
    timers: Vec<Timer<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            timers: Vec::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn schedule(&mut self, delay_ms: u64, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due_ms: self.now_ms.saturating_add(delay_ms),
            task,
        });
        id
    }

    /// Returns false if the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.timers.iter().position(|t| t.id == id) {
            Some(idx) => {
                self.timers.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) -> usize {
        let n = self.timers.len();
        self.timers.clear();
        n
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.iter().map(|t| t.due_ms).min()
    }

    /// Move the clock forward. Does not fire anything.
    pub fn advance(&mut self, elapsed_ms: u64) {
        self.now_ms = self.now_ms.saturating_add(elapsed_ms);
    }

    /// Take the earliest timer due at or before the current time.
    pub fn pop_due(&mut self) -> Option<(TimerId, T)> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= self.now_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id))
            .map(|(idx, _)| idx)?;
        let timer = self.timers.remove(idx);
        Some((timer.id, timer.task))
    }

    /// Jump the clock to the next deadline (never backwards) and take that timer.
    pub fn pop_next(&mut self) -> Option<(TimerId, T)> {
        let deadline = self.next_deadline()?;
        self.now_ms = self.now_ms.max(deadline);
        self.pop_due()
    }
}
