//! Timer task scheduling
//!
//! Every timer is a named task with an explicit due time, owned by the
//! session state and emptied in one call when the `Playing` phase is left,
//! so a superseded session can never be mutated by a stale callback.
//!
//! Periods are "at least N ms": tasks fire when the shell advances the
//! clock past their due time, in due order, each running to completion.

/// Named timer tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Expire stale targets, top up the active set (recurring)
    SpawnTick,
    /// Roll for a new power-up (recurring)
    PowerUpTick,
    /// Decrement the session countdown (recurring)
    ClockTick,
    /// Prune cosmetic records (recurring)
    Cleanup,
    /// Reset the combo streak (one-shot, re-armed per elimination)
    ComboDecay,
    /// Clear the double-points flag (one-shot)
    DoublePointsExpiry,
    /// Restore normal animation speed (one-shot)
    SlowTimeRestore,
    /// Enter the success phase shortly after the score target is hit
    SuccessDelay,
}

#[derive(Debug, Clone)]
struct Entry {
    task: Task,
    due_ms: u64,
    period_ms: Option<u64>,
    /// Tie-breaker so equal due times fire in scheduling order
    seq: u64,
}

/// Pending timer tasks for one session
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a recurring task. Replaces any pending instance of `task`.
    pub fn every(&mut self, task: Task, now_ms: u64, period_ms: u64) {
        self.cancel(task);
        self.push(task, now_ms + period_ms, Some(period_ms));
    }

    /// Arm a one-shot task. Replaces any pending instance of `task`, which
    /// is what gives the combo window its reset-on-elimination semantics.
    pub fn once(&mut self, task: Task, now_ms: u64, delay_ms: u64) {
        self.cancel(task);
        self.push(task, now_ms + delay_ms, None);
    }

    pub fn cancel(&mut self, task: Task) {
        self.entries.retain(|e| e.task != task);
    }

    /// Cancel everything pending. Called on every exit from `Playing`.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_scheduled(&self, task: Task) -> bool {
        self.entries.iter().any(|e| e.task == task)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pop the earliest task due at or before `now_ms`, re-arming it if
    /// recurring. Returns `None` once nothing else is due.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Task> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= now_ms)
            .min_by_key(|(_, e)| (e.due_ms, e.seq))
            .map(|(i, _)| i)?;

        let task = self.entries[idx].task;
        match self.entries[idx].period_ms {
            Some(period) => {
                let due = self.entries[idx].due_ms + period;
                self.entries[idx].due_ms = due;
                self.entries[idx].seq = self.bump_seq();
            }
            None => {
                self.entries.remove(idx);
            }
        }
        Some(task)
    }

    fn push(&mut self, task: Task, due_ms: u64, period_ms: Option<u64>) {
        let seq = self.bump_seq();
        self.entries.push(Entry {
            task,
            due_ms,
            period_ms,
            seq,
        });
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_once() {
        let mut sched = Scheduler::new();
        sched.once(Task::ComboDecay, 0, 2000);

        assert_eq!(sched.pop_due(1999), None);
        assert_eq!(sched.pop_due(2000), Some(Task::ComboDecay));
        assert_eq!(sched.pop_due(10_000), None);
    }

    #[test]
    fn test_rearming_replaces_pending() {
        let mut sched = Scheduler::new();
        sched.once(Task::ComboDecay, 0, 2000);
        // Elimination at t=1500 pushes the window out
        sched.once(Task::ComboDecay, 1500, 2000);

        assert_eq!(sched.pop_due(2500), None);
        assert_eq!(sched.pop_due(3500), Some(Task::ComboDecay));
    }

    #[test]
    fn test_recurring_rearms_from_due_time() {
        let mut sched = Scheduler::new();
        sched.every(Task::ClockTick, 0, 1000);

        // Late poll catches up one tick at a time
        assert_eq!(sched.pop_due(2500), Some(Task::ClockTick));
        assert_eq!(sched.pop_due(2500), Some(Task::ClockTick));
        assert_eq!(sched.pop_due(2500), None);
        assert_eq!(sched.pop_due(3000), Some(Task::ClockTick));
    }

    #[test]
    fn test_due_order_then_scheduling_order() {
        let mut sched = Scheduler::new();
        sched.once(Task::SlowTimeRestore, 0, 500);
        sched.once(Task::ComboDecay, 0, 200);
        sched.once(Task::DoublePointsExpiry, 0, 500);

        assert_eq!(sched.pop_due(600), Some(Task::ComboDecay));
        assert_eq!(sched.pop_due(600), Some(Task::SlowTimeRestore));
        assert_eq!(sched.pop_due(600), Some(Task::DoublePointsExpiry));
    }

    #[test]
    fn test_cancel_all() {
        let mut sched = Scheduler::new();
        sched.every(Task::SpawnTick, 0, 600);
        sched.once(Task::ComboDecay, 0, 2000);
        sched.cancel_all();

        assert!(sched.is_empty());
        assert_eq!(sched.pop_due(u64::MAX), None);
    }
}
