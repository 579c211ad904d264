//! The four deferred-action queues
//!
//! Queues never fire tasks in place. Each pass takes the due tasks out of
//! its queue first; the drain in `schedule::run_scheduler` then calls them
//! with the world. A task cancelled while taken out is remembered in the
//! in-flight set until the drain ends.

use ahash::AHashSet;

use crate::core::types::TaskId;
use crate::schedule::pending::{Action, Interpolator, PeriodFn};

pub struct NextTickTask {
    pub id: TaskId,
    pub action: Action,
}

pub struct CountdownTask {
    pub id: TaskId,
    pub remaining: u32,
    pub action: Action,
}

pub struct PeriodicTask {
    pub id: TaskId,
    pub remaining: u32,
    pub period: PeriodFn,
    pub action: Action,
}

pub struct InterpolationTask {
    pub id: TaskId,
    pub value: f64,
    pub to: f64,
    /// Always non-negative; direction comes from `to - value`
    pub step: f64,
    pub callback: Interpolator,
}

impl InterpolationTask {
    pub fn new(id: TaskId, from: f64, to: f64, step: f64, callback: Interpolator) -> Self {
        // A zero step would never arrive; deliver the target once instead
        let stalled = step == 0.0 || !step.is_finite();
        Self {
            id,
            value: if stalled { to } else { from },
            to,
            step: step.abs(),
            callback,
        }
    }

    /// Move one step toward `to`. Returns false once `to` has been delivered.
    pub fn advance(&mut self) -> bool {
        if self.value == self.to || self.step == 0.0 || !self.step.is_finite() {
            return false;
        }
        let remaining = self.to - self.value;
        if remaining.abs() <= self.step {
            self.value = self.to;
        } else {
            self.value += self.step * remaining.signum();
        }
        true
    }
}

#[derive(Default)]
pub struct Scheduler {
    next_tick: Vec<NextTickTask>,
    countdowns: Vec<CountdownTask>,
    periodic: Vec<PeriodicTask>,
    interpolations: Vec<InterpolationTask>,
    /// Tasks taken out of their queues by the running drain
    in_flight: AHashSet<TaskId>,
    /// Cancellations of tasks currently taken out for firing
    in_flight_cancelled: AHashSet<TaskId>,
    draining: bool,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add to the next-tick set unless a task with this id is already there
    pub fn insert_next_tick(&mut self, id: TaskId, action: Action) {
        if !self.next_tick.iter().any(|task| task.id == id) {
            self.next_tick.push(NextTickTask { id, action });
        }
    }

    pub fn insert_countdown(&mut self, id: TaskId, remaining: u32, action: Action) {
        self.countdowns.push(CountdownTask {
            id,
            remaining: remaining.max(1),
            action,
        });
    }

    pub fn insert_periodic(&mut self, task: PeriodicTask) {
        self.periodic.push(task);
    }

    pub fn insert_interpolation(&mut self, task: InterpolationTask) {
        self.interpolations.push(task);
    }

    /// Remove a task by identity, searching all four queues.
    ///
    /// During a drain, a task taken out for firing is recorded so the drain
    /// skips it (and does not re-arm it). Unknown ids are never reported as
    /// cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.len();
        self.next_tick.retain(|task| task.id != id);
        self.countdowns.retain(|task| task.id != id);
        self.periodic.retain(|task| task.id != id);
        self.interpolations.retain(|task| task.id != id);
        if self.len() != before {
            return true;
        }
        if self.draining && self.in_flight.contains(&id) {
            self.in_flight_cancelled.insert(id);
            return true;
        }
        false
    }

    pub fn begin_drain(&mut self) {
        self.draining = true;
    }

    pub fn end_drain(&mut self) {
        self.draining = false;
        self.in_flight.clear();
        self.in_flight_cancelled.clear();
    }

    fn mark_in_flight(&mut self, ids: impl IntoIterator<Item = TaskId>) {
        if self.draining {
            self.in_flight.extend(ids);
        }
    }

    pub fn is_cancelled(&self, id: TaskId) -> bool {
        self.in_flight_cancelled.contains(&id)
    }

    pub fn take_next_tick(&mut self) -> Vec<NextTickTask> {
        let taken = std::mem::take(&mut self.next_tick);
        self.mark_in_flight(taken.iter().map(|task| task.id));
        taken
    }

    /// Decrement every countdown, then pull out the ones that reached zero
    pub fn countdown_pass(&mut self) -> Vec<CountdownTask> {
        for task in &mut self.countdowns {
            task.remaining = task.remaining.saturating_sub(1);
        }
        let (fired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.countdowns)
            .into_iter()
            .partition(|task| task.remaining == 0);
        self.countdowns = kept;
        self.mark_in_flight(fired.iter().map(|task| task.id));
        fired
    }

    /// Same as the countdown pass; fired tasks are re-armed by the drain
    pub fn periodic_pass(&mut self) -> Vec<PeriodicTask> {
        for task in &mut self.periodic {
            task.remaining = task.remaining.saturating_sub(1);
        }
        let (fired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.periodic)
            .into_iter()
            .partition(|task| task.remaining == 0);
        self.periodic = kept;
        self.mark_in_flight(fired.iter().map(|task| task.id));
        fired
    }

    pub fn take_interpolations(&mut self) -> Vec<InterpolationTask> {
        let taken = std::mem::take(&mut self.interpolations);
        self.mark_in_flight(taken.iter().map(|task| task.id));
        taken
    }

    /// Number of tasks waiting in all four queues
    pub fn len(&self) -> usize {
        self.next_tick.len() + self.countdowns.len() + self.periodic.len() + self.interpolations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.next_tick.iter().any(|t| t.id == id)
            || self.countdowns.iter().any(|t| t.id == id)
            || self.periodic.iter().any(|t| t.id == id)
            || self.interpolations.iter().any(|t| t.id == id)
    }
}
