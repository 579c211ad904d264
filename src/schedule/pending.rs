//! Pending-operations queue
//!
//! Everything that would change a live collection mid-tick (new scheduled
//! tasks, force fields entering or leaving the active set) is buffered here
//! and applied at the single flush point at the head of the scheduler phase.

use crate::core::types::{FieldId, TaskId};
use crate::ecs::world::World;
use crate::force::ForceField;

pub type Action = Box<dyn FnMut(&mut World)>;
pub type PeriodFn = Box<dyn FnMut(&mut World) -> u32>;
pub type Interpolator = Box<dyn FnMut(&mut World, f64)>;

/// A task waiting to enter one of the four scheduler queues
pub enum Schedule {
    NextTick(Action),
    Countdown {
        remaining: u32,
        action: Action,
    },
    Periodic {
        period: PeriodFn,
        action: Action,
    },
    Interpolate {
        from: f64,
        to: f64,
        step: f64,
        callback: Interpolator,
    },
}

pub enum PendingOp {
    Schedule { id: TaskId, schedule: Schedule },
    AddField(ForceField),
    RemoveField(FieldId),
}

impl std::fmt::Debug for PendingOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PendingOp::Schedule { id, schedule } => {
                let queue = match schedule {
                    Schedule::NextTick(_) => "next_tick",
                    Schedule::Countdown { .. } => "countdown",
                    Schedule::Periodic { .. } => "periodic",
                    Schedule::Interpolate { .. } => "interpolate",
                };
                write!(f, "Schedule({:?}, {})", id, queue)
            }
            PendingOp::AddField(field) => write!(f, "AddField({:?})", field.id),
            PendingOp::RemoveField(id) => write!(f, "RemoveField({:?})", id),
        }
    }
}

#[derive(Debug, Default)]
pub struct PendingQueue {
    ops: Vec<PendingOp>,
    next_task: u64,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a task id without scheduling anything (for keyed next-tick tasks)
    pub fn reserve_id(&mut self) -> TaskId {
        let id = TaskId(self.next_task);
        self.next_task += 1;
        id
    }

    fn push(&mut self, id: TaskId, schedule: Schedule) -> TaskId {
        self.ops.push(PendingOp::Schedule { id, schedule });
        id
    }

    /// Run `action` once, on the tick after this one
    pub fn next_tick(&mut self, action: impl FnMut(&mut World) + 'static) -> TaskId {
        let id = self.reserve_id();
        self.push(id, Schedule::NextTick(Box::new(action)))
    }

    /// Like [`next_tick`](Self::next_tick) but deduplicated by `id`: if a
    /// next-tick task with this id is already waiting, this one is dropped.
    pub fn next_tick_keyed(&mut self, id: TaskId, action: impl FnMut(&mut World) + 'static) {
        let already_pending = self.ops.iter().any(|op| {
            matches!(op, PendingOp::Schedule { id: existing, schedule: Schedule::NextTick(_) } if *existing == id)
        });
        if !already_pending {
            self.push(id, Schedule::NextTick(Box::new(action)));
        }
    }

    /// Run `action` on exactly the `ticks`-th subsequent tick (0 counts as 1)
    pub fn after(&mut self, ticks: u32, action: impl FnMut(&mut World) + 'static) -> TaskId {
        let id = self.reserve_id();
        self.push(
            id,
            Schedule::Countdown {
                remaining: ticks.max(1),
                action: Box::new(action),
            },
        )
    }

    /// Run `action` repeatedly; `period` supplies each delay (first one included)
    pub fn every(
        &mut self,
        period: impl FnMut(&mut World) -> u32 + 'static,
        action: impl FnMut(&mut World) + 'static,
    ) -> TaskId {
        let id = self.reserve_id();
        self.every_keyed(id, period, action)
    }

    /// [`every`](Self::every) under an id reserved beforehand, so the action
    /// can cancel its own task
    pub fn every_keyed(
        &mut self,
        id: TaskId,
        period: impl FnMut(&mut World) -> u32 + 'static,
        action: impl FnMut(&mut World) + 'static,
    ) -> TaskId {
        self.push(
            id,
            Schedule::Periodic {
                period: Box::new(period),
                action: Box::new(action),
            },
        )
    }

    /// Call `callback` once per tick with a value moving from `from` to `to`
    /// by `step`. The last call receives `to` exactly.
    pub fn interpolate(
        &mut self,
        from: f64,
        to: f64,
        step: f64,
        callback: impl FnMut(&mut World, f64) + 'static,
    ) -> TaskId {
        let id = self.reserve_id();
        self.push(
            id,
            Schedule::Interpolate {
                from,
                to,
                step,
                callback: Box::new(callback),
            },
        )
    }

    /// Queue a field to join the active set at the next flush
    pub fn add_field(&mut self, field: ForceField) {
        self.ops.push(PendingOp::AddField(field));
    }

    /// Queue a field to leave the active set at the next flush
    pub fn remove_field(&mut self, id: FieldId) {
        self.ops.push(PendingOp::RemoveField(id));
    }

    /// Drop a not-yet-flushed task. Returns whether one was found.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.ops.len();
        self.ops
            .retain(|op| !matches!(op, PendingOp::Schedule { id: existing, .. } if *existing == id));
        self.ops.len() != before
    }

    pub fn take(&mut self) -> Vec<PendingOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let mut queue = PendingQueue::new();
        let a = queue.next_tick(|_| {});
        let b = queue.after(3, |_| {});
        let c = queue.reserve_id();
        assert!(a < b && b < c);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_keyed_next_tick_dedups() {
        let mut queue = PendingQueue::new();
        let key = queue.reserve_id();
        queue.next_tick_keyed(key, |_| {});
        queue.next_tick_keyed(key, |_| {});
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_cancel_pending() {
        let mut queue = PendingQueue::new();
        let a = queue.next_tick(|_| {});
        let b = queue.every(|_| 5, |_| {});
        assert!(queue.cancel(a));
        assert!(!queue.cancel(a));
        assert_eq!(queue.len(), 1);
        assert!(queue.cancel(b));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_zero_countdown_clamped() {
        let mut queue = PendingQueue::new();
        queue.after(0, |_| {});
        match queue.take().pop() {
            Some(PendingOp::Schedule {
                schedule: Schedule::Countdown { remaining, .. },
                ..
            }) => assert_eq!(remaining, 1),
            other => panic!("unexpected op: {:?}", other),
        }
    }
}
