//! Deferred execution: pending-operations queue plus four scheduler queues
//!
//! Per tick, [`run_scheduler`] does:
//! 1. Flush the pending queue (tasks join their queues, fields join/leave the
//!    active set, dead fields are dropped)
//! 2. Fire the next-tick set
//! 3. Countdown pass
//! 4. Periodic pass (re-arming through the period supplier)
//! 5. Interpolation pass
//!
//! Anything scheduled while this runs lands in the pending queue and is
//! first seen at the next tick's flush.

pub mod pending;
pub mod scheduler;

pub use pending::{Action, Interpolator, PendingOp, PendingQueue, PeriodFn, Schedule};
pub use scheduler::{InterpolationTask, PeriodicTask, Scheduler};

use crate::ecs::world::World;

/// Apply every buffered operation. This is the only point where scheduler
/// queues gain tasks and the force-field set changes membership.
pub fn flush_pending(world: &mut World) {
    for op in world.pending.take() {
        match op {
            PendingOp::Schedule { id, schedule } => match schedule {
                Schedule::NextTick(action) => world.scheduler.insert_next_tick(id, action),
                Schedule::Countdown { remaining, action } => {
                    world.scheduler.insert_countdown(id, remaining, action)
                }
                Schedule::Periodic { mut period, action } => {
                    let remaining = period(world).max(1);
                    world.scheduler.insert_periodic(PeriodicTask {
                        id,
                        remaining,
                        period,
                        action,
                    });
                }
                Schedule::Interpolate {
                    from,
                    to,
                    step,
                    callback,
                } => world
                    .scheduler
                    .insert_interpolation(InterpolationTask::new(id, from, to, step, callback)),
            },
            PendingOp::AddField(field) => world.fields.push(field),
            PendingOp::RemoveField(id) => world.fields.retain(|field| field.id != id),
        }
    }

    let before = world.fields.len();
    world.fields.retain(|field| !field.dead);
    let retired = before - world.fields.len();
    if retired > 0 {
        tracing::trace!("Retired {} force fields at flush", retired);
    }
}

/// Flush pending operations and drain all four queues, in fixed order
pub fn run_scheduler(world: &mut World) {
    flush_pending(world);
    world.scheduler.begin_drain();

    for mut task in world.scheduler.take_next_tick() {
        if world.scheduler.is_cancelled(task.id) {
            continue;
        }
        (task.action)(world);
    }

    for mut task in world.scheduler.countdown_pass() {
        if world.scheduler.is_cancelled(task.id) {
            continue;
        }
        (task.action)(world);
    }

    for mut task in world.scheduler.periodic_pass() {
        if world.scheduler.is_cancelled(task.id) {
            continue;
        }
        (task.action)(world);
        // The action may have cancelled its own task
        if world.scheduler.is_cancelled(task.id) {
            continue;
        }
        task.remaining = (task.period)(world).max(1);
        world.scheduler.insert_periodic(task);
    }

    for mut task in world.scheduler.take_interpolations() {
        if world.scheduler.is_cancelled(task.id) {
            continue;
        }
        (task.callback)(world, task.value);
        if world.scheduler.is_cancelled(task.id) {
            continue;
        }
        if task.advance() {
            world.scheduler.insert_interpolation(task);
        }
    }

    world.scheduler.end_drain();
}
