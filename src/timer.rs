//! Timer capability, and the debounce/throttle wrappers built on top of it.

use std::{cell::Cell, rc::Rc, time::Duration};

use crate::error::Result;

/// Opaque handle to a scheduled callback, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub i32);

/// Something that can run a callback once after a delay.
pub trait Timers {
    /// Schedule `callback` to run once after `delay`.
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Result<TimerHandle>;

    /// Cancel a pending callback. Cancelling one that already ran is a no-op.
    fn clear_timeout(&self, handle: TimerHandle);
}

/// Fire-and-forget variant of [`Timers::set_timeout`]. A scheduling failure is logged, and the
/// callback is dropped without running.
pub fn schedule<T, F>(timers: &T, delay: Duration, callback: F) -> Option<TimerHandle>
where
    T: Timers + ?Sized,
    F: 'static + FnOnce(),
{
    match timers.set_timeout(delay, Box::new(callback)) {
        Ok(handle) => Some(handle),
        Err(error) => {
            tracing::warn!(%error, ?delay, "unable to schedule timer");
            None
        }
    }
}

/// Wrap `callback` so that a burst of calls results in a single call, `wait` after the last one
/// in the burst, receiving that last call's arguments.
pub fn debounce<T, A, F>(timers: T, wait: Duration, callback: F) -> impl Fn(A)
where
    T: 'static + Timers,
    A: 'static,
    F: 'static + Fn(A),
{
    let callback = Rc::new(callback);
    let pending = Rc::new(Cell::new(None::<TimerHandle>));

    move |args| {
        if let Some(handle) = pending.take() {
            timers.clear_timeout(handle);
        }

        let handle = schedule(&timers, wait, {
            let callback = Rc::clone(&callback);
            let pending = Rc::clone(&pending);

            move || {
                pending.set(None);
                callback(args);
            }
        });

        pending.set(handle);
    }
}

/// Wrap `callback` so that it runs at most once per `limit`. The first call of a quiet period
/// runs straight away, and any call made while cooling down is dropped.
pub fn throttle<T, A, F>(timers: T, limit: Duration, callback: F) -> impl Fn(A)
where
    T: 'static + Timers,
    A: 'static,
    F: 'static + Fn(A),
{
    let cooling = Rc::new(Cell::new(false));

    move |args| {
        if cooling.get() {
            return;
        }

        callback(args);
        cooling.set(true);

        let reset = Rc::clone(&cooling);
        if schedule(&timers, limit, move || reset.set(false)).is_none() {
            // Never stay latched if the reset could not be scheduled
            cooling.set(false);
        }
    }
}
