//! Waiting for the provider script to load
//!
//! The script tag is loaded asynchronously, so `window.turnstile` may appear
//! after the first render. [`wait_for_provider`] checks at a fixed interval
//! and races the checks against a single deadline. Whichever completes first
//! decides the outcome; dropping the future stops both timers.
//!
//! [`cancellable`] wraps such a wait so that cancelling it drops the future,
//! and with it every pending timer, before `cancel` returns.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::task::{Poll, Waker};

use futures::future::{self, Either, FutureExt, LocalBoxFuture};
use futures::pin_mut;

use super::provider::ProviderError;
use crate::config::TurnstileConfig;

/// Timer source used by [`wait_for_provider`]
pub trait Sleep {
    type Sleep: Future<Output = ()>;

    fn sleep(&self, millis: u32) -> Self::Sleep;
}

/// Browser timers via `setTimeout`
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTimer;

impl Sleep for BrowserTimer {
    type Sleep = gloo_timers::future::TimeoutFuture;

    fn sleep(&self, millis: u32) -> Self::Sleep {
        gloo_timers::future::TimeoutFuture::new(millis)
    }
}

/// Check interval and overall deadline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval_ms: u32,
    pub timeout_ms: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval_ms: TurnstileConfig::POLL_INTERVAL_MS,
            timeout_ms: TurnstileConfig::POLL_TIMEOUT_MS,
        }
    }
}

/// Resolve with the provider once `lookup` finds it, or fail after the deadline.
pub async fn wait_for_provider<P, F, S>(
    mut lookup: F,
    timer: &S,
    policy: PollPolicy,
) -> Result<P, ProviderError>
where
    F: FnMut() -> Option<P>,
    S: Sleep,
{
    if let Some(provider) = lookup() {
        return Ok(provider);
    }

    let deadline = timer.sleep(policy.timeout_ms);
    let polling = async {
        loop {
            timer.sleep(policy.interval_ms).await;
            if let Some(provider) = lookup() {
                return provider;
            }
        }
    };
    pin_mut!(deadline, polling);

    match future::select(polling, deadline).await {
        Either::Left((provider, _)) => Ok(provider),
        Either::Right(((), _)) => Err(ProviderError::Unavailable {
            waited_ms: policy.timeout_ms,
        }),
    }
}

#[derive(Default)]
struct TaskSlot {
    future: Option<LocalBoxFuture<'static, ()>>,
    waker: Option<Waker>,
}

/// Cancels a future wrapped by [`cancellable`]
#[derive(Clone)]
pub struct CancelHandle {
    slot: Rc<RefCell<TaskSlot>>,
}

impl CancelHandle {
    /// Drop the wrapped future now; the driver then completes on its next poll.
    pub fn cancel(&self) {
        let (future, waker) = match self.slot.try_borrow_mut() {
            Ok(mut slot) => (slot.future.take(), slot.waker.take()),
            Err(_) => {
                tracing::warn!("cancel called from inside the task it cancels");
                return;
            }
        };
        drop(future);
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    /// The future ran to completion or was cancelled
    pub fn is_finished(&self) -> bool {
        self.slot.borrow().future.is_none()
    }
}

impl std::fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelHandle")
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// Split `task` into a driver to spawn and a handle that drops it on demand.
pub fn cancellable<F>(task: F) -> (impl Future<Output = ()>, CancelHandle)
where
    F: Future<Output = ()> + 'static,
{
    let slot = Rc::new(RefCell::new(TaskSlot {
        future: Some(task.boxed_local()),
        waker: None,
    }));
    let handle = CancelHandle { slot: slot.clone() };

    let driver = future::poll_fn(move |cx| {
        let mut slot = slot.borrow_mut();
        let Some(task) = slot.future.as_mut() else {
            return Poll::Ready(());
        };
        match task.as_mut().poll(cx) {
            Poll::Ready(()) => {
                slot.future = None;
                slot.waker = None;
                Poll::Ready(())
            }
            Poll::Pending => {
                slot.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    });

    (driver, handle)
}

#[cfg(test)]
pub(crate) mod test_clock {
    use std::cell::RefCell;
    use std::future::Future;
    use std::pin::Pin;
    use std::rc::Rc;
    use std::task::{Context, Poll, Waker};

    use super::Sleep;

    #[derive(Default)]
    struct ClockState {
        now: u32,
        live_timers: usize,
        wakers: Vec<Waker>,
    }

    /// Manually advanced clock for driving timers in tests
    #[derive(Clone, Default)]
    pub(crate) struct ManualClock {
        state: Rc<RefCell<ClockState>>,
    }

    impl ManualClock {
        pub(crate) fn advance(&self, millis: u32) {
            let wakers = {
                let mut state = self.state.borrow_mut();
                state.now += millis;
                std::mem::take(&mut state.wakers)
            };
            for waker in wakers {
                waker.wake();
            }
        }

        /// Timers created and not yet dropped
        pub(crate) fn live_timers(&self) -> usize {
            self.state.borrow().live_timers
        }
    }

    pub(crate) struct ManualSleep {
        clock: ManualClock,
        deadline: u32,
    }

    impl Future for ManualSleep {
        type Output = ();

        fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            let mut state = self.clock.state.borrow_mut();
            if state.now >= self.deadline {
                Poll::Ready(())
            } else {
                state.wakers.push(cx.waker().clone());
                Poll::Pending
            }
        }
    }

    impl Drop for ManualSleep {
        fn drop(&mut self) {
            self.clock.state.borrow_mut().live_timers -= 1;
        }
    }

    impl Sleep for ManualClock {
        type Sleep = ManualSleep;

        fn sleep(&self, millis: u32) -> ManualSleep {
            let mut state = self.state.borrow_mut();
            state.live_timers += 1;
            ManualSleep {
                clock: self.clone(),
                deadline: state.now + millis,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use futures::executor::LocalPool;
    use futures::task::LocalSpawnExt;

    use super::test_clock::ManualClock;
    use super::*;

    fn spawn_wait(
        pool: &LocalPool,
        clock: &ManualClock,
        available: Rc<Cell<bool>>,
        lookups: Rc<Cell<u32>>,
    ) -> Rc<RefCell<Option<Result<&'static str, ProviderError>>>> {
        let outcome = Rc::new(RefCell::new(None));
        let slot = outcome.clone();
        let clock = clock.clone();
        pool.spawner()
            .spawn_local(async move {
                let lookup = || {
                    lookups.set(lookups.get() + 1);
                    available.get().then_some("turnstile")
                };
                let result = wait_for_provider(lookup, &clock, PollPolicy::default()).await;
                *slot.borrow_mut() = Some(result);
            })
            .unwrap();
        outcome
    }

    #[test]
    fn resolves_immediately_when_provider_is_present() {
        let mut pool = LocalPool::new();
        let clock = ManualClock::default();
        let lookups = Rc::new(Cell::new(0));
        let outcome = spawn_wait(&pool, &clock, Rc::new(Cell::new(true)), lookups.clone());

        pool.run_until_stalled();

        assert_eq!(*outcome.borrow(), Some(Ok("turnstile")));
        assert_eq!(lookups.get(), 1);
        assert_eq!(clock.live_timers(), 0);
    }

    #[test]
    fn resolves_on_the_first_lookup_after_the_script_loads() {
        let mut pool = LocalPool::new();
        let clock = ManualClock::default();
        let available = Rc::new(Cell::new(false));
        let outcome = spawn_wait(&pool, &clock, available.clone(), Rc::new(Cell::new(0)));

        pool.run_until_stalled();
        clock.advance(100);
        pool.run_until_stalled();
        assert!(outcome.borrow().is_none());

        available.set(true);
        clock.advance(100);
        pool.run_until_stalled();

        assert_eq!(*outcome.borrow(), Some(Ok("turnstile")));
        assert_eq!(clock.live_timers(), 0);
    }

    #[test]
    fn cancel_drops_pending_timers_immediately() {
        let mut pool = LocalPool::new();
        let clock = ManualClock::default();
        let (driver, handle) = {
            let clock = clock.clone();
            cancellable(async move {
                let _ = wait_for_provider(|| None::<()>, &clock, PollPolicy::default()).await;
            })
        };
        let done = Rc::new(Cell::new(false));
        {
            let done = done.clone();
            pool.spawner()
                .spawn_local(async move {
                    driver.await;
                    done.set(true);
                })
                .unwrap();
        }
        pool.run_until_stalled();
        assert_eq!(clock.live_timers(), 2);

        handle.cancel();

        assert_eq!(clock.live_timers(), 0);
        assert!(handle.is_finished());
        pool.run_until_stalled();
        assert!(done.get());
    }

    #[test]
    fn finished_task_reports_finished() {
        let mut pool = LocalPool::new();
        let (driver, handle) = cancellable(async {});
        assert!(!handle.is_finished());

        pool.run_until(driver);

        assert!(handle.is_finished());
        handle.cancel();
    }

    #[test]
    fn gives_up_after_the_deadline_and_stops_polling() {
        let mut pool = LocalPool::new();
        let clock = ManualClock::default();
        let lookups = Rc::new(Cell::new(0));
        let outcome = spawn_wait(&pool, &clock, Rc::new(Cell::new(false)), lookups.clone());

        pool.run_until_stalled();
        for _ in 0..100 {
            clock.advance(100);
            pool.run_until_stalled();
        }

        assert_eq!(
            *outcome.borrow(),
            Some(Err(ProviderError::Unavailable { waited_ms: 10_000 }))
        );
        assert_eq!(clock.live_timers(), 0);

        let lookups_at_deadline = lookups.get();
        clock.advance(5_000);
        pool.run_until_stalled();
        assert_eq!(lookups.get(), lookups_at_deadline);
    }
}
