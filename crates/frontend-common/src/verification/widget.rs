//! Mounted-widget lifecycle
//!
//! ```text
//! Unmounted -> WaitingForProvider -> Mounted -> Solved
//!                     |                 |  \
//!          (deadline: stays here)       |   -> Removed
//!                                       +-- error: stays Mounted
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::provider::{ChallengeProvider, ProviderError, RenderOptions, WidgetId};
use super::readiness::{PollPolicy, Sleep, wait_for_provider};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetState {
    Unmounted,
    WaitingForProvider,
    Mounted,
    Solved,
    Removed,
}

/// Imperative controls exposed to the owner of a widget
pub trait WidgetControls {
    /// Ask the provider to run the challenge again; keeps the widget mounted.
    fn reset(&self) -> Result<(), ProviderError>;

    /// Release the widget; the handle is cleared.
    fn remove(&self) -> Result<(), ProviderError>;

    /// Last token the provider issued, if a widget is mounted.
    fn get_response(&self) -> Option<String>;
}

struct Inner<P> {
    state: WidgetState,
    provider: Option<Rc<P>>,
    widget: Option<WidgetId>,
}

/// Owns one provider widget from mount to removal
pub struct WidgetHandle<P> {
    inner: Rc<RefCell<Inner<P>>>,
}

impl<P> Clone for WidgetHandle<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P> Default for WidgetHandle<P> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                state: WidgetState::Unmounted,
                provider: None,
                widget: None,
            })),
        }
    }
}

impl<P> fmt::Debug for WidgetHandle<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("WidgetHandle")
            .field("state", &inner.state)
            .field("widget", &inner.widget)
            .finish()
    }
}

impl<P: ChallengeProvider + 'static> WidgetHandle<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WidgetState {
        self.inner.borrow().state
    }

    pub fn widget_id(&self) -> Option<WidgetId> {
        self.inner.borrow().widget.clone()
    }

    /// Render the widget with `provider`. A handle that already holds a widget
    /// returns its id without rendering again.
    pub fn mount(
        &self,
        provider: P,
        container: &P::Container,
        options: RenderOptions,
    ) -> Result<WidgetId, ProviderError> {
        if let Some(widget) = self.widget_id() {
            return Ok(widget);
        }

        let options = self.instrument(options);
        let widget = provider.render(container, options)?;
        tracing::debug!(%widget, "challenge widget mounted");

        let mut inner = self.inner.borrow_mut();
        inner.provider = Some(Rc::new(provider));
        inner.widget = Some(widget.clone());
        inner.state = WidgetState::Mounted;
        Ok(widget)
    }

    /// Wait for the provider, then mount. If the provider never shows up the
    /// handle stays in `WaitingForProvider` with nothing mounted.
    pub async fn mount_when_ready<F, S>(
        self,
        lookup: F,
        timer: &S,
        policy: PollPolicy,
        container: P::Container,
        options: RenderOptions,
    ) where
        F: FnMut() -> Option<P>,
        S: Sleep,
    {
        self.inner.borrow_mut().state = WidgetState::WaitingForProvider;

        match wait_for_provider(lookup, timer, policy).await {
            Ok(provider) => {
                if self.state() != WidgetState::WaitingForProvider {
                    return;
                }
                if let Err(err) = self.mount(provider, &container, options) {
                    tracing::error!(error = %err, "failed to mount challenge widget");
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "verification disabled for this page");
            }
        }
    }

    /// Teardown: remove the widget if one is mounted.
    pub fn release(&self) {
        if self.remove().is_err() {
            self.inner.borrow_mut().state = WidgetState::Removed;
        }
    }

    fn mounted(&self) -> Option<(Rc<P>, WidgetId)> {
        let inner = self.inner.borrow();
        Some((inner.provider.clone()?, inner.widget.clone()?))
    }

    /// Track solve/error events on the handle before handing them to the caller.
    fn instrument(&self, mut options: RenderOptions) -> RenderOptions {
        let weak: Weak<RefCell<Inner<P>>> = Rc::downgrade(&self.inner);
        let on_success = options.on_success.take();
        options = options.on_success(move |token| {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().state = WidgetState::Solved;
            }
            if let Some(callback) = &on_success {
                callback(token);
            }
        });

        let weak: Weak<RefCell<Inner<P>>> = Rc::downgrade(&self.inner);
        let on_error = options.on_error.take();
        options.on_error(move || {
            let widget = weak
                .upgrade()
                .and_then(|inner| inner.borrow().widget.clone());
            tracing::error!(?widget, "challenge verification failed");
            if let Some(callback) = &on_error {
                callback();
            }
        })
    }
}

impl<P: ChallengeProvider + 'static> WidgetControls for WidgetHandle<P> {
    fn reset(&self) -> Result<(), ProviderError> {
        let (provider, widget) = self.mounted().ok_or(ProviderError::NotMounted)?;
        provider.reset(&widget);
        Ok(())
    }

    fn remove(&self) -> Result<(), ProviderError> {
        let (provider, widget) = self.mounted().ok_or(ProviderError::NotMounted)?;
        {
            let mut inner = self.inner.borrow_mut();
            inner.widget = None;
            inner.provider = None;
            inner.state = WidgetState::Removed;
        }
        provider.remove(&widget);
        tracing::debug!(%widget, "challenge widget removed");
        Ok(())
    }

    fn get_response(&self) -> Option<String> {
        let (provider, widget) = self.mounted()?;
        provider.get_response(&widget)
    }
}

/// Shared slot through which a parent reaches a child widget's controls.
///
/// The widget component fills it while mounted and empties it on teardown.
#[derive(Clone, Default)]
pub struct WidgetRef {
    slot: Rc<RefCell<Option<Rc<dyn WidgetControls>>>>,
}

impl WidgetRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.slot.borrow().is_some()
    }

    pub(crate) fn attach(&self, controls: Rc<dyn WidgetControls>) {
        *self.slot.borrow_mut() = Some(controls);
    }

    pub(crate) fn detach(&self) {
        self.slot.borrow_mut().take();
    }

    fn controls(&self) -> Option<Rc<dyn WidgetControls>> {
        self.slot.borrow().clone()
    }
}

impl PartialEq for WidgetRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}

impl fmt::Debug for WidgetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetRef")
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl WidgetControls for WidgetRef {
    fn reset(&self) -> Result<(), ProviderError> {
        self.controls().ok_or(ProviderError::NotMounted)?.reset()
    }

    fn remove(&self) -> Result<(), ProviderError> {
        self.controls().ok_or(ProviderError::NotMounted)?.remove()
    }

    fn get_response(&self) -> Option<String> {
        self.controls()?.get_response()
    }
}


#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use futures::executor::LocalPool;
    use futures::task::LocalSpawnExt;

    use super::scripted::ScriptedProvider;
    use super::*;
    use crate::verification::readiness::cancellable;
    use crate::verification::readiness::test_clock::ManualClock;

    fn mounted_handle(
        options: RenderOptions,
    ) -> (WidgetHandle<ScriptedProvider>, ScriptedProvider) {
        let provider = ScriptedProvider::default();
        let handle = WidgetHandle::new();
        handle.mount(provider.clone(), &(), options).unwrap();
        (handle, provider)
    }

    #[test]
    fn solve_forwards_the_exact_token() {
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = received.clone();
        let (handle, provider) = mounted_handle(
            RenderOptions::new("site-key").on_success(move |token| sink.borrow_mut().push(token)),
        );
        assert_eq!(handle.state(), WidgetState::Mounted);

        provider.solve("0.tok-EN/+=");

        assert_eq!(*received.borrow(), vec!["0.tok-EN/+=".to_string()]);
        assert_eq!(handle.state(), WidgetState::Solved);
    }

    #[test]
    fn provider_error_keeps_widget_mounted() {
        let errors = Rc::new(Cell::new(0));
        let counter = errors.clone();
        let (handle, provider) = mounted_handle(
            RenderOptions::new("site-key").on_error(move || counter.set(counter.get() + 1)),
        );

        provider.fail();

        assert_eq!(errors.get(), 1);
        assert_eq!(handle.state(), WidgetState::Mounted);
        assert!(handle.widget_id().is_some());
    }

    #[test]
    fn release_removes_exactly_once() {
        let (handle, provider) = mounted_handle(RenderOptions::new("site-key"));

        handle.release();
        handle.release();

        assert_eq!(provider.calls.borrow().removes, vec![WidgetId::new("widget-1")]);
        assert_eq!(handle.state(), WidgetState::Removed);
        assert_eq!(handle.widget_id(), None);
        assert_eq!(handle.remove(), Err(ProviderError::NotMounted));
    }

    #[test]
    fn reset_keeps_the_handle() {
        let (handle, provider) = mounted_handle(RenderOptions::new("site-key"));

        handle.reset().unwrap();

        assert_eq!(provider.calls.borrow().resets, vec![WidgetId::new("widget-1")]);
        assert_eq!(handle.widget_id(), Some(WidgetId::new("widget-1")));
    }

    #[test]
    fn get_response_is_empty_when_unmounted() {
        let (handle, provider) = mounted_handle(RenderOptions::new("site-key"));
        provider.calls.borrow_mut().response = Some("token".into());
        assert_eq!(handle.get_response(), Some("token".into()));

        handle.remove().unwrap();
        assert_eq!(handle.get_response(), None);

        let fresh: WidgetHandle<ScriptedProvider> = WidgetHandle::new();
        assert_eq!(fresh.get_response(), None);
        assert_eq!(fresh.reset(), Err(ProviderError::NotMounted));
    }

    #[test]
    fn second_mount_reuses_the_existing_widget() {
        let (handle, provider) = mounted_handle(RenderOptions::new("site-key"));

        let again = handle
            .mount(provider.clone(), &(), RenderOptions::new("site-key"))
            .unwrap();

        assert_eq!(again, WidgetId::new("widget-1"));
        assert_eq!(provider.calls.borrow().rendered.len(), 1);
    }

    #[test]
    fn widget_ref_forwards_to_attached_controls() {
        let (handle, provider) = mounted_handle(RenderOptions::new("site-key"));
        let widget_ref = WidgetRef::new();
        assert_eq!(widget_ref.reset(), Err(ProviderError::NotMounted));

        widget_ref.attach(Rc::new(handle.clone()));
        widget_ref.reset().unwrap();
        widget_ref.remove().unwrap();
        assert_eq!(provider.calls.borrow().resets.len(), 1);
        assert_eq!(provider.calls.borrow().removes.len(), 1);

        widget_ref.detach();
        assert!(!widget_ref.is_attached());
        assert_eq!(widget_ref.get_response(), None);
    }

    #[test]
    fn mounts_once_the_provider_appears() {
        let mut pool = LocalPool::new();
        let clock = ManualClock::default();
        let provider = ScriptedProvider::default();
        let available = Rc::new(Cell::new(false));
        let handle: WidgetHandle<ScriptedProvider> = WidgetHandle::new();

        {
            let (clock, provider, available, handle) =
                (clock.clone(), provider.clone(), available.clone(), handle.clone());
            pool.spawner()
                .spawn_local(async move {
                    let lookup = || available.get().then(|| provider.clone());
                    handle
                        .mount_when_ready(
                            lookup,
                            &clock,
                            PollPolicy::default(),
                            (),
                            RenderOptions::new("k"),
                        )
                        .await;
                })
                .unwrap();
        }

        pool.run_until_stalled();
        assert_eq!(handle.state(), WidgetState::WaitingForProvider);

        available.set(true);
        clock.advance(100);
        pool.run_until_stalled();

        assert_eq!(handle.state(), WidgetState::Mounted);
        assert_eq!(provider.calls.borrow().rendered.len(), 1);
        assert_eq!(clock.live_timers(), 0);
    }

    #[test]
    fn missing_provider_leaves_nothing_mounted_and_no_timers() {
        let mut pool = LocalPool::new();
        let clock = ManualClock::default();
        let handle: WidgetHandle<ScriptedProvider> = WidgetHandle::new();
        let lookups = Rc::new(Cell::new(0));

        {
            let (clock, handle, lookups) = (clock.clone(), handle.clone(), lookups.clone());
            pool.spawner()
                .spawn_local(async move {
                    let lookup = || {
                        lookups.set(lookups.get() + 1);
                        None
                    };
                    handle
                        .mount_when_ready(
                            lookup,
                            &clock,
                            PollPolicy::default(),
                            (),
                            RenderOptions::new("k"),
                        )
                        .await;
                })
                .unwrap();
        }

        pool.run_until_stalled();
        for _ in 0..100 {
            clock.advance(100);
            pool.run_until_stalled();
        }

        assert_eq!(handle.state(), WidgetState::WaitingForProvider);
        assert_eq!(handle.widget_id(), None);
        assert_eq!(clock.live_timers(), 0);

        let lookups_at_deadline = lookups.get();
        clock.advance(1_000);
        pool.run_until_stalled();
        assert_eq!(lookups.get(), lookups_at_deadline);
    }

    #[test]
    fn unmount_while_waiting_cancels_timers() {
        let mut pool = LocalPool::new();
        let clock = ManualClock::default();
        let provider = ScriptedProvider::default();
        let handle: WidgetHandle<ScriptedProvider> = WidgetHandle::new();

        let (task, cancel) = {
            let (clock, handle) = (clock.clone(), handle.clone());
            cancellable(async move {
                handle
                    .mount_when_ready(
                        || None,
                        &clock,
                        PollPolicy::default(),
                        (),
                        RenderOptions::new("k"),
                    )
                    .await;
            })
        };
        pool.spawner()
            .spawn_local(task)
            .unwrap();
        pool.run_until_stalled();
        assert_eq!(clock.live_timers(), 2);

        cancel.cancel();
        handle.release();
        assert_eq!(clock.live_timers(), 0);
        pool.run_until_stalled();

        assert!(provider.calls.borrow().removes.is_empty());
        assert_eq!(handle.state(), WidgetState::Removed);
    }

    #[test]
    fn unmount_after_mount_removes_once_with_no_timers() {
        let mut pool = LocalPool::new();
        let clock = ManualClock::default();
        let provider = ScriptedProvider::default();
        let handle: WidgetHandle<ScriptedProvider> = WidgetHandle::new();

        let (task, cancel) = {
            let (clock, handle, provider) = (clock.clone(), handle.clone(), provider.clone());
            cancellable(async move {
                let lookup = || Some(provider.clone());
                handle
                    .mount_when_ready(
                        lookup,
                        &clock,
                        PollPolicy::default(),
                        (),
                        RenderOptions::new("k"),
                    )
                    .await;
            })
        };
        pool.spawner()
            .spawn_local(task)
            .unwrap();
        pool.run_until_stalled();
        assert_eq!(handle.state(), WidgetState::Mounted);

        cancel.cancel();
        handle.release();
        pool.run_until_stalled();

        assert_eq!(provider.calls.borrow().removes.len(), 1);
        assert_eq!(clock.live_timers(), 0);
    }
}
