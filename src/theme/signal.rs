//! The host's colour-scheme preference and change subscriptions.

use std::fmt;
use std::sync::{Arc, Mutex, Weak};

/// Callback invoked with the new "prefers dark" value
pub type SchemeHandler = Arc<dyn Fn(bool) + Send + Sync>;

/// Handle for a registration; releasing it unregisters the callback.
///
/// Dropping the handle releases it too, so owners tear down simply by dropping.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to release
    pub fn noop() -> Self {
        Self { release: None }
    }

    pub fn dispose(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Source of the host's dark-mode preference
pub trait ColorSchemeSignal: Send + Sync {
    /// `None` when the host cannot tell
    fn prefers_dark(&self) -> Option<bool>;

    fn subscribe(&self, handler: SchemeHandler) -> Subscription;
}

/// A preference fixed for the life of the process; never notifies
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticColorScheme {
    prefers_dark: Option<bool>,
}

impl StaticColorScheme {
    pub fn new(prefers_dark: Option<bool>) -> Self {
        Self { prefers_dark }
    }
}

impl ColorSchemeSignal for StaticColorScheme {
    fn prefers_dark(&self) -> Option<bool> {
        self.prefers_dark
    }

    fn subscribe(&self, _handler: SchemeHandler) -> Subscription {
        Subscription::noop()
    }
}

#[derive(Default)]
struct BroadcastState {
    prefers_dark: Option<bool>,
    next_id: u64,
    handlers: Vec<(u64, SchemeHandler)>,
}

/// A preference the embedding host pushes changes into.
/// Handlers run on the caller's thread, after the new value is recorded.
#[derive(Clone, Default)]
pub struct ColorSchemeBroadcast {
    state: Arc<Mutex<BroadcastState>>,
}

impl ColorSchemeBroadcast {
    pub fn new(prefers_dark: Option<bool>) -> Self {
        let broadcast = Self::default();
        broadcast.lock().prefers_dark = prefers_dark;
        broadcast
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BroadcastState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records the new preference and notifies every live handler
    pub fn set_prefers_dark(&self, dark: bool) {
        let handlers: Vec<SchemeHandler> = {
            let mut state = self.lock();
            state.prefers_dark = Some(dark);
            state.handlers.iter().map(|(_, h)| Arc::clone(h)).collect()
        };

        for handler in handlers {
            handler(dark);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.lock().handlers.len()
    }
}

impl ColorSchemeSignal for ColorSchemeBroadcast {
    fn prefers_dark(&self) -> Option<bool> {
        self.lock().prefers_dark
    }

    fn subscribe(&self, handler: SchemeHandler) -> Subscription {
        let id = {
            let mut state = self.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.handlers.push((id, handler));
            id
        };

        let weak: Weak<Mutex<BroadcastState>> = Arc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                let mut state = state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                state.handlers.retain(|(existing, _)| *existing != id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn dropping_subscription_stops_notifications() {
        let broadcast = ColorSchemeBroadcast::new(Some(false));
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let subscription = broadcast.subscribe(Arc::new(move |_: bool| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        broadcast.set_prefers_dark(true);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(broadcast.prefers_dark(), Some(true));

        drop(subscription);
        assert_eq!(broadcast.handler_count(), 0);
        broadcast.set_prefers_dark(false);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dispose_removes_only_its_own_handler() {
        let broadcast = ColorSchemeBroadcast::default();
        let first = broadcast.subscribe(Arc::new(|_: bool| {}));
        let _second = broadcast.subscribe(Arc::new(|_: bool| {}));
        assert_eq!(broadcast.handler_count(), 2);

        first.dispose();
        assert_eq!(broadcast.handler_count(), 1);
    }

    #[test]
    fn static_scheme_reports_fixed_value() {
        assert_eq!(StaticColorScheme::new(Some(true)).prefers_dark(), Some(true));
        assert_eq!(StaticColorScheme::default().prefers_dark(), None);
    }
}
