use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tracing::{debug, info, warn};

use crate::theme::presentation::{apply_presentation, toggle_icon, toggle_label, Presentation};
use crate::theme::signal::{ColorSchemeSignal, Subscription};
use crate::theme::storage::PreferenceStore;

/// Storage key holding `"dark"` or `"light"`
pub const STORAGE_KEY: &str = "estate-pilot-theme";

/// Observer notified with the new dark flag after every change
pub type ThemeListener = Arc<dyn Fn(bool) + Send + Sync>;

/// Where the current theme value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeOrigin {
    /// Chosen by the user, now or in an earlier session
    Explicit,
    /// Following the host colour scheme
    Implicit,
}

#[derive(Debug, Clone, Copy)]
struct ThemeState {
    is_dark: bool,
    origin: ThemeOrigin,
    /// False while an explicit choice failed to reach storage
    persisted: bool,
}

struct Shared {
    state: Mutex<ThemeState>,
    store: Arc<dyn PreferenceStore>,
    presentation: Arc<dyn Presentation>,
    listeners: Mutex<Vec<(u64, ThemeListener)>>,
    next_listener: AtomicU64,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, ThemeState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn listeners(&self) -> MutexGuard<'_, Vec<(u64, ThemeListener)>> {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Applies an explicit choice: state, presentation, then storage.
    fn choose(&self, next: impl FnOnce(bool) -> bool) -> bool {
        let dark = {
            let mut state = self.state();
            let dark = next(state.is_dark);
            state.is_dark = dark;
            state.origin = ThemeOrigin::Explicit;
            apply_presentation(self.presentation.as_ref(), dark);

            let value = if dark { "dark" } else { "light" };
            state.persisted = match self.store.save(STORAGE_KEY, value) {
                Ok(()) => true,
                Err(err) => {
                    warn!("Could not persist theme '{}': {}", value, err);
                    false
                }
            };
            dark
        };

        info!("Theme set to {}", if dark { "dark" } else { "light" });
        self.notify(dark);
        dark
    }

    fn on_scheme_change(&self, prefers_dark: bool) {
        {
            let mut state = self.state();
            if state.origin == ThemeOrigin::Explicit {
                debug!("Ignoring colour scheme change; theme was chosen explicitly");
                return;
            }
            state.is_dark = prefers_dark;
            apply_presentation(self.presentation.as_ref(), prefers_dark);
        }

        debug!("Following colour scheme change, dark={}", prefers_dark);
        self.notify(prefers_dark);
    }

    fn notify(&self, dark: bool) {
        let listeners: Vec<ThemeListener> = self
            .listeners()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(dark);
        }
    }
}

/// Owns the light/dark theme for the life of the application.
///
/// Built once at start-up by [`ThemeController::initialize`] and handed by
/// reference to whatever needs it. Dropping it (or calling [`shutdown`])
/// releases the host colour-scheme subscription.
///
/// [`shutdown`]: ThemeController::shutdown
pub struct ThemeController {
    shared: Arc<Shared>,
    scheme_subscription: Mutex<Option<Subscription>>,
}

impl ThemeController {
    /// Seeds the theme from storage, else from the host preference, applies it
    /// and starts following host changes. Never fails: unreadable storage is
    /// treated as empty and an unknown host preference as light.
    pub fn initialize(
        store: Arc<dyn PreferenceStore>,
        signal: &dyn ColorSchemeSignal,
        presentation: Arc<dyn Presentation>,
    ) -> Self {
        let saved = match store.load(STORAGE_KEY) {
            Ok(saved) => saved,
            Err(err) => {
                warn!("Theme preference unreadable, falling back to host preference: {}", err);
                None
            }
        };

        let (is_dark, origin) = match saved.as_deref() {
            Some("dark") => (true, ThemeOrigin::Explicit),
            Some("light") => (false, ThemeOrigin::Explicit),
            other => {
                if let Some(value) = other {
                    warn!("Ignoring unrecognised theme preference '{}'", value);
                }
                let prefers_dark = signal.prefers_dark().unwrap_or(false);
                (prefers_dark, ThemeOrigin::Implicit)
            }
        };

        apply_presentation(presentation.as_ref(), is_dark);
        info!("Theme initialised: dark={} ({:?})", is_dark, origin);

        let shared = Arc::new(Shared {
            state: Mutex::new(ThemeState {
                is_dark,
                origin,
                persisted: true,
            }),
            store,
            presentation,
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
        });

        let weak: Weak<Shared> = Arc::downgrade(&shared);
        let subscription = signal.subscribe(Arc::new(move |prefers_dark: bool| {
            if let Some(shared) = weak.upgrade() {
                shared.on_scheme_change(prefers_dark);
            }
        }));

        Self {
            shared,
            scheme_subscription: Mutex::new(Some(subscription)),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.shared.state().is_dark
    }

    pub fn origin(&self) -> ThemeOrigin {
        self.shared.state().origin
    }

    /// Whether storage agrees with the current explicit choice
    pub fn is_persisted(&self) -> bool {
        self.shared.state().persisted
    }

    /// Label of the toggle button for the current theme
    pub fn toggle_label(&self) -> &'static str {
        toggle_label(self.is_dark())
    }

    pub fn toggle_icon(&self) -> &'static str {
        toggle_icon(self.is_dark())
    }

    /// Flips the theme and records it as the user's choice. Returns the new value.
    pub fn toggle(&self) -> bool {
        self.shared.choose(|dark| !dark)
    }

    pub fn set_explicit(&self, dark: bool) {
        self.shared.choose(|_| dark);
    }

    /// Registers an observer; it runs after each change has been applied.
    pub fn subscribe(&self, listener: impl Fn(bool) + Send + Sync + 'static) -> Subscription {
        let id = self.shared.next_listener.fetch_add(1, Ordering::Relaxed);
        let listener: ThemeListener = Arc::new(listener);
        self.shared.listeners().push((id, listener));

        let weak = Arc::downgrade(&self.shared);
        Subscription::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.listeners().retain(|(existing, _)| *existing != id);
            }
        })
    }

    /// Stops following the host colour scheme. Safe to call more than once.
    pub fn shutdown(&self) {
        let subscription = self
            .scheme_subscription
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(subscription) = subscription {
            subscription.dispose();
            debug!("Released colour scheme subscription");
        }
    }
}

impl std::fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = *self.shared.state();
        f.debug_struct("ThemeController")
            .field("is_dark", &state.is_dark)
            .field("origin", &state.origin)
            .field("persisted", &state.persisted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::presentation::{BodyClasses, DARK_CLASS, LEGACY_DARK_CLASS};
    use crate::theme::signal::{ColorSchemeBroadcast, StaticColorScheme};
    use crate::theme::storage::MemoryPreferenceStore;

    fn controller(
        store: Arc<MemoryPreferenceStore>,
        signal: &dyn ColorSchemeSignal,
    ) -> (ThemeController, BodyClasses) {
        let body = BodyClasses::new();
        let theme = ThemeController::initialize(store, signal, Arc::new(body.clone()));
        (theme, body)
    }

    #[test]
    fn saved_dark_wins_over_light_host() {
        let store = Arc::new(MemoryPreferenceStore::with_entry(STORAGE_KEY, "dark"));
        let (theme, body) = controller(store, &StaticColorScheme::new(Some(false)));

        assert!(theme.is_dark());
        assert_eq!(theme.origin(), ThemeOrigin::Explicit);
        assert!(body.contains(DARK_CLASS));
        assert!(body.contains(LEGACY_DARK_CLASS));
    }

    #[test]
    fn no_saved_value_follows_host_without_persisting() {
        let store = Arc::new(MemoryPreferenceStore::new());
        let (theme, body) = controller(Arc::clone(&store), &StaticColorScheme::new(Some(true)));

        assert!(theme.is_dark());
        assert_eq!(theme.origin(), ThemeOrigin::Implicit);
        assert!(body.contains(DARK_CLASS));
        assert_eq!(store.load(STORAGE_KEY).expect("load"), None);
    }

    #[test]
    fn unreadable_storage_and_unknown_host_default_to_light() {
        let store = Arc::new(MemoryPreferenceStore::with_entry(STORAGE_KEY, "dark"));
        store.set_unavailable(true);
        let (theme, body) = controller(store, &StaticColorScheme::new(None));

        assert!(!theme.is_dark());
        assert_eq!(theme.origin(), ThemeOrigin::Implicit);
        assert!(body.snapshot().is_empty());
    }

    #[test]
    fn unrecognised_saved_value_is_treated_as_absent() {
        let store = Arc::new(MemoryPreferenceStore::with_entry(STORAGE_KEY, "sepia"));
        let (theme, _body) = controller(store, &StaticColorScheme::new(Some(true)));

        assert!(theme.is_dark());
        assert_eq!(theme.origin(), ThemeOrigin::Implicit);
    }

    #[test]
    fn toggle_persists_and_applies() {
        let store = Arc::new(MemoryPreferenceStore::new());
        let (theme, body) = controller(Arc::clone(&store), &StaticColorScheme::new(Some(false)));

        assert!(theme.toggle());
        assert_eq!(store.load(STORAGE_KEY).expect("load"), Some("dark".to_string()));
        assert!(body.contains(DARK_CLASS));

        assert!(!theme.toggle());
        assert_eq!(store.load(STORAGE_KEY).expect("load"), Some("light".to_string()));
        assert!(!body.contains(LEGACY_DARK_CLASS));
        assert_eq!(theme.origin(), ThemeOrigin::Explicit);
    }

    #[test]
    fn toggle_button_tracks_current_theme() {
        let store = Arc::new(MemoryPreferenceStore::new());
        let (theme, _body) = controller(store, &StaticColorScheme::new(Some(false)));
        assert_eq!(theme.toggle_label(), "Switch to dark mode");
        assert_eq!(theme.toggle_icon(), "pi pi-moon");

        theme.toggle();
        assert_eq!(theme.toggle_label(), "Switch to light mode");
        assert_eq!(theme.toggle_icon(), "pi pi-sun");
    }

    #[test]
    fn failed_save_keeps_applied_state_and_reports_it() {
        let store = Arc::new(MemoryPreferenceStore::new());
        let (theme, body) = controller(Arc::clone(&store), &StaticColorScheme::new(Some(false)));

        store.set_unavailable(true);
        theme.set_explicit(true);
        assert!(theme.is_dark());
        assert!(body.contains(DARK_CLASS));
        assert!(!theme.is_persisted());

        store.set_unavailable(false);
        theme.set_explicit(true);
        assert!(theme.is_persisted());
        assert_eq!(store.load(STORAGE_KEY).expect("load"), Some("dark".to_string()));
    }

    #[test]
    fn implicit_theme_follows_host_changes() {
        let host = ColorSchemeBroadcast::new(Some(true));
        let store = Arc::new(MemoryPreferenceStore::new());
        let (theme, body) = controller(Arc::clone(&store), &host);
        assert!(theme.is_dark());

        host.set_prefers_dark(false);
        assert!(!theme.is_dark());
        assert!(!body.contains(DARK_CLASS));

        host.set_prefers_dark(true);
        assert!(theme.is_dark());
        assert_eq!(theme.origin(), ThemeOrigin::Implicit);
        assert_eq!(store.load(STORAGE_KEY).expect("load"), None);
    }

    #[test]
    fn explicit_choice_ignores_host_changes() {
        let host = ColorSchemeBroadcast::new(Some(false));
        let (theme, body) = controller(Arc::new(MemoryPreferenceStore::new()), &host);

        assert!(theme.toggle());
        host.set_prefers_dark(false);
        assert!(theme.is_dark());
        assert!(body.contains(DARK_CLASS));
    }

    #[test]
    fn listeners_see_changes_until_released() {
        let host = ColorSchemeBroadcast::new(Some(false));
        let (theme, _body) = controller(Arc::new(MemoryPreferenceStore::new()), &host);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = theme.subscribe(move |dark| sink.lock().expect("seen mutex").push(dark));

        host.set_prefers_dark(true);
        theme.set_explicit(false);
        subscription.dispose();
        theme.toggle();

        assert_eq!(*seen.lock().expect("seen mutex"), vec![true, false]);
    }

    #[test]
    fn shutdown_and_drop_release_host_subscription() {
        let host = ColorSchemeBroadcast::new(Some(false));
        let (theme, _body) = controller(Arc::new(MemoryPreferenceStore::new()), &host);
        assert_eq!(host.handler_count(), 1);

        theme.shutdown();
        assert_eq!(host.handler_count(), 0);
        host.set_prefers_dark(true);
        assert!(!theme.is_dark());
        theme.shutdown();

        let (second, _body) = controller(Arc::new(MemoryPreferenceStore::new()), &host);
        assert_eq!(host.handler_count(), 1);
        drop(second);
        assert_eq!(host.handler_count(), 0);
    }
}
