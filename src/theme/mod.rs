//! Light/dark theme: persisted user choice, host colour-scheme following,
//! and the body classes that express it.

pub mod controller;
pub mod presentation;
pub mod signal;
pub mod storage;

pub use controller::{ThemeController, ThemeListener, ThemeOrigin, STORAGE_KEY};
pub use presentation::{
    apply_presentation, toggle_icon, toggle_label, BodyClasses, Presentation, DARK_CLASS,
    LEGACY_DARK_CLASS,
};
pub use signal::{ColorSchemeBroadcast, ColorSchemeSignal, SchemeHandler, StaticColorScheme, Subscription};
pub use storage::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, StoreError};
