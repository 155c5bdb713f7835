use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// Primary dark-mode class on the global UI context
pub const DARK_CLASS: &str = "dark";
/// Legacy alias still matched by older component styles
pub const LEGACY_DARK_CLASS: &str = "dark-mode";

const DARK_CLASSES: [&str; 2] = [DARK_CLASS, LEGACY_DARK_CLASS];

/// Global UI context the theme is applied to
///
/// The controller calls these while holding its state lock, so an
/// implementation must not call back into `ThemeController`.
pub trait Presentation: Send + Sync {
    fn add_classes(&self, classes: &[&str]);

    fn remove_classes(&self, classes: &[&str]);
}

/// Adds both dark classes when `dark`, removes both otherwise. Idempotent.
pub fn apply_presentation(presentation: &dyn Presentation, dark: bool) {
    if dark {
        presentation.add_classes(&DARK_CLASSES);
    } else {
        presentation.remove_classes(&DARK_CLASSES);
    }
}

/// Text for the theme toggle button: it names the mode it switches to.
pub fn toggle_label(is_dark: bool) -> &'static str {
    if is_dark {
        "Switch to light mode"
    } else {
        "Switch to dark mode"
    }
}

/// Icon for the theme toggle button
pub fn toggle_icon(is_dark: bool) -> &'static str {
    if is_dark {
        "pi pi-sun"
    } else {
        "pi pi-moon"
    }
}

/// Class list of the document body, kept in memory
#[derive(Debug, Clone, Default)]
pub struct BodyClasses {
    classes: Arc<Mutex<BTreeSet<String>>>,
}

impl BodyClasses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, class: &str) -> bool {
        self.snapshot().contains(class)
    }

    pub fn snapshot(&self) -> BTreeSet<String> {
        self.classes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Presentation for BodyClasses {
    fn add_classes(&self, classes: &[&str]) {
        let mut set = self
            .classes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        set.extend(classes.iter().map(|c| c.to_string()));
    }

    fn remove_classes(&self, classes: &[&str]) {
        let mut set = self
            .classes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for class in classes {
            set.remove(*class);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_adds_both_classes_and_light_removes_both() {
        let body = BodyClasses::new();
        body.add_classes(&["layout-static"]);

        apply_presentation(&body, true);
        assert!(body.contains(DARK_CLASS));
        assert!(body.contains(LEGACY_DARK_CLASS));

        apply_presentation(&body, false);
        assert!(!body.contains(DARK_CLASS));
        assert!(!body.contains(LEGACY_DARK_CLASS));
        assert!(body.contains("layout-static"));
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let body = BodyClasses::new();
        apply_presentation(&body, true);
        let once = body.snapshot();
        apply_presentation(&body, true);
        assert_eq!(body.snapshot(), once);

        apply_presentation(&body, false);
        let cleared = body.snapshot();
        apply_presentation(&body, false);
        assert_eq!(body.snapshot(), cleared);
    }

    #[test]
    fn toggle_button_offers_the_other_mode() {
        assert_eq!(toggle_label(true), "Switch to light mode");
        assert_eq!(toggle_icon(true), "pi pi-sun");
        assert_eq!(toggle_label(false), "Switch to dark mode");
        assert_eq!(toggle_icon(false), "pi pi-moon");
    }
}
