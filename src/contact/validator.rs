use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const PHONE_MISMATCH: &str = "phoneMismatch";
pub const EMAIL_MISMATCH: &str = "emailMismatch";

/// Named validation errors attached to a single field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors(BTreeSet<String>);

impl ValidationErrors {
    pub fn single(name: &str) -> Self {
        let mut errors = Self::default();
        errors.insert(name);
        errors
    }

    pub fn insert(&mut self, name: &str) {
        self.0.insert(name.to_string());
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// `None` for an empty set, so callers never hold an empty container
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl<'a> FromIterator<&'a str> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

/// Result of checking one value/confirmation pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairOutcome {
    /// Error to report at form level, if the pair disagrees
    pub pair_error: Option<String>,
    /// Updated errors for the confirmation field
    pub confirm_errors: Option<ValidationErrors>,
}

/// Checks that `confirm` repeats `primary`.
///
/// A missing or empty side makes no decision and leaves `confirm_errors` as is.
/// A mismatch adds `error_name` next to any other errors; a match removes only
/// `error_name`.
pub fn validate_pair(
    primary: Option<&str>,
    confirm: Option<&str>,
    confirm_errors: Option<ValidationErrors>,
    error_name: &str,
) -> PairOutcome {
    let (primary, confirm) = match (non_empty(primary), non_empty(confirm)) {
        (Some(primary), Some(confirm)) => (primary, confirm),
        _ => {
            return PairOutcome {
                pair_error: None,
                confirm_errors,
            }
        }
    };

    if primary != confirm {
        let mut errors = confirm_errors.unwrap_or_default();
        errors.insert(error_name);
        return PairOutcome {
            pair_error: Some(error_name.to_string()),
            confirm_errors: Some(errors),
        };
    }

    let confirm_errors = confirm_errors.and_then(|mut errors| {
        errors.remove(error_name);
        errors.into_option()
    });

    PairOutcome {
        pair_error: None,
        confirm_errors,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
