pub mod dialog;
pub mod form;
pub mod validator;

pub use dialog::{ContactDialog, Notification, SubmitOutcome};
pub use form::{ContactField, ContactForm, FormErrors};
pub use validator::{validate_pair, PairOutcome, ValidationErrors, EMAIL_MISMATCH, PHONE_MISMATCH};
