use crate::api::ContactSink;
use crate::contact::form::ContactForm;
use crate::models::Severity;
use serde::Serialize;
use tracing::{info, warn};

const SUBMIT_FAILED: &str = "Failed to submit. Please try again.";

/// Transient message shown after a submission attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Notification {
    fn sent() -> Self {
        Self {
            severity: Severity::Success,
            summary: "Sent!".to_string(),
            detail: "Your contact info has been submitted successfully.".to_string(),
        }
    }

    fn failed(detail: String) -> Self {
        Self {
            severity: Severity::Danger,
            summary: "Error".to_string(),
            detail,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The form did not validate; nothing was sent
    Invalid,
    Sent(Notification),
    Failed(Notification),
}

/// Dialog registering buyer interest in one listing
#[derive(Debug, Clone)]
pub struct ContactDialog {
    property_id: i64,
    visible: bool,
    submitting: bool,
    pub form: ContactForm,
}

impl ContactDialog {
    pub fn new(property_id: i64) -> Self {
        Self {
            property_id,
            visible: false,
            submitting: false,
            form: ContactForm::new(),
        }
    }

    pub fn property_id(&self) -> i64 {
        self.property_id
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Opens the dialog with an empty form
    pub fn show(&mut self) {
        self.form.reset();
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub async fn submit(&mut self, sink: &dyn ContactSink) -> SubmitOutcome {
        if !self.form.is_valid() {
            self.form.mark_all_touched();
            return SubmitOutcome::Invalid;
        }

        let request = self.form.request();
        self.submitting = true;
        let result = sink.add_buyer_contact(self.property_id, &request).await;
        self.submitting = false;

        match result {
            Ok(()) => {
                info!("Contact request sent for property {}", self.property_id);
                self.visible = false;
                SubmitOutcome::Sent(Notification::sent())
            }
            Err(err) => {
                warn!("Contact request for property {} failed: {}", self.property_id, err);
                SubmitOutcome::Failed(Notification::failed(err.user_message(SUBMIT_FAILED)))
            }
        }
    }
}
