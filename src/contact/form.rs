use crate::contact::validator::{validate_pair, ValidationErrors, EMAIL_MISMATCH, PHONE_MISMATCH};
use crate::models::ContactRequest;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::OnceLock;

pub const REQUIRED: &str = "required";
pub const MIN_LENGTH: &str = "minlength";
pub const PATTERN: &str = "pattern";
pub const EMAIL: &str = "email";

const NAME_MIN_LENGTH: usize = 2;

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?\d{10,15}$").expect("phone pattern compiles"))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
        )
        .expect("email pattern compiles")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContactField {
    Name,
    Phone,
    ConfirmPhone,
    Email,
    ConfirmEmail,
}

impl ContactField {
    pub const ALL: [ContactField; 5] = [
        ContactField::Name,
        ContactField::Phone,
        ContactField::ConfirmPhone,
        ContactField::Email,
        ContactField::ConfirmEmail,
    ];
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContactField::Name => "name",
            ContactField::Phone => "phone",
            ContactField::ConfirmPhone => "confirmPhone",
            ContactField::Email => "email",
            ContactField::ConfirmEmail => "confirmEmail",
        };
        f.write_str(name)
    }
}

/// Cross-field rule: `confirm` must repeat `primary`
#[derive(Debug, Clone, Copy)]
struct PairRule {
    primary: ContactField,
    confirm: ContactField,
    error: &'static str,
}

const PAIR_RULES: [PairRule; 2] = [
    PairRule {
        primary: ContactField::Phone,
        confirm: ContactField::ConfirmPhone,
        error: PHONE_MISMATCH,
    },
    PairRule {
        primary: ContactField::Email,
        confirm: ContactField::ConfirmEmail,
        error: EMAIL_MISMATCH,
    },
];

/// Errors for the whole form: per field, plus the pair errors raised at form level
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub fields: BTreeMap<ContactField, ValidationErrors>,
    pub group: Option<ValidationErrors>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.group.is_none()
    }

    pub fn field(&self, field: ContactField) -> Option<&ValidationErrors> {
        self.fields.get(&field)
    }
}

/// Values typed into the contact dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub phone: String,
    pub confirm_phone: String,
    pub email: String,
    pub confirm_email: String,
    touched: BTreeSet<ContactField>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Phone => &self.phone,
            ContactField::ConfirmPhone => &self.confirm_phone,
            ContactField::Email => &self.email,
            ContactField::ConfirmEmail => &self.confirm_email,
        }
    }

    /// Clears every value and the touched markers
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn mark_all_touched(&mut self) {
        self.touched.extend(ContactField::ALL);
    }

    pub fn is_touched(&self, field: ContactField) -> bool {
        self.touched.contains(&field)
    }

    pub fn validate(&self) -> FormErrors {
        let mut fields: BTreeMap<ContactField, ValidationErrors> = ContactField::ALL
            .iter()
            .filter_map(|field| {
                field_errors(*field, self.value(*field))
                    .into_option()
                    .map(|errors| (*field, errors))
            })
            .collect();

        let mut group = ValidationErrors::default();
        for rule in PAIR_RULES {
            let outcome = validate_pair(
                Some(self.value(rule.primary)),
                Some(self.value(rule.confirm)),
                fields.remove(&rule.confirm),
                rule.error,
            );
            if let Some(error) = outcome.pair_error {
                group.insert(&error);
            }
            if let Some(errors) = outcome.confirm_errors {
                fields.insert(rule.confirm, errors);
            }
        }

        FormErrors {
            fields,
            group: group.into_option(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Payload sent to the contact endpoint
    pub fn request(&self) -> ContactRequest {
        ContactRequest {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
        }
    }
}

/// Single-field validators; format checks skip empty values and leave them to `required`.
fn field_errors(field: ContactField, value: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if value.is_empty() {
        errors.insert(REQUIRED);
        return errors;
    }

    match field {
        ContactField::Name => {
            if value.chars().count() < NAME_MIN_LENGTH {
                errors.insert(MIN_LENGTH);
            }
        }
        ContactField::Phone => {
            if !phone_pattern().is_match(value) {
                errors.insert(PATTERN);
            }
        }
        ContactField::Email | ContactField::ConfirmEmail => {
            if !email_pattern().is_match(value) {
                errors.insert(EMAIL);
            }
        }
        ContactField::ConfirmPhone => {}
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        ContactForm {
            name: "Mona Adel".to_string(),
            phone: "+201001234567".to_string(),
            confirm_phone: "+201001234567".to_string(),
            email: "mona@example.com".to_string(),
            confirm_email: "mona@example.com".to_string(),
            ..ContactForm::default()
        }
    }

    #[test]
    fn complete_matching_form_is_valid() {
        let form = filled();
        assert!(form.is_valid(), "{:?}", form.validate());
        assert_eq!(
            form.request(),
            ContactRequest {
                name: "Mona Adel".to_string(),
                phone: "+201001234567".to_string(),
                email: "mona@example.com".to_string(),
            }
        );
    }

    #[test]
    fn empty_form_reports_required_everywhere() {
        let errors = ContactForm::new().validate();
        for field in ContactField::ALL {
            assert!(
                errors.field(field).expect("field has errors").contains(REQUIRED),
                "{field} should be required"
            );
        }
        assert_eq!(errors.group, None);
    }

    #[test]
    fn field_formats_are_checked() {
        let mut form = filled();
        form.name = "M".to_string();
        form.phone = "12345".to_string();
        form.confirm_phone = "12345".to_string();
        form.email = "not-an-email".to_string();
        form.confirm_email = "not-an-email".to_string();

        let errors = form.validate();
        assert!(errors.field(ContactField::Name).unwrap().contains(MIN_LENGTH));
        assert!(errors.field(ContactField::Phone).unwrap().contains(PATTERN));
        assert!(errors.field(ContactField::Email).unwrap().contains(EMAIL));
        assert!(errors.field(ContactField::ConfirmPhone).is_none());
        assert_eq!(errors.group, None);
    }

    #[test]
    fn mismatched_pairs_flag_confirmation_fields() {
        let mut form = filled();
        form.confirm_phone = "+201001234568".to_string();
        form.confirm_email = "broken".to_string();

        let errors = form.validate();
        let group = errors.group.clone().expect("group errors");
        assert!(group.contains(PHONE_MISMATCH));
        assert!(group.contains(EMAIL_MISMATCH));

        let confirm_email = errors.field(ContactField::ConfirmEmail).unwrap();
        assert!(confirm_email.contains(EMAIL_MISMATCH));
        assert!(confirm_email.contains(EMAIL));
        assert!(errors
            .field(ContactField::ConfirmPhone)
            .unwrap()
            .contains(PHONE_MISMATCH));
    }

    #[test]
    fn fixing_a_pair_clears_its_mismatch() {
        let mut form = filled();
        form.confirm_phone = "+20100".to_string();
        assert!(!form.is_valid());

        form.confirm_phone = form.phone.clone();
        assert!(form.is_valid());
    }

    #[test]
    fn reset_clears_values_and_touched() {
        let mut form = filled();
        form.mark_all_touched();
        assert!(form.is_touched(ContactField::Email));

        form.reset();
        assert_eq!(form, ContactForm::default());
        assert!(!form.is_touched(ContactField::Email));
    }
}
