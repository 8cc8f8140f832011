use crate::error::CoreError;
use crate::model::{EventPayload, LinkPayload, UserPayload};

/// Minimum length of a password after trimming.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Payload-only checks. No I/O; the same result whether called from a
/// validate endpoint or as the first gate of a write.
pub struct Validator;

impl Validator {
    /// Validate user payload.
    pub fn user_violations(user: &UserPayload) -> Vec<String> {
        let mut violations = Vec::new();
        if is_blank(&user.name) {
            violations.push("name must not be blank".to_string());
        }
        if is_blank(&user.email) {
            violations.push("email must not be blank".to_string());
        }
        violations
    }

    /// Validate event payload.
    pub fn event_violations(event: &EventPayload) -> Vec<String> {
        let mut violations = Vec::new();

        if event.name.as_deref().is_none_or(is_blank) {
            violations.push("event name must not be blank".to_string());
        }
        match event.is_ead {
            None => violations.push("is_EAD must be true or false".to_string()),
            Some(false) if event.address.as_deref().is_none_or(is_blank) => {
                violations.push("address is required for in-person events".to_string())
            }
            Some(_) => {}
        }
        if event.event_date.is_none() {
            violations.push("event date is required".to_string());
        }
        if let (Some(deadline), Some(date)) = (event.purchase_deadline, event.event_date) {
            if deadline > date {
                violations.push("purchase deadline must not be after the event date".to_string());
            }
        }
        if event.capacity.is_some_and(|c| c < 0) {
            violations.push("capacity must not be negative".to_string());
        }
        if event.quantity < 0 {
            violations.push("quantity must not be negative".to_string());
        }
        if event.presenters.is_none() {
            violations.push("presenters must not be null (may be empty)".to_string());
        }

        violations
    }

    /// Validate link payload.
    pub fn link_violations(link: &LinkPayload) -> Vec<String> {
        let mut violations = Vec::new();
        if !is_positive(link.user_id) {
            violations.push("user_id is required and must be positive".to_string());
        }
        if !is_positive(link.event_id) {
            violations.push("event_id is required and must be positive".to_string());
        }
        violations
    }

    /// Validate a wallet reference.
    pub fn wallet_violations(user_id: Option<i64>) -> Vec<String> {
        if is_positive(user_id) {
            Vec::new()
        } else {
            vec!["user_id is required and must be positive".to_string()]
        }
    }

    pub fn validate_user(user: &UserPayload) -> Result<(), CoreError> {
        into_result(Self::user_violations(user))
    }

    pub fn validate_event(event: &EventPayload) -> Result<(), CoreError> {
        into_result(Self::event_violations(event))
    }

    pub fn validate_link(link: &LinkPayload) -> Result<(), CoreError> {
        into_result(Self::link_violations(link))
    }

    pub fn validate_wallet(user_id: Option<i64>) -> Result<(), CoreError> {
        into_result(Self::wallet_violations(user_id))
    }

    /// Validate a replacement password.
    pub fn validate_new_password(password: &str) -> Result<(), CoreError> {
        if password.trim().chars().count() < MIN_PASSWORD_LEN {
            return Err(CoreError::validation(format!(
                "new password must have at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn is_positive(id: Option<i64>) -> bool {
    id.is_some_and(|v| v > 0)
}

fn into_result(violations: Vec<String>) -> Result<(), CoreError> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(violations))
    }
}
