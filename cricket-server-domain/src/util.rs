use chrono::{DateTime, Utc};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{ServiceError, ServiceResult};

#[derive(Validate)]
struct EmailValidator {
    #[validate(email)]
    email: String,
}

/// Trims and lowercases an email address and checks its format.
pub fn validate_email(email: &str) -> ServiceResult<String> {
    let validator = EmailValidator {
        email: email.trim().to_ascii_lowercase(),
    };
    if let Err(e) = validator.validate() {
        return ServiceError::invalid(format!("Invalid email: {}", describe_errors(&e)));
    }
    Ok(validator.email)
}

/// Runs the derived field rules of `input` and turns any failure into
/// `ServiceError::Invalid` listing every offending field.
pub fn validate_input<T: Validate>(input: &T) -> ServiceResult<()> {
    input
        .validate()
        .map_err(|e| ServiceError::Invalid(describe_errors(&e)))
}

/// Field rule for required text: whitespace alone does not count as a value.
pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

fn describe_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let reason = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                format!("{}: {}", field, reason)
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Replaces `target` with `value` if one was supplied.
pub fn merge<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Like [`merge`] for columns that are nullable in storage.
pub fn merge_opt<T>(target: &mut Option<T>, value: Option<T>) {
    if let Some(value) = value {
        *target = Some(value);
    }
}
