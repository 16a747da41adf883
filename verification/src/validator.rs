//! Raw payload validation and normalization.
//!
//! Rules run in a fixed order and the first failure wins:
//! 1. payload present and non-empty
//! 2. trim strings; lower-case email, role, platform
//! 3. every field non-empty, followers a non-negative integer
//! 4. email shape
//! 5. role in the closed set
//! 6. platform in the closed set

use std::sync::LazyLock;

use guardiq_types::{Platform, Role};
use regex::Regex;
use serde_json::{Map, Value};

use crate::{ValidationError, VerificationRequest};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is a valid regex")
});

pub struct RequestValidator;

impl RequestValidator {
    /// Turn an untyped JSON payload into a [`VerificationRequest`].
    pub fn validate(raw: &Value) -> Result<VerificationRequest, ValidationError> {
        let fields = match raw {
            Value::Object(map) if !map.is_empty() => map,
            _ => return Err(ValidationError::MissingPayload),
        };

        let full_name = string_field(fields, "fullName")?;
        let email = string_field(fields, "email")?.to_lowercase();
        let role = string_field(fields, "role")?.to_lowercase();
        let platform = string_field(fields, "platform")?.to_lowercase();
        let followers = followers_field(fields)?;

        if full_name.is_empty() || email.is_empty() || role.is_empty() || platform.is_empty() {
            return Err(ValidationError::MissingFields);
        }

        if !Self::is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }

        let role: Role = role
            .parse()
            .map_err(|_| ValidationError::InvalidRole(role))?;
        let platform: Platform = platform
            .parse()
            .map_err(|_| ValidationError::InvalidPlatform(platform))?;

        Ok(VerificationRequest {
            full_name,
            email,
            role,
            platform,
            followers,
        })
    }

    /// Whether `email` has the accepted `local@label(.label)*.tld` shape.
    pub fn is_valid_email(email: &str) -> bool {
        EMAIL_PATTERN.is_match(email)
    }

    /// Trim, lower-case and check an email taken from outside a payload.
    pub fn normalize_email(email: &str) -> Result<String, ValidationError> {
        let email = email.trim().to_lowercase();
        if Self::is_valid_email(&email) {
            Ok(email)
        } else {
            Err(ValidationError::InvalidEmail)
        }
    }
}

/// Missing or null strings read as empty; non-strings are rejected.
fn string_field(fields: &Map<String, Value>, key: &str) -> Result<String, ValidationError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Err(ValidationError::MissingFields),
    }
}

/// Missing followers read as zero.
fn followers_field(fields: &Map<String, Value>) -> Result<u64, ValidationError> {
    match fields.get("followers") {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n.as_u64().ok_or(ValidationError::MissingFields),
        Some(_) => Err(ValidationError::MissingFields),
    }
}
