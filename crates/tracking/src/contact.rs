use serde::{Deserialize, Serialize};

pub const NAME_MAX: usize = 100;
pub const MESSAGE_MIN: usize = 10;
pub const MESSAGE_MAX: usize = 1000;

/// Body of `POST /api/contact`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// One field-level validation failure. Unlike the tracking endpoints, the
/// contact form reports these back to the (human) submitter.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl ContactPayload {
    /// Check every field and collect all failures, so the client can render
    /// them next to the form inputs in one round trip.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        let name_len = self.name.trim().chars().count();
        if name_len == 0 {
            errors.push(FieldError {
                field: "name",
                message: "Name is required".to_string(),
            });
        } else if name_len > NAME_MAX {
            errors.push(FieldError {
                field: "name",
                message: format!("Name must be at most {} characters", NAME_MAX),
            });
        }

        if !email_is_valid(&self.email) {
            errors.push(FieldError {
                field: "email",
                message: "Invalid email address".to_string(),
            });
        }

        let message_len = self.message.chars().count();
        if message_len < MESSAGE_MIN {
            errors.push(FieldError {
                field: "message",
                message: format!("Message must be at least {} characters", MESSAGE_MIN),
            });
        } else if message_len > MESSAGE_MAX {
            errors.push(FieldError {
                field: "message",
                message: format!("Message must be at most {} characters", MESSAGE_MAX),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Structural email check: one `@`, non-empty local part, and a domain
/// containing a dot with no whitespace anywhere.
fn email_is_valid(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty() && !domain.contains('@')
}
