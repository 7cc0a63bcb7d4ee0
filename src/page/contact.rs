//! Contact form validation and relay-response handling
//!
//! The browser side (field reads, fetch, status element) lives in
//! `crate::web::page`; everything here is plain data so it can be tested.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Relay endpoint used when the form has no `action`
pub const DEFAULT_ENDPOINT: &str = "https://formspree.io/f/xeovjpov";

/// Delay before falling back to a native submit after a network failure
pub const NATIVE_SUBMIT_DELAY_MS: i32 = 600;

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid e-mail regex"))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("Prosím vyplňte všechna pole.")]
    MissingFields,

    #[error("Neplatný e-mail.")]
    InvalidEmail,

    #[error("Spam detekován.")]
    SpamDetected,

    /// Relay answered with a non-2xx status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Chyba sítě. Zkus to později nebo se provede nativní odeslání.")]
    Network,
}

impl ContactError {
    /// A 404 from the relay almost always means a wrong form id
    pub fn is_missing_form(&self) -> bool {
        matches!(self, ContactError::Rejected { status: 404, .. })
    }
}

/// Field values read from the form
#[derive(Debug, Clone, Default)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    /// Hidden `_honey` field, only bots fill it in
    pub honeypot: Option<String>,
}

impl ContactSubmission {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            message: message.trim().to_string(),
            honeypot: None,
        }
    }

    pub fn with_honeypot(mut self, value: &str) -> Self {
        self.honeypot = Some(value.to_string());
        self
    }

    /// Check required fields, then the e-mail shape, then the honeypot
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.is_empty() || self.email.is_empty() || self.message.is_empty() {
            return Err(ContactError::MissingFields);
        }
        if !email_pattern().is_match(&self.email) {
            return Err(ContactError::InvalidEmail);
        }
        if self.honeypot.as_deref().is_some_and(|h| !h.is_empty()) {
            return Err(ContactError::SpamDetected);
        }
        Ok(())
    }
}

/// Form `action` if set, otherwise the default relay
pub fn endpoint(action: Option<&str>) -> &str {
    match action {
        Some(url) if !url.trim().is_empty() => url,
        _ => DEFAULT_ENDPOINT,
    }
}

/// Turn a relay response into success or a user-facing rejection. The body
/// may be JSON, plain text or empty.
pub fn interpret_response(status: u16, body: &str) -> Result<(), ContactError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let json: serde_json::Value = serde_json::from_str(body).unwrap_or(serde_json::Value::Null);
    let field = |key: &str| {
        json.get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let message = field("error")
        .or_else(|| field("message"))
        .or_else(|| (!body.is_empty()).then(|| body.to_string()))
        .unwrap_or_else(|| format!("Chyba při odesílání (status {}).", status));
    Err(ContactError::Rejected { status, message })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Neutral,
    Success,
    Error,
}

impl Severity {
    /// Inline text color for the status element
    pub fn color(self) -> &'static str {
        match self {
            Severity::Neutral => "",
            Severity::Success => "green",
            Severity::Error => "tomato",
        }
    }
}

/// Text and severity shown in the form status element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub severity: Severity,
}

impl StatusLine {
    pub fn cleared() -> Self {
        Self {
            text: String::new(),
            severity: Severity::Neutral,
        }
    }

    pub fn sending() -> Self {
        Self {
            text: "Odesílám…".to_string(),
            severity: Severity::Neutral,
        }
    }

    pub fn sent() -> Self {
        Self {
            text: "Děkuji! Zpráva byla odeslána.".to_string(),
            severity: Severity::Success,
        }
    }
}

impl From<&ContactError> for StatusLine {
    fn from(err: &ContactError) -> Self {
        Self {
            text: err.to_string(),
            severity: Severity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_submission() {
        let form = ContactSubmission::new(" Jana ", "jana@example.cz", "Ahoj");
        assert_eq!(form.name, "Jana");
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn test_validation_order() {
        let blank = ContactSubmission::new("", "not-an-email", "   ").with_honeypot("bot");
        assert_eq!(blank.validate(), Err(ContactError::MissingFields));

        let bad_email = ContactSubmission::new("Jana", "jana@example", "Ahoj").with_honeypot("bot");
        assert_eq!(bad_email.validate(), Err(ContactError::InvalidEmail));

        let spam = ContactSubmission::new("Jana", "jana@example.cz", "Ahoj").with_honeypot("bot");
        assert_eq!(spam.validate(), Err(ContactError::SpamDetected));
    }

    #[test]
    fn test_email_shape() {
        for bad in ["jana", "jana@", "@example.cz", "ja na@example.cz", "jana@@example.cz"] {
            let form = ContactSubmission::new("Jana", bad, "Ahoj");
            assert_eq!(form.validate(), Err(ContactError::InvalidEmail), "{}", bad);
        }
    }

    #[test]
    fn test_empty_honeypot_is_fine() {
        let form = ContactSubmission::new("Jana", "jana@example.cz", "Ahoj").with_honeypot("");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_endpoint_fallback() {
        assert_eq!(endpoint(Some("https://relay.test/f/1")), "https://relay.test/f/1");
        assert_eq!(endpoint(Some("  ")), DEFAULT_ENDPOINT);
        assert_eq!(endpoint(None), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_success_statuses() {
        assert!(interpret_response(200, "").is_ok());
        assert!(interpret_response(204, "").is_ok());
        assert!(interpret_response(200, "{\"ok\":true}").is_ok());
    }

    #[test]
    fn test_rejection_prefers_error_then_message() {
        let err = interpret_response(422, r#"{"error":"Bad email","message":"ignored"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Bad email");

        let err = interpret_response(400, r#"{"message":"Limit reached"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Limit reached");
    }

    #[test]
    fn test_rejection_falls_back_to_body_then_status() {
        let err = interpret_response(500, "Internal").unwrap_err();
        assert_eq!(err.to_string(), "Internal");

        let err = interpret_response(404, "").unwrap_err();
        assert_eq!(err.to_string(), "Chyba při odesílání (status 404).");
        assert!(err.is_missing_form());
    }

    #[test]
    fn test_status_lines() {
        assert_eq!(StatusLine::sent().severity.color(), "green");
        assert_eq!(StatusLine::sending().severity.color(), "");
        let line = StatusLine::from(&ContactError::Network);
        assert_eq!(line.severity.color(), "tomato");
        assert!(line.text.starts_with("Chyba sítě"));
    }
}
