//! Declarative request-body validation.
//!
//! A rule pairs a field with a message and a predicate. Every rule is
//! evaluated and each failure is collected, in declaration order, so a client
//! sees all problems with a body at once.

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::types::Operation;

/// Fields of a user body, in the order rules are declared
pub const USER_FIELDS: [&str; 4] = ["Name", "Password", "Email", "Birthday"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

/// Read access to the string fields of a request body
pub trait Fields {
    fn field(&self, name: &str) -> Option<&str>;
}

impl Fields for serde_json::Map<String, serde_json::Value> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.as_str())
    }
}

#[derive(Clone, Copy)]
pub struct Rule {
    pub field: &'static str,
    pub message: &'static str,
    /// Absent values are checked as "" instead of being skipped
    pub required: bool,
    check: fn(&str) -> bool,
}

impl Rule {
    pub fn new(field: &'static str, message: &'static str, check: fn(&str) -> bool) -> Self {
        Self {
            field,
            message,
            required: false,
            check,
        }
    }

    pub fn required_if(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    fn violated_by(&self, value: Option<&str>) -> bool {
        match value {
            Some(v) => !(self.check)(v),
            None if self.required => !(self.check)(""),
            None => false,
        }
    }
}

/// Run every rule against `body`, collecting all violations
pub fn validate<F: Fields + ?Sized>(rules: &[Rule], body: &F) -> Result<(), Vec<Violation>> {
    let violations: Vec<Violation> = rules
        .iter()
        .filter(|rule| rule.violated_by(body.field(rule.field)))
        .map(|rule| Violation {
            field: rule.field.to_string(),
            message: rule.message.to_string(),
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// The user rule set, keyed by operation.
///
/// Registration requires Name, Password and Email. Updates only check the
/// fields that are present unless `strict_update` asks for the registration
/// rules on every update.
pub fn user_rules(operation: Operation, strict_update: bool) -> Vec<Rule> {
    let required = operation == Operation::Create || strict_update;

    vec![
        Rule::new("Name", "Name must be at least 5 characters long", |v| {
            v.chars().count() >= 5
        })
        .required_if(required),
        Rule::new(
            "Name",
            "Name contains non alphanumeric characters - not allowed.",
            is_alphanumeric,
        )
        .required_if(required),
        Rule::new("Password", "Password is required", |v| !v.is_empty()).required_if(required),
        Rule::new("Email", "Email does not appear to be valid", is_email).required_if(required),
        Rule::new("Birthday", "Birthday must be a date in YYYY-MM-DD format", |v| {
            parse_date(v).is_some()
        }),
    ]
}

/// Validate a user body for `operation`; an update must change something
pub fn check_user_body<F: Fields + ?Sized>(
    body: &F,
    operation: Operation,
    strict_update: bool,
) -> Result<(), Vec<Violation>> {
    if operation == Operation::Update && USER_FIELDS.iter().all(|f| body.field(f).is_none()) {
        return Err(vec![Violation {
            field: "body".to_string(),
            message: "At least one of Name, Password, Email or Birthday is required".to_string(),
        }]);
    }

    validate(&user_rules(operation, strict_update), body)
}

pub fn is_alphanumeric(value: &str) -> bool {
    static ALNUM_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = ALNUM_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("Failed to compile alphanumeric regex"));

    regex.is_match(value)
}

pub fn is_email(value: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    regex.is_match(value)
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn body(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn messages(result: Result<(), Vec<Violation>>) -> Vec<String> {
        result.unwrap_err().into_iter().map(|v| v.message).collect()
    }

    #[test]
    fn accepts_a_valid_registration() {
        let b = body(json!({"Name": "johnd1", "Password": "Secr3t!", "Email": "john@x.com"}));
        assert!(check_user_body(&b, Operation::Create, false).is_ok());
    }

    #[test]
    fn lists_exactly_the_violated_rules() {
        let b = body(json!({"Name": "johnd1", "Email": "not-an-email"}));
        let violations = check_user_body(&b, Operation::Create, false).unwrap_err();

        assert_eq!(
            violations,
            vec![
                Violation {
                    field: "Password".to_string(),
                    message: "Password is required".to_string(),
                },
                Violation {
                    field: "Email".to_string(),
                    message: "Email does not appear to be valid".to_string(),
                },
            ]
        );
    }

    #[test]
    fn missing_name_fails_both_name_rules_in_order() {
        let b = body(json!({"Password": "pw", "Email": "a@b.co"}));
        assert_eq!(
            messages(check_user_body(&b, Operation::Create, false)),
            vec![
                "Name must be at least 5 characters long",
                "Name contains non alphanumeric characters - not allowed.",
            ]
        );
    }

    #[test]
    fn short_and_symbolic_names_are_rejected() {
        let b = body(json!({"Name": "jo!", "Password": "pw", "Email": "a@b.co"}));
        assert_eq!(check_user_body(&b, Operation::Create, false).unwrap_err().len(), 2);
    }

    #[test]
    fn update_checks_only_present_fields() {
        let b = body(json!({"Email": "new@x.com"}));
        assert!(check_user_body(&b, Operation::Update, false).is_ok());

        let b = body(json!({"Email": "nope"}));
        assert_eq!(
            messages(check_user_body(&b, Operation::Update, false)),
            vec!["Email does not appear to be valid"]
        );
    }

    #[test]
    fn strict_update_applies_registration_rules() {
        let b = body(json!({"Email": "new@x.com"}));
        let violations = check_user_body(&b, Operation::Update, true).unwrap_err();
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["Name", "Name", "Password"]);
    }

    #[test]
    fn empty_update_is_rejected() {
        let b = body(json!({"Unrelated": true}));
        let violations = check_user_body(&b, Operation::Update, false).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "body");
    }

    #[test]
    fn birthday_is_optional_but_must_be_a_date() {
        let b = body(json!({"Name": "johnd1", "Password": "pw", "Email": "a@b.co", "Birthday": "1990-13-01"}));
        assert_eq!(
            messages(check_user_body(&b, Operation::Create, false)),
            vec!["Birthday must be a date in YYYY-MM-DD format"]
        );
        assert_eq!(parse_date("1990-04-02"), NaiveDate::from_ymd_opt(1990, 4, 2));
    }

    #[test]
    fn email_syntax() {
        assert!(is_email("john@x.com"));
        assert!(is_email("test.user+tag@domain.co.uk"));
        assert!(!is_email("john@x"));
        assert!(!is_email("@x.com"));
        assert!(!is_email(""));
    }
}
