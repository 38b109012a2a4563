//! Form validation and sanitization
//!
//! Each form is described by a static table of [`FieldRule`]s. [`evaluate`]
//! runs every rule in declaration order against the submitted fields and
//! returns a [`Submission`] holding the sanitized values, the typed values
//! ready to build a draft, and the accumulated field errors.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;
use utoipa::ToSchema;
use validator::ValidateLength;

use crate::models::FieldValue;

/// Raw form fields as submitted
pub type RawFields = HashMap<String, String>;

static ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Za-z]+$").expect("valid alphanumeric regex"));

/// Whether a field must carry a value
#[derive(Debug, Clone, Copy)]
pub enum Presence {
    /// Empty values fail with the given message
    Required(&'static str),
    /// Empty values are accepted as absent and skip all checks
    Optional,
}

/// How a valid value is typed once it passed its checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Text,
    Date,
    Int,
}

#[derive(Debug, Clone, Copy)]
pub enum Predicate {
    /// Length in characters, bounds inclusive
    Length { min: u64, max: u64 },
    Alphanumeric,
    IsoDate,
    Integer,
    OneOf(&'static [&'static str]),
}

impl Predicate {
    fn holds(&self, value: &str) -> bool {
        match self {
            Predicate::Length { min, max } => value.validate_length(Some(*min), Some(*max), None),
            Predicate::Alphanumeric => ALPHANUMERIC.is_match(value),
            Predicate::IsoDate => parse_iso_date(value).is_some(),
            Predicate::Integer => value.parse::<i32>().is_ok(),
            Predicate::OneOf(allowed) => allowed.contains(&value),
        }
    }
}

/// One predicate and the message reported when it fails
#[derive(Debug, Clone, Copy)]
pub struct Check {
    pub predicate: Predicate,
    pub message: &'static str,
}

/// Declarative rule for one form field
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub presence: Presence,
    pub checks: &'static [Check],
    /// HTML-encode the value for safe echoing and storage
    pub escape: bool,
    pub kind: Kind,
}

/// Error attached to one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Outcome of running a rule table against a submission
#[derive(Debug, Clone, Default)]
pub struct Submission {
    values: IndexMap<&'static str, String>,
    typed: IndexMap<&'static str, FieldValue>,
    errors: Vec<FieldError>,
}

impl Submission {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Sanitized input, keyed by field in rule order
    pub fn values(&self) -> &IndexMap<&'static str, String> {
        &self.values
    }

    /// Typed text value; empty when the field was absent
    pub fn text(&self, field: &str) -> String {
        match self.typed.get(field) {
            Some(FieldValue::Text(value)) => value.clone(),
            _ => String::new(),
        }
    }

    pub fn date(&self, field: &str) -> Option<NaiveDate> {
        match self.typed.get(field) {
            Some(FieldValue::Date(value)) => *value,
            _ => None,
        }
    }

    pub fn int(&self, field: &str) -> Option<i32> {
        match self.typed.get(field) {
            Some(FieldValue::Int(value)) => Some(*value),
            _ => None,
        }
    }
}

/// Run all rules in order; every field is evaluated and every failing check
/// contributes its own message.
pub fn evaluate(rules: &[FieldRule], raw: &RawFields) -> Submission {
    let mut submission = Submission::default();

    for rule in rules {
        let value = normalize(raw.get(rule.field).map(String::as_str).unwrap_or_default());
        let mut failed = false;

        if value.is_empty() {
            match rule.presence {
                Presence::Optional => {
                    submission.values.insert(rule.field, value);
                    if rule.kind == Kind::Date {
                        submission.typed.insert(rule.field, FieldValue::Date(None));
                    }
                    continue;
                }
                Presence::Required(message) => {
                    failed = true;
                    submission.errors.push(FieldError {
                        field: rule.field.to_string(),
                        message: message.to_string(),
                    });
                }
            }
        }

        let stored = if rule.escape { escape(&value) } else { value.clone() };

        for check in rule.checks {
            // Length bounds apply to what is stored, after escaping
            let subject = match check.predicate {
                Predicate::Length { .. } => &stored,
                _ => &value,
            };
            if !check.predicate.holds(subject) {
                failed = true;
                submission.errors.push(FieldError {
                    field: rule.field.to_string(),
                    message: check.message.to_string(),
                });
            }
        }

        let value = stored;

        if !failed {
            let typed = match rule.kind {
                Kind::Text => Some(FieldValue::Text(value.clone())),
                Kind::Date => parse_iso_date(&value).map(|date| FieldValue::Date(Some(date))),
                Kind::Int => value.parse::<i32>().ok().map(FieldValue::Int),
            };
            if let Some(typed) = typed {
                submission.typed.insert(rule.field, typed);
            }
        }

        submission.values.insert(rule.field, value);
    }

    submission
}

/// Trim surrounding whitespace and apply Unicode NFC
pub fn normalize(value: &str) -> String {
    value.trim().nfc().collect()
}

/// HTML-encode characters unsafe to echo back into a page
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            '\\' => escaped.push_str("&#x5C;"),
            '`' => escaped.push_str("&#96;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Parse an ISO-8601 date or timestamp, keeping the calendar date
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()
        .map(|datetime| datetime.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME_RULES: &[FieldRule] = &[
        FieldRule {
            field: "first_name",
            presence: Presence::Required("First name must be specified."),
            checks: &[Check {
                predicate: Predicate::Alphanumeric,
                message: "First name has non-alphanumeric characters.",
            }],
            escape: true,
            kind: Kind::Text,
        },
        FieldRule {
            field: "born",
            presence: Presence::Optional,
            checks: &[Check {
                predicate: Predicate::IsoDate,
                message: "Invalid date of birth",
            }],
            escape: false,
            kind: Kind::Date,
        },
    ];

    fn fields(pairs: &[(&str, &str)]) -> RawFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn messages(submission: &Submission) -> Vec<&str> {
        submission.errors().iter().map(|e| e.message.as_str()).collect()
    }

    #[test]
    fn test_valid_submission_is_typed() {
        let submission = evaluate(NAME_RULES, &fields(&[("first_name", "  Jane "), ("born", "1775-12-16")]));
        assert!(submission.is_valid());
        assert_eq!(submission.text("first_name"), "Jane");
        assert_eq!(submission.date("born"), NaiveDate::from_ymd_opt(1775, 12, 16));
    }

    #[test]
    fn test_whitespace_only_required_field() {
        let submission = evaluate(NAME_RULES, &fields(&[("first_name", "   ")]));
        assert!(!submission.is_valid());
        // Both checks report: messages accumulate within a field
        assert_eq!(
            messages(&submission),
            vec![
                "First name must be specified.",
                "First name has non-alphanumeric characters."
            ]
        );
    }

    #[test]
    fn test_missing_field_counts_as_empty() {
        let submission = evaluate(NAME_RULES, &RawFields::new());
        assert_eq!(submission.errors()[0].field, "first_name");
        assert_eq!(submission.values()["first_name"], "");
    }

    #[test]
    fn test_non_alphanumeric_is_echoed_escaped() {
        let submission = evaluate(NAME_RULES, &fields(&[("first_name", "Jo<b>")]));
        assert_eq!(messages(&submission), vec!["First name has non-alphanumeric characters."]);
        assert_eq!(submission.values()["first_name"], "Jo&lt;b&gt;");
        assert_eq!(submission.text("first_name"), "");
    }

    #[test]
    fn test_empty_optional_date_is_absent() {
        let submission = evaluate(NAME_RULES, &fields(&[("first_name", "Jane"), ("born", "")]));
        assert!(submission.is_valid());
        assert_eq!(submission.date("born"), None);
    }

    #[test]
    fn test_malformed_date_keeps_raw_input() {
        let submission = evaluate(NAME_RULES, &fields(&[("first_name", "Jane"), ("born", "16/12/1775")]));
        assert_eq!(messages(&submission), vec!["Invalid date of birth"]);
        assert_eq!(submission.values()["born"], "16/12/1775");
    }

    #[test]
    fn test_errors_follow_rule_order() {
        let submission = evaluate(NAME_RULES, &fields(&[("first_name", "Jo-hn"), ("born", "soon")]));
        let fields: Vec<&str> = submission.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["first_name", "born"]);
    }

    #[test]
    fn test_length_counts_escaped_characters() {
        const TITLE_RULES: &[FieldRule] = &[FieldRule {
            field: "title",
            presence: Presence::Required("Title must be specified."),
            checks: &[Check {
                predicate: Predicate::Length { min: 3, max: 10 },
                message: "Title must contain between 3 and 10 characters.",
            }],
            escape: true,
            kind: Kind::Text,
        }];

        let fits = evaluate(TITLE_RULES, &fields(&[("title", "Tom & Ann")]));
        assert!(!fits.is_valid());
        assert_eq!(messages(&fits), vec!["Title must contain between 3 and 10 characters."]);

        let plain = evaluate(TITLE_RULES, &fields(&[("title", "Tom and A")]));
        assert!(plain.is_valid());
        assert_eq!(plain.text("title"), "Tom and A");
    }

    #[test]
    fn test_predicates() {
        assert!(Predicate::Length { min: 3, max: 5 }.holds("abc"));
        assert!(!Predicate::Length { min: 3, max: 5 }.holds("ab"));
        assert!(!Predicate::Length { min: 3, max: 5 }.holds("abcdef"));
        assert!(Predicate::Integer.holds("42"));
        assert!(!Predicate::Integer.holds("4x"));
        assert!(Predicate::OneOf(&["Loaned"]).holds("Loaned"));
        assert!(!Predicate::Alphanumeric.holds("Émile"));
    }

    #[test]
    fn test_parse_iso_date() {
        let expected = NaiveDate::from_ymd_opt(2020, 3, 1);
        assert_eq!(parse_iso_date("2020-03-01"), expected);
        assert_eq!(parse_iso_date("2020-03-01T10:30:00"), expected);
        assert_eq!(parse_iso_date("2020-03-01T10:30:00+02:00"), expected);
        assert_eq!(parse_iso_date("2020-02-30"), None);
        assert_eq!(parse_iso_date("yesterday"), None);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;&#x2F;a&gt;");
    }

    #[test]
    fn test_normalize_composes() {
        assert_eq!(normalize(" e\u{301} "), "\u{e9}");
    }
}
