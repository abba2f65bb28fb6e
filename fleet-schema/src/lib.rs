//! Declarative input validation for the fleet access layer.
//!
//! Import wizards and form handlers feed raw JSON rows through a
//! [`Schema`]: an ordered list of field rules, each of which first
//! coerces the raw value to its target type (string→number, string→date)
//! and only then applies range/format checks. Failures come back as a
//! structured list of field+message pairs, never as the first error only.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde_json::{json, Value};
use validator::ValidateEmail;

use fleet_core::{ActionError, RecordValue};

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Target type of a field, decided before any semantic check runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Flag,
}

/// A single declarative field rule.
///
/// `min`/`max` bound the numeric value for `Number` fields and the
/// character length for `Text` fields; they are ignored for dates and
/// flags.
#[derive(Debug, Clone)]
pub struct FieldRule {
    name: String,
    kind: FieldKind,
    required: bool,
    min: Option<f64>,
    max: Option<f64>,
    email: bool,
}

impl FieldRule {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            min: None,
            max: None,
            email: false,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Flag)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn email(mut self) -> Self {
        self.email = true;
        self
    }

    /// Coercion step. Returns the typed value or a coercion failure;
    /// semantic checks only ever see a successfully coerced value.
    fn coerce(&self, raw: &Value) -> Result<RecordValue, FieldError> {
        match self.kind {
            FieldKind::Text => match raw {
                Value::String(s) => Ok(RecordValue::Text(s.clone())),
                _ => Err(FieldError::new(&self.name, "must be text")),
            },
            FieldKind::Number => match raw {
                Value::Number(n) => n
                    .as_f64()
                    .map(RecordValue::Number)
                    .ok_or_else(|| FieldError::new(&self.name, "must be a number")),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(RecordValue::Number)
                    .map_err(|_| FieldError::new(&self.name, "must be a number")),
                _ => Err(FieldError::new(&self.name, "must be a number")),
            },
            FieldKind::Date => match raw {
                Value::String(s) => parse_date(s)
                    .map(RecordValue::Timestamp)
                    .ok_or_else(|| FieldError::new(&self.name, "must be a date")),
                _ => Err(FieldError::new(&self.name, "must be a date")),
            },
            FieldKind::Flag => match raw {
                Value::Bool(b) => Ok(RecordValue::Bool(*b)),
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" | "yes" | "1" => Ok(RecordValue::Bool(true)),
                    "false" | "no" | "0" => Ok(RecordValue::Bool(false)),
                    _ => Err(FieldError::new(&self.name, "must be a yes/no value")),
                },
                _ => Err(FieldError::new(&self.name, "must be a yes/no value")),
            },
        }
    }

    /// Range/format checks, applied to an already-coerced value.
    fn check(&self, value: &RecordValue, out: &mut Vec<FieldError>) {
        match value {
            RecordValue::Number(n) => {
                if let Some(min) = self.min {
                    if *n < min {
                        out.push(FieldError::new(&self.name, format!("must be at least {min}")));
                    }
                }
                if let Some(max) = self.max {
                    if *n > max {
                        out.push(FieldError::new(&self.name, format!("must be at most {max}")));
                    }
                }
            }
            RecordValue::Text(s) => {
                let len = s.chars().count() as f64;
                if let Some(min) = self.min {
                    if len < min {
                        out.push(FieldError::new(
                            &self.name,
                            format!("must be at least {min} characters"),
                        ));
                    }
                }
                if let Some(max) = self.max {
                    if len > max {
                        out.push(FieldError::new(
                            &self.name,
                            format!("must be at most {max} characters"),
                        ));
                    }
                }
                if self.email && !s.validate_email() {
                    out.push(FieldError::new(&self.name, "must be a valid email"));
                }
            }
            _ => {}
        }
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // plain calendar dates, as CSV exports deliver them
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)))
}

/// An ordered set of field rules over one input row.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    rules: Vec<FieldRule>,
}

impl Schema {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Validate one input row.
    ///
    /// Per field: missing/null is only an error when the field is
    /// required; otherwise coercion runs first, and range/format checks
    /// run only on a coerced value. All failures are collected.
    pub fn validate(&self, input: &Value) -> Result<BTreeMap<String, RecordValue>, Vec<FieldError>> {
        let mut out = BTreeMap::new();
        let mut errors = Vec::new();

        for rule in &self.rules {
            let raw = input.get(&rule.name).filter(|v| !v.is_null());
            let Some(raw) = raw else {
                if rule.required {
                    errors.push(FieldError::new(&rule.name, "is required"));
                }
                continue;
            };

            match rule.coerce(raw) {
                Ok(value) => {
                    rule.check(&value, &mut errors);
                    out.insert(rule.name.clone(), value);
                }
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() {
            Ok(out)
        } else {
            Err(errors)
        }
    }
}

/// Turn a failure list into the `VALIDATION` action error consumed by
/// the result protocol, grouping messages per field.
pub fn into_action_error(errors: Vec<FieldError>) -> ActionError {
    let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for e in errors {
        fields.entry(e.field).or_default().push(e.message);
    }
    ActionError::validation("Validation failed").with_fields(json!(fields))
}
