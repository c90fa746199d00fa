//! Declarative per-field validation.
//!
//! Each form field carries a static rule list. Values are trimmed before the
//! rules run, every failing rule of every field is collected, and nothing here
//! ever touches the network.

use std::fmt;

use serde::Serialize;

/// A single constraint on a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The trimmed value must not be empty.
    Required,
    /// At least this many characters (Unicode scalar values).
    MinChars(usize),
    /// At most this many characters (Unicode scalar values).
    MaxChars(usize),
    /// A rough e-mail shape: something on both sides of a single `@`.
    Email,
    /// A base-10 integer.
    Numeric,
}

impl Rule {
    fn message(self) -> String {
        match self {
            Self::Required => "is required".to_string(),
            Self::MinChars(n) => format!("must be at least {n} characters"),
            Self::MaxChars(n) => format!("must be at most {n} characters"),
            Self::Email => "must be a valid e-mail address".to_string(),
            Self::Numeric => "must be a number".to_string(),
        }
    }

    fn accepts(self, value: &str) -> bool {
        match self {
            Self::Required => !value.is_empty(),
            Self::MinChars(n) => value.chars().count() >= n,
            Self::MaxChars(n) => value.chars().count() <= n,
            Self::Email => value
                .split_once('@')
                .is_some_and(|(user, host)| !user.is_empty() && !host.is_empty() && !host.contains('@')),
            Self::Numeric => value.parse::<i64>().is_ok(),
        }
    }
}

/// Static description of one form field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rules: &'static [Rule],
}

impl FieldSpec {
    pub const fn new(name: &'static str, rules: &'static [Rule]) -> Self {
        Self { name, rules }
    }

    /// Check `value` against this field's rules, recording failures in
    /// `errors`, and return the trimmed value.
    ///
    /// An empty optional field (no `Required` rule) skips the remaining rules.
    pub fn check(&self, value: &str, errors: &mut FieldErrors) -> String {
        let trimmed = value.trim();
        let required = self.rules.contains(&Rule::Required);
        if trimmed.is_empty() && !required {
            return String::new();
        }

        for rule in self.rules {
            if !rule.accepts(trimmed) {
                errors.push(self.name, rule.message());
                if matches!(rule, Rule::Required) {
                    break;
                }
            }
        }
        trimmed.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Every field error found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Messages recorded for one field.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |error| error.field == field)
            .map(|error| error.message.as_str())
    }

    /// `Ok(value)` when nothing was recorded, otherwise the collected errors.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}
