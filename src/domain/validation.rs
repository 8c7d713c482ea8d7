//! Field-level validation for inbound submissions.
//!
//! A [`Validator`] walks every field of a submission and collects all
//! violations instead of stopping at the first one, so a client can fix a
//! form in a single round trip.

use crate::error::PulseError;
use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email pattern")
});

/// Longest address accepted, per RFC 5321.
const MAX_EMAIL_LEN: usize = 254;

/// A closed set of string values a categorical field may take.
pub trait Choice: Copy + 'static {
    const VARIANTS: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|c| c.as_str() == value)
    }

    fn expected() -> String {
        Self::VARIANTS
            .iter()
            .map(Self::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether any error was reported against `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the trimmed length of a free-text field and returns the trimmed value.
    pub fn text(&mut self, field: &'static str, value: &str, bounds: RangeInclusive<usize>) -> String {
        let trimmed = value.trim();
        let len = trimmed.chars().count();
        if len == 0 {
            self.errors.push(field, "is required");
        } else if len < *bounds.start() {
            self.errors
                .push(field, format!("must be at least {} characters", bounds.start()));
        } else if len > *bounds.end() {
            self.errors
                .push(field, format!("must be at most {} characters", bounds.end()));
        }
        trimmed.to_string()
    }

    pub fn email(&mut self, field: &'static str, value: &str) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.errors.push(field, "is required");
        } else if trimmed.len() > MAX_EMAIL_LEN || !EMAIL_SHAPE.is_match(trimmed) {
            self.errors.push(field, "must be a valid email address");
        }
        trimmed.to_string()
    }

    pub fn choice<C: Choice>(&mut self, field: &'static str, value: &str) -> Option<C> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.errors.push(field, "is required");
            return None;
        }
        let parsed = C::parse(trimmed);
        if parsed.is_none() {
            self.errors
                .push(field, format!("must be one of: {}", C::expected()));
        }
        parsed
    }

    /// Validates a set of tags: known values only, no repeats, count within `bounds`.
    pub fn tags<C: Choice>(
        &mut self,
        field: &'static str,
        values: &[String],
        bounds: RangeInclusive<usize>,
    ) -> Vec<C> {
        if values.len() < *bounds.start() {
            self.errors
                .push(field, format!("select at least {}", bounds.start()));
        } else if values.len() > *bounds.end() {
            self.errors
                .push(field, format!("select at most {}", bounds.end()));
        }

        let mut seen = HashSet::new();
        let mut tags = Vec::with_capacity(values.len());
        for value in values {
            let value = value.trim();
            match C::parse(value) {
                Some(tag) if seen.insert(tag.as_str()) => tags.push(tag),
                Some(_) => self.errors.push(field, format!("duplicate value '{value}'")),
                None => self.errors.push(
                    field,
                    format!("unknown value '{value}', expected one of: {}", C::expected()),
                ),
            }
        }
        tags
    }

    /// Parses an ISO `YYYY-MM-DD` calendar date.
    pub fn date(&mut self, field: &'static str, value: &str) -> Option<NaiveDate> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.errors.push(field, "is required");
            return None;
        }
        let parsed = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok();
        if parsed.is_none() {
            self.errors.push(field, "must be a date formatted as YYYY-MM-DD");
        }
        parsed
    }

    pub fn fail(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(field, message);
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_error(self) -> PulseError {
        PulseError::ValidationError(self.errors)
    }
}
