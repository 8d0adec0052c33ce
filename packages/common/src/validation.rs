use std::fmt;

use serde::Serialize;

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Stable field key, e.g. `markingGuide` or `members[1].email`.
    pub field: String,
    pub message: String,
}

/// Field errors collected while validating a draft, in the order the fields
/// were checked. Only the first failure per field is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    entries: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure unless the field already has one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        if self.get(&field).is_none() {
            self.entries.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    /// Record the outcome of a validator for `field`.
    pub fn check(&mut self, field: impl Into<String>, outcome: Result<(), String>) {
        if let Err(message) = outcome {
            self.insert(field, message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.entries.iter()
    }

    /// `Ok(())` when nothing failed.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

/// Length in characters after trimming surrounding whitespace.
pub fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}

pub fn required(value: &str, label: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{label} is required"));
    }
    Ok(())
}

/// Length check for a value that may also be blank (blank passes).
pub fn length_between(value: &str, label: &str, min: usize, max: usize) -> Result<(), String> {
    let len = char_len(value);
    if len == 0 {
        return Ok(());
    }
    if len < min {
        return Err(format!("{label} must be at least {min} characters"));
    }
    if len > max {
        return Err(format!("{label} cannot exceed {max} characters"));
    }
    Ok(())
}

pub fn max_length(value: &str, label: &str, max: usize) -> Result<(), String> {
    if char_len(value) > max {
        return Err(format!("{label} cannot exceed {max} characters"));
    }
    Ok(())
}

/// Required text within `min..=max` characters.
pub fn required_length(value: &str, label: &str, min: usize, max: usize) -> Result<(), String> {
    required(value, label)?;
    length_between(value, label, min, max)
}

/// Required integer within `min..=max`.
pub fn int_range(value: Option<i64>, label: &str, min: i64, max: i64) -> Result<(), String> {
    let Some(value) = value else {
        return Err(format!("{label} is required"));
    };
    if value < min {
        return Err(format!("{label} must be at least {min}"));
    }
    if value > max {
        return Err(format!("{label} cannot exceed {max}"));
    }
    Ok(())
}

/// Required finite number within `min..=max`.
pub fn float_range(value: Option<f64>, label: &str, min: f64, max: f64) -> Result<(), String> {
    let Some(value) = value else {
        return Err(format!("{label} is required"));
    };
    if !value.is_finite() {
        return Err(format!("{label} must be a number"));
    }
    if value < min {
        return Err(format!("{label} must be at least {min:.1}"));
    }
    if value > max {
        return Err(format!("{label} cannot exceed {max:.1}"));
    }
    Ok(())
}

/// Exactly eight ASCII digits (`^\d{8}$`).
pub fn is_student_number(value: &str) -> bool {
    value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit())
}

/// Address shape `^[^\s@]+@[^\s@]+\.[^\s@]+$`.
pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let last = domain.len().saturating_sub(1);
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < last)
}
