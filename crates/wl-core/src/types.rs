//! Validated work-item types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The issue key is not of the form `PROJECT-123`.
    #[error("invalid issue key: {value}")]
    InvalidIssueKey { value: String },
}

const MAX_PROJECT_LEN: usize = 10;
const MAX_NUMBER_LEN: usize = 10;

/// A validated tracker issue key such as `ABC-123`.
///
/// The project part is 1-10 ASCII letters, the number part 1-10 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IssueKey(String);

impl IssueKey {
    /// Creates a new key after validation.
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ValidationError::Empty { field: "issue key" });
        }

        let valid = key.split_once('-').is_some_and(|(project, number)| {
            (1..=MAX_PROJECT_LEN).contains(&project.len())
                && project.chars().all(|c| c.is_ascii_alphabetic())
                && (1..=MAX_NUMBER_LEN).contains(&number.len())
                && number.chars().all(|c| c.is_ascii_digit())
        });
        if !valid {
            return Err(ValidationError::InvalidIssueKey { value: key });
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for IssueKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IssueKey> for String {
    fn from(key: IssueKey) -> Self {
        key.0
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for IssueKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A unit of work time is split across.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub key: IssueKey,
    pub comment: Option<String>,
}

impl WorkItem {
    pub fn new(key: IssueKey, comment: Option<String>) -> Self {
        // Blank comments are dropped so they never reach the tracker.
        let comment = comment.filter(|c| !c.trim().is_empty());
        Self { key, comment }
    }

    /// `KEY comment` or just `KEY`.
    pub fn label(&self) -> String {
        match &self.comment {
            Some(comment) => format!("{} {comment}", self.key),
            None => self.key.to_string(),
        }
    }
}

/// The ordered, non-empty set of work items for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItems(Vec<WorkItem>);

impl WorkItems {
    pub fn new(items: Vec<WorkItem>) -> Result<Self, ValidationError> {
        if items.is_empty() {
            return Err(ValidationError::Empty {
                field: "work items",
            });
        }
        Ok(Self(items))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub const fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WorkItem> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a WorkItems {
    type Item = &'a WorkItem;
    type IntoIter = std::slice::Iter<'a, WorkItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
