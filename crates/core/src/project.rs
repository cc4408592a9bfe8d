//! Project write payload, status values and field validation.
//!
//! Callers submit a [`ProjectInput`]. Only the fields declared on that
//! struct are read from the request body; anything else (including the
//! system-managed `id`, `createdAt` and `updatedAt`) is dropped during
//! deserialization. The input is then turned into a [`NewProject`] or a
//! [`ProjectChanges`], which are the only shapes the storage layer accepts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::ValidateUrl;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Upper bound on `name`, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Upper bound on `description`, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    InProgress,
    Completed,
    OnHold,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Planning,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
        ProjectStatus::OnHold,
    ];

    /// The wire and column representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::InProgress => "in-progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::OnHold => "on-hold",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "status must be one of: {}",
                    allowed_statuses()
                ))
            })
    }
}

impl TryFrom<String> for ProjectStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

fn allowed_statuses() -> String {
    ProjectStatus::ALL
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Caller-supplied project fields, for both create and update.
///
/// Every field is optional at this stage; requiredness is decided by
/// [`ProjectInput::into_new_project`] and [`ProjectInput::into_changes`].
/// `status` stays a raw string so an unknown value produces a field-level
/// validation error rather than a body-parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub status: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub repository: Option<String>,
    pub live_url: Option<String>,
}

/// A validated project ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub status: ProjectStatus,
    /// Defaults to the creation time when `None`.
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub repository: Option<String>,
    pub live_url: Option<String>,
}

/// A validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub repository: Option<String>,
    pub live_url: Option<String>,
}

impl ProjectInput {
    /// Validate a creation payload.
    ///
    /// `name` and `description` are required and must be non-empty after
    /// trimming. All violations are reported together.
    pub fn into_new_project(self) -> Result<NewProject, CoreError> {
        let mut errors = Vec::new();

        let name = required_text("name", self.name, MAX_NAME_LEN, &mut errors);
        let description = required_text(
            "description",
            self.description,
            MAX_DESCRIPTION_LEN,
            &mut errors,
        );
        let status = optional_status(self.status.as_deref(), &mut errors);
        let repository = optional_url("repository", self.repository, &mut errors);
        let live_url = optional_url("liveUrl", self.live_url, &mut errors);
        check_date_order(self.start_date, self.end_date, &mut errors);

        if !errors.is_empty() {
            return Err(CoreError::Validation(errors.join("; ")));
        }

        Ok(NewProject {
            name: name.unwrap_or_default(),
            description: description.unwrap_or_default(),
            technologies: clean_technologies(self.technologies.unwrap_or_default()),
            status: status.unwrap_or_default(),
            start_date: self.start_date,
            end_date: self.end_date,
            repository,
            live_url,
        })
    }

    /// Validate an update payload.
    ///
    /// Absent fields are left alone, but a field that is present must
    /// satisfy the same rules it would on create.
    pub fn into_changes(self) -> Result<ProjectChanges, CoreError> {
        let mut errors = Vec::new();

        let name = self
            .name
            .and_then(|v| required_text("name", Some(v), MAX_NAME_LEN, &mut errors));
        let description = self.description.and_then(|v| {
            required_text("description", Some(v), MAX_DESCRIPTION_LEN, &mut errors)
        });
        let status = optional_status(self.status.as_deref(), &mut errors);
        let repository = optional_url("repository", self.repository, &mut errors);
        let live_url = optional_url("liveUrl", self.live_url, &mut errors);
        check_date_order(self.start_date, self.end_date, &mut errors);

        if !errors.is_empty() {
            return Err(CoreError::Validation(errors.join("; ")));
        }

        Ok(ProjectChanges {
            name,
            description,
            technologies: self.technologies.map(clean_technologies),
            status,
            start_date: self.start_date,
            end_date: self.end_date,
            repository,
            live_url,
        })
    }
}

fn required_text(
    field: &str,
    value: Option<String>,
    max_len: usize,
    errors: &mut Vec<String>,
) -> Option<String> {
    let trimmed = value.as_deref().map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        errors.push(format!("{field} is required"));
        return None;
    }
    if trimmed.chars().count() > max_len {
        errors.push(format!("{field} must be at most {max_len} characters"));
        return None;
    }
    Some(trimmed.to_string())
}

fn optional_status(value: Option<&str>, errors: &mut Vec<String>) -> Option<ProjectStatus> {
    match value.map(ProjectStatus::from_str) {
        Some(Ok(status)) => Some(status),
        Some(Err(e)) => {
            if let CoreError::Validation(msg) = e {
                errors.push(msg);
            }
            None
        }
        None => None,
    }
}

fn optional_url(field: &str, value: Option<String>, errors: &mut Vec<String>) -> Option<String> {
    let url = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())?;
    if !url.validate_url() {
        errors.push(format!("{field} must be a valid URL"));
        return None;
    }
    Some(url)
}

fn check_date_order(start: Option<Timestamp>, end: Option<Timestamp>, errors: &mut Vec<String>) {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            errors.push("endDate must not be before startDate".to_string());
        }
    }
}

/// Trim entries and drop blanks, preserving order.
fn clean_technologies(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
