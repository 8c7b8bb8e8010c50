// Core structs: Profile, commands, status messages and error types
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::oneshot;

/// Autofill data. Every attribute defaults to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub website: String,
    pub years_experience: String,
}

impl Profile {
    /// Trims every attribute, as the popup form does before saving.
    pub fn trimmed(&self) -> Profile {
        Profile {
            full_name: self.full_name.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            location: self.location.trim().to_string(),
            linkedin: self.linkedin.trim().to_string(),
            github: self.github.trim().to_string(),
            website: self.website.trim().to_string(),
            years_experience: self.years_experience.trim().to_string(),
        }
    }

    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::FullName => &self.full_name,
            ProfileField::FirstName => &self.first_name,
            ProfileField::LastName => &self.last_name,
            ProfileField::Email => &self.email,
            ProfileField::Phone => &self.phone,
            ProfileField::Location => &self.location,
            ProfileField::Linkedin => &self.linkedin,
            ProfileField::Github => &self.github,
            ProfileField::Website => &self.website,
            ProfileField::YearsExperience => &self.years_experience,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    FullName,
    FirstName,
    LastName,
    Email,
    Phone,
    Location,
    Linkedin,
    Github,
    Website,
    YearsExperience,
}

/// Commands delivered from the popup to the content script of a tab.
#[derive(Debug)]
pub enum ContentCommand {
    RunAutofill {
        reply: oneshot::Sender<AutofillResponse>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutofillResponse {
    pub ok: bool,
    pub filled_count: usize,
}

/// Line shown in the popup's status area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: false }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: true }
    }
}

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
    #[error("No element matches {0}")]
    TargetNotFound(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Unexpected status {0}")]
    InvalidResponse(u16),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Seed fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("Seed parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SeedError {
    /// Fetch and parse failures are reported to the user the same way.
    pub fn user_message(&self) -> &'static str {
        "Could not load profile data."
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("Corrupt setting value: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Invalid profile JSON: {0}")]
    BadProfile(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("No listener on the target tab")]
    Unreachable,
    #[error("Listener dropped the reply")]
    NoResponse,
}
