// Seed files: bootstrap a Profile from a profile document and a resume document
use crate::model::{Profile, SeedError};
use crate::source::Fetcher;
use crate::utils::four_digit_years;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileSeed {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub links: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResumeSeed {
    pub experience: Vec<ExperienceEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub start: serde_json::Value,
}

impl ExperienceEntry {
    /// The start date as text; numbers such as `2015` are accepted too.
    pub fn start_text(&self) -> String {
        match &self.start {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Builds a Profile from the seed documents as of `current_year`.
pub fn derive_profile(seed: &ProfileSeed, resume: &ResumeSeed, current_year: i32) -> Profile {
    let full_name = seed.name.split_whitespace().collect::<Vec<_>>().join(" ");
    let (first_name, last_name) = match full_name.split_once(' ') {
        Some((first, rest)) => (first.to_string(), rest.to_string()),
        None => (full_name.clone(), String::new()),
    };

    let mut linkedin = String::new();
    let mut github = String::new();
    let mut website = String::new();
    for link in seed.links.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        let lower = link.to_lowercase();
        let slot = if lower.contains("linkedin.com") {
            &mut linkedin
        } else if lower.contains("github.com") {
            &mut github
        } else {
            &mut website
        };
        if slot.is_empty() {
            *slot = link.to_string();
        }
    }

    let years_experience = resume
        .experience
        .iter()
        .flat_map(|entry| four_digit_years(&entry.start_text()))
        .min()
        .map(|earliest| (current_year - earliest).max(0).to_string())
        .unwrap_or_default();

    Profile {
        full_name,
        first_name,
        last_name,
        email: seed.email.trim().to_string(),
        phone: seed.phone.trim().to_string(),
        location: seed.location.trim().to_string(),
        linkedin,
        github,
        website,
        years_experience,
    }
}

/// Fetches and parses both seed documents, then derives the Profile.
pub async fn load_profile(
    fetcher: &dyn Fetcher,
    profile_location: &str,
    resume_location: &str,
    current_year: i32,
) -> Result<Profile, SeedError> {
    let (profile_raw, resume_raw) = futures::join!(
        fetcher.fetch(profile_location),
        fetcher.fetch(resume_location)
    );

    let seed: ProfileSeed = serde_json::from_str(&profile_raw?).inspect_err(|e| {
        warn!("❌ Bad profile seed {}: {}", profile_location, e);
    })?;
    let resume: ResumeSeed = serde_json::from_str(&resume_raw?).inspect_err(|e| {
        warn!("❌ Bad resume seed {}: {}", resume_location, e);
    })?;

    let profile = derive_profile(&seed, &resume, current_year);
    info!(
        "🌱 Seed profile for '{}' ({} years)",
        profile.full_name, profile.years_experience
    );
    Ok(profile)
}
