use crate::grid::Grid;
use serde::{Deserialize, Serialize};

pub const PERMANENT_MEMBERS: usize = 2;
pub const MIN_MEMBERS: usize = 2;

#[derive(Debug, Clone, Serialize)]
pub struct MemberRoster {
    names: Vec<String>,
}

impl Default for MemberRoster {
    fn default() -> Self {
        Self::new()
    }
}

impl MemberRoster {
    pub fn new() -> Self {
        Self {
            names: vec![String::new(); PERMANENT_MEMBERS],
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn add(&mut self) {
        self.names.push(String::new());
    }

    pub fn set(&mut self, index: usize, name: String) -> bool {
        match self.names.get_mut(index) {
            Some(slot) => {
                *slot = name;
                true
            }
            None => false,
        }
    }

    // The first two slots can be edited but never removed.
    pub fn remove(&mut self, index: usize) -> Result<(), RosterError> {
        if index < PERMANENT_MEMBERS {
            return Err(RosterError::Permanent);
        }
        if index >= self.names.len() {
            return Err(RosterError::NoSuchMember);
        }
        self.names.remove(index);
        Ok(())
    }

    pub fn filled_count(&self) -> usize {
        self.names
            .iter()
            .filter(|name| !name.trim().is_empty())
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterError {
    Permanent,
    NoSuchMember,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormFields {
    #[serde(default)]
    pub band_name: String,
    #[serde(default)]
    pub performance_time: String,
    #[serde(default)]
    pub bandmaster: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionPayload {
    pub band_name: String,
    pub performance_time: String,
    pub bandmaster: String,
    pub members: Vec<String>,
    pub time_selections: Grid,
}

pub fn validate(
    fields: &FormFields,
    roster: &MemberRoster,
    grid: &Grid,
) -> Result<SubmissionPayload, Vec<String>> {
    let mut errors = Vec::new();

    if fields.band_name.trim().is_empty() {
        errors.push("Please enter a band name.".to_string());
    }
    if fields.performance_time.trim().is_empty() {
        errors.push("Please select a performance time.".to_string());
    }
    if fields.bandmaster.trim().is_empty() {
        errors.push("Please enter the band leader's name.".to_string());
    }
    if roster.filled_count() < MIN_MEMBERS {
        errors.push("Please enter at least two band members.".to_string());
    }
    if !grid.any_marked() {
        errors.push("Please mark at least one available time slot.".to_string());
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(SubmissionPayload {
        band_name: fields.band_name.trim().to_string(),
        performance_time: fields.performance_time.trim().to_string(),
        bandmaster: fields.bandmaster.trim().to_string(),
        members: roster
            .names()
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
        time_selections: grid.clone(),
    })
}
