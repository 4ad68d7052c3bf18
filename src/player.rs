use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_AGE: u8 = 1;
pub const MAX_AGE: u8 = 120;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("player name must not be empty")]
    EmptyName,
    #[error("age must be between 1 and 120, got {0}")]
    AgeOutOfRange(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default)]
    pub gender: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "Perú".to_string()
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: None,
            gender: String::new(),
            country: default_country(),
        }
    }
}

impl PlayerProfile {
    pub fn set_name(&mut self, name: &str) -> Result<(), ProfileError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        self.name = trimmed.to_string();
        Ok(())
    }

    pub fn set_age(&mut self, age: i64) -> Result<(), ProfileError> {
        match u8::try_from(age) {
            Ok(age) if (MIN_AGE..=MAX_AGE).contains(&age) => {
                self.age = Some(age);
                Ok(())
            }
            _ => Err(ProfileError::AgeOutOfRange(age)),
        }
    }

    /// Onboarding is finished once the player has a name and an age.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && self.age.is_some()
    }
}

/// Edits submitted from the profile form. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    /// A blank country resets it to the default.
    pub country: Option<String>,
}

impl PlayerProfile {
    /// Applies every field of the update or none of them.
    pub fn apply(&mut self, update: ProfileUpdate) -> Result<(), ProfileError> {
        let mut next = self.clone();
        if let Some(name) = update.name.as_deref() {
            next.set_name(name)?;
        }
        if let Some(age) = update.age {
            next.set_age(age)?;
        }
        if let Some(gender) = update.gender {
            next.gender = gender.trim().to_string();
        }
        if let Some(country) = update.country {
            let country = country.trim();
            next.country = if country.is_empty() {
                default_country()
            } else {
                country.to_string()
            };
        }
        *self = next;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default = "default_coins")]
    pub coins: u32,
    #[serde(default = "default_seeds")]
    pub seeds: u32,
    #[serde(default = "default_happiness")]
    pub happiness: u32,
}

fn default_coins() -> u32 {
    100
}

fn default_seeds() -> u32 {
    5
}

fn default_happiness() -> u32 {
    100
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            coins: default_coins(),
            seeds: default_seeds(),
            happiness: default_happiness(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed_and_required() {
        let mut profile = PlayerProfile::default();
        assert_eq!(profile.set_name("   "), Err(ProfileError::EmptyName));
        profile.set_name("  Rosa ").unwrap();
        assert_eq!(profile.name, "Rosa");
    }

    #[test]
    fn age_bounds() {
        let mut profile = PlayerProfile::default();
        assert_eq!(profile.set_age(0), Err(ProfileError::AgeOutOfRange(0)));
        assert_eq!(profile.set_age(121), Err(ProfileError::AgeOutOfRange(121)));
        assert_eq!(profile.set_age(-3), Err(ProfileError::AgeOutOfRange(-3)));
        profile.set_age(120).unwrap();
        assert_eq!(profile.age, Some(120));
    }

    #[test]
    fn failed_update_changes_nothing() {
        let mut profile = PlayerProfile::default();
        profile.set_name("Rosa").unwrap();
        let update = ProfileUpdate {
            name: Some("Lucho".into()),
            age: Some(400),
            ..ProfileUpdate::default()
        };
        assert!(profile.apply(update).is_err());
        assert_eq!(profile.name, "Rosa");
        assert!(!profile.is_complete());
    }

    #[test]
    fn blank_country_falls_back_to_default() {
        let mut profile = PlayerProfile::default();
        profile
            .apply(ProfileUpdate {
                country: Some(" Chile ".into()),
                ..ProfileUpdate::default()
            })
            .unwrap();
        assert_eq!(profile.country, "Chile");
        profile
            .apply(ProfileUpdate {
                country: Some("  ".into()),
                ..ProfileUpdate::default()
            })
            .unwrap();
        assert_eq!(profile.country, "Perú");
    }
}
