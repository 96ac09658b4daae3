//! Participant metadata collected after both testing phases.

use crate::error::{ProfileField, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $key:literal, $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stable lowercase key, as written to reports and config.
            pub fn key(&self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            /// Human readable label.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.key().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        let keys: Vec<&str> = $name::ALL.iter().map(|v| v.key()).collect();
                        format!("expected one of: {}", keys.join(", "))
                    })
            }
        }
    };
}

choice_enum!(Gender {
    Male => "male", "Male",
    Female => "female", "Female",
    Other => "other", "Other",
});

choice_enum!(
    /// Highest completed level of education.
    Education {
        Hsc => "hsc", "Higher Secondary (HSC)",
        Graduation => "graduation", "Graduate",
        Masters => "masters", "Postgraduate",
        Phd => "phd", "PhD",
    }
);

choice_enum!(SocioeconomicLevel {
    Low => "low", "Low",
    Middle => "middle", "Middle",
    High => "high", "High",
});

/// Unvalidated intake form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantDraft {
    pub name: String,
    pub age: String,
    pub gender: Option<Gender>,
    pub education: Option<Education>,
    pub socioeconomic: Option<SocioeconomicLevel>,
}

impl ParticipantDraft {
    /// Checks that every required field is present. Format and range are not checked.
    pub fn validate(&self) -> Result<ParticipantProfile, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField(ProfileField::Name));
        }
        let age = self.age.trim();
        if age.is_empty() {
            return Err(ValidationError::MissingField(ProfileField::Age));
        }
        let gender = self
            .gender
            .ok_or(ValidationError::MissingField(ProfileField::Gender))?;
        let education = self
            .education
            .ok_or(ValidationError::MissingField(ProfileField::Education))?;

        Ok(ParticipantProfile {
            name: name.to_string(),
            age: age.to_string(),
            gender,
            education,
            socioeconomic: self.socioeconomic,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantProfile {
    pub name: String,
    pub age: String,
    pub gender: Gender,
    pub education: Education,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socioeconomic: Option<SocioeconomicLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> ParticipantDraft {
        ParticipantDraft {
            name: "  Ada Lovelace ".into(),
            age: "36".into(),
            gender: Some(Gender::Female),
            education: Some(Education::Masters),
            socioeconomic: None,
        }
    }

    #[test]
    fn complete_draft_validates_and_trims() {
        let profile = complete_draft().validate().unwrap();
        assert_eq!(profile.name, "Ada Lovelace");
        assert_eq!(profile.age, "36");
        assert_eq!(profile.socioeconomic, None);
    }

    #[test]
    fn each_required_field_is_checked() {
        let mut draft = complete_draft();
        draft.name = "   ".into();
        assert_eq!(
            draft.validate(),
            Err(ValidationError::MissingField(ProfileField::Name))
        );

        let mut draft = complete_draft();
        draft.age.clear();
        assert_eq!(
            draft.validate(),
            Err(ValidationError::MissingField(ProfileField::Age))
        );

        let mut draft = complete_draft();
        draft.gender = None;
        assert_eq!(
            draft.validate(),
            Err(ValidationError::MissingField(ProfileField::Gender))
        );

        let mut draft = complete_draft();
        draft.education = None;
        assert_eq!(
            draft.validate(),
            Err(ValidationError::MissingField(ProfileField::Education))
        );
    }

    #[test]
    fn choices_parse_from_keys() {
        assert_eq!("Female".parse::<Gender>(), Ok(Gender::Female));
        assert_eq!("phd".parse::<Education>(), Ok(Education::Phd));
        assert_eq!(" middle ".parse::<SocioeconomicLevel>(), Ok(SocioeconomicLevel::Middle));
        assert!("robot".parse::<Gender>().unwrap_err().contains("male, female, other"));
    }

    #[test]
    fn profile_serializes_lowercase_keys() {
        let profile = complete_draft().validate().unwrap();
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"gender\":\"female\""));
        assert!(json.contains("\"education\":\"masters\""));
        assert!(!json.contains("socioeconomic"));
    }
}
