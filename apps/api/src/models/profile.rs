use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NOT_SPECIFIED: &str = "Not specified";
pub const DEFAULT_EMPLOYMENT_TYPE: &str = "Full-time";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Seeker,
    Employer,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Seeker => "seeker",
            Mode::Employer => "employer",
        }
    }

    /// The mode whose profiles this mode swipes through.
    pub fn counterpart(&self) -> Mode {
        match self {
            Mode::Seeker => Mode::Employer,
            Mode::Employer => Mode::Seeker,
        }
    }

    pub fn parse(raw: &str) -> Option<Mode> {
        match raw {
            "seeker" => Some(Mode::Seeker),
            "employer" => Some(Mode::Employer),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeekerDetails {
    pub bio: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployerDetails {
    pub description: String,
    pub requirements: Vec<String>,
    pub salary: String,
    #[serde(rename = "type")]
    pub employment_type: String,
}

/// Mode-specific part of a profile. Also the output shape of text extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ProfileDetails {
    Seeker(SeekerDetails),
    Employer(EmployerDetails),
}

impl ProfileDetails {
    pub fn mode(&self) -> Mode {
        match self {
            ProfileDetails::Seeker(_) => Mode::Seeker,
            ProfileDetails::Employer(_) => Mode::Employer,
        }
    }
}

/// A user's seeker or employer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Option<String>,
    pub owner_id: Option<String>,
    pub name: String,
    pub title: String,
    pub location: String,
    /// Avatar for seekers, logo for employers.
    pub image: Option<String>,
    #[serde(flatten)]
    pub details: ProfileDetails,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn mode(&self) -> Mode {
        self.details.mode()
    }

    pub fn into_row(self) -> ProfileRow {
        let mode = self.mode();
        let mut row = ProfileRow {
            id: self.id,
            user_id: self.owner_id,
            mode: mode.as_str().to_string(),
            name: Some(self.name),
            title: Some(self.title),
            location: Some(self.location),
            created_at: self.created_at,
            updated_at: self.updated_at,
            ..ProfileRow::default()
        };
        match self.details {
            ProfileDetails::Seeker(d) => {
                row.avatar = self.image;
                row.bio = Some(d.bio);
                row.skills = Some(d.skills);
                row.experience = Some(d.experience);
                row.education = Some(d.education);
            }
            ProfileDetails::Employer(d) => {
                row.logo = self.image;
                row.description = Some(d.description);
                row.requirements = Some(d.requirements);
                row.salary = Some(d.salary);
                row.employment_type = Some(d.employment_type);
            }
        }
        row
    }
}

/// Flat `profiles` row as stored by the remote row store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub mode: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Error, PartialEq)]
pub enum RowShapeError {
    #[error("unknown profile mode '{0}'")]
    UnknownMode(String),

    #[error("profile row is missing required field '{0}'")]
    MissingField(&'static str),
}

impl TryFrom<ProfileRow> for Profile {
    type Error = RowShapeError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let mode = Mode::parse(&row.mode).ok_or_else(|| RowShapeError::UnknownMode(row.mode.clone()))?;
        let name = required(row.name, "name")?;
        let title = required(row.title, "title")?;
        let location = required(row.location, "location")?;

        let (image, details) = match mode {
            Mode::Seeker => (
                row.avatar,
                ProfileDetails::Seeker(SeekerDetails {
                    bio: row.bio.unwrap_or_default(),
                    skills: row.skills.unwrap_or_default(),
                    experience: row.experience.unwrap_or_else(|| NOT_SPECIFIED.to_string()),
                    education: row.education.unwrap_or_else(|| NOT_SPECIFIED.to_string()),
                }),
            ),
            Mode::Employer => (
                row.logo,
                ProfileDetails::Employer(EmployerDetails {
                    description: row.description.unwrap_or_default(),
                    requirements: row.requirements.unwrap_or_default(),
                    salary: row.salary.unwrap_or_else(|| NOT_SPECIFIED.to_string()),
                    employment_type: row
                        .employment_type
                        .unwrap_or_else(|| DEFAULT_EMPLOYMENT_TYPE.to_string()),
                }),
            ),
        };

        Ok(Profile {
            id: row.id,
            owner_id: row.user_id,
            name,
            title,
            location,
            image,
            details,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, RowShapeError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(RowShapeError::MissingField(field))
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_mode_serde_is_snake_case() {
        assert_eq!(serde_json::to_string(&Mode::Seeker).unwrap(), r#""seeker""#);
        let mode: Mode = serde_json::from_str(r#""employer""#).unwrap();
        assert_eq!(mode, Mode::Employer);
    }

    #[test]
    fn test_counterpart_swaps_modes() {
        assert_eq!(Mode::Seeker.counterpart(), Mode::Employer);
        assert_eq!(Mode::Employer.counterpart(), Mode::Seeker);
    }

    #[test]
    fn test_seeker_row_puts_image_in_avatar() {
        let row = seeker_profile().into_row();
        assert_eq!(row.mode, "seeker");
        assert_eq!(row.avatar.as_deref(), Some("https://img.example/jane.png"));
        assert!(row.logo.is_none());
        assert!(row.requirements.is_none());
    }

    #[test]
    fn test_employer_row_serializes_type_field() {
        let row = employer_profile().into_row();
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["type"], "Contract");
        assert_eq!(json["logo"], "https://img.example/acme.png");
        assert!(json.get("id").is_none());
        assert!(json.get("bio").is_none());
    }

    #[test]
    fn test_row_back_to_profile_preserves_fields() {
        let original = employer_profile();
        let profile = Profile::try_from(original.clone().into_row()).unwrap();
        assert_eq!(profile, original);
    }

    #[test]
    fn test_row_with_unknown_mode_is_rejected() {
        let row = ProfileRow {
            mode: "recruiter".to_string(),
            name: Some("x".to_string()),
            title: Some("y".to_string()),
            location: Some("z".to_string()),
            ..ProfileRow::default()
        };
        assert_eq!(
            Profile::try_from(row).unwrap_err(),
            RowShapeError::UnknownMode("recruiter".to_string())
        );
    }

    #[test]
    fn test_row_missing_title_is_rejected() {
        let row = ProfileRow {
            mode: "seeker".to_string(),
            name: Some("Jane".to_string()),
            title: Some("  ".to_string()),
            location: Some("NYC".to_string()),
            ..ProfileRow::default()
        };
        assert_eq!(
            Profile::try_from(row).unwrap_err(),
            RowShapeError::MissingField("title")
        );
    }

    #[test]
    fn test_sparse_employer_row_gets_defaults() {
        let json = r#"{
            "id": "p-1",
            "user_id": "u-1",
            "mode": "employer",
            "name": "DataCorp",
            "title": "Backend Developer",
            "location": "New York, NY",
            "created_at": "2026-10-01T12:00:00Z"
        }"#;
        let row: ProfileRow = serde_json::from_str(json).unwrap();
        let profile = Profile::try_from(row).unwrap();
        match profile.details {
            ProfileDetails::Employer(d) => {
                assert_eq!(d.salary, NOT_SPECIFIED);
                assert_eq!(d.employment_type, DEFAULT_EMPLOYMENT_TYPE);
                assert!(d.requirements.is_empty());
            }
            other => panic!("expected employer details, got {other:?}"),
        }
        assert_eq!(profile.owner_id.as_deref(), Some("u-1"));
    }

    #[test]
    fn test_profile_json_is_tagged_by_mode() {
        let json = serde_json::to_value(seeker_profile()).unwrap();
        assert_eq!(json["mode"], "seeker");
        assert_eq!(json["skills"][0], "React");
        let back: Profile = serde_json::from_value(json).unwrap();
        assert_eq!(back.mode(), Mode::Seeker);
    }
}
