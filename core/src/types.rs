//! Domain DTOs for the student API.
//!
//! # Design
//! These types mirror the backend's JSON schema but are defined independently
//! from the mock-server crate. Integration tests catch any schema drift between
//! the two. A record only becomes a `Student` once the backend has assigned it
//! an id; until then it travels as a `NewStudent`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Server-assigned student identifier. Opaque to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub u64);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of `MALE`, `FEMALE`, `OTHER`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gender: {0:?}")]
pub struct UnknownGender(pub String);

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| UnknownGender(s.to_string()))
    }
}

/// A persisted student record returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub gender: Gender,
}

impl Student {
    /// The editable part of the record, without the id.
    pub fn fields(&self) -> NewStudent {
        NewStudent {
            name: self.name.clone(),
            email: self.email.clone(),
            gender: self.gender,
        }
    }
}

/// Request payload for creating a student. The backend assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub gender: Gender,
}

impl NewStudent {
    pub fn with_id(self, id: StudentId) -> Student {
        Student {
            id,
            name: self.name,
            email: self.email,
            gender: self.gender,
        }
    }
}

/// Error body produced by the backend for rejected requests.
///
/// Extra attributes such as `timestamp` or `path` are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerError {
    #[serde(default)]
    pub message: String,
    pub status: u16,
    #[serde(default)]
    pub error: String,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] [{}]", self.message, self.status, self.error)
    }
}

/// The resolved "about project" resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InfoResource {
    pub url: String,
    pub description: String,
}
