//! User identity domain models.

use serde::{Deserialize, Serialize};

/// The role a portal account carries.
///
/// The role decides which dashboard and operations a signed-in user sees;
/// the client treats it as an opaque tag beyond routing decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Lecturer,
    HeadOfDepartment,
    Bursary,
    Admin,
}

impl Role {
    /// Whether this role carries student-only attributes
    /// (matriculation number, academic level).
    pub fn is_student(&self) -> bool {
        matches!(self, Role::Student)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Student => "student",
            Role::Lecturer => "lecturer",
            Role::HeadOfDepartment => "head_of_department",
            Role::Bursary => "bursary",
            Role::Admin => "admin",
        };
        write!(f, "{}", name)
    }
}

/// The identity record of a portal account, as returned by the remote API.
///
/// Role-specific attributes are optional: students carry a matriculation
/// number and possibly a level, staff carry a staff identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique account identifier, assigned by the server.
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    /// Student-only matriculation identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matric_number: Option<String>,
    /// Staff-only identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Academic level (e.g. "200"), student-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl User {
    /// The user's full display name.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
