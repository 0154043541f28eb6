use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column holding the password hash in every role table.
pub const PASSWORD_FIELD: &str = "password";

/// Table holding every registered id, whatever the role. Each role table's
/// id column references it, so an id is taken at most once platform-wide.
pub const IDENTITY_ID_TABLE: &str = "identity_ids";

/// Name of the unique constraint guarding [`IDENTITY_ID_TABLE`].
pub const IDENTITY_ID_CONSTRAINT: &str = "identity_ids_pkey";

/// Static storage layout of a role's identity table.
///
/// `required_fields` and `optional_fields` are disjoint, and the id and email
/// columns are always part of `insertable_fields`.
#[derive(Debug, PartialEq, Eq)]
pub struct RoleDescriptor {
    pub role_name: &'static str,
    pub table_name: &'static str,
    pub id_field: &'static str,
    pub email_field: &'static str,
    pub password_field: &'static str,
    pub required_fields: &'static [&'static str],
    pub optional_fields: &'static [&'static str],
    pub insertable_fields: &'static [&'static str],
}

impl RoleDescriptor {
    pub fn is_required(&self, field: &str) -> bool {
        self.required_fields.contains(&field)
    }

    pub fn is_insertable(&self, field: &str) -> bool {
        self.insertable_fields.contains(&field)
    }
}

const STUDENT: RoleDescriptor = RoleDescriptor {
    role_name: "student",
    table_name: "students",
    id_field: "student_id",
    email_field: "student_email",
    password_field: PASSWORD_FIELD,
    required_fields: &["student_id", "student_email", PASSWORD_FIELD, "full_name"],
    optional_fields: &["phone", "major", "academic_year"],
    insertable_fields: &[
        "student_id",
        "student_email",
        PASSWORD_FIELD,
        "full_name",
        "phone",
        "major",
        "academic_year",
    ],
};

const PROFESSOR: RoleDescriptor = RoleDescriptor {
    role_name: "professor",
    table_name: "professors",
    id_field: "professor_id",
    email_field: "professor_email",
    password_field: PASSWORD_FIELD,
    required_fields: &[
        "professor_id",
        "professor_email",
        PASSWORD_FIELD,
        "full_name",
        "department",
    ],
    optional_fields: &["phone", "office"],
    insertable_fields: &[
        "professor_id",
        "professor_email",
        PASSWORD_FIELD,
        "full_name",
        "department",
        "phone",
        "office",
    ],
};

const STUDENT_AFFAIRS: RoleDescriptor = RoleDescriptor {
    role_name: "student_affairs",
    table_name: "student_affairs_officers",
    id_field: "officer_id",
    email_field: "officer_email",
    password_field: PASSWORD_FIELD,
    required_fields: &["officer_id", "officer_email", PASSWORD_FIELD, "full_name"],
    optional_fields: &["phone", "office"],
    insertable_fields: &[
        "officer_id",
        "officer_email",
        PASSWORD_FIELD,
        "full_name",
        "phone",
        "office",
    ],
};

const ADMIN: RoleDescriptor = RoleDescriptor {
    role_name: "admin",
    table_name: "administrators",
    id_field: "admin_id",
    email_field: "admin_email",
    password_field: PASSWORD_FIELD,
    required_fields: &["admin_id", "admin_email", PASSWORD_FIELD, "full_name"],
    optional_fields: &["phone"],
    insertable_fields: &["admin_id", "admin_email", PASSWORD_FIELD, "full_name", "phone"],
};

/// The fixed set of identity categories on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Professor,
    StudentAffairs,
    Admin,
}

impl Role {
    /// Every role, in the order tables are scanned.
    pub const ALL: [Role; 4] = [
        Role::Student,
        Role::Professor,
        Role::StudentAffairs,
        Role::Admin,
    ];

    pub fn descriptor(self) -> &'static RoleDescriptor {
        match self {
            Role::Student => &STUDENT,
            Role::Professor => &PROFESSOR,
            Role::StudentAffairs => &STUDENT_AFFAIRS,
            Role::Admin => &ADMIN,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.descriptor().role_name
    }

    /// The role whose identities live in `table`.
    pub fn for_table(table: &str) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|role| role.descriptor().table_name == table)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleError {
    #[error("Invalid role: {0}")]
    InvalidRole(String),
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "professor" => Ok(Role::Professor),
            "student_affairs" | "student-affairs" => Ok(Role::StudentAffairs),
            "admin" => Ok(Role::Admin),
            _ => Err(RoleError::InvalidRole(s.to_owned())),
        }
    }
}

/// Resolve a role name to its descriptor.
pub fn describe(role_name: &str) -> Result<&'static RoleDescriptor, RoleError> {
    role_name.parse::<Role>().map(Role::descriptor)
}
