use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Roles known to the dashboard. Only a subset matters to letter access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Hr,
    Finance,
    ProjectManager,
    Staff,
}

impl Role {
    /// Roles allowed to change letter workflow fields.
    pub const MANAGERS: [Role; 4] = [Role::Hr, Role::SuperAdmin, Role::Finance, Role::ProjectManager];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Hr => "hr",
            Role::Finance => "finance",
            Role::ProjectManager => "project_manager",
            Role::Staff => "staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Role::SuperAdmin),
            "hr" => Ok(Role::Hr),
            "finance" => Ok(Role::Finance),
            "project_manager" => Ok(Role::ProjectManager),
            "staff" => Ok(Role::Staff),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

/// The authenticated actor performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub roles: HashSet<Role>,
}

impl Principal {
    pub fn new(id: Uuid, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            id,
            roles: roles.into_iter().collect(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.roles.contains(role))
    }
}
