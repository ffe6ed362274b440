use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account roles known to the checksheet panel.
///
/// The first four are admin-level: they see every department and may use the
/// mutating endpoints. The rest are staff-level and are confined to the
/// department stored on their account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Admin,
    Manager,
    Supervisor,
    Engineer,
    Sheif,
    AstSheif,
    Leader,
    Worker,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::Admin,
        Role::Manager,
        Role::Supervisor,
        Role::Engineer,
        Role::Sheif,
        Role::AstSheif,
        Role::Leader,
        Role::Worker,
    ];

    /// Wire and storage spelling of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Supervisor => "supervisor",
            Role::Engineer => "engineer",
            Role::Sheif => "sheif",
            Role::AstSheif => "ast-sheif",
            Role::Leader => "leader",
            Role::Worker => "worker",
        }
    }

    pub fn is_admin_level(&self) -> bool {
        matches!(
            self,
            Role::Admin | Role::Manager | Role::Supervisor | Role::Engineer
        )
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored or submitted role string is not one of [`Role::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_level_set_is_fixed() {
        let admins: Vec<_> = Role::ALL.iter().filter(|r| r.is_admin_level()).collect();
        assert_eq!(
            admins,
            vec![&Role::Admin, &Role::Manager, &Role::Supervisor, &Role::Engineer]
        );
    }

    #[test]
    fn parses_its_own_spelling() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn serde_uses_kebab_case() {
        assert_eq!(serde_json::to_string(&Role::AstSheif).unwrap(), "\"ast-sheif\"");
        let role: Role = serde_json::from_str("\"worker\"").unwrap();
        assert_eq!(role, Role::Worker);
    }
}
