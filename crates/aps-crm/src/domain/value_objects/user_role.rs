//! UserRole / UserStatus / LoginPlatform - CRM account classification

use serde::{Deserialize, Serialize};

/// CRM user role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    Volunteer,
    #[default]
    User,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "ADMIN"),
            UserRole::Volunteer => write!(f, "VOLUNTEER"),
            UserRole::User => write!(f, "USER"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ADMIN" => Ok(UserRole::Admin),
            "VOLUNTEER" => Ok(UserRole::Volunteer),
            "USER" => Ok(UserRole::User),
            _ => Err(format!("Unknown user role: {}", s)),
        }
    }
}

/// Account lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    Active,
    #[default]
    Pending,
    Inactive,
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "ACTIVE"),
            UserStatus::Pending => write!(f, "PENDING"),
            UserStatus::Inactive => write!(f, "INACTIVE"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(UserStatus::Active),
            "PENDING" => Ok(UserStatus::Pending),
            "INACTIVE" => Ok(UserStatus::Inactive),
            _ => Err("Invalid status".to_string()),
        }
    }
}

/// Client platform announced at login
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoginPlatform {
    Mobile,
    #[default]
    Web,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_display() {
        for role in [UserRole::Admin, UserRole::Volunteer, UserRole::User] {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), role);
        }
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("active".parse::<UserStatus>().unwrap(), UserStatus::Active);
        assert_eq!(" Inactive ".parse::<UserStatus>().unwrap(), UserStatus::Inactive);
        assert_eq!(
            "BANNED".parse::<UserStatus>().unwrap_err(),
            "Invalid status"
        );
    }

    #[test]
    fn test_platform_deserializes_uppercase() {
        let p: LoginPlatform = serde_json::from_str("\"MOBILE\"").unwrap();
        assert_eq!(p, LoginPlatform::Mobile);
    }
}
