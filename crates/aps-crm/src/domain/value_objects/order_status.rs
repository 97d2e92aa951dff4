//! OrderStatus - Donation order state in the fundraising plugin

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Status of a `wp_frmaster_order` row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Approved,
    Rejected,
    OnlinePaid,
    Offline,
    Other(String),
}

impl OrderStatus {
    /// Romanian label shown in the CRM
    pub fn label(&self) -> String {
        match self {
            OrderStatus::Pending => "În așteptare".to_string(),
            OrderStatus::Approved => "Aprobat".to_string(),
            OrderStatus::Rejected => "Respins".to_string(),
            OrderStatus::OnlinePaid => "Plătit online".to_string(),
            OrderStatus::Offline => "Plată offline".to_string(),
            OrderStatus::Other(raw) => raw.clone(),
        }
    }

    /// Statuses an operator may set manually
    pub fn parse_settable(s: &str) -> Result<Self, String> {
        match s.parse::<OrderStatus>() {
            Ok(status @ (OrderStatus::Pending | OrderStatus::Approved | OrderStatus::Rejected)) => {
                Ok(status)
            }
            _ => Err(format!(
                "Invalid status: {} (allowed: pending, approved, rejected)",
                s
            )),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Approved => write!(f, "approved"),
            OrderStatus::Rejected => write!(f, "rejected"),
            OrderStatus::OnlinePaid => write!(f, "online-paid"),
            OrderStatus::Offline => write!(f, "offline"),
            OrderStatus::Other(raw) => write!(f, "{}", raw),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "pending" => OrderStatus::Pending,
            "approved" => OrderStatus::Approved,
            "rejected" => OrderStatus::Rejected,
            "online-paid" => OrderStatus::OnlinePaid,
            "offline" => OrderStatus::Offline,
            _ => OrderStatus::Other(s.to_string()),
        })
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(OrderStatus::OnlinePaid.label(), "Plătit online");
        assert_eq!(OrderStatus::Other("cancel".into()).label(), "cancel");
    }

    #[test]
    fn test_only_manual_statuses_are_settable() {
        assert_eq!(
            OrderStatus::parse_settable("Approved").unwrap(),
            OrderStatus::Approved
        );
        assert!(OrderStatus::parse_settable("online-paid").is_err());
        assert!(OrderStatus::parse_settable("whatever").is_err());
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status: OrderStatus = "wait-for-approval".parse().unwrap();
        assert_eq!(status.to_string(), "wait-for-approval");
    }
}
