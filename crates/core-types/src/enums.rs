use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of work a customer has ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Cut,
    Sew,
    Embroider,
    Repair,
    Other,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Cut => "cut",
            ServiceType::Sew => "sew",
            ServiceType::Embroider => "embroider",
            ServiceType::Repair => "repair",
            ServiceType::Other => "other",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cut" => Ok(ServiceType::Cut),
            "sew" => Ok(ServiceType::Sew),
            "embroider" => Ok(ServiceType::Embroider),
            "repair" => Ok(ServiceType::Repair),
            "other" => Ok(ServiceType::Other),
            _ => Err(CoreError::InvalidInput(
                "service_type".to_string(),
                s.to_string(),
            )),
        }
    }
}

/// The workflow stage of an order.
///
/// The workflow is linear in spirit (not started, in progress, completed)
/// but no transition ordering is enforced; any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::NotStarted => "not_started",
            ProcessingStatus::InProgress => "in_progress",
            ProcessingStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(ProcessingStatus::NotStarted),
            "in_progress" => Ok(ProcessingStatus::InProgress),
            "completed" => Ok(ProcessingStatus::Completed),
            _ => Err(CoreError::InvalidInput(
                "processing_status".to_string(),
                s.to_string(),
            )),
        }
    }
}

/// The bucketing granularity of an income report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Daily,
    Monthly,
    Yearly,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Period::Daily => "daily",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
        };
        f.write_str(s)
    }
}

impl FromStr for Period {
    type Err = CoreError;

    /// An unrecognized period string is a validation error, never coerced
    /// into a default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Period::Daily),
            "monthly" => Ok(Period::Monthly),
            "yearly" => Ok(Period::Yearly),
            _ => Err(CoreError::InvalidPeriod(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_status_round_trips_through_str() {
        for status in [
            ProcessingStatus::NotStarted,
            ProcessingStatus::InProgress,
            ProcessingStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<ProcessingStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_period_is_rejected() {
        let err = "weekly".parse::<Period>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidPeriod(ref s) if s == "weekly"));
    }

    #[test]
    fn period_parses_all_known_values() {
        assert_eq!("daily".parse::<Period>().unwrap(), Period::Daily);
        assert_eq!("monthly".parse::<Period>().unwrap(), Period::Monthly);
        assert_eq!("yearly".parse::<Period>().unwrap(), Period::Yearly);
    }

    #[test]
    fn service_type_serializes_as_snake_case() {
        let json = serde_json::to_string(&ServiceType::Embroider).unwrap();
        assert_eq!(json, "\"embroider\"");
    }
}
