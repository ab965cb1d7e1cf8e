//! Adjuster pool entries

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::AdjusterId;

/// The line of business an adjuster is qualified for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpecializationArea {
    Auto,
    Home,
    Health,
}

impl SpecializationArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecializationArea::Auto => "AUTO",
            SpecializationArea::Home => "HOME",
            SpecializationArea::Health => "HEALTH",
        }
    }
}

impl fmt::Display for SpecializationArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SpecializationArea {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AUTO" => Ok(SpecializationArea::Auto),
            "HOME" => Ok(SpecializationArea::Home),
            "HEALTH" => Ok(SpecializationArea::Health),
            other => Err(format!("Unknown specialization area: {other}")),
        }
    }
}

/// Employment relationship of an adjuster
///
/// Assignment only ever considers EXTERNAL adjusters; internal staff are
/// listed in the same directory but never picked by this system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentType {
    Internal,
    External,
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::Internal => "INTERNAL",
            EmploymentType::External => "EXTERNAL",
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An adjuster as the employee directory reports them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjuster {
    /// Unique identifier
    pub id: AdjusterId,
    /// Legal first name
    pub first_name: String,
    /// Legal last name
    pub last_name: String,
    /// Line of business the adjuster handles
    pub specialization: SpecializationArea,
    /// Employment relationship
    pub employment: EmploymentType,
}

impl Adjuster {
    /// Returns the full name in "First Last" format
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specialization_parse_is_lenient() {
        assert_eq!(" home ".parse::<SpecializationArea>().unwrap(), SpecializationArea::Home);
        assert_eq!("AUTO".parse::<SpecializationArea>().unwrap(), SpecializationArea::Auto);
        assert!("BOAT".parse::<SpecializationArea>().is_err());
    }

    #[test]
    fn test_wire_values_are_uppercase() {
        let json = serde_json::to_string(&SpecializationArea::Health).unwrap();
        assert_eq!(json, "\"HEALTH\"");
        let json = serde_json::to_string(&EmploymentType::External).unwrap();
        assert_eq!(json, "\"EXTERNAL\"");
    }
}
