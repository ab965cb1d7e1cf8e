//! Locked tasks and their variable bags
//!
//! A task arrives from the external queue with a bag of named process
//! variables. Workers read their inputs through the typed lookups here and
//! hand their outputs back as another bag, which the queue merges into the
//! process state on completion.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A variable lookup that could not produce the requested value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariableError {
    #[error("Required task variable '{0}' is missing")]
    Missing(String),

    #[error("Task variable '{name}' has the wrong type: expected {expected}")]
    WrongType { name: String, expected: &'static str },
}

impl VariableError {
    fn missing(name: &str) -> Self {
        VariableError::Missing(name.to_string())
    }

    fn wrong_type(name: &str, expected: &'static str) -> Self {
        VariableError::WrongType {
            name: name.to_string(),
            expected,
        }
    }
}

/// A bag of named process variables
///
/// JSON-shaped because that is what the queue speaks. A variable that is
/// present but `null` counts as absent: the engine sends `null` for process
/// variables that were never set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableMap {
    values: serde_json::Map<String, Value>,
}

impl VariableMap {
    /// Creates an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Builder-style insert of a decimal amount
    ///
    /// Amounts are written as strings so no precision is lost in transit;
    /// [`Self::require_decimal`] reads them back.
    pub fn with_decimal(self, name: impl Into<String>, amount: Decimal) -> Self {
        self.with(name, amount.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the variables in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Raw value access, `None` for absent or `null` variables
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|value| !value.is_null())
    }

    fn lookup(&self, name: &str) -> Result<&Value, VariableError> {
        self.get(name).ok_or_else(|| VariableError::missing(name))
    }

    /// A required string variable
    pub fn require_str(&self, name: &str) -> Result<&str, VariableError> {
        self.lookup(name)?
            .as_str()
            .ok_or_else(|| VariableError::wrong_type(name, "string"))
    }

    /// A required integer variable
    pub fn require_i64(&self, name: &str) -> Result<i64, VariableError> {
        self.lookup(name)?
            .as_i64()
            .ok_or_else(|| VariableError::wrong_type(name, "integer"))
    }

    /// A required decimal amount
    ///
    /// Amounts travel as JSON numbers or as strings; both parse here, so
    /// senders can pick the representation that preserves their precision.
    pub fn require_decimal(&self, name: &str) -> Result<Decimal, VariableError> {
        match self.lookup(name)? {
            Value::Number(number) => Decimal::from_str(&number.to_string())
                .map_err(|_| VariableError::wrong_type(name, "decimal amount")),
            Value::String(text) => Decimal::from_str(text.trim())
                .map_err(|_| VariableError::wrong_type(name, "decimal amount")),
            _ => Err(VariableError::wrong_type(name, "decimal amount")),
        }
    }

    /// An optional string variable
    pub fn opt_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// An optional integer variable
    pub fn opt_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    /// An optional decimal amount
    pub fn opt_decimal(&self, name: &str) -> Option<Decimal> {
        self.require_decimal(name).ok()
    }

    /// An optional boolean variable
    pub fn opt_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }
}

impl FromIterator<(String, Value)> for VariableMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A unit of work locked by this process
///
/// The lock is held by the external queue; if the task is neither completed
/// nor failed before the lock expires, the queue hands it out again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockedTask {
    /// Queue-assigned task id
    pub id: String,
    /// The topic this task was polled from
    pub topic: String,
    /// Input variables
    pub variables: VariableMap,
}

impl LockedTask {
    pub fn new(id: impl Into<String>, topic: impl Into<String>, variables: VariableMap) -> Self {
        Self {
            id: id.into(),
            topic: topic.into(),
            variables,
        }
    }
}

impl fmt::Display for LockedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.id, self.topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_require_str() {
        let variables = VariableMap::new().with("policy_number", "P-2024-001");
        assert_eq!(variables.require_str("policy_number").unwrap(), "P-2024-001");
    }

    #[test]
    fn test_missing_variable_error_message() {
        let variables = VariableMap::new();
        let error = variables.require_str("claim_type").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Required task variable 'claim_type' is missing"
        );
    }

    #[test]
    fn test_null_counts_as_missing() {
        let variables = VariableMap::new().with("claim_id", Value::Null);
        assert!(matches!(
            variables.require_i64("claim_id").unwrap_err(),
            VariableError::Missing(_)
        ));
        assert_eq!(variables.opt_i64("claim_id"), None);
    }

    #[test]
    fn test_wrong_type_error() {
        let variables = VariableMap::new().with("claim_id", "not-a-number");
        let error = variables.require_i64("claim_id").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Task variable 'claim_id' has the wrong type: expected integer"
        );
    }

    #[test]
    fn test_require_i64_rejects_fractional_number() {
        let variables = VariableMap::new().with("claim_id", 12.5);
        assert!(matches!(
            variables.require_i64("claim_id").unwrap_err(),
            VariableError::WrongType { .. }
        ));
    }

    #[test]
    fn test_require_decimal_from_number_and_string() {
        let variables = VariableMap::new()
            .with("invoice_amount", 1000.55)
            .with("approved_amount", "800.44");

        assert_eq!(
            variables.require_decimal("invoice_amount").unwrap(),
            dec!(1000.55)
        );
        assert_eq!(
            variables.require_decimal("approved_amount").unwrap(),
            dec!(800.44)
        );
    }

    #[test]
    fn test_opt_lookups() {
        let variables = VariableMap::new()
            .with("adjuster_id", 42)
            .with("notification_sent", true);

        assert_eq!(variables.opt_i64("adjuster_id"), Some(42));
        assert_eq!(variables.opt_bool("notification_sent"), Some(true));
        assert_eq!(variables.opt_str("decision_notes"), None);
        assert_eq!(variables.opt_decimal("paid_amount"), None);
    }

    #[test]
    fn test_serializes_as_plain_json_object() {
        let variables = VariableMap::new()
            .with("claim_id", 7)
            .with("claim_type", "HOME");

        let value = serde_json::to_value(&variables).unwrap();
        assert_eq!(value, json!({"claim_id": 7, "claim_type": "HOME"}));

        let back: VariableMap = serde_json::from_value(value).unwrap();
        assert_eq!(back.require_i64("claim_id").unwrap(), 7);
    }

    #[test]
    fn test_collect_keeps_the_last_value_per_name() {
        // Completion outputs override earlier process state on merge.
        let earlier = VariableMap::new().with("claim_status", "APPROVED");
        let later = VariableMap::new().with("claim_status", "PAID");

        let merged: VariableMap = earlier
            .iter()
            .chain(later.iter())
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        assert_eq!(merged.opt_str("claim_status"), Some("PAID"));
    }

    #[test]
    fn test_locked_task_display() {
        let task = LockedTask::new("task-9", "claim-create", VariableMap::new());
        assert_eq!(task.to_string(), "task-9 [claim-create]");
    }

    #[test]
    fn test_with_decimal_round_trips_exactly() {
        let variables = VariableMap::new().with_decimal("approved_amount", dec!(800.00));

        let value = serde_json::to_value(&variables).unwrap();
        assert_eq!(value, json!({"approved_amount": "800.00"}));
        assert_eq!(
            variables.require_decimal("approved_amount").unwrap(),
            dec!(800.00)
        );
    }
}
