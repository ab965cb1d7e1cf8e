//! Validation result accumulation
//!
//! Worker requests are validated schema-level in full before any side effect:
//! every violation is collected, then joined into a single error message. The
//! accumulator here is shared by all request validators.

/// Result of validating a request or entity
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the subject is valid
    pub is_valid: bool,
    /// List of validation errors
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Creates a successful validation result
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Adds an error to the result
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    /// Joins all collected errors into one message
    ///
    /// A single violation surfaces verbatim, so fixed messages such as
    /// "Claim ID cannot be null" reach the caller unchanged.
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}
