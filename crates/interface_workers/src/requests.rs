//! Typed worker requests extracted from task variables
//!
//! Every worker starts by turning the task's variable bag into a typed
//! request. Extraction validates the full shape before any side effect:
//! each field is checked, every violation is collected, and the worker
//! fails with all of them joined into one message. A request that
//! constructs successfully carries only parsed, known-good values.
//!
//! The checks follow the schema rules shared by all workers: ids must be
//! present and positive, strings non-blank, amounts positive, claim types
//! valid (case- and whitespace-insensitive), and email addresses well
//! formed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use validator::ValidateEmail;

use core_kernel::{AdjusterId, ClaimId, PolicyNumber, ValidationResult};
use domain_claims::ClaimType;
use infra_queue::{LockedTask, VariableMap, WorkerError};

/// Process-variable names shared with the external workflow
///
/// These strings are the wire contract; renaming one breaks the running
/// process definitions.
pub mod vars {
    pub const CLAIM_ID: &str = "claim_id";
    pub const CLAIM_FILE_NUMBER: &str = "claim_file_number";
    pub const CLAIM_TYPE: &str = "claim_type";
    pub const CLAIM_STATUS: &str = "claim_status";
    pub const POLICY_NUMBER: &str = "policy_number";
    pub const DESCRIPTION: &str = "description";
    pub const INCIDENT_DATE: &str = "incident_date";
    pub const ESTIMATED_AMOUNT: &str = "estimated_amount";
    pub const CUSTOMER_FIRSTNAME: &str = "customer_firstname";
    pub const CUSTOMER_LASTNAME: &str = "customer_lastname";
    pub const CUSTOMER_NOTIFICATION_EMAIL: &str = "customer_notification_email";
    pub const ADJUSTER_ID: &str = "adjuster_id";
    pub const DECISION_NOTES: &str = "decision_notes";
    pub const INVOICE_AMOUNT: &str = "invoice_amount";
    pub const INVOICE_DETAILS: &str = "invoice_details";
    pub const APPROVED_AMOUNT: &str = "approved_amount";
    pub const NOTIFICATION_SENT: &str = "notification_sent";
    pub const NOTIFICATION_MESSAGE: &str = "notification_message";
    pub const PAYMENT_EXECUTED: &str = "payment_executed";
    pub const PAID_AMOUNT: &str = "paid_amount";
}

/// Checks the claim id: present and positive
fn check_claim_id(result: &mut ValidationResult, value: Option<i64>) -> Option<ClaimId> {
    match value {
        None => {
            result.add_error("Claim ID cannot be null");
            None
        }
        Some(raw) if raw <= 0 => {
            result.add_error(format!("Claim ID must be positive, got {raw}"));
            None
        }
        Some(raw) => Some(ClaimId::new(raw)),
    }
}

/// Checks the adjuster id: present and positive
fn check_adjuster_id(result: &mut ValidationResult, value: Option<i64>) -> Option<AdjusterId> {
    match value {
        None => {
            result.add_error("Adjuster ID cannot be null");
            None
        }
        Some(raw) if raw <= 0 => {
            result.add_error(format!("Adjuster ID must be positive, got {raw}"));
            None
        }
        Some(raw) => Some(AdjusterId::new(raw)),
    }
}

/// Checks a required string: present and non-blank, returned trimmed
fn check_blank(
    result: &mut ValidationResult,
    field: &str,
    value: Option<&str>,
) -> Option<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => {
            result.add_error(format!("{field} cannot be blank"));
            None
        }
    }
}

/// Checks the claim type: present, non-blank, and a known value
fn check_claim_type(result: &mut ValidationResult, value: Option<&str>) -> Option<ClaimType> {
    let Some(text) = value.filter(|text| !text.trim().is_empty()) else {
        result.add_error("Claim type cannot be blank");
        return None;
    };
    match text.parse::<ClaimType>() {
        Ok(claim_type) => Some(claim_type),
        Err(error) => {
            result.add_error(error.to_string());
            None
        }
    }
}

/// Checks a required amount: present and strictly positive
fn check_amount(
    result: &mut ValidationResult,
    field: &str,
    value: Option<Decimal>,
) -> Option<Decimal> {
    match value {
        None => {
            result.add_error(format!("{field} cannot be null"));
            None
        }
        Some(amount) if amount <= Decimal::ZERO => {
            result.add_error(format!("{field} must be positive, got {amount}"));
            None
        }
        Some(amount) => Some(amount),
    }
}

/// Checks the notification email: present and well formed
fn check_email(result: &mut ValidationResult, value: Option<&str>) -> Option<String> {
    match value.map(str::trim) {
        None | Some("") => {
            result.add_error("Customer notification email cannot be blank");
            None
        }
        Some(email) if !email.validate_email() => {
            result.add_error(format!("Invalid email format: {email}"));
            None
        }
        Some(email) => Some(email.to_string()),
    }
}

/// Checks a required ISO date (`YYYY-MM-DD`)
fn check_date(result: &mut ValidationResult, field: &str, value: Option<&str>) -> Option<NaiveDate> {
    let Some(text) = value.filter(|text| !text.trim().is_empty()) else {
        result.add_error(format!("{field} cannot be null"));
        return None;
    };
    match text.trim().parse::<NaiveDate>() {
        Ok(date) => Some(date),
        Err(_) => {
            result.add_error(format!("Invalid {}: {}", field.to_lowercase(), text.trim()));
            None
        }
    }
}

/// Finishes extraction: fails with the joined violations, or yields the
/// request built from the parsed fields
fn finish<T>(result: ValidationResult, value: Option<T>) -> Result<T, WorkerError> {
    if !result.is_valid {
        return Err(WorkerError::validation(result.error_message()));
    }
    value.ok_or_else(|| WorkerError::invariant("request fields missing after validation"))
}

/// Input for the claim creation worker
#[derive(Debug, Clone)]
pub struct ClaimCreateRequest {
    pub claim_type: ClaimType,
    pub policy_number: PolicyNumber,
    pub description: String,
    pub incident_date: NaiveDate,
    pub estimated_amount: Decimal,
}

impl ClaimCreateRequest {
    pub fn from_task(task: &LockedTask) -> Result<Self, WorkerError> {
        let mut result = ValidationResult::ok();
        let request = Self::collect(&task.variables, &mut result);
        finish(result, request)
    }

    fn collect(variables: &VariableMap, result: &mut ValidationResult) -> Option<Self> {
        let claim_type = check_claim_type(result, variables.opt_str(vars::CLAIM_TYPE));
        let policy_number =
            check_blank(result, "Policy number", variables.opt_str(vars::POLICY_NUMBER));
        let description = check_blank(result, "Description", variables.opt_str(vars::DESCRIPTION));
        let incident_date = check_date(
            result,
            "Incident date",
            variables.opt_str(vars::INCIDENT_DATE),
        );
        let estimated_amount = check_amount(
            result,
            "Estimated amount",
            variables.opt_decimal(vars::ESTIMATED_AMOUNT),
        );

        Some(Self {
            claim_type: claim_type?,
            policy_number: PolicyNumber::new(policy_number?),
            description: description?,
            incident_date: incident_date?,
            estimated_amount: estimated_amount?,
        })
    }
}

/// Input for workers that address one claim: repair approval and adjuster
/// assignment
#[derive(Debug, Clone, Copy)]
pub struct ClaimReferenceRequest {
    pub claim_id: ClaimId,
    pub claim_type: ClaimType,
}

impl ClaimReferenceRequest {
    pub fn from_task(task: &LockedTask) -> Result<Self, WorkerError> {
        let mut result = ValidationResult::ok();
        let request = Self::collect(&task.variables, &mut result);
        finish(result, request)
    }

    fn collect(variables: &VariableMap, result: &mut ValidationResult) -> Option<Self> {
        let claim_id = check_claim_id(result, variables.opt_i64(vars::CLAIM_ID));
        let claim_type = check_claim_type(result, variables.opt_str(vars::CLAIM_TYPE));

        Some(Self {
            claim_id: claim_id?,
            claim_type: claim_type?,
        })
    }
}

/// Context shared by both rejection workers
#[derive(Debug, Clone)]
pub struct RejectionContext {
    pub claim_id: ClaimId,
    pub claim_type: ClaimType,
    pub claim_file_number: String,
    pub customer_firstname: String,
    pub customer_lastname: String,
    pub notification_email: String,
    pub policy_number: PolicyNumber,
}

impl RejectionContext {
    fn collect(variables: &VariableMap, result: &mut ValidationResult) -> Option<Self> {
        let claim_id = check_claim_id(result, variables.opt_i64(vars::CLAIM_ID));
        let claim_type = check_claim_type(result, variables.opt_str(vars::CLAIM_TYPE));
        let claim_file_number = check_blank(
            result,
            "Claim file number",
            variables.opt_str(vars::CLAIM_FILE_NUMBER),
        );
        let customer_firstname = check_blank(
            result,
            "Customer first name",
            variables.opt_str(vars::CUSTOMER_FIRSTNAME),
        );
        let customer_lastname = check_blank(
            result,
            "Customer last name",
            variables.opt_str(vars::CUSTOMER_LASTNAME),
        );
        let notification_email = check_email(
            result,
            variables.opt_str(vars::CUSTOMER_NOTIFICATION_EMAIL),
        );
        let policy_number =
            check_blank(result, "Policy number", variables.opt_str(vars::POLICY_NUMBER));

        Some(Self {
            claim_id: claim_id?,
            claim_type: claim_type?,
            claim_file_number: claim_file_number?,
            customer_firstname: customer_firstname?,
            customer_lastname: customer_lastname?,
            notification_email: notification_email?,
            policy_number: PolicyNumber::new(policy_number?),
        })
    }

    /// The customer's name in "First Last" format, for the notification
    pub fn customer_full_name(&self) -> String {
        format!("{} {}", self.customer_firstname, self.customer_lastname)
    }
}

/// Input for the invalid-policy rejection worker
#[derive(Debug, Clone)]
pub struct InvalidPolicyRejectionRequest {
    pub context: RejectionContext,
}

impl InvalidPolicyRejectionRequest {
    pub fn from_task(task: &LockedTask) -> Result<Self, WorkerError> {
        let mut result = ValidationResult::ok();
        let context = RejectionContext::collect(&task.variables, &mut result);
        finish(result, context.map(|context| Self { context }))
    }
}

/// Input for the adjuster-decision rejection worker
#[derive(Debug, Clone)]
pub struct DecisionRejectionRequest {
    pub context: RejectionContext,
    pub adjuster_id: AdjusterId,
    pub decision_notes: String,
}

impl DecisionRejectionRequest {
    pub fn from_task(task: &LockedTask) -> Result<Self, WorkerError> {
        let mut result = ValidationResult::ok();
        let context = RejectionContext::collect(&task.variables, &mut result);
        let adjuster_id = check_adjuster_id(&mut result, task.variables.opt_i64(vars::ADJUSTER_ID));
        let decision_notes = check_blank(
            &mut result,
            "Decision notes",
            task.variables.opt_str(vars::DECISION_NOTES),
        );

        let request = match (context, adjuster_id, decision_notes) {
            (Some(context), Some(adjuster_id), Some(decision_notes)) => Some(Self {
                context,
                adjuster_id,
                decision_notes,
            }),
            _ => None,
        };
        finish(result, request)
    }
}

/// Input for the payment calculation workers
///
/// Invoice details are optional; when present they become the decision's
/// additional notes.
#[derive(Debug, Clone)]
pub struct PaymentCalculationRequest {
    pub claim_id: ClaimId,
    pub claim_type: ClaimType,
    pub invoice_amount: Decimal,
    pub invoice_details: Option<String>,
}

impl PaymentCalculationRequest {
    pub fn from_task(task: &LockedTask) -> Result<Self, WorkerError> {
        let mut result = ValidationResult::ok();
        let request = Self::collect(&task.variables, &mut result);
        finish(result, request)
    }

    fn collect(variables: &VariableMap, result: &mut ValidationResult) -> Option<Self> {
        let claim_id = check_claim_id(result, variables.opt_i64(vars::CLAIM_ID));
        let claim_type = check_claim_type(result, variables.opt_str(vars::CLAIM_TYPE));
        let invoice_amount = check_amount(
            result,
            "Invoice amount",
            variables.opt_decimal(vars::INVOICE_AMOUNT),
        );
        let invoice_details = variables
            .opt_str(vars::INVOICE_DETAILS)
            .map(str::trim)
            .filter(|details| !details.is_empty())
            .map(str::to_string);

        Some(Self {
            claim_id: claim_id?,
            claim_type: claim_type?,
            invoice_amount: invoice_amount?,
            invoice_details,
        })
    }
}

/// Input for the payment execution worker
#[derive(Debug, Clone)]
pub struct PaymentExecutionRequest {
    pub claim_id: ClaimId,
    pub claim_type: ClaimType,
    pub approved_amount: Decimal,
}

impl PaymentExecutionRequest {
    pub fn from_task(task: &LockedTask) -> Result<Self, WorkerError> {
        let mut result = ValidationResult::ok();
        let request = Self::collect(&task.variables, &mut result);
        finish(result, request)
    }

    fn collect(variables: &VariableMap, result: &mut ValidationResult) -> Option<Self> {
        let claim_id = check_claim_id(result, variables.opt_i64(vars::CLAIM_ID));
        let claim_type = check_claim_type(result, variables.opt_str(vars::CLAIM_TYPE));
        let approved_amount = check_amount(
            result,
            "Approved amount",
            variables.opt_decimal(vars::APPROVED_AMOUNT),
        );

        Some(Self {
            claim_id: claim_id?,
            claim_type: claim_type?,
            approved_amount: approved_amount?,
        })
    }
}
