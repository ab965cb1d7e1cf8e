//! REST adapters for the customer, policy, and employee directories and
//! the notification gateway
//!
//! Each adapter wraps one remote service. The directories are read-only
//! lookups; the notification gateway is the single outbound write. All of
//! them answer `/health` for the startup probe.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{
    AdjusterId, CustomerId, DomainPort, HealthCheckResult, HealthCheckable, PolicyNumber,
    PortError,
};
use domain_directory::{
    Adjuster, AdjusterDirectoryPort, Customer, CustomerDirectoryPort, EmploymentType,
    NotificationPort, Policy, PolicyDirectoryPort, SpecializationArea,
};

use crate::client::{RestClientConfig, RestService};

// ---------------------------------------------------------------------------
// Customer directory
// ---------------------------------------------------------------------------

/// REST-backed implementation of CustomerDirectoryPort
pub struct RestCustomerDirectory {
    rest: RestService,
}

impl RestCustomerDirectory {
    pub fn new(config: RestClientConfig) -> Result<Self, PortError> {
        Ok(Self {
            rest: RestService::new("customer-directory", config)?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerDto {
    id: CustomerId,
    first_name: String,
    last_name: String,
    notification_email: String,
}

impl From<CustomerDto> for Customer {
    fn from(dto: CustomerDto) -> Self {
        Self {
            id: dto.id,
            first_name: dto.first_name,
            last_name: dto.last_name,
            notification_email: dto.notification_email,
        }
    }
}

impl DomainPort for RestCustomerDirectory {}

#[async_trait]
impl CustomerDirectoryPort for RestCustomerDirectory {
    async fn get_customer_by_id(&self, id: CustomerId) -> Result<Customer, PortError> {
        let path = format!("/customers/{id}");
        let dto: CustomerDto = self.rest.get_json("get_customer_by_id", &path).await?;
        Ok(dto.into())
    }
}

#[async_trait]
impl HealthCheckable for RestCustomerDirectory {
    async fn health_check(&self) -> HealthCheckResult {
        self.rest.probe("/health").await
    }
}

// ---------------------------------------------------------------------------
// Policy directory
// ---------------------------------------------------------------------------

/// REST-backed implementation of PolicyDirectoryPort
pub struct RestPolicyDirectory {
    rest: RestService,
}

impl RestPolicyDirectory {
    pub fn new(config: RestClientConfig) -> Result<Self, PortError> {
        Ok(Self {
            rest: RestService::new("policy-directory", config)?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PolicyDto {
    policy_number: PolicyNumber,
    customer_id: CustomerId,
}

impl From<PolicyDto> for Policy {
    fn from(dto: PolicyDto) -> Self {
        Self {
            policy_number: dto.policy_number,
            customer_id: dto.customer_id,
        }
    }
}

impl DomainPort for RestPolicyDirectory {}

#[async_trait]
impl PolicyDirectoryPort for RestPolicyDirectory {
    async fn get_policy_by_number(&self, number: &PolicyNumber) -> Result<Policy, PortError> {
        let path = format!("/policies/{number}");
        let dto: PolicyDto = self.rest.get_json("get_policy_by_number", &path).await?;
        Ok(dto.into())
    }
}

#[async_trait]
impl HealthCheckable for RestPolicyDirectory {
    async fn health_check(&self) -> HealthCheckResult {
        self.rest.probe("/health").await
    }
}

// ---------------------------------------------------------------------------
// Employee directory (adjuster pool)
// ---------------------------------------------------------------------------

/// REST-backed implementation of AdjusterDirectoryPort
pub struct RestAdjusterDirectory {
    rest: RestService,
}

impl RestAdjusterDirectory {
    pub fn new(config: RestClientConfig) -> Result<Self, PortError> {
        Ok(Self {
            rest: RestService::new("employee-directory", config)?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdjusterDto {
    id: AdjusterId,
    first_name: String,
    last_name: String,
    specialization: SpecializationArea,
    employment_type: EmploymentType,
}

impl From<AdjusterDto> for Adjuster {
    fn from(dto: AdjusterDto) -> Self {
        Self {
            id: dto.id,
            first_name: dto.first_name,
            last_name: dto.last_name,
            specialization: dto.specialization,
            employment: dto.employment_type,
        }
    }
}

impl DomainPort for RestAdjusterDirectory {}

#[async_trait]
impl AdjusterDirectoryPort for RestAdjusterDirectory {
    async fn available_adjusters(
        &self,
        specialization: SpecializationArea,
        employment: EmploymentType,
    ) -> Result<Vec<Adjuster>, PortError> {
        let path = format!(
            "/employees/adjusters?specialization={}&employmentType={}",
            specialization.as_str(),
            employment.as_str(),
        );
        let dtos: Vec<AdjusterDto> = self.rest.get_json("available_adjusters", &path).await?;
        Ok(dtos.into_iter().map(Adjuster::from).collect())
    }
}

#[async_trait]
impl HealthCheckable for RestAdjusterDirectory {
    async fn health_check(&self) -> HealthCheckResult {
        self.rest.probe("/health").await
    }
}

// ---------------------------------------------------------------------------
// Notification gateway
// ---------------------------------------------------------------------------

/// REST-backed implementation of NotificationPort
pub struct RestNotificationGateway {
    rest: RestService,
}

impl RestNotificationGateway {
    pub fn new(config: RestClientConfig) -> Result<Self, PortError> {
        Ok(Self {
            rest: RestService::new("notification-gateway", config)?,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationRequest<'a> {
    email: &'a str,
    message: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationResponse {
    sent: bool,
}

impl DomainPort for RestNotificationGateway {}

#[async_trait]
impl NotificationPort for RestNotificationGateway {
    async fn send_to_customer(&self, email: &str, message: &str) -> Result<bool, PortError> {
        let request = NotificationRequest { email, message };
        let response: NotificationResponse = self
            .rest
            .post_json("send_to_customer", "/notifications", &request)
            .await?;
        Ok(response.sent)
    }
}

#[async_trait]
impl HealthCheckable for RestNotificationGateway {
    async fn health_check(&self) -> HealthCheckResult {
        self.rest.probe("/health").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_customer_dto_parses_and_converts() {
        let dto: CustomerDto = serde_json::from_value(json!({
            "id": 12,
            "firstName": "Jane",
            "lastName": "Miller",
            "notificationEmail": "jane.miller@example.com",
        }))
        .unwrap();
        let customer = Customer::from(dto);
        assert_eq!(customer.id, CustomerId::new(12));
        assert_eq!(customer.full_name(), "Jane Miller");
    }

    #[test]
    fn test_policy_dto_converts() {
        let dto: PolicyDto = serde_json::from_value(json!({
            "policyNumber": "P-100",
            "customerId": 12,
        }))
        .unwrap();
        let policy = Policy::from(dto);
        assert_eq!(policy.policy_number, PolicyNumber::new("P-100"));
        assert_eq!(policy.customer_id, CustomerId::new(12));
    }

    #[test]
    fn test_adjuster_dto_maps_employment_type() {
        let dto: AdjusterDto = serde_json::from_value(json!({
            "id": 3,
            "firstName": "Omar",
            "lastName": "Haddad",
            "specialization": "AUTO",
            "employmentType": "EXTERNAL",
        }))
        .unwrap();
        let adjuster = Adjuster::from(dto);
        assert_eq!(adjuster.specialization, SpecializationArea::Auto);
        assert_eq!(adjuster.employment, EmploymentType::External);
    }

    #[test]
    fn test_notification_request_wire_shape() {
        let request = NotificationRequest {
            email: "jane@example.com",
            message: "Your claim was rejected",
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "email": "jane@example.com",
                "message": "Your claim was rejected",
            })
        );
    }

    #[test]
    fn test_notification_response_reads_sent_flag() {
        let response: NotificationResponse =
            serde_json::from_value(json!({"sent": false})).unwrap();
        assert!(!response.sent);
    }
}
