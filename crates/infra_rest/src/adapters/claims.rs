//! REST adapter for the remote claim store
//!
//! One store serves all three lines of business behind per-family endpoint
//! trees (`/claims/auto`, `/claims/home`, `/claims/health`). The family
//! segment carries the claim type, so the wire payloads do not repeat it;
//! conversions back into domain claims take the type from the caller.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{
    AdjusterId, ClaimId, DomainPort, HealthCheckResult, HealthCheckable, PolicyNumber, PortError,
};
use domain_claims::{
    Claim, ClaimDecision, ClaimStatus, ClaimStorePort, ClaimType, DecisionType, NewClaim,
};

use crate::client::{RestClientConfig, RestService};

/// URL path segment for a line of business
fn family(claim_type: ClaimType) -> &'static str {
    match claim_type {
        ClaimType::Auto => "auto",
        ClaimType::Home => "home",
        ClaimType::Health => "health",
    }
}

/// REST-backed implementation of ClaimStorePort
pub struct RestClaimStore {
    rest: RestService,
}

impl RestClaimStore {
    pub fn new(config: RestClientConfig) -> Result<Self, PortError> {
        Ok(Self {
            rest: RestService::new("claim-store", config)?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClaimDto {
    id: ClaimId,
    file_number: String,
    policy_number: PolicyNumber,
    description: String,
    incident_date: NaiveDate,
    reported_date: DateTime<Utc>,
    estimated_amount: Decimal,
    status: ClaimStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    paid_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    adjuster_id: Option<AdjusterId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    decision: Option<DecisionDto>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ClaimDto {
    fn into_domain(self, claim_type: ClaimType) -> Claim {
        Claim {
            id: self.id,
            claim_type,
            file_number: self.file_number,
            policy_number: self.policy_number,
            description: self.description,
            incident_date: self.incident_date,
            reported_date: self.reported_date,
            estimated_amount: self.estimated_amount,
            status: self.status,
            paid_amount: self.paid_amount,
            adjuster_id: self.adjuster_id,
            decision: self.decision.map(ClaimDecision::from),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<&Claim> for ClaimDto {
    fn from(claim: &Claim) -> Self {
        Self {
            id: claim.id,
            file_number: claim.file_number.clone(),
            policy_number: claim.policy_number.clone(),
            description: claim.description.clone(),
            incident_date: claim.incident_date,
            reported_date: claim.reported_date,
            estimated_amount: claim.estimated_amount,
            status: claim.status,
            paid_amount: claim.paid_amount,
            adjuster_id: claim.adjuster_id,
            decision: claim.decision.as_ref().map(DecisionDto::from),
            created_at: claim.created_at,
            updated_at: claim.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewClaimDto<'a> {
    file_number: &'a str,
    policy_number: &'a PolicyNumber,
    description: &'a str,
    incident_date: NaiveDate,
    reported_date: DateTime<Utc>,
    estimated_amount: Decimal,
    status: ClaimStatus,
}

impl<'a> From<&'a NewClaim> for NewClaimDto<'a> {
    fn from(new_claim: &'a NewClaim) -> Self {
        Self {
            file_number: &new_claim.file_number,
            policy_number: &new_claim.policy_number,
            description: &new_claim.description,
            incident_date: new_claim.incident_date,
            reported_date: new_claim.reported_date,
            estimated_amount: new_claim.estimated_amount,
            status: new_claim.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DecisionDto {
    claim_id: ClaimId,
    decision: DecisionType,
    decision_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    decided_by_id: Option<AdjusterId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    decided_by_name: Option<String>,
    approved_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rejection_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    additional_notes: Option<String>,
    updated_at: DateTime<Utc>,
}

impl From<&ClaimDecision> for DecisionDto {
    fn from(decision: &ClaimDecision) -> Self {
        Self {
            claim_id: decision.claim_id,
            decision: decision.decision,
            decision_date: decision.decision_date,
            decided_by_id: decision.decided_by_id,
            decided_by_name: decision.decided_by_name.clone(),
            approved_amount: decision.approved_amount,
            reasoning: decision.reasoning.clone(),
            rejection_reason: decision.rejection_reason.clone(),
            additional_notes: decision.additional_notes.clone(),
            updated_at: decision.updated_at,
        }
    }
}

impl From<DecisionDto> for ClaimDecision {
    fn from(dto: DecisionDto) -> Self {
        Self {
            claim_id: dto.claim_id,
            decision: dto.decision,
            decision_date: dto.decision_date,
            decided_by_id: dto.decided_by_id,
            decided_by_name: dto.decided_by_name,
            approved_amount: dto.approved_amount,
            reasoning: dto.reasoning,
            rejection_reason: dto.rejection_reason,
            additional_notes: dto.additional_notes,
            updated_at: dto.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignAdjusterRequest {
    adjuster_id: AdjusterId,
}

impl DomainPort for RestClaimStore {}

#[async_trait]
impl ClaimStorePort for RestClaimStore {
    async fn create_claim(
        &self,
        claim_type: ClaimType,
        new_claim: &NewClaim,
    ) -> Result<Claim, PortError> {
        let path = format!("/claims/{}", family(claim_type));
        let dto: ClaimDto = self
            .rest
            .post_json("create_claim", &path, &NewClaimDto::from(new_claim))
            .await?;
        Ok(dto.into_domain(claim_type))
    }

    async fn get_claim_by_id(
        &self,
        claim_type: ClaimType,
        id: ClaimId,
    ) -> Result<Claim, PortError> {
        let path = format!("/claims/{}/{}", family(claim_type), id);
        let dto: ClaimDto = self.rest.get_json("get_claim_by_id", &path).await?;
        Ok(dto.into_domain(claim_type))
    }

    async fn update_claim(
        &self,
        claim_type: ClaimType,
        id: ClaimId,
        claim: &Claim,
    ) -> Result<Claim, PortError> {
        let path = format!("/claims/{}/{}", family(claim_type), id);
        let dto: ClaimDto = self
            .rest
            .put_json("update_claim", &path, &ClaimDto::from(claim))
            .await?;
        Ok(dto.into_domain(claim_type))
    }

    async fn assign_adjuster(
        &self,
        claim_type: ClaimType,
        claim_id: ClaimId,
        adjuster_id: AdjusterId,
    ) -> Result<Claim, PortError> {
        let path = format!("/claims/{}/{}/adjuster", family(claim_type), claim_id);
        let dto: ClaimDto = self
            .rest
            .put_json("assign_adjuster", &path, &AssignAdjusterRequest { adjuster_id })
            .await?;
        Ok(dto.into_domain(claim_type))
    }

    async fn create_decision(
        &self,
        claim_type: ClaimType,
        decision: &ClaimDecision,
    ) -> Result<ClaimDecision, PortError> {
        let path = format!("/claims/{}/{}/decision", family(claim_type), decision.claim_id);
        let dto: DecisionDto = self
            .rest
            .post_json("create_decision", &path, &DecisionDto::from(decision))
            .await?;
        Ok(dto.into())
    }

    async fn update_decision(
        &self,
        claim_type: ClaimType,
        decision: &ClaimDecision,
    ) -> Result<ClaimDecision, PortError> {
        let path = format!("/claims/{}/{}/decision", family(claim_type), decision.claim_id);
        let dto: DecisionDto = self
            .rest
            .put_json("update_decision", &path, &DecisionDto::from(decision))
            .await?;
        Ok(dto.into())
    }
}

#[async_trait]
impl HealthCheckable for RestClaimStore {
    async fn health_check(&self) -> HealthCheckResult {
        self.rest.probe("/health").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn sample_claim() -> Claim {
        let now = Utc::now();
        Claim {
            id: ClaimId::new(42),
            claim_type: ClaimType::Auto,
            file_number: "CLM-1234567".to_string(),
            policy_number: PolicyNumber::new("P-100"),
            description: "Rear-end collision".to_string(),
            incident_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            reported_date: now,
            estimated_amount: dec!(2500.00),
            status: ClaimStatus::Submitted,
            paid_amount: None,
            adjuster_id: None,
            decision: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_family_maps_each_line_of_business() {
        assert_eq!(family(ClaimType::Auto), "auto");
        assert_eq!(family(ClaimType::Home), "home");
        assert_eq!(family(ClaimType::Health), "health");
    }

    #[test]
    fn test_claim_dto_wire_shape_is_camel_case() {
        let value = serde_json::to_value(ClaimDto::from(&sample_claim())).unwrap();
        assert_eq!(value["fileNumber"], "CLM-1234567");
        assert_eq!(value["policyNumber"], "P-100");
        assert_eq!(value["status"], "SUBMITTED");
        assert!(value.get("paidAmount").is_none());
        assert!(value.get("decision").is_none());
    }

    #[test]
    fn test_claim_round_trips_through_dto() {
        let mut claim = sample_claim();
        claim.adjuster_id = Some(AdjusterId::new(7));
        claim.decision = Some(ClaimDecision::approval(
            claim.id,
            dec!(2000.00),
            "approved after inspection",
        ));

        let dto = ClaimDto::from(&claim);
        let back = dto.into_domain(ClaimType::Auto);

        assert_eq!(back.id, claim.id);
        assert_eq!(back.adjuster_id, Some(AdjusterId::new(7)));
        let decision = back.decision.unwrap();
        assert_eq!(decision.approved_amount, dec!(2000.00));
        assert_eq!(decision.decision, DecisionType::Approved);
    }

    #[test]
    fn test_claim_dto_parses_payload_without_optional_fields() {
        let dto: ClaimDto = serde_json::from_value(json!({
            "id": 5,
            "fileNumber": "CLM-1",
            "policyNumber": "P-1",
            "description": "hail damage",
            "incidentDate": "2025-01-02",
            "reportedDate": "2025-01-03T10:00:00Z",
            "estimatedAmount": "100.00",
            "status": "SUBMITTED",
            "createdAt": "2025-01-03T10:00:00Z",
            "updatedAt": "2025-01-03T10:00:00Z",
        }))
        .unwrap();
        let claim = dto.into_domain(ClaimType::Home);
        assert_eq!(claim.claim_type, ClaimType::Home);
        assert!(claim.decision.is_none());
        assert!(claim.adjuster_id.is_none());
    }

    #[test]
    fn test_rejection_decision_dto_carries_reason() {
        let decision =
            ClaimDecision::rejection(ClaimId::new(9), "policy lapsed", "no active coverage");
        let value = serde_json::to_value(DecisionDto::from(&decision)).unwrap();
        assert_eq!(value["claimId"], 9);
        assert_eq!(value["decision"], "REJECTED");
        assert_eq!(value["rejectionReason"], "policy lapsed");
        assert_eq!(value["approvedAmount"], "0");
    }

    #[test]
    fn test_assign_adjuster_request_wire_shape() {
        let value = serde_json::to_value(AssignAdjusterRequest {
            adjuster_id: AdjusterId::new(3),
        })
        .unwrap();
        assert_eq!(value, json!({"adjusterId": 3}));
    }
}
