//! Client tests against a mocked risk-engine API.
use std::time::Duration;

use sentinel_risk_report::client::RiskApiClient;
use sentinel_risk_report::config::ApiConfig;
use sentinel_risk_report::error::{ApiError, IngestError};
use sentinel_risk_report::models::{DistressReason, Status};
use sentinel_risk_report::risk;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> RiskApiClient {
    RiskApiClient::new(&ApiConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn fetches_and_aggregates_users() {
    let mock_server = MockServer::start().await;

    let users = serde_json::json!([
        {"id": "U1", "name": "Asha Rao", "score": 80, "exposure": 100000.0,
         "status": "Critical", "volatility": "JobLoss", "income": 5000.0},
        {"id": "U2", "name": "Vikram Shah", "score": 60, "exposure": 50000.0,
         "status": "Warning", "volatility": "Medical"},
        {"id": "U3", "name": "Meera Iyer", "score": 20, "exposure": 10000.0,
         "status": "Safe", "volatility": "Salary"}
    ]);

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&users))
        .mount(&mock_server)
        .await;

    let records = client_for(&mock_server).fetch_users().await.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].status, Status::Critical);

    let summary = risk::compute_dashboard_summary(&records);
    assert_eq!(summary.total_exposure, 160000.0);
    assert_eq!(summary.success_rate, 66.7);

    let report = risk::compute_risk_factor_report(&records);
    assert_eq!(report.total_high_risk, 2);
    assert_eq!(report.factors[0].name, "JobLoss");
}

#[tokio::test]
async fn server_error_is_reported_as_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database offline"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).fetch_users().await.unwrap_err();
    match err {
        ApiError::Status { status, body, .. } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "database offline");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unknown_status_is_rejected_at_ingestion() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": "U1", "name": "Asha Rao", "score": 70, "status": "Transient"}
        ])))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).fetch_users().await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Ingest(IngestError::UnknownStatus { .. })
    ));
}

#[tokio::test]
async fn missing_profile_maps_to_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/U404"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"detail": "User not found"})),
        )
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .fetch_user_profile("U404")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(ref id) if id == "U404"));
}

#[tokio::test]
async fn profile_passes_through_detail_fields() {
    let mock_server = MockServer::start().await;

    let profile = serde_json::json!({
        "id": "U7",
        "name": "Kiran Das",
        "occupation": "Gig Worker",
        "income": 30000.0,
        "risk_score": 72,
        "status": "Warning",
        "volatility": "Salary Delay",
        "shap_values": [
            {"feature": "EPF Contribution", "impact": 15, "desc": "Lack of steady employment signal"}
        ],
        "expenditure_breakdown": [
            {"name": "Rent", "value": 12000.0},
            {"name": "Groceries", "value": 8000.0}
        ],
        "total_spend": 20000.0,
        "loans": [
            {"type": "Personal", "principal": 200000.0, "outstanding": 150000.0,
             "emi": 6000.0, "interest_rate": 13.5, "remaining_months": 28}
        ],
        "total_emi": 6000.0,
        "disposable_income": 4000.0,
        "can_repay": true
    });

    Mock::given(method("GET"))
        .and(path("/api/users/U7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&profile))
        .mount(&mock_server)
        .await;

    let profile = client_for(&mock_server)
        .fetch_user_profile("U7")
        .await
        .unwrap();
    assert_eq!(profile.loans[0].loan_type, "Personal");
    assert_eq!(profile.shap_values[0].impact, 15.0);
    assert!(profile.can_repay);

    let shares = risk::expenditure_shares(&profile);
    assert_eq!(shares[0].percent, 60.0);
    assert_eq!(shares[1].percent, 40.0);
}

#[tokio::test]
async fn discovery_posts_reason_and_returns_intervention() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/discovery"))
        .and(body_json(serde_json::json!({"user_id": "U7", "reason": "salary"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user": {"id": "U7", "status": "Warning"},
            "intervention": {
                "action": "Grace Period",
                "message": "Payment date shifted by 7 days. No penalty.",
                "type": "liquidity"
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let intervention = client_for(&mock_server)
        .request_intervention("U7", DistressReason::Salary)
        .await
        .unwrap();
    assert_eq!(intervention.action, "Grace Period");
    assert_eq!(intervention.kind.as_deref(), Some("liquidity"));
}
