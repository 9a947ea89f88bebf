//! End-to-end scenarios against the bundled Kerala dataset and guidance table, exercised
//! through the public service facade and both HTTP routers.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use scheme_navigator::guidance::{agent_router, GuidanceEntry, GuidanceTable};
use scheme_navigator::schemes::{eligibility_router, SchemeCatalog, SchemeService, UserProfile};

const DATASET: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/kerala_schemes.json");

fn catalog() -> Arc<SchemeCatalog> {
    Arc::new(SchemeCatalog::load(DATASET).expect("bundled dataset loads"))
}

fn eligible_ids(service: &SchemeService, profile: &UserProfile) -> Vec<String> {
    service
        .find_eligible(profile)
        .eligible_schemes
        .into_iter()
        .map(|summary| summary.id.0)
        .collect()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.expect("route executes");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&body).expect("json payload"))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

#[test]
fn bundled_dataset_has_well_formed_rules() {
    let catalog = catalog();

    assert_eq!(catalog.len(), 7);
    for scheme in catalog.iter() {
        assert_eq!(
            scheme.eligibility.malformed().count(),
            0,
            "{} has malformed rules",
            scheme.id
        );
        assert!(!scheme.roadmap.is_empty(), "{} has no roadmap", scheme.id);
    }
}

#[test]
fn widowed_senior_matches_pension_housing_widow_and_health() {
    let service = SchemeService::new(catalog());
    let profile = UserProfile::default()
        .with_age(65)
        .with_gender("female")
        .with_ration_card("yellow")
        .with_income(48000.0)
        .with_marital_status("widowed");

    assert_eq!(
        eligible_ids(&service, &profile),
        vec!["PENSION_001", "HOUSING_001", "WIDOW_001", "HEALTH_001"]
    );
}

#[test]
fn young_job_seeker_matches_unemployment_assistance_only() {
    let service = SchemeService::new(catalog());
    let profile = UserProfile::default()
        .with_age(24)
        .with_gender("male")
        .with_income(60000.0)
        .with_education("SSLC, Plus Two")
        .with_ration_card("white")
        .with_housing_status("owned");

    assert_eq!(eligible_ids(&service, &profile), vec!["EMPLOY_001"]);
}

#[test]
fn every_scheme_has_usable_guidance() {
    let catalog = catalog();
    let table = GuidanceTable::bundled().expect("bundled guidance parses");

    for scheme in catalog.iter() {
        let entry = table.guidance(scheme.id.as_str(), 1);
        assert!(!entry.instructions.is_empty());
        if !table.contains_scheme(scheme.id.as_str()) {
            assert_eq!(entry, GuidanceEntry::not_configured());
        }
    }
}

#[tokio::test]
async fn check_then_roadmap_then_guidance() {
    let eligibility = eligibility_router(Arc::new(SchemeService::new(catalog())));
    let agent = agent_router(Arc::new(
        GuidanceTable::bundled().expect("bundled guidance parses"),
    ));

    let (status, report) = send(
        eligibility.clone(),
        post_json(
            "/check-eligibility",
            json!({ "age": 65.0, "ration_card": "pink", "income": 30000 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        report["total_eligible"].as_u64(),
        report["eligible_schemes"].as_array().map(|s| s.len() as u64)
    );
    let first = report["eligible_schemes"][0]["id"]
        .as_str()
        .expect("at least one scheme")
        .to_string();
    assert_eq!(first, "PENSION_001");

    let (status, roadmap) = send(
        eligibility,
        Request::get(format!("/roadmap/{first}"))
            .body(Body::empty())
            .expect("request builds"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        roadmap["official_url"],
        json!("https://welfarepension.lsgkerala.gov.in")
    );
    assert_eq!(roadmap["roadmap"].as_array().map(Vec::len), Some(3));

    let (status, guidance) = send(
        agent,
        post_json(
            "/analyze-form",
            json!({
                "scheme_id": first,
                "screenshot": "data:image/png;base64,AAAA",
                "current_step": 1,
                "user_data": { "age": 65 }
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(guidance["next_action"], json!("Collect the application form"));
}

#[tokio::test]
async fn roadmap_for_scheme_without_url_returns_null() {
    let eligibility = eligibility_router(Arc::new(SchemeService::new(catalog())));

    let (status, roadmap) = send(
        eligibility,
        Request::get("/roadmap/UNWED_001")
            .body(Body::empty())
            .expect("request builds"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(roadmap["scheme_name"], json!("Snehasparsham Scheme"));
    assert_eq!(roadmap["official_url"], Value::Null);
}
