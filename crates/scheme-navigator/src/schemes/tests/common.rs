use std::sync::Arc;

use axum::response::Response;
use serde_json::{json, Value};

use crate::schemes::{EligibilityRules, SchemeCatalog, SchemeService};

pub(super) fn rules(value: Value) -> EligibilityRules {
    serde_json::from_value(value).expect("rules parse")
}

/// Small catalog covering every criterion kind plus one broken and one open scheme.
pub(super) fn catalog() -> SchemeCatalog {
    let document = json!({
        "kerala_schemes": [
            {
                "id": "PENSION_001",
                "name": "Old Age Pension",
                "benefit": "₹1,600 per month",
                "category": "Pension",
                "official_url": "https://pension.example.gov.in",
                "eligibility": {
                    "min_age": 60,
                    "income_max": 100000,
                    "ration_card": ["yellow", "pink"]
                },
                "roadmap": [
                    { "step": 1, "title": "Collect form", "documents": [] },
                    { "step": 2, "title": "Submit form", "documents": ["Aadhaar card"] }
                ]
            },
            {
                "id": "YOUTH_001",
                "name": "Youth Employment Aid",
                "benefit": "₹120 per month",
                "category": "Employment",
                "eligibility": {
                    "min_age": 18,
                    "max_age": 35,
                    "education": "SSLC"
                },
                "roadmap": []
            },
            {
                "id": "MOTHER_001",
                "name": "Single Mother Support",
                "benefit": "₹2,000 per month",
                "category": "Women Welfare",
                "eligibility": {
                    "gender": ["female"],
                    "marital_status": "unmarried",
                    "child_age_max": 18,
                    "housing_status": ["rented", "homeless"]
                },
                "roadmap": []
            },
            {
                "id": "BROKEN_001",
                "name": "Broken Rules Scheme",
                "benefit": "Unknown",
                "category": "Misc",
                "eligibility": { "min_age": "sixty" },
                "roadmap": []
            },
            {
                "id": "OPEN_001",
                "name": "Universal Health Cover",
                "benefit": "Free check-ups",
                "category": "Health",
                "eligibility": { "district": ["Kollam"] },
                "roadmap": []
            }
        ]
    });

    SchemeCatalog::from_json_str(&document.to_string()).expect("catalog parses")
}

pub(super) fn service() -> SchemeService {
    SchemeService::new(Arc::new(catalog()))
}

pub(super) fn ids(report: &crate::schemes::EligibilityReport) -> Vec<&str> {
    report
        .eligible_schemes
        .iter()
        .map(|summary| summary.id.as_str())
        .collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
