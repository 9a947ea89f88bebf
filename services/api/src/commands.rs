use crate::infra::{load_catalog, load_guidance};
use clap::Args;
use scheme_navigator::config::AppConfig;
use scheme_navigator::error::AppError;
use scheme_navigator::guidance::GuidanceEntry;
use scheme_navigator::schemes::{EligibilityReport, RoadmapView, SchemeService, UserProfile};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct CheckArgs {
    /// Applicant age in years
    #[arg(long)]
    pub(crate) age: Option<u32>,
    /// Applicant gender (e.g. male, female, other)
    #[arg(long)]
    pub(crate) gender: Option<String>,
    /// Household income, in the unit the dataset uses
    #[arg(long)]
    pub(crate) income: Option<f64>,
    /// Ration card colour (yellow, pink, blue, white)
    #[arg(long)]
    pub(crate) ration_card: Option<String>,
    /// Highest education, free text
    #[arg(long)]
    pub(crate) education: Option<String>,
    /// Housing status (owned, rented, homeless)
    #[arg(long)]
    pub(crate) housing_status: Option<String>,
    /// Marital status
    #[arg(long)]
    pub(crate) marital_status: Option<String>,
    /// Age of the youngest child in years
    #[arg(long)]
    pub(crate) child_age: Option<u32>,
}

impl CheckArgs {
    fn into_profile(self) -> UserProfile {
        let mut profile = UserProfile::default();
        if let Some(age) = self.age {
            profile = profile.with_age(age);
        }
        if let Some(gender) = self.gender {
            profile = profile.with_gender(gender);
        }
        if let Some(income) = self.income {
            profile = profile.with_income(income);
        }
        if let Some(ration_card) = self.ration_card {
            profile = profile.with_ration_card(ration_card);
        }
        if let Some(education) = self.education {
            profile = profile.with_education(education);
        }
        if let Some(housing_status) = self.housing_status {
            profile = profile.with_housing_status(housing_status);
        }
        if let Some(marital_status) = self.marital_status {
            profile = profile.with_marital_status(marital_status);
        }
        if let Some(child_age) = self.child_age {
            profile = profile.with_child_age(child_age);
        }
        profile
    }
}

#[derive(Args, Debug)]
pub(crate) struct RoadmapArgs {
    /// Scheme identifier, e.g. PENSION_001
    pub(crate) scheme_id: String,
}

#[derive(Args, Debug)]
pub(crate) struct GuidanceArgs {
    /// Scheme identifier, e.g. STHREE_001
    pub(crate) scheme_id: String,
    /// Application step number
    pub(crate) step: i64,
}

fn scheme_service() -> Result<SchemeService, AppError> {
    let config = AppConfig::load()?;
    let catalog = load_catalog(&config.data)?;
    Ok(SchemeService::new(Arc::new(catalog)))
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let service = scheme_service()?;
    let report = service.find_eligible(&args.into_profile());
    print!("{}", render_report(&report));
    Ok(())
}

pub(crate) fn run_roadmap(args: RoadmapArgs) -> Result<(), AppError> {
    let service = scheme_service()?;
    let view = service.roadmap(&args.scheme_id)?;
    print!("{}", render_roadmap(&view));
    Ok(())
}

pub(crate) fn run_guidance(args: GuidanceArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let table = load_guidance(&config.data)?;
    let entry = table.guidance(&args.scheme_id, args.step);
    print!("{}", render_guidance(&args.scheme_id, args.step, &entry));
    Ok(())
}

fn render_report(report: &EligibilityReport) -> String {
    if report.total_eligible == 0 {
        return "No eligible schemes found\n".to_string();
    }

    let mut out = format!("Eligible for {} scheme(s)\n", report.total_eligible);
    for scheme in &report.eligible_schemes {
        out.push_str(&format!(
            "- [{}] {} ({}): {}\n",
            scheme.category, scheme.name, scheme.id, scheme.benefit
        ));
    }
    out
}

fn render_roadmap(view: &RoadmapView) -> String {
    let mut out = format!("{}\nBenefit: {}\n", view.scheme_name, view.benefit);
    if let Some(url) = &view.official_url {
        out.push_str(&format!("Apply at: {url}\n"));
    }

    out.push_str("\nApplication steps\n");
    for (position, step) in view.roadmap.iter().enumerate() {
        let number = step.number().unwrap_or(position as u64 + 1);
        let title = step.text("title").unwrap_or("Untitled step");
        out.push_str(&format!("{number}. {title}\n"));
        if let Some(action) = step.text("action") {
            out.push_str(&format!("   Action: {action}\n"));
        }
        match (step.text("method"), step.text("time")) {
            (Some(method), Some(time)) => {
                out.push_str(&format!("   Method: {method} | Time: {time}\n"))
            }
            (Some(method), None) => out.push_str(&format!("   Method: {method}\n")),
            (None, Some(time)) => out.push_str(&format!("   Time: {time}\n")),
            (None, None) => {}
        }
        let documents = step.documents();
        if !documents.is_empty() {
            out.push_str(&format!("   Required: {}\n", documents.join(", ")));
        }
        if let Some(location) = step.text("location") {
            out.push_str(&format!("   Location: {location}\n"));
        }
    }
    out
}

fn render_guidance(scheme_id: &str, step: i64, entry: &GuidanceEntry) -> String {
    let mut out = format!("Guidance for {scheme_id}, step {step}\n");
    for instruction in &entry.instructions {
        out.push_str(&format!("- {instruction}\n"));
    }
    if !entry.field_mappings.is_empty() {
        out.push_str("\nFields\n");
        for (field, hint) in &entry.field_mappings {
            out.push_str(&format!("- {field}: {hint}\n"));
        }
    }
    for warning in &entry.warnings {
        out.push_str(&format!("! {warning}\n"));
    }
    out.push_str(&format!("Next: {}\n", entry.next_action));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scheme_navigator::schemes::{Attribute, SchemeCatalog, Years};

    fn sample_service() -> SchemeService {
        let catalog = SchemeCatalog::from_json_str(
            r#"[
                {
                    "id": "PENSION_001",
                    "name": "Old Age Pension",
                    "benefit": "₹1,600 per month",
                    "category": "Pension",
                    "official_url": "https://pension.example.gov.in",
                    "eligibility": { "min_age": 60 },
                    "roadmap": [
                        {
                            "step": 1,
                            "title": "Collect form",
                            "action": "Visit the Panchayat",
                            "method": "Offline",
                            "time": "1 day",
                            "documents": ["Aadhaar card", "Ration card"],
                            "location": "Gram Panchayat"
                        },
                        { "title": "Submit" }
                    ]
                }
            ]"#,
        )
        .expect("catalog parses");
        SchemeService::new(Arc::new(catalog))
    }

    #[test]
    fn check_args_only_set_supplied_attributes() {
        let profile = CheckArgs {
            age: Some(65),
            ration_card: Some("yellow".to_string()),
            ..CheckArgs::default()
        }
        .into_profile();

        assert_eq!(profile.age, Attribute::Provided(Years(65)));
        assert!(profile.income.is_absent());
        assert!(profile.gender.is_absent());
    }

    #[test]
    fn renders_matching_and_empty_reports() {
        let service = sample_service();

        let matched = render_report(&service.find_eligible(&UserProfile::default().with_age(70)));
        assert!(matched.starts_with("Eligible for 1 scheme(s)"));
        assert!(matched.contains("[Pension] Old Age Pension (PENSION_001)"));

        let empty = render_report(&service.find_eligible(&UserProfile::default().with_age(30)));
        assert_eq!(empty, "No eligible schemes found\n");
    }

    #[test]
    fn renders_roadmap_steps() {
        let view = sample_service().roadmap("PENSION_001").expect("scheme exists");
        let text = render_roadmap(&view);

        assert!(text.contains("Apply at: https://pension.example.gov.in"));
        assert!(text.contains("1. Collect form"));
        assert!(text.contains("Method: Offline | Time: 1 day"));
        assert!(text.contains("Required: Aadhaar card, Ration card"));
        assert!(text.contains("2. Submit"));
    }

    #[test]
    fn renders_guidance_fallbacks() {
        let text = render_guidance("UNKNOWN_ID", 1, &GuidanceEntry::not_configured());
        assert!(text.contains("AI guidance not yet configured"));
        assert!(text.ends_with("Next: Follow the instructions provided\n"));
        assert!(!text.contains("Fields"));
    }
}
