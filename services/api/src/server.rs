use crate::cli::ServeArgs;
use crate::infra::{load_catalog, load_guidance, AppState};
use crate::routes::with_ops_routes;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use scheme_navigator::config::{AppConfig, ServerConfig};
use scheme_navigator::error::AppError;
use scheme_navigator::guidance::agent_router;
use scheme_navigator::schemes::{eligibility_router, SchemeService};
use scheme_navigator::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

pub(crate) async fn run_eligibility(args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    apply_overrides(&mut config.server, args);
    telemetry::init(&config.telemetry)?;

    let catalog = Arc::new(load_catalog(&config.data)?);
    let service = Arc::new(SchemeService::new(catalog));

    serve(
        eligibility_router(service),
        &config,
        &config.server,
        "scheme eligibility api",
    )
    .await
}

pub(crate) async fn run_agent(args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    apply_overrides(&mut config.agent, args);
    telemetry::init(&config.telemetry)?;

    let table = Arc::new(load_guidance(&config.data)?);

    serve(
        agent_router(table),
        &config,
        &config.agent,
        "form filling agent",
    )
    .await
}

fn apply_overrides(server: &mut ServerConfig, mut args: ServeArgs) {
    if let Some(host) = args.host.take() {
        server.host = host;
    }
    if let Some(port) = args.port.take() {
        server.port = port;
    }
}

/// Ops routes, shared state, metrics and CORS around a service router.
fn build_app(
    router: Router,
    state: AppState,
    metrics_layer: PrometheusMetricLayer<'static>,
) -> Router {
    with_ops_routes(router)
        .layer(Extension(state))
        .layer(metrics_layer)
        .layer(CorsLayer::very_permissive())
}

async fn serve(
    router: Router,
    config: &AppConfig,
    binding: &ServerConfig,
    service_name: &'static str,
) -> Result<(), AppError> {
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = build_app(router, app_state, prometheus_layer);

    let addr = binding.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, service = service_name, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use scheme_navigator::schemes::SchemeCatalog;
    use tower::ServiceExt;

    fn eligibility_app(ready: bool) -> Router {
        let catalog = SchemeCatalog::from_json_str(
            r#"[{ "id": "OPEN_001", "name": "Open", "benefit": "Any", "category": "Test" }]"#,
        )
        .expect("catalog parses");
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };

        build_app(
            eligibility_router(Arc::new(SchemeService::new(Arc::new(catalog)))),
            state,
            PrometheusMetricLayer::new(),
        )
    }

    #[tokio::test]
    async fn preflight_allows_any_origin_with_credentials() {
        let response = eligibility_app(true)
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/check-eligibility")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&header::HeaderValue::from_static("http://localhost:3000"))
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
            Some(&header::HeaderValue::from_static("true"))
        );
    }

    #[tokio::test]
    async fn built_app_serves_ops_and_service_routes() {
        let app = eligibility_app(true);

        let ready = app
            .clone()
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");
        assert_eq!(ready.status(), StatusCode::OK);

        let metrics = app
            .clone()
            .oneshot(Request::get("/metrics").body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");
        assert_eq!(metrics.status(), StatusCode::OK);

        let check = app
            .oneshot(
                Request::post("/check-eligibility")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::from(r#"{ "age": 30 }"#))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(check.status(), StatusCode::OK);
        assert!(check.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn readiness_is_unavailable_before_bind() {
        let response = eligibility_app(false)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn overrides_replace_configured_binding() {
        let mut binding = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
        };

        apply_overrides(
            &mut binding,
            ServeArgs {
                host: Some("0.0.0.0".to_string()),
                port: None,
            },
        );

        assert_eq!(binding.host, "0.0.0.0");
        assert_eq!(binding.port, 8000);
    }
}
