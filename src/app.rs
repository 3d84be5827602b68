use std::net::SocketAddr;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{
    auth, contracts, dashboard, employees, expenses, invoices, payments, tasks, users, work_hours,
};

pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(users::router())
        .merge(employees::router())
        .merge(contracts::router())
        .merge(work_hours::router())
        .merge(dashboard::router())
        .merge(payments::router())
        .merge(invoices::router())
        .merge(expenses::router())
        .merge(tasks::router())
        .route("/health", get(health))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_router())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::services::JwtKeys, error::ApiError, users::Role};
    use axum::{
        body::Body,
        extract::FromRef,
        http::{header, Method, Request, StatusCode},
    };
    use sqlx::PgPool;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn token(state: &AppState, role: Role) -> String {
        JwtKeys::from_ref(state).sign_access(Uuid::new_v4(), role).unwrap()
    }

    fn request(method: Method, uri: &str, bearer: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        match body {
            Some(b) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(resp: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = build_app(AppState::fake());
        let resp = app.oneshot(request(Method::GET, "/api/health", None, None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["status"], "ok");
    }

    #[tokio::test]
    async fn protected_routes_need_a_token() {
        let app = build_app(AppState::fake());
        let resp = app.oneshot(request(Method::GET, "/api/contracts", None, None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(json_body(resp).await["error"].is_string());
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let app = build_app(AppState::fake());
        let resp = app
            .oneshot(request(Method::GET, "/api/dashboard", Some("not-a-jwt"), None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn plain_users_cannot_create_users() {
        let state = AppState::fake();
        let bearer = token(&state, Role::User);
        let body = json!({ "email": "new@site.co.uk", "role": "user" });
        let resp = build_app(state)
            .oneshot(request(Method::POST, "/api/users", Some(&bearer), Some(body)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn plain_users_cannot_write_payments() {
        let state = AppState::fake();
        let bearer = token(&state, Role::User);
        let body = json!({
            "employee_id": Uuid::new_v4(),
            "week_label": "2025-03-10 - 2025-03-16",
        });
        let resp = build_app(state)
            .oneshot(request(Method::POST, "/api/payments", Some(&bearer), Some(body)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn week_submission_without_site_is_rejected() {
        let state = AppState::fake();
        let bearer = token(&state, Role::Manager);
        let employee = Uuid::new_v4().to_string();
        let body = json!({
            "weekLabel": "2025-03-10 - 2025-03-16",
            "hourData": {
                employee: {
                    "2025-03-10 - 2025-03-16": {
                        "E hënë": { "hours": 8 }
                    }
                }
            }
        });
        let resp = build_app(state)
            .oneshot(request(Method::POST, "/api/work-hours", Some(&bearer), Some(body)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let err = json_body(resp).await;
        assert!(err["error"].as_str().unwrap().contains("site"));
    }

    #[tokio::test]
    async fn malformed_week_label_is_rejected() {
        let state = AppState::fake();
        let bearer = token(&state, Role::Admin);
        let body = json!({ "weekLabel": "last week", "hourData": {} });
        let resp = build_app(state)
            .oneshot(request(Method::POST, "/api/work-hours", Some(&bearer), Some(body)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_body_is_a_json_bad_request() {
        let state = AppState::fake();
        let bearer = token(&state, Role::Admin);
        let resp = build_app(state)
            .oneshot(request(Method::POST, "/api/contracts", Some(&bearer), Some(json!({}))))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(resp).await["error"].is_string());
    }

    #[tokio::test]
    async fn bad_path_id_is_a_json_bad_request() {
        let state = AppState::fake();
        let bearer = token(&state, Role::Admin);
        let resp = build_app(state)
            .oneshot(request(Method::GET, "/api/contracts/not-a-uuid", Some(&bearer), None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(resp).await["error"].is_string());
    }

    #[tokio::test]
    async fn bad_query_is_a_json_bad_request() {
        let state = AppState::fake();
        let bearer = token(&state, Role::Admin);
        let resp = build_app(state)
            .oneshot(request(Method::GET, "/api/users?employee_id=nope", Some(&bearer), None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(resp).await["error"].is_string());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn contract_round_trip(pool: PgPool) {
        let state = AppState::with_pool(pool);
        let bearer = token(&state, Role::Manager);
        let app = build_app(state);
        let body = json!({
            "company": "Acme Build",
            "site_name": "Camden",
            "contract_value": 125000.0,
            "start_date": "2025-01-06",
            "finish_date": "2025-06-30",
        });

        let resp = app
            .clone()
            .oneshot(request(Method::POST, "/api/contracts", Some(&bearer), Some(body.clone())))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created = json_body(resp).await;
        assert_eq!(created["contract_number"], "1");

        let uri = format!("/api/contracts/{}", created["id"].as_str().unwrap());
        let resp = app
            .clone()
            .oneshot(request(Method::GET, &uri, Some(&bearer), None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let fetched = json_body(resp).await;
        let fields = [
            "contract_number",
            "company",
            "site_name",
            "contract_value",
            "start_date",
            "finish_date",
            "status",
        ];
        for field in fields {
            assert_eq!(fetched[field], created[field], "{field}");
        }
        assert_eq!(fetched["start_date"], "2025-01-06");

        let mut duplicate = body;
        duplicate["contract_number"] = json!("1");
        let resp = app
            .clone()
            .oneshot(request(Method::POST, "/api/contracts", Some(&bearer), Some(duplicate)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let early_finish = json!({ "finish_date": "2024-12-31" });
        let resp = app
            .oneshot(request(Method::PUT, &uri, Some(&bearer), Some(early_finish)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn payment_round_trip_and_duplicate_week(pool: PgPool) {
        let state = AppState::with_pool(pool);
        let bearer = token(&state, Role::Admin);
        let app = build_app(state);

        let employee = json!({ "first_name": "Arben", "last_name": "Hoxha", "hourly_rate": 15.0 });
        let resp = app
            .clone()
            .oneshot(request(Method::POST, "/api/employees", Some(&bearer), Some(employee)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let employee_id = json_body(resp).await["id"].as_str().unwrap().to_string();

        let payment = json!({
            "employee_id": employee_id,
            "week_label": "2025-03-10 - 2025-03-16",
            "gross_amount": 500.0,
        });
        let resp = app
            .clone()
            .oneshot(request(Method::POST, "/api/payments", Some(&bearer), Some(payment.clone())))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created = json_body(resp).await;

        let uri = format!("/api/payments/{employee_id}");
        let resp = app
            .clone()
            .oneshot(request(Method::GET, &uri, Some(&bearer), None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let listed = json_body(resp).await;
        let rows = listed.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], created["id"]);
        assert_eq!(rows[0]["week_label"], "2025-03-10 - 2025-03-16");
        assert_eq!(rows[0]["gross_amount"], created["gross_amount"]);
        assert_eq!(rows[0]["net_amount"], created["net_amount"]);
        assert_eq!(rows[0]["is_paid"], false);

        let resp = app
            .oneshot(request(Method::POST, "/api/payments", Some(&bearer), Some(payment)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert!(json_body(resp).await["error"].as_str().unwrap().contains("already exists"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn constraint_violations_are_client_errors(pool: PgPool) {
        const CONTRACT: &str = "INSERT INTO contracts \
            (contract_number, company, site_name, contract_value, start_date, finish_date) \
            VALUES ('7', 'Acme', 'Camden', 10, '2025-01-06', '2025-02-06')";
        sqlx::query(CONTRACT).execute(&pool).await.unwrap();
        let err = sqlx::query(CONTRACT).execute(&pool).await.unwrap_err();
        let err = ApiError::from(anyhow::Error::from(err).context("insert contract"));
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err = sqlx::query(
            "INSERT INTO expenses (contract_id, date, expense_type) VALUES ($1, '2025-01-06', 'Materiale')",
        )
        .bind(Uuid::new_v4())
        .execute(&pool)
        .await
        .unwrap_err();
        let err = ApiError::from(anyhow::Error::from(err).context("insert expense"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
