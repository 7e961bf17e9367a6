//! End-to-end scenarios exercising the full HTTP surface against the
//! in-memory adapters.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::Duration;
use mockable::DefaultClock;
use serde_json::{Value, json};

use backend::inbound::http::health::HealthState;
use backend::server::{build_app, build_state};

fn app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = web::Data::new(build_state(Duration::hours(1), Arc::new(DefaultClock)));
    build_app(state, web::Data::new(HealthState::new()))
}

async fn post_json<S, B>(app: &S, uri: &str, token: Option<&str>, body: &Value) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let mut request = actix_test::TestRequest::post().uri(uri).set_json(body);
    if let Some(token) = token {
        request = request.insert_header(("Authorization", format!("Bearer {token}")));
    }
    actix_test::call_service(app, request.to_request()).await
}

async fn put_json<S, B>(app: &S, uri: &str, token: &str, body: &Value) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = actix_test::TestRequest::put()
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(body)
        .to_request();
    actix_test::call_service(app, request).await
}

async fn get<S, B>(app: &S, uri: &str, token: &str) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = actix_test::TestRequest::get()
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    actix_test::call_service(app, request).await
}

async fn body_json<B: MessageBody>(response: ServiceResponse<B>) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON body")
}

async fn register<S, B>(app: &S, username: &str, role: &str, team: &[&str]) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    post_json(
        app,
        "/register",
        None,
        &json!({
            "username": username,
            "password": "pw",
            "role": role,
            "team": team,
        }),
    )
    .await
}

async fn login<S, B>(app: &S, username: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = post_json(
        app,
        "/login",
        None,
        &json!({ "username": username, "password": "pw" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login of {username}");
    body_json(response).await["access_token"]
        .as_str()
        .expect("access token")
        .to_owned()
}

async fn own_id<S, B>(app: &S, token: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = get(app, "/users/me", token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["id"]
        .as_str()
        .expect("user id")
        .to_owned()
}

#[actix_web::test]
async fn feedback_lifecycle_from_submission_to_edit() {
    let app = actix_test::init_service(app()).await;
    assert_eq!(
        register(&app, "e1", "employee", &[]).await.status(),
        StatusCode::CREATED
    );
    assert_eq!(
        register(&app, "m1", "manager", &["e1"]).await.status(),
        StatusCode::CREATED
    );
    let m1 = login(&app, "m1").await;
    let e1 = login(&app, "e1").await;
    let e1_id = own_id(&app, &e1).await;

    // m1 submits positive feedback to e1.
    let response = post_json(
        &app,
        "/feedback",
        Some(&m1),
        &json!({
            "employee_id": "e1",
            "strengths": "clear communication",
            "improvements": "estimation accuracy",
            "sentiment": "positive",
            "tags": ["clarity", "pace"],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let record = body_json(response).await;
    let feedback_id = record["id"].as_str().expect("feedback id").to_owned();
    let created_at = record["created_at"].as_str().expect("timestamp").to_owned();

    // e1 sees one unacknowledged record.
    let response = get(&app, &format!("/feedback/{e1_id}"), &e1).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    let feedback = listing["feedback"].as_array().expect("feedback array");
    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0]["acknowledged"], false);
    assert_eq!(feedback[0]["tags"], json!(["clarity", "pace"]));

    // e1 acknowledges; a re-list shows the flag set.
    let response = post_json(
        &app,
        &format!("/feedback/{feedback_id}/ack"),
        Some(&e1),
        &json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get(&app, &format!("/feedback/{e1_id}"), &e1).await;
    let listing = body_json(response).await;
    assert_eq!(listing["feedback"][0]["acknowledged"], true);

    // m1 edits the sentiment; acknowledgement and timestamp are untouched.
    let response = put_json(
        &app,
        &format!("/feedback/{feedback_id}"),
        &m1,
        &json!({ "sentiment": "neutral" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, &format!("/feedback/{e1_id}"), &e1).await;
    let listing = body_json(response).await;
    let record = &listing["feedback"][0];
    assert_eq!(record["sentiment"], "neutral");
    assert_eq!(record["acknowledged"], true);
    assert_eq!(record["created_at"], created_at.as_str());
    assert_eq!(record["version"], 1);
}

#[actix_web::test]
async fn acknowledgement_is_idempotent() {
    let app = actix_test::init_service(app()).await;
    register(&app, "e1", "employee", &[]).await;
    register(&app, "m1", "manager", &["e1"]).await;
    let m1 = login(&app, "m1").await;
    let e1 = login(&app, "e1").await;

    let response = post_json(
        &app,
        "/feedback",
        Some(&m1),
        &json!({
            "employee_id": "e1",
            "strengths": "s",
            "improvements": "i",
            "sentiment": "neutral",
        }),
    )
    .await;
    let feedback_id = body_json(response).await["id"]
        .as_str()
        .expect("feedback id")
        .to_owned();

    for _ in 0..2 {
        let response = post_json(
            &app,
            &format!("/feedback/{feedback_id}/ack"),
            Some(&e1),
            &json!({}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["acknowledged"], true);
    }
}

#[actix_web::test]
async fn stale_edits_conflict_and_leave_the_record_alone() {
    let app = actix_test::init_service(app()).await;
    register(&app, "e1", "employee", &[]).await;
    register(&app, "m1", "manager", &["e1"]).await;
    let m1 = login(&app, "m1").await;
    let e1 = login(&app, "e1").await;
    let e1_id = own_id(&app, &e1).await;

    let response = post_json(
        &app,
        "/feedback",
        Some(&m1),
        &json!({
            "employee_id": "e1",
            "strengths": "s",
            "improvements": "i",
            "sentiment": "positive",
        }),
    )
    .await;
    let feedback_id = body_json(response).await["id"]
        .as_str()
        .expect("feedback id")
        .to_owned();

    // First edit moves the record to version 1.
    let response = put_json(
        &app,
        &format!("/feedback/{feedback_id}"),
        &m1,
        &json!({ "sentiment": "neutral", "expected_version": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // A second edit based on version 0 is stale.
    let response = put_json(
        &app,
        &format!("/feedback/{feedback_id}"),
        &m1,
        &json!({ "sentiment": "negative", "expected_version": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = get(&app, &format!("/feedback/{e1_id}"), &e1).await;
    let listing = body_json(response).await;
    assert_eq!(listing["feedback"][0]["sentiment"], "neutral");
}

#[actix_web::test]
async fn employees_cannot_read_each_other() {
    let app = actix_test::init_service(app()).await;
    register(&app, "e1", "employee", &[]).await;
    register(&app, "e2", "employee", &[]).await;
    let e1 = login(&app, "e1").await;
    let e2 = login(&app, "e2").await;
    let e1_id = own_id(&app, &e1).await;

    let response = get(&app, &format!("/feedback/{e1_id}"), &e2).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let error = body_json(response).await;
    assert_eq!(error["code"], "forbidden");
}

#[actix_web::test]
async fn editing_anothers_feedback_is_forbidden() {
    let app = actix_test::init_service(app()).await;
    register(&app, "e1", "employee", &[]).await;
    register(&app, "m1", "manager", &["e1"]).await;
    register(&app, "m2", "manager", &[]).await;
    let m1 = login(&app, "m1").await;
    let m2 = login(&app, "m2").await;

    let response = post_json(
        &app,
        "/feedback",
        Some(&m1),
        &json!({
            "employee_id": "e1",
            "strengths": "s",
            "improvements": "i",
            "sentiment": "positive",
        }),
    )
    .await;
    let feedback_id = body_json(response).await["id"]
        .as_str()
        .expect("feedback id")
        .to_owned();

    let response = put_json(
        &app,
        &format!("/feedback/{feedback_id}"),
        &m2,
        &json!({ "sentiment": "negative" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn team_binding_rules_are_enforced_at_registration() {
    let app = actix_test::init_service(app()).await;
    register(&app, "e1", "employee", &[]).await;
    register(&app, "m1", "manager", &["e1"]).await;

    // Unknown member.
    let response = register(&app, "m2", "manager", &["ghost"]).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Already-claimed employee: first writer wins.
    let response = register(&app, "m3", "manager", &["e1"]).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Managers are not valid team members.
    register(&app, "e2", "employee", &[]).await;
    let response = register(&app, "m4", "manager", &["m1"]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Employees may not declare a team.
    let response = register(&app, "e3", "employee", &["e2"]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Duplicate username.
    let response = register(&app, "e1", "employee", &[]).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn protected_endpoints_reject_missing_and_bogus_tokens() {
    let app = actix_test::init_service(app()).await;

    let request = actix_test::TestRequest::get().uri("/team").to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(&app, "/team", "not-a-real-token").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let error = body_json(response).await;
    assert_eq!(error["code"], "unauthorized");
}

#[actix_web::test]
async fn health_probes_respond() {
    let app = actix_test::init_service(app()).await;

    let request = actix_test::TestRequest::get()
        .uri("/health/live")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The test app never marks itself ready.
    let request = actix_test::TestRequest::get()
        .uri("/health/ready")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
