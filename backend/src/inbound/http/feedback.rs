//! Feedback lifecycle handlers.
//!
//! ```text
//! POST /feedback {"employee_id":"e1","strengths":"...","improvements":"...","sentiment":"positive","tags":["clarity"]}
//! GET /feedback/{employee_id}
//! PUT /feedback/{feedback_id} {"sentiment":"neutral"}
//! POST /feedback/{feedback_id}/ack
//! ```
//!
//! The submit body's `employee_id` field carries the employee's *username*,
//! matching the contract the front-end was built against.

use actix_web::{HttpResponse, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::SubmitFeedbackRequest;
use crate::domain::{
    Error, FeedbackEdit, FeedbackId, FeedbackRecord, FeedbackText, FeedbackValidationError,
    Sentiment, Tags, UserId, Username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::BearerToken;
use crate::inbound::http::state::HttpState;

/// Wire representation of one feedback record.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FeedbackDto {
    pub id: Uuid,
    pub manager_id: Uuid,
    pub employee_id: Uuid,
    pub strengths: String,
    pub improvements: String,
    pub sentiment: Sentiment,
    pub tags: Vec<String>,
    pub acknowledged: bool,
    /// Edit counter; send it back as `expected_version` to detect lost updates.
    pub version: u64,
    pub created_at: DateTime<Utc>,
}

impl From<FeedbackRecord> for FeedbackDto {
    fn from(record: FeedbackRecord) -> Self {
        Self {
            id: record.id().into_uuid(),
            manager_id: record.manager_id().into_uuid(),
            employee_id: record.employee_id().into_uuid(),
            strengths: record.strengths().as_str().to_owned(),
            improvements: record.improvements().as_str().to_owned(),
            sentiment: record.sentiment(),
            tags: record.tags().as_slice().to_vec(),
            acknowledged: record.acknowledged(),
            version: record.version(),
            created_at: record.created_at(),
        }
    }
}

fn map_feedback_validation_error(field: &str, err: FeedbackValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn parse_sentiment(raw: &str) -> Result<Sentiment, Error> {
    raw.parse::<Sentiment>()
        .map_err(|err| map_feedback_validation_error("sentiment", err))
}

/// Submission request body for `POST /feedback`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SubmitRequest {
    /// Username of the receiving employee.
    pub employee_id: String,
    pub strengths: String,
    pub improvements: String,
    /// One of `positive`, `neutral`, `negative`.
    pub sentiment: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TryFrom<SubmitRequest> for SubmitFeedbackRequest {
    type Error = Error;

    fn try_from(value: SubmitRequest) -> Result<Self, Self::Error> {
        let employee_username = Username::new(value.employee_id).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": "employee_id" }))
        })?;
        Ok(Self {
            employee_username,
            strengths: FeedbackText::new(value.strengths)
                .map_err(|err| map_feedback_validation_error("strengths", err))?,
            improvements: FeedbackText::new(value.improvements)
                .map_err(|err| map_feedback_validation_error("improvements", err))?,
            sentiment: parse_sentiment(&value.sentiment)?,
            tags: Tags::new(value.tags),
        })
    }
}

/// Submit feedback to a team member. Managers only.
#[utoipa::path(
    post,
    path = "/feedback",
    request_body = SubmitRequest,
    responses(
        (status = 201, description = "Feedback stored", body = FeedbackDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller is not the employee's manager", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["feedback"],
    operation_id = "submitFeedback"
)]
#[post("/feedback")]
pub async fn submit_feedback(
    state: web::Data<HttpState>,
    bearer: BearerToken,
    payload: web::Json<SubmitRequest>,
) -> ApiResult<HttpResponse> {
    let ctx = state.authenticate(&bearer).await?;
    let request = SubmitFeedbackRequest::try_from(payload.into_inner())?;
    let record = state.feedback.submit(&ctx, request).await?;
    Ok(HttpResponse::Created().json(FeedbackDto::from(record)))
}

/// Feedback listing payload for `GET /feedback/{employee_id}`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FeedbackListResponse {
    pub feedback: Vec<FeedbackDto>,
}

/// List an employee's feedback, newest first.
///
/// Managers may list their own team members; employees only themselves.
#[utoipa::path(
    get,
    path = "/feedback/{employee_id}",
    params(("employee_id" = Uuid, Path, description = "Employee user id")),
    responses(
        (status = 200, description = "Feedback records", body = FeedbackListResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Employee is outside the caller's scope", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["feedback"],
    operation_id = "listFeedback"
)]
#[get("/feedback/{employee_id}")]
pub async fn list_feedback(
    state: web::Data<HttpState>,
    bearer: BearerToken,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<FeedbackListResponse>> {
    let ctx = state.authenticate(&bearer).await?;
    let employee_id = UserId::new(path.into_inner());
    let records = state.feedback_query.list_for_employee(&ctx, employee_id).await?;
    Ok(web::Json(FeedbackListResponse {
        feedback: records.into_iter().map(FeedbackDto::from).collect(),
    }))
}

/// Edit request body for `PUT /feedback/{feedback_id}`. Absent fields are
/// left untouched.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct EditRequest {
    pub strengths: Option<String>,
    pub improvements: Option<String>,
    pub sentiment: Option<String>,
    pub tags: Option<Vec<String>>,
    /// When supplied, the edit fails with 409 if the record has moved on.
    pub expected_version: Option<u64>,
}

impl TryFrom<EditRequest> for FeedbackEdit {
    type Error = Error;

    fn try_from(value: EditRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            strengths: value
                .strengths
                .map(|text| {
                    FeedbackText::new(text)
                        .map_err(|err| map_feedback_validation_error("strengths", err))
                })
                .transpose()?,
            improvements: value
                .improvements
                .map(|text| {
                    FeedbackText::new(text)
                        .map_err(|err| map_feedback_validation_error("improvements", err))
                })
                .transpose()?,
            sentiment: value
                .sentiment
                .as_deref()
                .map(parse_sentiment)
                .transpose()?,
            tags: value.tags.map(Tags::new),
            expected_version: value.expected_version,
        })
    }
}

/// Edit a feedback record. Only the original author may edit.
#[utoipa::path(
    put,
    path = "/feedback/{feedback_id}",
    params(("feedback_id" = Uuid, Path, description = "Feedback record id")),
    request_body = EditRequest,
    responses(
        (status = 200, description = "Updated record", body = FeedbackDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller is not the author", body = Error),
        (status = 404, description = "Unknown feedback record", body = Error),
        (status = 409, description = "Stale expected_version", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["feedback"],
    operation_id = "editFeedback"
)]
#[put("/feedback/{feedback_id}")]
pub async fn edit_feedback(
    state: web::Data<HttpState>,
    bearer: BearerToken,
    path: web::Path<Uuid>,
    payload: web::Json<EditRequest>,
) -> ApiResult<web::Json<FeedbackDto>> {
    let ctx = state.authenticate(&bearer).await?;
    let id = FeedbackId::new(path.into_inner());
    let edit = FeedbackEdit::try_from(payload.into_inner())?;
    let record = state.feedback.edit(&ctx, id, edit).await?;
    Ok(web::Json(FeedbackDto::from(record)))
}

/// Acknowledge a feedback record. Only its subject may acknowledge; repeats
/// succeed without further effect.
#[utoipa::path(
    post,
    path = "/feedback/{feedback_id}/ack",
    params(("feedback_id" = Uuid, Path, description = "Feedback record id")),
    responses(
        (status = 200, description = "Acknowledged record", body = FeedbackDto),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller is not the subject", body = Error),
        (status = 404, description = "Unknown feedback record", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["feedback"],
    operation_id = "acknowledgeFeedback"
)]
#[post("/feedback/{feedback_id}/ack")]
pub async fn acknowledge_feedback(
    state: web::Data<HttpState>,
    bearer: BearerToken,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<FeedbackDto>> {
    let ctx = state.authenticate(&bearer).await?;
    let id = FeedbackId::new(path.into_inner());
    let record = state.feedback.acknowledge(&ctx, id).await?;
    Ok(web::Json(FeedbackDto::from(record)))
}
