//! Dashboard handlers.
//!
//! ```text
//! GET /dashboard/manager
//! GET /dashboard/employee
//! ```

use std::collections::BTreeMap;

use actix_web::{get, web};
use serde::{Deserialize, Serialize};

use crate::domain::FeedbackSummary;
use crate::domain::ports::ManagerDashboard;
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::BearerToken;
use crate::inbound::http::feedback::FeedbackDto;
use crate::inbound::http::state::HttpState;

/// Sentiment trend buckets over a team's feedback.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SentimentTrends {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl From<FeedbackSummary> for SentimentTrends {
    fn from(summary: FeedbackSummary) -> Self {
        Self {
            positive: summary.positive,
            neutral: summary.neutral,
            negative: summary.negative,
        }
    }
}

/// Manager dashboard payload for `GET /dashboard/manager`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ManagerDashboardResponse {
    /// Feedback record count per team member, keyed by username.
    pub feedback_count: BTreeMap<String, usize>,
    pub sentiment_trends: SentimentTrends,
    pub total_feedback: usize,
}

impl From<ManagerDashboard> for ManagerDashboardResponse {
    fn from(dashboard: ManagerDashboard) -> Self {
        Self {
            feedback_count: dashboard
                .feedback_count
                .into_iter()
                .map(|member| (member.username.into(), member.count))
                .collect(),
            total_feedback: dashboard.summary.total,
            sentiment_trends: dashboard.summary.into(),
        }
    }
}

/// Aggregate view over the caller's team. Managers only.
#[utoipa::path(
    get,
    path = "/dashboard/manager",
    responses(
        (status = 200, description = "Team dashboard", body = ManagerDashboardResponse),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Caller is not a manager", body = crate::domain::Error),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["dashboard"],
    operation_id = "managerDashboard"
)]
#[get("/dashboard/manager")]
pub async fn manager_dashboard(
    state: web::Data<HttpState>,
    bearer: BearerToken,
) -> ApiResult<web::Json<ManagerDashboardResponse>> {
    let ctx = state.authenticate(&bearer).await?;
    let dashboard = state.dashboard.manager_dashboard(&ctx).await?;
    Ok(web::Json(ManagerDashboardResponse::from(dashboard)))
}

/// Employee dashboard payload for `GET /dashboard/employee`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EmployeeDashboardResponse {
    /// The caller's feedback, newest first.
    pub timeline: Vec<FeedbackDto>,
}

/// The caller's own feedback timeline. Employees only.
#[utoipa::path(
    get,
    path = "/dashboard/employee",
    responses(
        (status = 200, description = "Feedback timeline", body = EmployeeDashboardResponse),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Caller is not an employee", body = crate::domain::Error),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["dashboard"],
    operation_id = "employeeDashboard"
)]
#[get("/dashboard/employee")]
pub async fn employee_dashboard(
    state: web::Data<HttpState>,
    bearer: BearerToken,
) -> ApiResult<web::Json<EmployeeDashboardResponse>> {
    let ctx = state.authenticate(&bearer).await?;
    let timeline = state.dashboard.employee_timeline(&ctx).await?;
    Ok(web::Json(EmployeeDashboardResponse {
        timeline: timeline.into_iter().map(FeedbackDto::from).collect(),
    }))
}
