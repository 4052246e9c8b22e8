//! Activity catalogue endpoint.

use super::WebResult;
use crate::server::state::AppState;
use axum::{Json, extract::State};
use serde::Serialize;

/// One activity and its booking constraints.
#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    /// Activity name
    pub name: String,
    /// Maximum participants per session
    pub capacity: u32,
    /// Whether every participant must give an attire size
    pub requires_attire_size: bool,
    /// Minimum participant age, if any
    pub minimum_age: Option<u32>,
}

/// List the activity catalogue, in name order.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/api/activities
/// # [{"name":"Jardinería","capacity":12,"requires_attire_size":false,"minimum_age":null}, ...]
/// ```
///
/// # Errors
///
/// Never fails; the signature matches the other handlers.
pub async fn list_activities(
    State(state): State<AppState>,
) -> WebResult<Json<Vec<ActivityResponse>>> {
    let activities = state
        .service
        .activities()
        .into_iter()
        .map(|(name, rule)| ActivityResponse {
            capacity: rule.capacity(),
            requires_attire_size: rule.requires_attire_size,
            minimum_age: rule.minimum_age,
            name,
        })
        .collect();

    Ok(Json(activities))
}
