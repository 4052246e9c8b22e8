//! Session availability endpoint.

use super::{WebResult, hhmm};
use crate::server::state::AppState;
use crate::service::SessionAvailability;
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{NaiveDate, NaiveTime};
use ecopark_core::SessionId;
use serde::{Deserialize, Serialize};

/// Query parameters for listing sessions.
#[derive(Debug, Deserialize)]
pub struct SessionsQuery {
    /// Only sessions on this date; from today onwards when absent
    pub date: Option<NaiveDate>,
}

/// A session with its free places.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Session ID
    pub session_id: SessionId,
    /// Activity name
    pub activity: String,
    /// Session date
    pub date: NaiveDate,
    /// Start time
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    /// Places already taken
    pub occupied: u32,
    /// Maximum participants
    pub capacity: Option<u32>,
    /// Places left
    pub available: Option<u32>,
}

impl From<SessionAvailability> for SessionResponse {
    fn from(availability: SessionAvailability) -> Self {
        let available = availability.available();
        let session = availability.session;

        Self {
            session_id: session.id,
            occupied: session.occupied(),
            activity: session.activity,
            date: session.date,
            time: session.time,
            capacity: availability.capacity,
            available,
        }
    }
}

/// List sessions in chronological order.
///
/// # Example
///
/// ```bash
/// curl "http://localhost:8080/api/sessions?date=2025-06-04"
/// ```
///
/// # Errors
///
/// 500 if the session store is unavailable.
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<SessionsQuery>,
) -> WebResult<Json<Vec<SessionResponse>>> {
    let sessions = state.service.sessions(query.date)?;
    Ok(Json(sessions.into_iter().map(SessionResponse::from).collect()))
}
