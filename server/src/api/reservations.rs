//! Reservation API endpoints.
//!
//! - POST /api/reservations - Book a party into a session
//! - GET /api/reservations/:id - Get a confirmed reservation
//! - DELETE /api/reservations/:id - Cancel a reservation and free its places

use super::{WebResult, hhmm};
use crate::error::ServiceError;
use crate::server::state::AppState;
use crate::service::BookingRequest;
use crate::store::StoredReservation;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{NaiveDate, NaiveTime};
use ecopark_core::{NationalId, Participant, ReservationId, SessionId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// One participant in a booking request.
#[derive(Debug, Deserialize)]
pub struct ParticipantRequest {
    /// Full name (letters and spaces)
    pub name: String,
    /// National identity document number
    pub national_id: u64,
    /// Age in years
    pub age: u32,
    /// Attire size, for activities that need one
    #[serde(default)]
    pub attire_size: Option<String>,
}

/// Request to book a session.
#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    /// Activity name
    pub activity: String,
    /// Session date (`YYYY-MM-DD`)
    pub date: NaiveDate,
    /// Session time (`HH:MM`)
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    /// Everyone being enrolled
    pub participants: Vec<ParticipantRequest>,
    /// Contact email for the confirmation
    pub email: String,
    /// Whether terms and conditions were accepted
    #[serde(default)]
    pub consent_given: bool,
}

/// Reservation details response.
#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    /// Reservation ID
    pub reservation_id: ReservationId,
    /// Session ID
    pub session_id: SessionId,
    /// Activity name
    pub activity: String,
    /// Session date
    pub date: NaiveDate,
    /// Session time
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    /// Enrolled participants
    pub participants: Vec<Participant>,
    /// Party size
    pub total_participants: u32,
    /// Contact email
    pub contact_email: String,
    /// Terms and conditions accepted
    pub consent_given: bool,
}

impl From<StoredReservation> for ReservationResponse {
    fn from(stored: StoredReservation) -> Self {
        let reservation = stored.reservation;
        let session = reservation.session();

        Self {
            reservation_id: stored.id,
            session_id: session.id,
            activity: session.activity.clone(),
            date: session.date,
            time: session.time,
            participants: reservation.participants().to_vec(),
            total_participants: reservation.total_participants(),
            contact_email: reservation.contact_email().to_string(),
            consent_given: reservation.consent_given(),
        }
    }
}

/// Response after booking.
#[derive(Debug, Serialize)]
pub struct CreateReservationResponse {
    /// The confirmed reservation
    #[serde(flatten)]
    pub reservation: ReservationResponse,
    /// Message for the user
    pub message: String,
}

/// Response after cancelling a reservation.
#[derive(Debug, Serialize)]
pub struct CancelReservationResponse {
    /// Cancelled reservation ID
    pub reservation_id: ReservationId,
    /// Places given back to the session
    pub released: u32,
    /// Message for the user
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Book a party into a session.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/reservations \
///   -H "Content-Type: application/json" \
///   -d '{
///     "activity": "Tirolesa",
///     "date": "2025-06-04",
///     "time": "14:00",
///     "participants": [
///       { "name": "Beto Gomez", "national_id": 25678901, "age": 28, "attire_size": "L" }
///     ],
///     "email": "beto@example.com",
///     "consent_given": true
///   }'
/// ```
///
/// Returns 201 with the reservation, or an error whose `code` names the rule
/// that rejected the booking (e.g. `NO_CAPACITY`).
///
/// # Errors
///
/// See [`AppError`](super::AppError) for the status mapping.
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(request): Json<CreateReservationRequest>,
) -> WebResult<(StatusCode, Json<CreateReservationResponse>)> {
    let participants = request
        .participants
        .into_iter()
        .map(|p| {
            Participant::new(p.name, NationalId::new(p.national_id), p.age, p.attire_size)
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(ServiceError::from)?;

    let stored = state
        .service
        .book(BookingRequest {
            activity: request.activity,
            date: request.date,
            time: request.time,
            participants,
            contact_email: request.email,
            consent_given: request.consent_given,
        })
        .await?;

    let reservation = ReservationResponse::from(stored);
    let message = format!(
        "Booking confirmed for {} on {} at {}",
        reservation.activity,
        reservation.date.format("%d/%m/%Y"),
        reservation.time.format("%H:%M"),
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateReservationResponse {
            reservation,
            message,
        }),
    ))
}

/// Get a reservation.
///
/// # Errors
///
/// 404 if the reservation does not exist.
pub async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<Json<ReservationResponse>> {
    let stored = state.service.reservation(ReservationId::from_uuid(id))?;
    Ok(Json(stored.into()))
}

/// Cancel a reservation.
///
/// The session's occupied count goes down by the party size, never below
/// zero.
///
/// # Errors
///
/// 404 if the reservation does not exist.
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<Json<CancelReservationResponse>> {
    let cancelled = state.service.cancel(ReservationId::from_uuid(id)).await?;
    let released = cancelled.reservation.total_participants();

    Ok(Json(CancelReservationResponse {
        reservation_id: cancelled.id,
        released,
        message: format!("Reservation cancelled, {released} place(s) released"),
    }))
}
