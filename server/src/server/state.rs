//! Application state for the booking HTTP server.

use crate::service::BookingService;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply via Arc) for each request.
#[derive(Clone)]
pub struct AppState {
    /// Booking service (sessions, reservations, rules)
    pub service: Arc<BookingService>,

    /// Prometheus handle rendering `/metrics`, when a recorder is installed
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state without a metrics endpoint.
    #[must_use]
    pub const fn new(service: Arc<BookingService>) -> Self {
        Self {
            service,
            prometheus: None,
        }
    }

    /// Expose the installed Prometheus recorder at `/metrics`.
    #[must_use]
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}
