//! # EcoPark Booking Server
//!
//! HTTP service that books visitor parties into guided activity sessions.
//!
//! Every booking goes through [`ecopark_core::BookingValidator`]; this crate
//! adds everything around it:
//!
//! - [`catalog`]: activity catalogue loading and session seeding
//! - [`store`]: in-memory sessions and reservations (also the validator's
//!   reservation history)
//! - [`service`]: find the session, validate, commit, under one commit lock
//! - [`api`] and [`server`]: the Axum router and its handlers
//! - [`config`]: environment-driven configuration
//! - [`metrics`]: Prometheus business metrics
//!
//! # Architecture
//!
//! ```text
//! HTTP request
//!      │
//!      ▼
//! ┌──────────┐   ┌────────────────┐   ┌──────────────────┐
//! │ handlers │──▶│ BookingService │──▶│ BookingValidator │
//! └──────────┘   └────────────────┘   └──────────────────┘
//!                        │                │           │
//!                        ▼                ▼           ▼
//!                ┌───────────────┐   history   QueuedNotifier
//!                │ InMemoryStore │◀────┘        (SMTP/console)
//!                └───────────────┘
//! ```

#![forbid(unsafe_code)]

pub mod api;
pub mod bootstrap;
pub mod catalog;
pub mod config;
pub mod error;
pub mod metrics;
pub mod server;
pub mod service;
pub mod store;

pub use config::Config;
pub use error::{ConfigError, ServiceError, StoreError};
pub use server::{AppState, build_router};
pub use service::{BookingRequest, BookingService, SessionAvailability};
pub use store::{InMemoryStore, StoredReservation};
