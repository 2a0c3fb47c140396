//! Shared API types for the Eventdeck events service.
//!
//! This crate is the **single source of truth** for all request/response
//! types exchanged with the backing service, including the realtime
//! attendee-update payload carried over the WebSocket channel.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Events ──────────────────────────────────────────────────────────────────

/// A single event as stored on the server.
///
/// `attendees` keeps arrival order for display, but behaves as a set keyed by
/// user id: [`EventRecord::add_attendee`] is a no-op for an id that is already
/// present, so duplicate deliveries of the same attendee notification cannot
/// inflate the count. `attendees_count` is redundant wire data; every local
/// mutation goes through `add_attendee`, which keeps it equal to
/// `attendees.len()`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(rename = "attendeesCount", default)]
    pub attendees_count: usize,
}

impl EventRecord {
    /// Insert a user id into the attendee set.
    ///
    /// Returns `true` if the id was newly added, `false` if it was already
    /// present. Recomputes `attendees_count` from the set either way, so the
    /// count can never diverge from the list.
    pub fn add_attendee(&mut self, user_id: &str) -> bool {
        let added = if self.attendees.iter().any(|a| a == user_id) {
            false
        } else {
            self.attendees.push(user_id.to_string());
            true
        };
        self.attendees_count = self.attendees.len();
        added
    }
}

/// Body for `POST /api/events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
}

/// Body for `PUT /api/events/{id}` — a partial event. Attendees are never
/// part of an edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
}

// ─── Realtime channel ────────────────────────────────────────────────────────

/// One frame on the attendee-update channel: some session (possibly this one)
/// attended an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttendeeUpdate {
    #[serde(rename = "eventId")]
    pub event_id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

// ─── Auth ────────────────────────────────────────────────────────────────────

/// Email + password login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// New account registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Returned by both login and signup.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthTokenResponse {
    pub token: String,
    pub user_id: String,
}

// ─── Misc ────────────────────────────────────────────────────────────────────

/// Generic success acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// Response for `GET /api/health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
