//! Types shared between the distribution backend and its API clients.
//!
//! - `model`: validated value objects (contacts, assigned items, batches, users).
//! - `requests`: JSON payloads accepted by the API.
//! - `responses`: JSON envelopes returned by the API.

pub mod model;
pub mod requests;
pub mod responses;
