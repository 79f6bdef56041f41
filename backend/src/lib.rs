//! Contact list distribution server.
//!
//! Admins create agent accounts and upload CSV contact lists; each upload is
//! validated row by row and split as evenly as possible across all agents as
//! one "batch". Agents read back the contacts assigned to them.
//!
//! - `config`: environment-driven settings.
//! - `bootstrap`: schema, default admin and batch-id generator at startup.
//! - `auth`: bearer-token extractors and password hashing.
//! - `services`: the Actix scopes (`/api/auth`, `/api/agents`, `/api/lists`).
//! - `store`: SQLite persistence.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod store;
