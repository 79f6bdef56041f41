//! Bearer-token authentication.
//!
//! `POST /api/auth/login` issues an opaque token stored in the `sessions`
//! table. Handlers ask for an `Identity` (any signed-in user) or an
//! `AdminIdentity` (role `admin`) and Actix resolves it from the
//! `Authorization: Bearer <token>` header before the handler runs.

pub mod identity;
pub mod password;

pub use identity::{AdminIdentity, Identity};
