//! Request handlers.

pub mod auth;
pub mod health;
pub mod medications;
pub mod patients;
pub mod treatment_options;
pub mod treatments;
pub mod users;
