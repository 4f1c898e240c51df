//! Domain models shared by the store, the services and the HTTP layer.

pub mod auth;
pub mod clinic;
