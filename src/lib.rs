// Library exports for Agora
// This allows integration tests and the binary to share the server modules

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod pagination;
pub mod routes;
pub mod state;
pub mod validation;
