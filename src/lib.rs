pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod mail;
pub mod models;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
