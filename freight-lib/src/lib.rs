//! Freight CRM API client library
//!
//! A Rust async client for the freight-forwarding CRM REST backend: token
//! login, CRUD over every resource, spreadsheet import/export, grid highlight
//! persistence, calendar tasks, site request workflow and user settings.

pub mod api;
pub mod auth;
pub mod error;
pub mod model;
pub mod response;

mod client;

pub use client::*;
pub use response::ListEnvelope;
