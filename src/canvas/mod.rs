//! Canvas module providing the API abstraction, the HTTP client, and data
//! models.

pub mod api;
pub mod client;
pub mod models;

pub use api::CanvasApi;
pub use client::CanvasClient;
pub use models::{Assignment, AssignmentGroup, PageRecord, PageSummary, PageWrite};
