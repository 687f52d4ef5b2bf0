//! Request handler module
//!
//! Responsible for request routing dispatch and the student service endpoints:
//! static assets, the HTML views and the JSON API.

pub mod router;
pub mod static_files;
pub mod students;
pub mod views;

// Re-export main entry point
pub use router::handle_request;
