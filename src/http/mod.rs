//! HTTP protocol layer module
//!
//! Response builders and the small pieces of HTTP semantics the handlers share.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_400_response, build_404_response, build_413_response,
    build_html_response, build_options_response, build_static_response, json_response,
};
