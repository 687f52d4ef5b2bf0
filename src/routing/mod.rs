//! Routing module
//!
//! Maps a method and path to one of the service endpoints.

mod matcher;

pub use matcher::{PathParams, PathPattern};

use hyper::Method;
use std::sync::OnceLock;

/// Every endpoint the service exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Index,
    ViewStudents,
    ListStudents,
    GetStudent,
    CreateStudent,
    UpdateStudent,
    DeleteStudent,
}

struct RouteEntry {
    method: Method,
    pattern: PathPattern,
    endpoint: Endpoint,
}

fn route_table() -> &'static [RouteEntry] {
    static ROUTES: OnceLock<Vec<RouteEntry>> = OnceLock::new();
    ROUTES.get_or_init(|| {
        let entry = |method: Method, pattern: &str, endpoint| RouteEntry {
            method,
            pattern: PathPattern::parse(pattern),
            endpoint,
        };
        vec![
            entry(Method::GET, "/", Endpoint::Index),
            entry(Method::GET, "/viewStudents", Endpoint::ViewStudents),
            entry(Method::GET, "/api/students", Endpoint::ListStudents),
            entry(Method::GET, "/api/students/:id", Endpoint::GetStudent),
            entry(Method::POST, "/api/students", Endpoint::CreateStudent),
            entry(Method::PUT, "/api/students/:id", Endpoint::UpdateStudent),
            entry(Method::DELETE, "/api/students/:id", Endpoint::DeleteStudent),
        ]
    })
}

/// Resolve a request to an endpoint; `HEAD` resolves like `GET`
pub fn resolve(method: &Method, path: &str) -> Option<(Endpoint, PathParams)> {
    let method = if method == Method::HEAD {
        &Method::GET
    } else {
        method
    };

    route_table()
        .iter()
        .filter(|route| route.method == *method)
        .find_map(|route| route.pattern.matches(path).map(|p| (route.endpoint, p)))
}
