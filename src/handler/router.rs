//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: static assets first, then route
//! matching, body decoding and dispatch to the student handlers. Every
//! response gets a `Server` header and, when enabled, an access log line.

use crate::config::AppState;
use crate::handler::{static_files, students, views};
use crate::http;
use crate::logger::{self, AccessLogEntry, AccessLogFormat};
use crate::registry::{decode_body, BodyError, FieldMap};
use crate::routing::{self, Endpoint, PathParams};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_LENGTH, CONTENT_TYPE, SERVER,
};
use hyper::{Method, Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let started = Instant::now();
    let access_entry = state
        .access_log_enabled()
        .then(|| access_entry_for(&req, remote_addr));

    let mut response = route_request(req, &state).await;

    if let Ok(name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, name);
    }
    if state.config.http.enable_cors {
        response
            .headers_mut()
            .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        let format = AccessLogFormat::parse(&state.config.logging.access_log_format);
        logger::log_access(&entry, &format);
    }

    Ok(response)
}

fn access_entry_for<B>(req: &Request<B>, remote_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

/// Route request to static assets or an endpoint
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let is_head = method == Method::HEAD;

    if method == Method::OPTIONS {
        return http::build_options_response(state.config.http.enable_cors);
    }

    // 1. Static assets shadow the application routes
    if method == Method::GET || is_head {
        let if_none_match = header_str(req.headers(), "if-none-match");
        if let Some(resp) = static_files::serve_static(
            &state.config.http.public_dir,
            &path,
            is_head,
            if_none_match.as_deref(),
        )
        .await
        {
            return resp;
        }
    }

    // 2. Application routes
    let Some((endpoint, params)) = routing::resolve(&method, &path) else {
        return http::build_404_response(method.as_str(), &path, is_head);
    };

    dispatch(endpoint, &params, req, state, is_head).await
}

async fn dispatch<B>(
    endpoint: Endpoint,
    params: &PathParams,
    req: Request<B>,
    state: &AppState,
    is_head: bool,
) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let id = params.get("id").unwrap_or_default();

    let mut response = match endpoint {
        Endpoint::Index => {
            http::build_html_response(StatusCode::OK, views::render_index(), is_head)
        }
        Endpoint::ViewStudents => {
            let registry = state.registry.read().await;
            let html = views::render_student_list(views::STUDENT_LIST_TITLE, registry.list());
            http::build_html_response(StatusCode::OK, html, is_head)
        }
        Endpoint::ListStudents => students::list_students(state).await,
        Endpoint::GetStudent => students::get_student(state, id).await,
        Endpoint::DeleteStudent => students::delete_student(state, id).await,
        Endpoint::CreateStudent => match read_fields(req, state.config.http.max_body_size).await {
            Ok(fields) => students::create_student(state, &fields).await,
            Err(e) => body_error_response(&e),
        },
        Endpoint::UpdateStudent => match read_fields(req, state.config.http.max_body_size).await {
            Ok(fields) => students::update_student(state, id, &fields).await,
            Err(e) => body_error_response(&e),
        },
    };

    if is_head {
        *response.body_mut() = Full::new(Bytes::new());
    }
    response
}

/// Read and decode a request body, enforcing `max_body_size`
async fn read_fields<B>(req: Request<B>, max_body_size: u64) -> Result<FieldMap, BodyError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let content_type = header_str(req.headers(), CONTENT_TYPE.as_str());

    if let Some(declared) = header_str(req.headers(), CONTENT_LENGTH.as_str()) {
        match declared.trim().parse::<u64>() {
            Ok(size) if size > max_body_size => {
                return Err(BodyError::TooLarge { max: max_body_size });
            }
            Ok(_) => {}
            Err(_) => logger::log_warning(&format!(
                "Invalid Content-Length value: '{declared}', skipping size check"
            )),
        }
    }

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let bytes = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            return Err(BodyError::TooLarge { max: max_body_size });
        }
        Err(e) => return Err(BodyError::Read(e.to_string())),
    };

    decode_body(content_type.as_deref(), &bytes)
}

fn body_error_response(err: &BodyError) -> Response<Full<Bytes>> {
    match err {
        BodyError::TooLarge { .. } => {
            logger::log_warning(&err.to_string());
            http::build_413_response()
        }
        BodyError::InvalidJson(_) | BodyError::Read(_) => http::build_400_response(&err.to_string()),
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
