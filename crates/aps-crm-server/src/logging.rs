//! Logging
//!
//! Subscriber setup and the per-request logging middleware. The middleware
//! also turns every error response into a problem body carrying the request
//! method and path.

use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::Instant;

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{ConnectInfo, Request},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use regex::Regex;
use tracing::Instrument;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;
use crate::error::{ProblemDetail, PROBLEM_JSON};

const REQUEST_BODY_LOG_LIMIT: usize = 2000;
const ERROR_BODY_LOG_LIMIT: usize = 1000;
const MAX_BUFFERED_BODY: usize = 10 * 1024 * 1024;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Text => registry.with(fmt::layer().with_target(false)).init(),
    }
}

fn secret_fields() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?i)"(password|confirmPassword|token|accessToken|refreshToken|secret|otp)"\s*:\s*"[^"]*""#,
        )
        .ok()
    })
    .as_ref()
}

/// Replace credential values in a JSON body with `***`
pub fn mask_secrets(body: &str) -> String {
    match secret_fields() {
        Some(re) => re.replace_all(body, r#""$1":"***""#).into_owned(),
        None => body.to_string(),
    }
}

/// Cut `text` to at most `max` characters
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}... (truncated)", &text[..idx]),
        None => text.to_string(),
    }
}

fn is_static_asset(path: &str) -> bool {
    path == "/favicon.ico"
        || path.starts_with("/swagger-ui")
        || [".css", ".js", ".png", ".jpg", ".svg", ".ico", ".map", ".woff2"]
            .iter()
            .any(|ext| path.ends_with(ext))
}

fn client_ip(request: &Request) -> String {
    let headers = request.headers();
    header_str(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
        .filter(|ip| !ip.is_empty())
        .or_else(|| header_str(headers, "x-real-ip").map(str::to_string))
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|info| info.0.ip().to_string())
        })
        .unwrap_or_else(|| "-".to_string())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn is_json(headers: &HeaderMap) -> bool {
    header_str(headers, header::CONTENT_TYPE.as_str()).is_some_and(|ct| ct.contains("json"))
}

/// Request logging middleware
pub async fn request_logging(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if is_static_asset(&path) {
        return next.run(request).await;
    }

    let request_id: String = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();
    let method = request.method().clone();
    let span = tracing::info_span!(
        "request",
        id = %request_id,
        method = %method,
        uri = %path,
        query = request.uri().query().unwrap_or(""),
        client_ip = %client_ip(&request),
        user_agent = header_str(request.headers(), header::USER_AGENT.as_str()).unwrap_or("-"),
    );

    async move {
        let started = Instant::now();
        tracing::info!(">>> REQUEST {} {}", method, path);

        let request = match log_request_body(request).await {
            Ok(request) => request,
            Err(response) => return response,
        };

        let response = next.run(request).await;
        let status = response.status();
        let mut response = if status.is_client_error() || status.is_server_error() {
            problem_response(response, &method, &path).await
        } else {
            response
        };

        let elapsed = started.elapsed().as_millis();
        if status.is_server_error() {
            tracing::error!("<<< RESPONSE {} | {} ms", status.as_u16(), elapsed);
        } else if status.is_client_error() {
            tracing::warn!("<<< RESPONSE {} | {} ms", status.as_u16(), elapsed);
        } else {
            tracing::info!("<<< RESPONSE {} | {} ms", status.as_u16(), elapsed);
        }

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}

async fn log_request_body(request: Request) -> Result<Request, Response> {
    let wants_body = matches!(*request.method(), Method::POST | Method::PUT | Method::PATCH)
        && is_json(request.headers())
        && tracing::enabled!(tracing::Level::DEBUG);
    if !wants_body {
        return Ok(request);
    }

    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_BUFFERED_BODY).await.map_err(|_| {
        ProblemDetail::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            ProblemDetail::default_title(StatusCode::PAYLOAD_TOO_LARGE),
            "Request body could not be read",
        )
        .into_response()
    })?;
    let text = String::from_utf8_lossy(&bytes);
    tracing::debug!(
        "Request body: {}",
        truncate(&mask_secrets(&text), REQUEST_BODY_LOG_LIMIT)
    );
    Ok(Request::from_parts(parts, Body::from(bytes)))
}

/// Rewrite an error response as a problem body with instance, method and path
async fn problem_response(response: Response, method: &Method, path: &str) -> Response {
    let (mut parts, body) = response.into_parts();
    let bytes = to_bytes(body, MAX_BUFFERED_BODY)
        .await
        .unwrap_or_else(|_| Bytes::new());

    let problem = if is_json(&parts.headers) {
        serde_json::from_slice::<ProblemDetail>(&bytes).ok()
    } else {
        None
    };
    let mut problem = problem.unwrap_or_else(|| {
        // Json extractor rejections of well-formed but mistyped bodies
        if parts.status == StatusCode::UNPROCESSABLE_ENTITY {
            parts.status = StatusCode::BAD_REQUEST;
        }
        let text = String::from_utf8_lossy(&bytes).trim().to_string();
        let detail = if text.is_empty() {
            parts
                .status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        } else {
            text
        };
        ProblemDetail::new(parts.status, ProblemDetail::default_title(parts.status), detail)
    });
    problem.instance = Some(path.to_string());
    problem.method = Some(method.to_string());
    problem.path = Some(path.to_string());

    let body = serde_json::to_vec(&problem).unwrap_or_default();
    tracing::debug!(
        "Error body: {}",
        truncate(&String::from_utf8_lossy(&body), ERROR_BODY_LOG_LIMIT)
    );

    parts.headers.remove(header::CONTENT_LENGTH);
    parts
        .headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON));
    Response::from_parts(parts, Body::from(body))
}
