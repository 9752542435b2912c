use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use regex::Regex;
use std::sync::{Arc, OnceLock};

use crate::calls;
use crate::AppState;

/// Prefix of every monitor derived from an HTTP request
const MONITOR_PREFIX: &str = "http";

/// Asset extensions that are never monitored
const STATIC_SUFFIXES: &[&str] = &[".css", ".png", ".gif", ".jpg", ".js"];

/// Request valve: times the whole request as the root call of the
/// request's call tree, records it on the monitor named after the route,
/// and adds two response headers:
///
///   X-Response-Time-Us: total request wall time in microseconds
///   Server-Timing: same value in the standard Server-Timing format
pub async fn timing_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    if !is_monitored(&path) {
        return next.run(req).await;
    }

    let method = req.method().clone();
    let name = monitor_name(&path);
    let monitors = &state.monitors;

    let (mut response, split) =
        calls::scope(calls::timed(monitors, &name, next.run(req))).await;
    let us = split.running_for / 1_000;

    // ── Inject response headers ─────────────────────────────────
    if let Ok(val) = us.to_string().parse() {
        response.headers_mut().insert("X-Response-Time-Us", val);
    }

    let server_timing =
        format!("total;dur={:.3}", split.running_for as f64 / 1_000_000.0);
    if let Ok(val) = server_timing.parse() {
        response.headers_mut().insert("Server-Timing", val);
    }

    tracing::debug!(
        status = response.status().as_u16(),
        %method,
        monitor = %name,
        us,
        "request timed"
    );

    response
}

/// Static assets are not worth a monitor.
pub fn is_monitored(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    !STATIC_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

/// Derive a monitor name from a request path: drop any `jsessionid`
/// parameter, replace characters not allowed in monitor names with `_`,
/// turn `/` into `.` and prefix the result.
pub fn monitor_name(path: &str) -> String {
    static JSESSIONID: OnceLock<Regex> = OnceLock::new();
    static UNALLOWED: OnceLock<Regex> = OnceLock::new();

    let jsessionid = JSESSIONID.get_or_init(|| {
        Regex::new(r"(?i)[;&]?jsessionid=[^;?/&]*").expect("valid jsessionid pattern")
    });
    let unallowed = UNALLOWED.get_or_init(|| {
        Regex::new(r"[^-_\[\]A-Za-z0-9.,@$%()<>/]").expect("valid name pattern")
    });

    let name = jsessionid.replace_all(path, "");
    let name = unallowed.replace_all(&name, "_");
    format!("{MONITOR_PREFIX}{}", name.replace('/', "."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_name_from_route() {
        assert_eq!(monitor_name("/api/users/:id"), "http.api.users._id");
        assert_eq!(monitor_name("/api/users"), "http.api.users");
    }

    #[test]
    fn test_monitor_name_strips_session_and_odd_chars() {
        assert_eq!(
            monitor_name("/shop/cart;JSESSIONID=AB12CD/item"),
            "http.shop.cart.item"
        );
        assert_eq!(monitor_name("/search?q=a b"), "http.search_q_a_b");
    }

    #[test]
    fn test_static_assets_are_skipped() {
        assert!(!is_monitored("/static/app.JS"));
        assert!(!is_monitored("/logo.png"));
        assert!(is_monitored("/api/products/:id"));
    }
}
