use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{trace, warn};

use crate::error::AppError;

/// Origins permitted to call the API from a browser.
#[derive(Debug, Clone)]
pub struct AllowedOrigins {
    any: bool,
    origins: Vec<HeaderValue>,
}

impl AllowedOrigins {
    /// Builds the allow-list from configured entries. `*` allows any origin;
    /// entries that are not valid header values are skipped.
    pub fn from_config(entries: &[String]) -> Self {
        let any = entries.iter().any(|e| e.trim() == "*");
        let origins = entries
            .iter()
            .map(|e| e.trim())
            .filter(|e| *e != "*" && !e.is_empty())
            .filter_map(|e| match HeaderValue::from_str(e) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid allowed origin: {:?}", e);
                    None
                }
            })
            .collect();
        Self { any, origins }
    }

    pub fn permits(&self, origin: &HeaderValue) -> bool {
        self.any || self.origins.iter().any(|allowed| allowed == origin)
    }

    /// CORS headers for permitted origins.
    pub fn cors_layer(&self) -> CorsLayer {
        let layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);
        if self.any {
            layer.allow_origin(Any)
        } else {
            layer.allow_origin(AllowOrigin::list(self.origins.clone()))
        }
    }
}

/// Rejects requests whose `Origin` header is not on the allow-list with 403.
/// Requests without an `Origin` header (non-browser clients) pass through.
pub async fn reject_disallowed_origin(
    State(allowed): State<AllowedOrigins>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(origin) = req.headers().get(header::ORIGIN) {
        if !allowed.permits(origin) {
            warn!("Request rejected: origin {:?} not allowed", origin);
            return Err(AppError::ForbiddenOrigin);
        }
        trace!("Origin {:?} allowed", origin);
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origins(entries: &[&str]) -> AllowedOrigins {
        let entries: Vec<String> = entries.iter().map(|e| e.to_string()).collect();
        AllowedOrigins::from_config(&entries)
    }

    #[test]
    fn test_only_listed_origins_are_permitted() {
        let allowed = origins(&["http://localhost:8080", "http://localhost:1234"]);

        assert!(allowed.permits(&HeaderValue::from_static("http://localhost:1234")));
        assert!(!allowed.permits(&HeaderValue::from_static("http://evil.example")));
        assert!(!allowed.permits(&HeaderValue::from_static("http://localhost:8081")));
    }

    #[test]
    fn test_wildcard_permits_everything() {
        let allowed = origins(&["*"]);
        assert!(allowed.permits(&HeaderValue::from_static("http://anything.example")));
    }

    #[test]
    fn test_empty_list_permits_nothing() {
        let allowed = origins(&[]);
        assert!(!allowed.permits(&HeaderValue::from_static("http://localhost:8080")));
    }
}
