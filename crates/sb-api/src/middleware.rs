//! suggestion-box/crates/sb-api/src/middleware.rs Middleware
//!
//! Request logging and cross-origin policy.

use actix_cors::Cors;
use actix_web::middleware::Logger;

/// remote-ip "request-line" status-code response-size "referrer" "user-agent" duration
pub fn standard_middleware() -> Logger {
    Logger::new(r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %Dms"#)
}

// A browser front end served from another origin drives the whole API.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allow_any_header()
        .max_age(3600)
}
