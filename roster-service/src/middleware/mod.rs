//! Middleware: request tracking, logging, rate limiting and security headers

pub mod rate_limit;
pub mod request_logging;
pub mod request_tracking;
pub mod security_headers;

pub use rate_limit::{client_key, ListingRateLimit};
pub use request_logging::{log_requests, Completion};
pub use request_tracking::{
    apply_request_tracking, request_id_layer, request_id_propagation_layer,
    sensitive_headers, sensitive_headers_layer,
};
pub use security_headers::apply_security_headers;
