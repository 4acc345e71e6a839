//! Outbound HTTP transport to the upstream inference API.

mod http;

pub use http::HttpTransport;
