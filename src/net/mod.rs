//! Network access.

pub mod http;

pub use http::HttpFetcher;
