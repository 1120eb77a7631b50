pub mod auth;
pub mod catalog;
mod error;
mod fetcher;
pub mod http;
pub mod manifest;
pub mod parser;
pub mod tracing;
pub mod types;

pub use error::Error;
pub use fetcher::{builder::MediaFetcherBuilder, FetchConfig, MediaFetcher};
