pub mod http;
pub mod library;
