pub mod middleware;

pub use middleware::request_tracing;
