pub mod jwt;
pub mod shutdown;
pub mod tracing;
pub mod upload;
