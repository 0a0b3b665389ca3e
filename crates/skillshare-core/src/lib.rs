//! Cross-cutting service plumbing: health probes, tracing, request ids,
//! graceful shutdown, and small serde / sea-orm helpers.

pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod shutdown;
pub mod tracing;
