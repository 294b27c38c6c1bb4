//! Data Transfer Objects - For API boundaries
//!
//! DTOs live in the application layer so the HTTP adapter can
//! serialize/deserialize without shaping the domain model around JSON.

pub mod extraction;
pub mod review;
pub mod saved_data;
pub mod template;

pub use extraction::*;
pub use review::*;
pub use saved_data::*;
pub use template::*;
