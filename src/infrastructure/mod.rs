//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: SQLite adapter for story records
//! - Storage: filesystem object storage for uploaded documents
//! - Export: JSON download of reviewed items
//! - HTTP: REST API routes
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod export;
pub mod http;
pub mod persistence;
pub mod state;
pub mod storage;
