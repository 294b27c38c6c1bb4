//! Object storage adapters

mod local_storage;

pub use local_storage::LocalObjectStorage;
