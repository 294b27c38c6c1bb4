//! Outbound ports - Interfaces that the application requires from external systems

mod repository_port;
mod storage_port;

pub use repository_port::{
    ChapterRepositoryPort, CharacterRepositoryPort, LocationRepositoryPort, Repositories,
    RepositoryError, StoryRepositoryPort,
};
pub use storage_port::{ObjectStoragePort, StorageError};
