//! Domain layer - Core records with no infrastructure dependencies
//!
//! This layer contains:
//! - Entities: ExtractedItem, Template, CharacterProfile, Location, Story, Chapter
//! - Value Objects: identifiers, item types, chapter story policy

pub mod entities;
pub mod value_objects;
