//! Domain entities - Extracted items, templates and the saved story records

mod chapter;
mod character;
mod extracted_item;
mod location;
mod story;
mod template;

pub use chapter::Chapter;
pub use character::{
    AbilityType, CharacterAbility, CharacterProfile, CharacterRecord, CharacterRelationship,
    RelationshipKind,
};
pub use extracted_item::{display_value, ExtractedItem, FieldEditError, FieldState, ValueKind};
pub use location::Location;
pub use story::{Story, DRAFT_STATUS};
pub use template::{catalog, Template};
