//! Value objects - Immutable objects defined by their attributes

mod ids;
mod item_type;
mod story_policy;

pub use ids::*;
pub use item_type::{Confidence, ItemType};
pub use story_policy::{ChapterStoryPolicy, PLACEHOLDER_STORY_TITLE};
