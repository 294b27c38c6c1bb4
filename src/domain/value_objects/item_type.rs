//! Item type and confidence tags carried by every extracted item

use serde::{Deserialize, Serialize};

/// The closed set of templates an item can be extracted with
///
/// Declaration order is the extraction priority order: characters first,
/// then locations, the story summary and finally the chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Character,
    Location,
    Story,
    Chapter,
}

impl ItemType {
    pub const ALL: [ItemType; 4] = [
        ItemType::Character,
        ItemType::Location,
        ItemType::Story,
        ItemType::Chapter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Character => "character",
            ItemType::Location => "location",
            ItemType::Story => "story",
            ItemType::Chapter => "chapter",
        }
    }
}

impl std::str::FromStr for ItemType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "character" => Ok(ItemType::Character),
            "location" => Ok(ItemType::Location),
            "story" => Ok(ItemType::Story),
            "chapter" => Ok(ItemType::Chapter),
            other => Err(format!("Unknown item type: {}", other)),
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an item's content was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Read directly from the source text
    Extracted,
    /// Fabricated or defaulted
    Inferred,
}

impl Confidence {
    /// Score written to `character_profiles.confidence_score`
    pub fn score(&self) -> f64 {
        match self {
            Confidence::Extracted => 0.9,
            Confidence::Inferred => 0.6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_serializes_lowercase() {
        let json = serde_json::to_string(&ItemType::Chapter).unwrap();
        assert_eq!(json, "\"chapter\"");
        let parsed: ItemType = serde_json::from_str("\"location\"").unwrap();
        assert_eq!(parsed, ItemType::Location);
    }

    #[test]
    fn test_unknown_item_type_is_rejected() {
        assert!(serde_json::from_str::<ItemType>("\"artifact\"").is_err());
        assert!("artifact".parse::<ItemType>().is_err());
        assert_eq!(" Story ".parse::<ItemType>(), Ok(ItemType::Story));
    }

    #[test]
    fn test_priority_order_matches_declaration() {
        let mut shuffled = vec![ItemType::Chapter, ItemType::Character, ItemType::Story, ItemType::Location];
        shuffled.sort();
        assert_eq!(shuffled, ItemType::ALL.to_vec());
    }
}
