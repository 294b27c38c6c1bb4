//! Character entity - a saved character profile and its child rows

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{
    CharacterAbilityId, CharacterProfileId, CharacterRelationshipId, UserId,
};

/// A row of `character_profiles`
///
/// Several free-text columns are legacy comma-joined renderings of list
/// data; the `*_array` columns carry the same lists verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterProfile {
    pub id: CharacterProfileId,
    pub user_id: UserId,
    pub full_name: String,
    pub title: Option<String>,
    pub age: Option<String>,
    pub species_race: Option<String>,
    pub role_in_story: Option<String>,
    pub backstory: Option<String>,
    pub core_motivation: Option<String>,
    pub tragic_flaw: Option<String>,
    pub emotional_tone: Option<String>,
    pub voice_tone: Option<String>,
    pub affiliations: Option<String>,
    pub summary_tagline: Option<String>,
    pub notable_traits: Option<String>,
    pub affiliations_array: Option<Vec<String>>,
    pub notable_traits_array: Option<Vec<String>>,
    pub catchphrases_array: Option<Vec<String>>,
    pub notable_features_array: Option<Vec<String>>,
    pub confidence_score: f64,
    pub inferred: bool,
    pub outfit_breakdown: Option<String>,
    pub pose_description: Option<String>,
    pub silhouette_notes: Option<String>,
    pub signature_weapon_tools: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CharacterProfile {
    pub fn new(user_id: UserId, full_name: impl Into<String>) -> Self {
        Self {
            id: CharacterProfileId::new(),
            user_id,
            full_name: full_name.into(),
            title: None,
            age: None,
            species_race: None,
            role_in_story: None,
            backstory: None,
            core_motivation: None,
            tragic_flaw: None,
            emotional_tone: None,
            voice_tone: None,
            affiliations: None,
            summary_tagline: None,
            notable_traits: None,
            affiliations_array: None,
            notable_traits_array: None,
            catchphrases_array: None,
            notable_features_array: None,
            confidence_score: 0.9,
            inferred: false,
            outfit_breakdown: None,
            pose_description: None,
            silhouette_notes: None,
            signature_weapon_tools: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityType {
    Skill,
    Power,
}

impl AbilityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbilityType::Skill => "skill",
            AbilityType::Power => "power",
        }
    }
}

/// A row of `character_abilities`
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterAbility {
    pub id: CharacterAbilityId,
    pub character_id: CharacterProfileId,
    pub ability_type: AbilityType,
    pub name: String,
    pub description: Option<String>,
}

impl CharacterAbility {
    pub fn new(character_id: CharacterProfileId, ability_type: AbilityType, name: impl Into<String>) -> Self {
        Self {
            id: CharacterAbilityId::new(),
            character_id,
            ability_type,
            name: name.into(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    Ally,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::Ally => "ally",
        }
    }
}

/// A row of `character_relationships`
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterRelationship {
    pub id: CharacterRelationshipId,
    pub character_id: CharacterProfileId,
    pub character_name: String,
    pub relationship_type: RelationshipKind,
    pub description: Option<String>,
}

impl CharacterRelationship {
    pub fn new(
        character_id: CharacterProfileId,
        relationship_type: RelationshipKind,
        character_name: impl Into<String>,
    ) -> Self {
        Self {
            id: CharacterRelationshipId::new(),
            character_id,
            character_name: character_name.into(),
            relationship_type,
            description: None,
        }
    }
}

/// A profile together with the child rows written alongside it
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterRecord {
    pub profile: CharacterProfile,
    pub abilities: Vec<CharacterAbility>,
    pub relationships: Vec<CharacterRelationship>,
}
