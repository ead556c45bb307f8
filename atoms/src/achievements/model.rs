use serde::{Deserialize, Serialize};

/// Fixed rarity tiers driving card visual treatment.
/// Not editable over the API; the color token maps to a FE style class.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn all() -> [Rarity; 5] {
        [
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::Epic,
            Rarity::Legendary,
        ]
    }

    pub fn id(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Rarity::Common => "bg-rarity-common",
            Rarity::Uncommon => "bg-rarity-uncommon",
            Rarity::Rare => "bg-rarity-rare",
            Rarity::Epic => "bg-rarity-epic",
            Rarity::Legendary => "bg-rarity-legendary",
        }
    }

    pub fn parse(id: &str) -> Option<Rarity> {
        Rarity::all().into_iter().find(|r| r.id() == id)
    }
}

/// Achievement domain model - one unlockable card in the showcase
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub rarity: Rarity,
    /// Category id; open set, extensible through the admin surface
    pub category: String,
    /// Durable image URL (https or data URI). `blob:` schemes are rejected at write time.
    pub image: String,
    pub requirements: String,
    pub reward: String,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAchievementPayload {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub rarity: Rarity,
    pub category: String,
    pub image: Option<String>,
    pub requirements: Option<String>,
    pub reward: Option<String>,
    pub unlocked: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAchievementPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub rarity: Option<Rarity>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub requirements: Option<String>,
    pub reward: Option<String>,
    pub unlocked: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SetImagePayload {
    pub image: String,
}

/// Image shown when an achievement has no durable image of its own.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Required-field validation applied before any save.
pub fn validate(title: &str, description: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title is required".to_string());
    }
    if description.trim().is_empty() {
        return Err("Description is required".to_string());
    }
    Ok(())
}

/// Resolve the id for a new achievement: keep a non-empty requested id,
/// otherwise generate a UUID.
pub fn resolve_id(requested: Option<&str>) -> String {
    match requested {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => uuid::Uuid::new_v4().to_string(),
    }
}

/// Repair empty or duplicate ids in a loaded list. Every achievement leaves
/// with a non-empty id unique within the list.
pub fn repair_ids(achievements: &mut [Achievement]) {
    let mut seen = std::collections::HashSet::new();
    for achievement in achievements.iter_mut() {
        if achievement.id.trim().is_empty() || !seen.insert(achievement.id.clone()) {
            let id = uuid::Uuid::new_v4().to_string();
            seen.insert(id.clone());
            achievement.id = id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn achievement(id: &str) -> Achievement {
        Achievement {
            id: id.to_string(),
            title: "Sweet Home".to_string(),
            description: "Build your first house".to_string(),
            rarity: Rarity::Common,
            category: "building".to_string(),
            image: PLACEHOLDER_IMAGE.to_string(),
            requirements: "A house with a bed".to_string(),
            reward: "Basic house templates".to_string(),
            unlocked: false,
            created_at: String::new(),
        }
    }

    #[test]
    fn resolve_id_generates_when_missing() {
        let generated = resolve_id(None);
        assert!(!generated.is_empty());
        assert_ne!(resolve_id(None), generated);
        assert_eq!(resolve_id(Some("first-house")), "first-house");
        assert_ne!(resolve_id(Some("   ")), "   ");
    }

    #[test]
    fn repair_ids_fixes_empty_and_duplicate() {
        let mut list = vec![achievement("a1"), achievement(""), achievement("a1")];
        repair_ids(&mut list);
        assert_eq!(list[0].id, "a1");
        assert!(!list[1].id.is_empty());
        assert_ne!(list[2].id, "a1");
        let ids: std::collections::HashSet<_> = list.iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn validate_rejects_blank_required_fields() {
        assert!(validate("Sweet Home", "Build a house").is_ok());
        assert!(validate("", "Build a house").is_err());
        assert!(validate("Sweet Home", "   ").is_err());
    }

    #[test]
    fn rarity_round_trips_through_lowercase_ids() {
        for rarity in Rarity::all() {
            assert_eq!(Rarity::parse(rarity.id()), Some(rarity));
            let json = serde_json::to_string(&rarity).unwrap();
            assert_eq!(json, format!("\"{}\"", rarity.id()));
        }
        assert_eq!(Rarity::parse("mythic"), None);
        assert_eq!(Rarity::Legendary.color(), "bg-rarity-legendary");
    }
}
