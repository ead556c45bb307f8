use blockhall_atoms::achievements::model::{Achievement, Rarity, PLACEHOLDER_IMAGE};
use blockhall_atoms::categories::model::Category;

fn achievement(
    id: &str,
    title: &str,
    description: &str,
    rarity: Rarity,
    category: &str,
    requirements: &str,
    reward: &str,
    unlocked: bool,
) -> Achievement {
    Achievement {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        rarity,
        category: category.to_string(),
        image: PLACEHOLDER_IMAGE.to_string(),
        requirements: requirements.to_string(),
        reward: reward.to_string(),
        unlocked,
        created_at: String::new(),
    }
}

/// Bundled achievement list, used when a local store is empty or corrupt and
/// for demo sessions.
pub fn seed_achievements() -> Vec<Achievement> {
    vec![
        achievement(
            "first-house",
            "Home Sweet Home",
            "Build your first house with at least a place to sleep, storage and crafting.",
            Rarity::Common,
            "building",
            "Build a house with a bed, a chest and a crafting table",
            "Unlocks basic house templates",
            true,
        ),
        achievement(
            "village-renovation",
            "Village Architect",
            "Completely renovate a village with at least 5 houses in your own style.",
            Rarity::Uncommon,
            "building",
            "Renovate 5 structures in a village",
            "Unlocks village decorations",
            false,
        ),
        achievement(
            "redstone-genius",
            "Redstone Engineer",
            "Create a complex redstone mechanism using at least 3 different components.",
            Rarity::Rare,
            "redstone",
            "Use pistons, repeaters and comparators in a single mechanism",
            "Unlocks advanced redstone projects",
            false,
        ),
        achievement(
            "garden-master",
            "Landscaper",
            "Create a garden with at least 8 different kinds of plants and flowers.",
            Rarity::Uncommon,
            "decoration",
            "Use 8 kinds of plants in a single garden",
            "Unlocks landscaping designs",
            false,
        ),
        achievement(
            "castle-creator",
            "Imposing Castle",
            "Build a complete castle with walls, towers and a moat.",
            Rarity::Epic,
            "megaproject",
            "Build a castle with at least 4 towers and a full wall",
            "Unlocks medieval structure designs",
            false,
        ),
        achievement(
            "modern-architect",
            "Modern Architect",
            "Build a modern house using glass, concrete and contemporary lighting.",
            Rarity::Rare,
            "building",
            "Use concrete blocks and at least 20 glass blocks",
            "Unlocks modern designs",
            false,
        ),
        achievement(
            "bridge-builder",
            "Bridge Engineer",
            "Build an impressive bridge connecting two areas at least 30 blocks apart.",
            Rarity::Rare,
            "landscape",
            "Bridge spanning at least 30 blocks",
            "Unlocks bridge designs",
            false,
        ),
        achievement(
            "pixel-artist",
            "Pixel Artist",
            "Create a pixel art build out of blocks that is at least 16x16.",
            Rarity::Uncommon,
            "decoration",
            "Pixel art of at least 16x16 blocks",
            "Unlocks pixel art examples",
            false,
        ),
        achievement(
            "skyscraper",
            "Skyscraper",
            "Build a tower at least 50 blocks tall with decorated interiors.",
            Rarity::Epic,
            "megaproject",
            "50+ block tall building with functional interiors",
            "Unlocks skyscraper designs",
            false,
        ),
        achievement(
            "farm-designer",
            "Master Farmer",
            "Create an automated farm harvesting at least 3 kinds of crops.",
            Rarity::Rare,
            "redstone",
            "Automatic farm for 3+ crops",
            "Unlocks automated farm designs",
            false,
        ),
        achievement(
            "underwater-base",
            "Atlantis",
            "Build a fully functional, decorated underwater base.",
            Rarity::Epic,
            "megaproject",
            "Underwater base with at least 5 rooms",
            "Unlocks underwater designs",
            false,
        ),
        achievement(
            "ultimate-builder",
            "Master Builder",
            "Complete every other building achievement to prove your mastery.",
            Rarity::Legendary,
            "megaproject",
            "Unlock all other achievements",
            "Exclusive Master Builder title",
            false,
        ),
    ]
}

/// Bundled categories, including the reserved "all" pseudo-category.
pub fn seed_categories() -> Vec<Category> {
    [
        ("all", "All"),
        ("building", "Building"),
        ("redstone", "Redstone"),
        ("decoration", "Decoration"),
        ("landscape", "Landscape"),
        ("megaproject", "Megaprojects"),
    ]
    .into_iter()
    .map(|(id, name)| Category {
        id: id.to_string(),
        name: name.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_ids_are_unique_and_non_empty() {
        let seed = seed_achievements();
        assert_eq!(seed.len(), 12);
        let ids: std::collections::HashSet<_> = seed.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), seed.len());
        assert!(seed.iter().all(|a| !a.id.is_empty()));
    }

    #[test]
    fn seed_categories_start_with_all() {
        let categories = seed_categories();
        assert_eq!(categories[0].id, "all");
        assert_eq!(categories.len(), 6);
    }
}
