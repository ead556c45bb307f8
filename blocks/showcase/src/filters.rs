use blockhall_atoms::achievements::model::Achievement;
use blockhall_atoms::categories::model::ALL_CATEGORY_ID;

/// Gallery filter state. All fields are conjunctive; a None (or "all"
/// category) means "no constraint".
#[derive(Debug, Default, Clone)]
pub struct ShowcaseFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub unlocked: Option<bool>,
}

impl ShowcaseFilter {
    pub fn is_empty(&self) -> bool {
        self.matches_any_category() && self.search.is_none() && self.unlocked.is_none()
    }

    fn matches_any_category(&self) -> bool {
        match self.category.as_deref() {
            None => true,
            Some(c) => c == ALL_CATEGORY_ID,
        }
    }

    fn matches(&self, achievement: &Achievement) -> bool {
        if !self.matches_any_category()
            && self.category.as_deref() != Some(achievement.category.as_str())
        {
            return false;
        }

        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            if !achievement.title.to_lowercase().contains(&term)
                && !achievement.description.to_lowercase().contains(&term)
            {
                return false;
            }
        }

        if let Some(unlocked) = self.unlocked {
            if achievement.unlocked != unlocked {
                return false;
            }
        }

        true
    }
}

/// Apply the filter to a list, preserving order. Category "all" (or none)
/// passes everything; search is a case-insensitive substring match over
/// title and description.
pub fn filter_achievements(
    achievements: &[Achievement],
    filter: &ShowcaseFilter,
) -> Vec<Achievement> {
    achievements
        .iter()
        .filter(|a| filter.matches(a))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_achievements;

    fn category(id: &str) -> ShowcaseFilter {
        ShowcaseFilter {
            category: Some(id.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn category_filter_only_keeps_matching_entries() {
        let all = seed_achievements();
        let filtered = filter_achievements(&all, &category("redstone"));
        assert!(!filtered.is_empty());
        assert!(filtered.iter().all(|a| a.category == "redstone"));
        assert!(filtered.len() < all.len());
    }

    #[test]
    fn all_category_returns_the_list_unchanged() {
        let all = seed_achievements();
        assert_eq!(filter_achievements(&all, &category("all")), all);
        assert_eq!(
            filter_achievements(&all, &ShowcaseFilter::default()),
            all
        );
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let all = seed_achievements();

        let by_title = filter_achievements(
            &all,
            &ShowcaseFilter {
                search: Some("sWeEt".to_string()),
                ..Default::default()
            },
        );
        assert!(by_title.iter().any(|a| a.id == "first-house"));

        let by_description = filter_achievements(
            &all,
            &ShowcaseFilter {
                search: Some("pixel art".to_string()),
                ..Default::default()
            },
        );
        assert!(by_description.iter().any(|a| a.id == "pixel-artist"));

        let missing = filter_achievements(
            &all,
            &ShowcaseFilter {
                search: Some("creeper rollercoaster".to_string()),
                ..Default::default()
            },
        );
        assert!(missing.is_empty());
    }

    #[test]
    fn filters_preserve_input_order() {
        let all = seed_achievements();
        let filtered = filter_achievements(&all, &category("megaproject"));
        let positions: Vec<usize> = filtered
            .iter()
            .map(|a| all.iter().position(|b| b.id == a.id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn unlocked_filter_splits_the_collection() {
        let all = seed_achievements();
        let unlocked = filter_achievements(
            &all,
            &ShowcaseFilter {
                unlocked: Some(true),
                ..Default::default()
            },
        );
        let locked = filter_achievements(
            &all,
            &ShowcaseFilter {
                unlocked: Some(false),
                ..Default::default()
            },
        );
        assert_eq!(unlocked.len() + locked.len(), all.len());
        assert!(unlocked.iter().all(|a| a.unlocked));
        assert!(locked.iter().all(|a| !a.unlocked));
    }
}
