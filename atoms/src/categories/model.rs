use serde::{Deserialize, Serialize};

/// Category domain model - a gallery filter bucket for achievements
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryPayload {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryPayload {
    pub name: Option<String>,
}

/// Pseudo-category meaning "no filter". Always present in the gallery and
/// never stored or deleted.
pub const ALL_CATEGORY_ID: &str = "all";

pub fn ensure_not_reserved(id: &str) -> Result<(), String> {
    if id == ALL_CATEGORY_ID {
        Err("Category id \"all\" is reserved".to_string())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_reserved() {
        assert!(ensure_not_reserved("all").is_err());
        assert!(ensure_not_reserved("building").is_ok());
        assert!(ensure_not_reserved("ALL").is_ok());
    }
}
