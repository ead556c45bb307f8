use serde::{Deserialize, Serialize};

/// Incoming WebSocket message from client
#[derive(Debug, Deserialize)]
pub struct WebSocketMessage {
    pub action: String,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// WebSocket action types
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebSocketAction {
    // Achievement actions
    CreateAchievement,
    UpdateAchievement,
    DeleteAchievement,
    SetAchievementImage,
    ConfirmChanges,

    // Category actions
    CreateCategory,
    UpdateCategory,
    DeleteCategory,

    // Gallery actions
    CreateGalleryImage,
    DeleteGalleryImage,
}

/// Message type fanned out when an admin confirms pending edits.
pub const ACHIEVEMENTS_UPDATED: &str = "achievements_updated";

/// Broadcast message sent to all clients
#[derive(Debug, Serialize)]
pub struct BroadcastMessage {
    pub r#type: String,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

impl BroadcastMessage {
    pub fn new(message_type: &str, data: serde_json::Value) -> Self {
        Self {
            r#type: message_type.to_string(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&WebSocketAction::ConfirmChanges).unwrap(),
            "\"confirm_changes\""
        );
        assert_eq!(
            serde_json::to_string(&WebSocketAction::SetAchievementImage).unwrap(),
            "\"set_achievement_image\""
        );
    }

    #[test]
    fn broadcast_messages_flatten_their_payload() {
        let msg = BroadcastMessage::new(
            ACHIEVEMENTS_UPDATED,
            serde_json::json!({"achievements": []}),
        );
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "achievements_updated");
        assert!(value["achievements"].is_array());
    }
}
