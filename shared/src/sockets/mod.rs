pub mod broadcast;
pub mod messages;

pub use broadcast::{
    broadcast_all, list_connections, management_client, register_connection, remove_connection,
};
pub use messages::{BroadcastMessage, WebSocketAction, WebSocketMessage, ACHIEVEMENTS_UPDATED};
