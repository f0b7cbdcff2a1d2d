// Network adapter for client websocket connections.

pub mod client;

pub use client::{spawn_world_serializer, ws_handler};
