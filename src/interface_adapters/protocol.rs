// Wire protocol DTOs and conversions for the public arena websocket.

use crate::domain::{
    InputPatch, LeaderboardEntry, ObstacleShape, ObstacleSnapshot, PlayerId, PlayerSnapshot,
    ProjectileSnapshot,
};
use crate::use_cases::{PlayerNotice, WorldUpdate};
use serde::{Deserialize, Serialize};

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    // Assigned identity after a join is accepted.
    Welcome {
        id: PlayerId,
        #[serde(rename = "worldSize")]
        world_size: WorldSizeDto,
    },
    // Sent only to the player who levelled, once per level.
    Levelup { level: u32 },
    // Full-world snapshot, broadcast to every connection.
    State(StateDto),
}

impl From<PlayerNotice> for ServerMessage {
    fn from(notice: PlayerNotice) -> Self {
        match notice {
            PlayerNotice::LevelUp { level } => ServerMessage::Levelup { level },
        }
    }
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Join {
        #[serde(default)]
        name: String,
    },
    Input {
        #[serde(default)]
        data: PlayerInputDto,
    },
    Upgrade {
        choice: String,
    },
}

/// Partial input update; absent fields keep their latched values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInputDto {
    pub up: Option<bool>,
    pub down: Option<bool>,
    pub left: Option<bool>,
    pub right: Option<bool>,
    pub aim_x: Option<f32>,
    pub aim_y: Option<f32>,
    pub firing: Option<bool>,
    pub auto_fire: Option<bool>,
}

impl From<PlayerInputDto> for InputPatch {
    fn from(input: PlayerInputDto) -> Self {
        Self {
            up: input.up,
            down: input.down,
            left: input.left,
            right: input.right,
            aim_x: input.aim_x,
            aim_y: input.aim_y,
            firing: input.firing,
            auto_fire: input.auto_fire,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct WorldSizeDto {
    pub w: f32,
    pub h: f32,
}

/// Snapshot of the world sent to clients on each broadcast.
#[derive(Debug, Clone, Serialize)]
pub struct StateDto {
    pub tick: u64,
    pub players: Vec<PlayerStateDto>,
    pub bullets: Vec<BulletStateDto>,
    pub obstacles: Vec<ObstacleStateDto>,
    pub leaderboard: Vec<LeaderboardRowDto>,
}

impl From<WorldUpdate> for StateDto {
    fn from(update: WorldUpdate) -> Self {
        let snapshot = update.snapshot;
        Self {
            tick: update.tick,
            players: snapshot.players.iter().map(PlayerStateDto::from).collect(),
            bullets: snapshot
                .projectiles
                .iter()
                .map(BulletStateDto::from)
                .collect(),
            obstacles: snapshot
                .obstacles
                .iter()
                .map(ObstacleStateDto::from)
                .collect(),
            leaderboard: snapshot
                .leaderboard
                .iter()
                .map(LeaderboardRowDto::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStateDto {
    pub id: PlayerId,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub size: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub score: u64,
    pub level: u32,
    pub xp: u64,
    pub xp_to_level: u64,
    pub tier: u8,
}

impl From<&PlayerSnapshot> for PlayerStateDto {
    fn from(p: &PlayerSnapshot) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            x: p.x,
            y: p.y,
            angle: p.angle,
            size: p.size,
            hp: p.hp,
            max_hp: p.max_hp,
            score: p.score,
            level: p.level,
            xp: p.xp,
            xp_to_level: p.xp_to_level,
            tier: p.tier,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletStateDto {
    pub id: u64,
    pub owner_id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub r: f32,
}

impl From<&ProjectileSnapshot> for BulletStateDto {
    fn from(b: &ProjectileSnapshot) -> Self {
        Self {
            id: b.id,
            owner_id: b.owner_id,
            x: b.x,
            y: b.y,
            r: b.radius,
        }
    }
}

/// Shape tag plus the fields that only exist for that shape.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeDto {
    Rect { w: f32, h: f32 },
    Hex { size: f32 },
}

impl From<ObstacleShape> for ShapeDto {
    fn from(shape: ObstacleShape) -> Self {
        match shape {
            ObstacleShape::Rect { w, h } => ShapeDto::Rect { w, h },
            ObstacleShape::Hex { size } => ShapeDto::Hex { size },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObstacleStateDto {
    pub id: u32,
    #[serde(flatten)]
    pub shape: ShapeDto,
    pub x: f32,
    pub y: f32,
    pub hp: f32,
    pub max_hp: f32,
}

impl From<&ObstacleSnapshot> for ObstacleStateDto {
    fn from(o: &ObstacleSnapshot) -> Self {
        Self {
            id: o.id,
            shape: o.shape.into(),
            x: o.x,
            y: o.y,
            hp: o.hp,
            max_hp: o.max_hp,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRowDto {
    pub id: PlayerId,
    pub name: String,
    pub score: u64,
    pub level: u32,
}

impl From<&LeaderboardEntry> for LeaderboardRowDto {
    fn from(e: &LeaderboardEntry) -> Self {
        Self {
            id: e.id,
            name: e.name.clone(),
            score: e.score,
            level: e.level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WorldSnapshot;
    use serde_json::json;

    #[test]
    fn input_message_reads_camel_case_partial_fields() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"input","data":{"aimX":12.5,"autoFire":true}}"#)
                .expect("valid input");
        let ClientMessage::Input { data } = msg else {
            panic!("expected input");
        };
        let patch = InputPatch::from(data);
        assert_eq!(patch.aim_x, Some(12.5));
        assert_eq!(patch.auto_fire, Some(true));
        assert_eq!(patch.up, None);
        assert_eq!(patch.aim_y, None);
    }

    #[test]
    fn join_and_upgrade_parse() {
        let join: ClientMessage =
            serde_json::from_str(r#"{"type":"join","name":"neo"}"#).expect("join");
        assert!(matches!(join, ClientMessage::Join { name } if name == "neo"));

        let upgrade: ClientMessage =
            serde_json::from_str(r#"{"type":"upgrade","choice":"fireRate"}"#).expect("upgrade");
        assert!(matches!(upgrade, ClientMessage::Upgrade { choice } if choice == "fireRate"));

        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"teleport"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
    }

    #[test]
    fn welcome_and_levelup_shapes() {
        let welcome = ServerMessage::Welcome {
            id: 3,
            world_size: WorldSizeDto { w: 3000.0, h: 2000.0 },
        };
        assert_eq!(
            serde_json::to_value(&welcome).expect("serialize"),
            json!({"type": "welcome", "id": 3, "worldSize": {"w": 3000.0, "h": 2000.0}})
        );

        let levelup = ServerMessage::from(PlayerNotice::LevelUp { level: 4 });
        assert_eq!(
            serde_json::to_value(&levelup).expect("serialize"),
            json!({"type": "levelup", "level": 4})
        );
    }

    #[test]
    fn state_message_flattens_obstacle_shape() {
        let update = WorldUpdate {
            tick: 9,
            snapshot: WorldSnapshot {
                players: Vec::new(),
                projectiles: vec![ProjectileSnapshot {
                    id: 5,
                    owner_id: 2,
                    x: 1.0,
                    y: 2.0,
                    radius: 5.0,
                }],
                obstacles: vec![
                    ObstacleSnapshot {
                        id: 0,
                        x: 10.0,
                        y: 20.0,
                        shape: ObstacleShape::Rect { w: 40.0, h: 50.0 },
                        hp: 30.0,
                        max_hp: 60.0,
                    },
                    ObstacleSnapshot {
                        id: 1,
                        x: 100.0,
                        y: 200.0,
                        shape: ObstacleShape::Hex { size: 80.0 },
                        hp: 0.0,
                        max_hp: 90.0,
                    },
                ],
                leaderboard: Vec::new(),
            },
        };

        let value =
            serde_json::to_value(ServerMessage::State(update.into())).expect("serialize");
        assert_eq!(value["type"], "state");
        assert_eq!(value["tick"], 9);
        assert_eq!(
            value["bullets"][0],
            json!({"id": 5, "ownerId": 2, "x": 1.0, "y": 2.0, "r": 5.0})
        );
        assert_eq!(
            value["obstacles"][0],
            json!({"id": 0, "type": "rect", "w": 40.0, "h": 50.0, "x": 10.0, "y": 20.0, "hp": 30.0, "maxHp": 60.0})
        );
        assert_eq!(value["obstacles"][1]["type"], "hex");
        assert_eq!(value["obstacles"][1]["size"], 80.0);
        assert!(value["obstacles"][1].get("w").is_none());
    }
}
