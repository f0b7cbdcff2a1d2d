mod support;

use arena_server::domain::ArenaTuning;
use arena_server::use_cases::ArenaSettings;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(5);

async fn connect() -> Ws {
    connect_to(&support::ws_url()).await
}

async fn connect_to(url: &str) -> Ws {
    let (ws, _) = connect_async(url).await.expect("websocket connect");
    ws
}

async fn send_json(ws: &mut Ws, value: Value) {
    ws.send(Message::text(value.to_string()))
        .await
        .expect("send message");
}

// Reads text frames until one satisfies `pred`, failing after `WAIT`.
async fn wait_for(ws: &mut Ws, pred: impl Fn(&Value) -> bool) -> Value {
    let deadline = Instant::now() + WAIT;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let frame = timeout(remaining, ws.next())
            .await
            .expect("timed out waiting for message")
            .expect("stream ended")
            .expect("websocket error");
        let Message::Text(text) = frame else {
            continue;
        };
        let value: Value = serde_json::from_str(&text).expect("server sends json");
        if pred(&value) {
            return value;
        }
    }
}

async fn join(ws: &mut Ws, name: &str) -> u64 {
    send_json(ws, json!({"type": "join", "name": name})).await;
    let welcome = wait_for(ws, |v| v["type"] == "welcome").await;
    welcome["id"].as_u64().expect("numeric id")
}

fn find_player(state: &Value, id: u64) -> Option<&Value> {
    state["players"]
        .as_array()?
        .iter()
        .find(|p| p["id"].as_u64() == Some(id))
}

// Centre of the nearest standing obstacle, as an aim point.
fn nearest_obstacle_centre(state: &Value, from: (f64, f64)) -> Option<(f64, f64)> {
    state["obstacles"]
        .as_array()?
        .iter()
        .filter(|o| o["hp"].as_f64().is_some_and(|hp| hp > 0.0))
        .filter_map(|o| {
            let (x, y) = (o["x"].as_f64()?, o["y"].as_f64()?);
            match o["type"].as_str()? {
                "rect" => Some((x + o["w"].as_f64()? / 2.0, y + o["h"].as_f64()? / 2.0)),
                _ => Some((x, y)),
            }
        })
        .min_by(|a, b| {
            let da = (a.0 - from.0).powi(2) + (a.1 - from.1).powi(2);
            let db = (b.0 - from.0).powi(2) + (b.1 - from.1).powi(2);
            da.total_cmp(&db)
        })
}

// Obstacles that break in one shot, packed densely, on a faster tick.
fn brittle_arena() -> ArenaSettings {
    let mut tuning = ArenaTuning::default();
    tuning.world.obstacle_count = 200;
    tuning.obstacle.min_hp = 1.0;
    tuning.obstacle.max_hp = 2.0;
    ArenaSettings {
        input_channel_capacity: 1024,
        world_broadcast_capacity: 128,
        tick_interval: Duration::from_millis(16),
        broadcast_interval: Duration::from_millis(50),
        tuning,
        seed: 7,
    }
}

fn short_name() -> String {
    format!("t-{}", &uuid::Uuid::new_v4().simple().to_string()[..8])
}

#[tokio::test]
async fn join_gets_welcome_and_shows_up_in_state() {
    let mut ws = connect().await;
    let name = short_name();

    send_json(&mut ws, json!({"type": "join", "name": format!("  {name} ")})).await;
    let welcome = wait_for(&mut ws, |v| v["type"] == "welcome").await;
    assert_eq!(welcome["worldSize"], json!({"w": 3000.0, "h": 2000.0}));
    let id = welcome["id"].as_u64().expect("numeric id");

    let state = wait_for(&mut ws, |v| {
        v["type"] == "state" && find_player(v, id).is_some()
    })
    .await;
    let me = find_player(&state, id).expect("player present");
    assert_eq!(me["name"], name.as_str());
    assert_eq!(me["level"], 1);
    assert_eq!(me["tier"], 1);
    assert_eq!(me["maxHp"], 100.0);
    assert!(state["obstacles"].as_array().is_some_and(|o| !o.is_empty()));
    assert!(state["leaderboard"].as_array().is_some_and(|l| l.len() <= 5));
    assert!(state["tick"].as_u64().is_some());
}

#[tokio::test]
async fn spectators_receive_state_without_joining() {
    let mut ws = connect().await;
    let state = wait_for(&mut ws, |v| v["type"] == "state").await;
    assert!(state["players"].is_array());
    assert!(state["bullets"].is_array());
}

#[tokio::test]
async fn malformed_and_pre_join_messages_are_ignored() {
    let mut ws = connect().await;

    ws.send(Message::text("definitely not json"))
        .await
        .expect("send garbage");
    send_json(&mut ws, json!({"type": "warp", "to": 3})).await;
    send_json(&mut ws, json!({"type": "input", "data": {"up": true}})).await;
    send_json(&mut ws, json!({"type": "upgrade", "choice": "damage"})).await;

    // The connection survived everything above.
    let id = join(&mut ws, &short_name()).await;

    // A second join keeps the first identity.
    send_json(&mut ws, json!({"type": "join", "name": "again"})).await;
    send_json(&mut ws, json!({"type": "upgrade", "choice": "hpMax"})).await;
    let state = wait_for(&mut ws, |v| {
        v["type"] == "state" && find_player(v, id).is_some_and(|p| p["maxHp"] == 120.0)
    })
    .await;
    let players_named_again = state["players"]
        .as_array()
        .expect("players")
        .iter()
        .filter(|p| p["name"] == "again")
        .count();
    assert_eq!(players_named_again, 0);
}

#[tokio::test]
async fn overlong_name_falls_back_to_default() {
    let mut ws = connect().await;
    let id = join(&mut ws, "a-name-that-is-way-too-long").await;
    let state = wait_for(&mut ws, |v| {
        v["type"] == "state" && find_player(v, id).is_some()
    })
    .await;
    assert_eq!(find_player(&state, id).expect("player")["name"], "Player");
}

#[tokio::test]
async fn closing_the_socket_removes_the_player() {
    let mut leaver = connect().await;
    let id = join(&mut leaver, &short_name()).await;

    let mut watcher = connect().await;
    wait_for(&mut watcher, |v| {
        v["type"] == "state" && find_player(v, id).is_some()
    })
    .await;

    leaver.close(None).await.expect("close");
    drop(leaver);

    wait_for(&mut watcher, |v| {
        v["type"] == "state" && find_player(v, id).is_none()
    })
    .await;
}

#[tokio::test]
async fn levelup_reaches_only_the_player_who_levelled() {
    let url = support::spawn_server(brittle_arena());
    let mut shooter = connect_to(&url).await;
    let mut bystander = connect_to(&url).await;
    let shooter_id = join(&mut shooter, &short_name()).await;
    join(&mut bystander, &short_name()).await;

    // Keep firing at whatever standing obstacle is closest until a level is gained.
    send_json(&mut shooter, json!({"type": "input", "data": {"autoFire": true}})).await;
    let deadline = Instant::now() + Duration::from_secs(20);
    let levelup = loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let frame = timeout(remaining, shooter.next())
            .await
            .expect("timed out waiting for levelup")
            .expect("stream ended")
            .expect("websocket error");
        let Message::Text(text) = frame else {
            continue;
        };
        let value: Value = serde_json::from_str(&text).expect("server sends json");
        if value["type"] == "levelup" {
            break value;
        }
        let Some(me) = find_player(&value, shooter_id) else {
            continue;
        };
        let from = (
            me["x"].as_f64().expect("x"),
            me["y"].as_f64().expect("y"),
        );
        if let Some((aim_x, aim_y)) = nearest_obstacle_centre(&value, from) {
            // Zero means "no aim" on the wire.
            let aim = json!({"aimX": aim_x.max(1.0), "aimY": aim_y.max(1.0)});
            send_json(&mut shooter, json!({"type": "input", "data": aim})).await;
        }
    };
    assert_eq!(levelup, json!({"type": "levelup", "level": 2}));

    // The bystander keeps receiving state but never a levelup of its own.
    let quiet_until = Instant::now() + Duration::from_millis(500);
    let mut states = 0;
    while let Ok(frame) = timeout(
        quiet_until.saturating_duration_since(Instant::now()),
        bystander.next(),
    )
    .await
    {
        let Some(Ok(Message::Text(text))) = frame else {
            continue;
        };
        let value: Value = serde_json::from_str(&text).expect("server sends json");
        assert_ne!(value["type"], "levelup", "bystander got {value}");
        states += 1;
    }
    assert!(states > 0);
}
