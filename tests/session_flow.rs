mod support;

use serde_json::{Value, json};

async fn join() -> (support::Client, String) {
    let mut client = support::connect().await;
    let init = support::next_json(&mut client).await;
    assert_eq!(init["type"], "init");
    let player_id = init["playerId"]
        .as_str()
        .expect("player id is a string")
        .to_string();
    (client, player_id)
}

fn has_player(state: &Value, player_id: &str) -> bool {
    state["players"].get(player_id).is_some()
}

#[tokio::test]
async fn when_client_connects_then_init_carries_id_config_and_map() {
    let mut client = support::connect().await;

    let init = support::next_json(&mut client).await;

    assert_eq!(init["type"], "init");
    assert!(!init["playerId"].as_str().expect("string id").is_empty());
    assert_eq!(init["config"]["mapWidth"], json!(1200.0));
    assert_eq!(init["config"]["mapHeight"], json!(900.0));
    assert_eq!(init["config"]["maxLives"], json!(3));
    assert_eq!(init["map"], json!([]));
}

#[tokio::test]
async fn when_client_joins_then_snapshots_include_its_tank_at_full_lives() {
    let (mut client, player_id) = join().await;

    let state = support::next_state_where(&mut client, |s| has_player(s, &player_id)).await;

    let tank = &state["players"][player_id.as_str()];
    assert_eq!(tank["id"], json!(player_id));
    assert_eq!(tank["lives"], json!(3));
    assert!(state["tick"].as_u64().is_some());
    assert_eq!(state["map"], json!([]));
}

#[tokio::test]
async fn when_garbage_is_sent_then_connection_survives_and_later_intents_apply() {
    let (mut client, player_id) = join().await;
    let state = support::next_state_where(&mut client, |s| has_player(s, &player_id)).await;
    let tank = &state["players"][player_id.as_str()];
    let (x, y) = (
        tank["x"].as_f64().expect("x"),
        tank["y"].as_f64().expect("y"),
    );
    // Aim at the arena centre so the bullet cannot leave the map on its first tick.
    let angle = (450.0 - y).atan2(600.0 - x);

    support::send_raw(&mut client, "not json at all").await;
    support::send_json(&mut client, json!({ "type": "teleport", "x": 10 })).await;
    support::send_json(&mut client, json!({ "type": "move", "forward": 5, "turn": 0 })).await;
    support::send_json(&mut client, json!({ "type": "cannonAim", "angle": angle })).await;
    support::send_json(&mut client, json!({ "type": "shoot" })).await;

    let state = support::next_state_where(&mut client, |s| {
        s["bullets"]
            .as_array()
            .is_some_and(|bullets| bullets.iter().any(|b| b["owner"] == json!(player_id)))
    })
    .await;

    assert!(has_player(&state, &player_id));
}

#[tokio::test]
async fn when_mine_is_placed_then_owner_lists_it() {
    let (mut client, player_id) = join().await;

    support::send_json(&mut client, json!({ "type": "mine" })).await;

    let state = support::next_state_where(&mut client, |s| {
        s["players"][player_id.as_str()]["mines"]
            .as_array()
            .is_some_and(|mines| !mines.is_empty())
    })
    .await;

    let owned = &state["players"][player_id.as_str()]["mines"][0];
    assert_eq!(owned["owner"], json!(player_id));
    assert!(
        state["mines"]
            .as_array()
            .expect("mines array")
            .iter()
            .any(|m| m["id"] == owned["id"])
    );
}

#[tokio::test]
async fn when_client_disconnects_then_its_tank_leaves_the_snapshot() {
    let (mut watcher, _) = join().await;
    let (mut leaver, leaver_id) = join().await;

    support::next_state_where(&mut watcher, |s| has_player(s, &leaver_id)).await;
    leaver.close(None).await.expect("close handshake");
    drop(leaver);

    let state = support::next_state_where(&mut watcher, |s| !has_player(s, &leaver_id)).await;

    assert!(state["players"].is_object());
}
