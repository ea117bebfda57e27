use super::*;
use crate::settings::Settings;
use crate::state::test_helpers;
use serde_json::json;
use tokio::time::{Duration, timeout};

async fn recv_room_event(rx: &mut mpsc::Receiver<ServerEvent>) -> ServerEvent {
    timeout(Duration::from_millis(500), rx.recv())
        .await
        .expect("room event receive timed out")
        .expect("room channel closed unexpectedly")
}

async fn assert_no_room_event(rx: &mut mpsc::Receiver<ServerEvent>) {
    assert!(
        timeout(Duration::from_millis(80), rx.recv()).await.is_err(),
        "expected no room event"
    );
}

fn text(value: serde_json::Value) -> String {
    value.to_string()
}

/// A simulated connection: its id, joined school, and outbound channel.
struct Conn {
    id: Uuid,
    school: Option<String>,
    tx: mpsc::Sender<ServerEvent>,
    rx: mpsc::Receiver<ServerEvent>,
}

impl Conn {
    fn new() -> Self {
        let (tx, rx) = mpsc::channel(16);
        Self { id: Uuid::new_v4(), school: None, tx, rx }
    }

    async fn send(&mut self, state: &AppState, value: serde_json::Value) -> Vec<ServerEvent> {
        process_inbound_text(state, &mut self.school, self.id, &self.tx, &text(value)).await
    }
}

fn join(school: &str) -> serde_json::Value {
    json!({"event": "join", "data": {"school_name": school}})
}

// =============================================================
// Join
// =============================================================

#[tokio::test]
async fn join_replies_with_names_then_settings() {
    let state = test_helpers::test_app_state();
    test_helpers::seed_school_with_names(&state, "s1", &["Ali", "Sara"]).await;
    let mut conn = Conn::new();

    let replies = conn.send(&state, join("s1")).await;

    assert_eq!(
        replies,
        vec![
            ServerEvent::CurrentNames { names: vec!["Sara".into(), "Ali".into()] },
            ServerEvent::UpdateSettings { settings: Settings::default() },
        ]
    );
    assert_eq!(conn.school.as_deref(), Some("s1"));
}

#[tokio::test]
async fn join_does_not_disturb_other_members() {
    let state = test_helpers::test_app_state();
    test_helpers::seed_school(&state, "s1").await;
    let mut display = Conn::new();
    display.send(&state, join("s1")).await;

    let mut entry = Conn::new();
    entry.send(&state, join("s1")).await;

    assert_no_room_event(&mut display.rx).await;
}

#[tokio::test]
async fn join_unknown_school_replies_error() {
    let state = test_helpers::test_app_state();
    let mut conn = Conn::new();

    let replies = conn.send(&state, join("ghost")).await;

    assert_eq!(replies.len(), 1);
    assert!(matches!(&replies[0], ServerEvent::Error { code: Some(c), .. } if c == "E_SCHOOL_NOT_FOUND"));
    assert!(conn.school.is_none());
}

#[tokio::test]
async fn rejoin_same_school_keeps_single_membership() {
    let state = test_helpers::test_app_state();
    test_helpers::seed_school_with_names(&state, "s1", &["Ali"]).await;
    let mut conn = Conn::new();

    let first = conn.send(&state, join("s1")).await;
    let second = conn.send(&state, join("s1")).await;

    assert_eq!(first, second);
    assert_eq!(state.schools.read().await.get("s1").unwrap().clients.len(), 1);
}

#[tokio::test]
async fn join_other_school_leaves_previous_room() {
    let state = test_helpers::test_app_state();
    test_helpers::seed_school(&state, "s1").await;
    test_helpers::seed_school(&state, "s2").await;
    let mut conn = Conn::new();

    conn.send(&state, join("s1")).await;
    conn.send(&state, join("s2")).await;

    let schools = state.schools.read().await;
    assert!(schools.get("s1").unwrap().clients.is_empty());
    assert!(schools.get("s2").unwrap().clients.contains_key(&conn.id));
    assert_eq!(conn.school.as_deref(), Some("s2"));
}

// =============================================================
// Submit
// =============================================================

#[tokio::test]
async fn submit_name_broadcasts_to_room_including_sender() {
    let state = test_helpers::test_app_state();
    test_helpers::seed_school_with_names(&state, "s1", &["Ali", "Sara"]).await;
    let mut display = Conn::new();
    let mut entry = Conn::new();
    display.send(&state, join("s1")).await;
    entry.send(&state, join("s1")).await;

    let replies = entry
        .send(&state, json!({"event": "submit_name", "data": {"school_name": "s1", "name": "Omar"}}))
        .await;

    assert!(replies.is_empty());
    let expected = ServerEvent::NewName {
        name: "Omar".into(),
        names: vec!["Omar".into(), "Sara".into(), "Ali".into()],
    };
    assert_eq!(recv_room_event(&mut display.rx).await, expected);
    assert_eq!(recv_room_event(&mut entry.rx).await, expected);
}

#[tokio::test]
async fn submit_name_without_joining_still_reaches_room() {
    let state = test_helpers::test_app_state();
    test_helpers::seed_school(&state, "s1").await;
    let mut display = Conn::new();
    display.send(&state, join("s1")).await;
    let mut entry = Conn::new();

    entry
        .send(&state, json!({"event": "submit_name", "data": {"school_name": "s1", "name": "Omar"}}))
        .await;

    assert!(matches!(recv_room_event(&mut display.rx).await, ServerEvent::NewName { .. }));
    assert_no_room_event(&mut entry.rx).await;
}

#[tokio::test]
async fn invalid_name_errors_only_to_sender() {
    let state = test_helpers::test_app_state();
    test_helpers::seed_school(&state, "s1").await;
    let mut display = Conn::new();
    display.send(&state, join("s1")).await;
    let mut entry = Conn::new();

    let replies = entry
        .send(&state, json!({"event": "submit_name", "data": {"school_name": "s1", "name": "x"}}))
        .await;

    assert!(matches!(&replies[..], [ServerEvent::Error { code: Some(c), .. }] if c == "E_INVALID_NAME"));
    assert_no_room_event(&mut display.rx).await;
}

#[tokio::test]
async fn submit_to_inactive_school_errors() {
    let state = test_helpers::test_app_state();
    test_helpers::seed_school(&state, "s1").await;
    state.schools.write().await.get_mut("s1").unwrap().is_active = false;
    let mut entry = Conn::new();

    let replies = entry
        .send(&state, json!({"event": "submit_name", "data": {"school_name": "s1", "name": "Omar"}}))
        .await;

    assert!(matches!(&replies[..], [ServerEvent::Error { code: Some(c), .. }] if c == "E_SCHOOL_INACTIVE"));
}

#[tokio::test]
async fn submit_name_without_name_is_incomplete() {
    let state = test_helpers::test_app_state();
    test_helpers::seed_school(&state, "s1").await;
    let mut display = Conn::new();
    display.send(&state, join("s1")).await;
    let mut entry = Conn::new();

    let replies = entry.send(&state, json!({"event": "submit_name", "data": {"school_name": "s1"}})).await;

    assert!(matches!(&replies[..], [ServerEvent::Error { code: Some(c), .. }] if c == "E_INCOMPLETE"));
    assert_no_room_event(&mut display.rx).await;
}

#[tokio::test]
async fn submit_name_with_blank_name_is_incomplete() {
    let state = test_helpers::test_app_state();
    test_helpers::seed_school(&state, "s1").await;
    let mut entry = Conn::new();

    let replies = entry
        .send(&state, json!({"event": "submit_name", "data": {"school_name": "s1", "name": "   "}}))
        .await;

    assert!(matches!(&replies[..], [ServerEvent::Error { code: Some(c), .. }] if c == "E_INCOMPLETE"));
}

// =============================================================
// Settings / clear
// =============================================================

#[tokio::test]
async fn settings_update_broadcasts_to_room() {
    let state = test_helpers::test_app_state();
    test_helpers::seed_school(&state, "s1").await;
    let mut admin = Conn::new();
    let mut display = Conn::new();
    admin.send(&state, join("s1")).await;
    display.send(&state, join("s1")).await;

    let replies = admin
        .send(
            &state,
            json!({"event": "update_school_settings", "data": {"school_name": "s1", "settings": {
                "background_color": "#111111", "text_color": "#eeeeee", "font_size": "30px"
            }}}),
        )
        .await;

    assert!(replies.is_empty());
    let expected = ServerEvent::UpdateSettings {
        settings: Settings {
            background_color: "#111111".into(),
            text_color: "#eeeeee".into(),
            font_size: "30px".into(),
            logo: None,
        },
    };
    assert_eq!(recv_room_event(&mut display.rx).await, expected);
    assert_eq!(recv_room_event(&mut admin.rx).await, expected);
}

#[tokio::test]
async fn settings_update_without_settings_applies_defaults() {
    let state = test_helpers::test_app_state();
    test_helpers::seed_school(&state, "s1").await;
    state.schools.write().await.get_mut("s1").unwrap().settings.background_color = "#123456".into();
    let mut display = Conn::new();
    display.send(&state, join("s1")).await;
    let mut admin = Conn::new();

    let replies = admin
        .send(&state, json!({"event": "update_school_settings", "data": {"school_name": "s1"}}))
        .await;

    assert!(replies.is_empty());
    assert_eq!(
        recv_room_event(&mut display.rx).await,
        ServerEvent::UpdateSettings { settings: Settings::default() }
    );
    assert_eq!(state.schools.read().await["s1"].settings, Settings::default());
}

#[tokio::test]
async fn clear_names_broadcasts_empty_roster() {
    let state = test_helpers::test_app_state();
    test_helpers::seed_school_with_names(&state, "s1", &["Ali"]).await;
    let mut display = Conn::new();
    display.send(&state, join("s1")).await;
    let mut admin = Conn::new();

    admin
        .send(&state, json!({"event": "clear_names", "data": {"school_name": "s1"}}))
        .await;

    assert_eq!(recv_room_event(&mut display.rx).await, ServerEvent::CurrentNames { names: vec![] });
}

// =============================================================
// Malformed input
// =============================================================

#[tokio::test]
async fn malformed_json_replies_error() {
    let state = test_helpers::test_app_state();
    let conn = Conn::new();
    let mut school = None;

    let replies = process_inbound_text(&state, &mut school, conn.id, &conn.tx, "not json").await;

    assert!(matches!(&replies[..], [ServerEvent::Error { code: Some(c), .. }] if c == "E_INVALID_EVENT"));
}

#[tokio::test]
async fn unknown_event_replies_error() {
    let state = test_helpers::test_app_state();
    let mut conn = Conn::new();

    let replies = conn.send(&state, json!({"event": "shutdown", "data": {}})).await;

    assert!(matches!(&replies[..], [ServerEvent::Error { .. }]));
}
