//! End-to-end engine scenarios against the in-process state store

use std::sync::Arc;
use std::time::Duration;

use lms_session::{PlayerNotification, SessionEvent};
use parking_lot::Mutex;
use squeeze_sync::{CommandSink, EngineConfig, EngineHandle, EngineInput, PlayerId, SyncEngine};
use state_store::{StateChange, StateStore, StateValue};

/// Command sink that records what the engine sends
#[derive(Default)]
struct RecordingSink {
    player: Mutex<Vec<(PlayerId, String)>>,
    server: Mutex<Vec<String>>,
}

impl RecordingSink {
    fn drain_for(&self, player: &PlayerId) -> Vec<String> {
        let mut sent = self.player.lock();
        let (mine, rest): (Vec<_>, Vec<_>) = sent.drain(..).partition(|(p, _)| p == player);
        *sent = rest;
        mine.into_iter().map(|(_, command)| command).collect()
    }
}

impl CommandSink for RecordingSink {
    fn send_command(&self, player: &PlayerId, command: &str) {
        self.player.lock().push((player.clone(), command.to_string()));
    }

    fn send_server_command(&self, command: &str) {
        self.server.lock().push(command.to_string());
    }

    fn query_server_pref(&self, name: &str) {
        self.server.lock().push(format!("pref {} ?", name));
    }
}

struct Bridge {
    engine: SyncEngine,
    handle: EngineHandle,
    store: StateStore,
    sink: Arc<RecordingSink>,
}

impl Bridge {
    fn new() -> Self {
        let store = StateStore::new();
        store.subscribe_states("*");
        let sink = Arc::new(RecordingSink::default());
        let (engine, handle) = SyncEngine::new(
            EngineConfig::new("192.168.1.10"),
            sink.clone(),
            Arc::new(store.clone()),
        )
        .unwrap();

        Self {
            engine,
            handle,
            store,
            sink,
        }
    }

    fn ready(&mut self, players: &[&PlayerId]) {
        self.feed(SessionEvent::Ready(players.iter().map(|p| (*p).clone()).collect()));
    }

    fn line(&mut self, player: &PlayerId, line: &str) {
        self.feed(SessionEvent::Player {
            player: player.clone(),
            notification: PlayerNotification::Line(line.split(' ').map(str::to_string).collect()),
        });
    }

    fn feed(&mut self, event: SessionEvent) {
        self.handle.session_event(event).unwrap();
        self.engine.process_pending();
    }

    /// Forward pending requests from the store, as the bridge binary does
    fn forward_requests(&mut self) {
        let requests: Vec<StateChange> = self.store.iter().try_iter().filter(|c| !c.ack).collect();
        for change in requests {
            self.handle.state_change(change).unwrap();
        }
        self.engine.process_pending();
    }

    fn value(&self, id: &str) -> Option<StateValue> {
        self.store.value(id)
    }
}

fn kitchen() -> PlayerId {
    PlayerId::new("00:04:20:aa:bb:cc")
}

fn den() -> PlayerId {
    PlayerId::new("00:04:20:dd:ee:ff")
}

#[tokio::test(start_paused = true)]
async fn test_play_and_tick_scenario() {
    let mut bridge = Bridge::new();
    let player = kitchen();

    bridge.ready(&[&player]);
    assert_eq!(*bridge.sink.server.lock(), vec!["pref httpport ?".to_string()]);
    assert_eq!(bridge.sink.drain_for(&player), vec!["name ?"]);

    bridge.line(&player, "name Kitchen");
    assert_eq!(bridge.store.channel_ids(), vec!["Kitchen".to_string()]);
    assert!(bridge.store.channel_object("Kitchen").is_some());
    bridge.sink.drain_for(&player);

    bridge.line(&player, "mode play");
    assert_eq!(bridge.value("Kitchen.state"), Some(StateValue::Number(1)));
    assert_eq!(bridge.sink.drain_for(&player), vec!["duration ?", "time ?"]);

    bridge.line(&player, "time 42");
    assert_eq!(bridge.value("Kitchen.elapsedTime"), Some(StateValue::Number(42)));
    assert_eq!(bridge.store.write_count("Kitchen.elapsedTime"), 1);

    tokio::time::sleep(Duration::from_millis(5100)).await;
    bridge.engine.process_pending();

    assert_eq!(bridge.value("Kitchen.elapsedTime"), Some(StateValue::Number(47)));
    assert_eq!(bridge.value("Kitchen.elapsedTimeText"), Some("00:47".into()));
    assert_eq!(bridge.store.write_count("Kitchen.elapsedTime"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_pause_stops_ticking() {
    let mut bridge = Bridge::new();
    let player = kitchen();
    bridge.ready(&[&player]);
    bridge.line(&player, "name Kitchen");
    bridge.line(&player, "mode play");
    bridge.line(&player, "time 10");

    tokio::time::sleep(Duration::from_millis(4000)).await;
    bridge.line(&player, "mode pause");

    tokio::time::sleep(Duration::from_secs(20)).await;
    bridge.engine.process_pending();

    assert_eq!(bridge.value("Kitchen.elapsedTime"), Some(StateValue::Number(10)));
    assert_eq!(bridge.store.write_count("Kitchen.elapsedTime"), 1);
}

fn player_line(player: &PlayerId, line: &str) -> EngineInput {
    EngineInput::Session(SessionEvent::Player {
        player: player.clone(),
        notification: PlayerNotification::Line(line.split(' ').map(str::to_string).collect()),
    })
}

#[tokio::test(start_paused = true)]
async fn test_tick_queued_before_cancel_is_discarded() {
    let mut bridge = Bridge::new();
    let player = kitchen();
    bridge.ready(&[&player]);
    bridge.line(&player, "name Kitchen");
    bridge.line(&player, "time 10");

    // The first tick is queued but not handled yet
    tokio::time::sleep(Duration::from_millis(5100)).await;
    let _ = bridge.engine.handle(player_line(&player, "mode stop"));

    bridge.engine.process_pending();
    assert_eq!(bridge.value("Kitchen.elapsedTime"), Some(StateValue::Number(10)));

    tokio::time::sleep(Duration::from_secs(15)).await;
    bridge.engine.process_pending();
    assert_eq!(bridge.value("Kitchen.elapsedTime"), Some(StateValue::Number(10)));
    assert_eq!(bridge.store.write_count("Kitchen.elapsedTime"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_new_ticker_ignores_ticks_of_previous_one() {
    let mut bridge = Bridge::new();
    let player = kitchen();
    bridge.ready(&[&player]);
    bridge.line(&player, "name Kitchen");
    bridge.line(&player, "time 10");

    // Old ticker's tick is queued while a new song replaces the ticker
    tokio::time::sleep(Duration::from_millis(5100)).await;
    let _ = bridge.engine.handle(player_line(&player, "playlist newsong"));
    let _ = bridge.engine.handle(player_line(&player, "time 0"));

    bridge.engine.process_pending();
    assert_eq!(bridge.value("Kitchen.elapsedTime"), Some(StateValue::Number(0)));

    tokio::time::sleep(Duration::from_millis(5100)).await;
    bridge.engine.process_pending();
    assert_eq!(bridge.value("Kitchen.elapsedTime"), Some(StateValue::Number(5)));
}

#[tokio::test]
async fn test_name_collision_publishes_one_channel() {
    let mut bridge = Bridge::new();
    let (a, b) = (kitchen(), den());
    bridge.ready(&[&a, &b]);

    bridge.line(&a, "name Living Room");
    bridge.line(&b, "name Living_Room");
    assert_eq!(bridge.store.channel_ids(), vec!["Living_Room".to_string()]);

    bridge.line(&b, "artist Nobody");
    bridge.line(&a, "artist Somebody");
    assert_eq!(bridge.value("Living_Room.currentArtist"), Some("Somebody".into()));
    assert_eq!(bridge.store.write_count("Living_Room.currentArtist"), 1);

    let excluded = bridge.engine.registry().get(&b).unwrap();
    assert!(excluded.is_excluded());
    assert_eq!(excluded.display_name(), Some("Living_Room"));
}

#[tokio::test]
async fn test_repeated_values_written_once() {
    let mut bridge = Bridge::new();
    let player = kitchen();
    bridge.ready(&[&player]);
    bridge.line(&player, "name Kitchen");

    for _ in 0..3 {
        bridge.line(&player, "album Blue Train");
        bridge.feed(SessionEvent::Player {
            player: player.clone(),
            notification: PlayerNotification::Volume(25),
        });
    }

    assert_eq!(bridge.store.write_count("Kitchen.currentAlbum"), 1);
    assert_eq!(bridge.store.write_count("Kitchen.volume"), 1);
}

#[tokio::test]
async fn test_artwork_fallback_after_port_arrives() {
    let mut bridge = Bridge::new();
    let player = kitchen();
    bridge.ready(&[&player]);
    bridge.line(&player, "name Kitchen");
    bridge.sink.drain_for(&player);

    bridge.line(&player, "status 0 1 tags:K");
    assert!(bridge.value("Kitchen.currentArtwork").is_none());

    bridge.feed(SessionEvent::ServerPref {
        name: "httpport".into(),
        value: "9000".into(),
    });
    assert_eq!(bridge.sink.drain_for(&player), vec!["status 0 1 tags:K"]);

    bridge.line(&player, "status 0 1 tags:K");
    let url = bridge.value("Kitchen.currentArtwork").unwrap().to_string();
    assert!(url.starts_with("http://192.168.1.10:9000/music/current/cover.jpg?player=00:04:20:aa:bb:cc&t="));
}

#[tokio::test]
async fn test_artwork_relative_path() {
    let mut bridge = Bridge::new();
    let player = kitchen();
    bridge.ready(&[&player]);
    bridge.feed(SessionEvent::ServerPref {
        name: "httpport".into(),
        value: "9000".into(),
    });
    bridge.line(&player, "name Kitchen");

    bridge.line(&player, "status 0 1 tags:K artwork_url:foo.jpg");
    assert_eq!(
        bridge.value("Kitchen.currentArtwork"),
        Some("http://192.168.1.10:9000/foo.jpg".into())
    );
}

#[tokio::test]
async fn test_mute_request_round_trip() {
    let mut bridge = Bridge::new();
    let player = kitchen();
    bridge.ready(&[&player]);
    bridge.line(&player, "name Kitchen");
    bridge.line(&player, "mixer muting 0");
    bridge.forward_requests();
    bridge.sink.drain_for(&player);

    bridge.store.set_state("Kitchen.muting", true.into(), false).unwrap();
    bridge.forward_requests();
    assert_eq!(bridge.sink.drain_for(&player), vec!["mixer muting 1"]);

    bridge.store.set_state("Kitchen.muting", true.into(), false).unwrap();
    bridge.forward_requests();
    assert!(bridge.sink.drain_for(&player).is_empty());

    // Confirmation from the server settles the request
    bridge.line(&player, "mixer muting 1");
    assert_eq!(bridge.value("Kitchen.muting"), Some(true.into()));
    assert!(bridge.store.get_state("Kitchen.muting").unwrap().ack);
}

#[tokio::test]
async fn test_play_request_powers_on() {
    let mut bridge = Bridge::new();
    let player = kitchen();
    bridge.ready(&[&player]);
    bridge.line(&player, "name Kitchen");
    bridge.line(&player, "mode stop");
    bridge.forward_requests();
    bridge.sink.drain_for(&player);

    bridge.store.set_state("Kitchen.state", StateValue::Number(1), false).unwrap();
    bridge.forward_requests();
    assert_eq!(bridge.sink.drain_for(&player), vec!["power 1", "play"]);
}

#[tokio::test]
async fn test_disconnect_stops_tickers() {
    let mut bridge = Bridge::new();
    let player = kitchen();
    bridge.ready(&[&player]);
    bridge.line(&player, "name Kitchen");
    bridge.line(&player, "time 3");
    assert!(bridge.engine.registry().get(&player).unwrap().has_ticker());

    bridge.feed(SessionEvent::Disconnected);
    assert!(!bridge.engine.registry().get(&player).unwrap().has_ticker());
}

#[tokio::test(start_paused = true)]
async fn test_run_loop_until_shutdown() {
    let store = StateStore::new();
    let sink = Arc::new(RecordingSink::default());
    let (engine, handle) =
        SyncEngine::new(EngineConfig::default(), sink.clone(), Arc::new(store.clone())).unwrap();
    let task = tokio::spawn(engine.run());

    let player = kitchen();
    handle.session_event(SessionEvent::Ready(vec![player.clone()])).unwrap();
    handle
        .session_event(SessionEvent::Player {
            player: player.clone(),
            notification: PlayerNotification::Line(vec!["name".into(), "Kitchen".into()]),
        })
        .unwrap();
    handle.shutdown().unwrap();
    task.await.unwrap();

    assert_eq!(store.channel_ids(), vec!["Kitchen".to_string()]);
    assert!(handle.session_event(SessionEvent::Disconnected).is_err());
}
