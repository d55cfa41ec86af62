use std::time::Duration;

use adrenaline_content::{MapKind, standard_decks};
use adrenaline_core::action::SpawnRequest;
use adrenaline_core::{
    ActionEffect, ActionEnvelope, ActionError, ActionKind, ActionRequest, ActionSet, GameStatus,
    PhaseState, PlayerColor, Rejection, SetupError,
};
use adrenaline_runtime::{
    Event, GameStateEvent, LobbyEvent, Runtime, RuntimeConfig, RuntimeError, Topic,
};
use tokio::sync::broadcast;
use tokio::time::timeout;
use tracing_subscriber::EnvFilter;

const PLAYERS: [(&str, PlayerColor); 3] = [
    ("violetta", PlayerColor::Yellow),
    ("dozer", PlayerColor::Green),
    ("banshee", PlayerColor::Blue),
];

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn next_event(rx: &mut broadcast::Receiver<Event>) -> Event {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("event should arrive in time")
        .expect("event channel should stay open")
}

async fn seated_runtime() -> Runtime {
    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            seed: 11,
            ..RuntimeConfig::default()
        })
        .build()
        .await
        .expect("runtime should build");

    let handle = runtime.handle();
    for (nickname, color) in PLAYERS {
        handle
            .add_player(nickname, color)
            .await
            .expect("player should be seated");
    }
    runtime
}

fn spawn(sender: PlayerColor) -> ActionEnvelope {
    ActionEnvelope::new(
        sender,
        ActionKind::Spawn,
        ActionRequest::Spawn(SpawnRequest { powerup: 0 }),
    )
}

#[tokio::test]
async fn first_turns_of_a_match() {
    init_tracing();

    let runtime = seated_runtime().await;
    let handle = runtime.handle();
    let mut lobby = runtime.subscribe(Topic::Lobby);
    let mut turns = runtime.subscribe(Topic::Turn);
    let mut game_events = runtime.subscribe(Topic::GameState);

    let snapshot = handle.start().await.expect("game should start");
    assert_eq!(snapshot.status, GameStatus::Started);
    assert_eq!(snapshot.first_player, Some(PlayerColor::Yellow));
    assert_eq!(snapshot.turn_owner, Some(PlayerColor::Yellow));

    let Event::Lobby(LobbyEvent::GameStarted { first_player }) = next_event(&mut lobby).await
    else {
        panic!("expected the start event");
    };
    assert_eq!(first_player, PlayerColor::Yellow);
    let Event::Turn(turn) = next_event(&mut turns).await else {
        panic!("expected a turn event");
    };
    assert_eq!(turn.owner, PlayerColor::Yellow);

    // The first player spawns on the colour of the discarded powerup.
    let hand = handle.powerups(PlayerColor::Yellow).await.unwrap();
    assert_eq!(hand.len(), 2);
    let offered = handle.possible_actions(PlayerColor::Yellow).await.unwrap();
    assert!(offered.contains(ActionSet::SPAWN));

    let outcome = handle
        .execute_action(spawn(PlayerColor::Yellow))
        .await
        .expect("spawn should be accepted");
    let map = MapKind::Small.load().unwrap();
    assert_eq!(
        outcome.effect,
        ActionEffect::Spawned(map.spawn_of(hand[0].color).unwrap())
    );
    assert_eq!(outcome.nonce, 1);
    assert_eq!(handle.powerups(PlayerColor::Yellow).await.unwrap(), vec![hand[1]]);

    let Event::GameState(GameStateEvent::ActionExecuted { sender, kind, .. }) =
        next_event(&mut game_events).await
    else {
        panic!("expected an executed action");
    };
    assert_eq!((sender, kind), (PlayerColor::Yellow, ActionKind::Spawn));

    // Out of turn requests are refused and leave the game alone.
    let error = handle
        .execute_action(ActionEnvelope::pass(PlayerColor::Green))
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::Action(ActionError::Rejected(Rejection::NotYourTurn(PlayerColor::Green)))
    ));
    let Event::GameState(GameStateEvent::ActionRejected { code, .. }) =
        next_event(&mut game_events).await
    else {
        panic!("expected a rejection");
    };
    assert_eq!(code, "NOT_YOUR_TURN");
    assert_eq!(handle.query_state().await.unwrap().nonce, 1);

    // Passing hands the turn to the next seat, which starts by spawning.
    handle
        .execute_action(ActionEnvelope::pass(PlayerColor::Yellow))
        .await
        .expect("pass should be accepted");
    let Event::Turn(turn) = next_event(&mut turns).await else {
        panic!("expected a turn event");
    };
    assert_eq!(turn.owner, PlayerColor::Green);

    let state = handle.query_state().await.unwrap();
    let green = state.player(PlayerColor::Green).unwrap();
    assert_eq!(green.phase, PhaseState::Spawn);
    assert_eq!(green.powerup_count, 2);
}

#[tokio::test]
async fn disconnected_owner_is_spawned_and_skipped() {
    init_tracing();

    let runtime = seated_runtime().await;
    let handle = runtime.handle();
    handle.start().await.unwrap();
    handle.execute_action(spawn(PlayerColor::Yellow)).await.unwrap();
    handle
        .execute_action(ActionEnvelope::pass(PlayerColor::Yellow))
        .await
        .unwrap();

    let mut lobby = runtime.subscribe(Topic::Lobby);
    let mut turns = runtime.subscribe(Topic::Turn);
    handle.disconnect(PlayerColor::Green).await.unwrap();

    let Event::Lobby(LobbyEvent::PlayerDisconnected { color }) = next_event(&mut lobby).await
    else {
        panic!("expected a disconnection");
    };
    assert_eq!(color, PlayerColor::Green);
    let Event::Turn(turn) = next_event(&mut turns).await else {
        panic!("expected a turn event");
    };
    assert_eq!(turn.owner, PlayerColor::Blue);

    let state = handle.query_state().await.unwrap();
    let green = state.player(PlayerColor::Green).unwrap();
    assert!(!green.connected);
    assert!(green.actor.position.is_some());

    handle.reconnect(PlayerColor::Green).await.unwrap();
    let state = handle.query_state().await.unwrap();
    assert!(state.player(PlayerColor::Green).unwrap().connected);
}

#[tokio::test]
async fn lobby_errors_come_back_as_setup_errors() {
    init_tracing();

    let runtime = Runtime::builder()
        .map(MapKind::Large.load().unwrap())
        .decks(standard_decks(3))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    handle.add_player("sprog", PlayerColor::Grey).await.unwrap();
    let error = handle
        .add_player("d-struct-or", PlayerColor::Grey)
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::Setup(SetupError::ColorTaken(PlayerColor::Grey))
    ));

    let error = handle.start().await.unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::Setup(SetupError::NotEnoughPlayers { found: 1, .. })
    ));

    let error = handle
        .execute_action(ActionEnvelope::pass(PlayerColor::Grey))
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::Action(ActionError::Rejected(Rejection::GameNotRunning))
    ));
}

#[tokio::test]
async fn snapshots_serialize_for_clients() {
    init_tracing();

    let runtime = seated_runtime().await;
    let handle = runtime.handle();
    handle.start().await.unwrap();

    let state = handle.query_state().await.unwrap();
    let json = serde_json::to_value(&state).expect("snapshot should serialize");
    assert_eq!(json["players"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["skulls"], 8);
}

#[tokio::test]
async fn shutdown_waits_for_the_worker() {
    init_tracing();

    let runtime = seated_runtime().await;
    let handle = runtime.handle();
    handle.start().await.unwrap();
    drop(handle);

    timeout(Duration::from_secs(1), runtime.shutdown())
        .await
        .expect("worker should stop once handles are gone")
        .expect("worker should join cleanly");
}

#[tokio::test]
async fn abandoned_match_ends_with_standings() {
    init_tracing();

    let runtime = seated_runtime().await;
    let handle = runtime.handle();
    handle.start().await.unwrap();
    let mut game_events = runtime.subscribe(Topic::GameState);

    for (_, color) in PLAYERS {
        handle.disconnect(color).await.unwrap();
    }

    let Event::GameState(GameStateEvent::GameEnded { standings }) =
        next_event(&mut game_events).await
    else {
        panic!("expected the end of the game");
    };
    assert_eq!(standings.len(), PLAYERS.len());
    assert!(standings.iter().all(|standing| standing.points == 0));

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.status, GameStatus::Ended);
    let error = handle.start().await.unwrap_err();
    assert!(matches!(error, RuntimeError::Setup(SetupError::AlreadyStarted)));
}
