// Reconnect behavior of the transport against a scripted in-process server:
// a non-client disconnect triggers a bounded retry with a fresh room join,
// exhaustion is terminal, and client-initiated shutdown never retries.

mod support;

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use fishbowl::domain::GamePhase;
use fishbowl::interface_adapters::net::{LinkState, NetClient, NetConfig, NetEvent};
use fishbowl::interface_adapters::protocol::{
    ClientMessage, ServerMessage, SyncStateDto, WireItem,
};
use fishbowl::{NetworkedSession, SessionInput};

fn test_config(url: String) -> NetConfig {
    NetConfig {
        url,
        room_id: "room-1".to_string(),
        reconnect_attempts: 5,
        reconnect_delay: Duration::from_millis(50),
        connect_timeout: Duration::from_secs(2),
    }
}

async fn next_link(events: &mut mpsc::Receiver<NetEvent>) -> LinkState {
    loop {
        let event = timeout(Duration::from_secs(3), events.recv())
            .await
            .expect("event in time")
            .expect("event channel open");
        if let NetEvent::Link(state) = event {
            return state;
        }
    }
}

#[tokio::test]
async fn rejoins_after_a_server_side_drop() {
    let (listener, url) = support::bind().await;

    let server = tokio::spawn(async move {
        let mut first = support::accept(&listener).await;
        let join = support::recv_client(&mut first).await;
        assert!(matches!(join, ClientMessage::RoomJoin(ref r) if r.room_id == "room-1"));
        // Kill the connection without a close handshake.
        drop(first);

        let mut second = support::accept(&listener).await;
        let rejoin = support::recv_client(&mut second).await;
        assert!(matches!(rejoin, ClientMessage::RoomJoin(ref r) if r.room_id == "room-1"));
        second
    });

    let (mut client, mut events) = NetClient::start(test_config(url));

    assert_eq!(next_link(&mut events).await, LinkState::Connecting);
    assert_eq!(next_link(&mut events).await, LinkState::Connected);
    assert_eq!(next_link(&mut events).await, LinkState::Disconnected);
    assert_eq!(
        next_link(&mut events).await,
        LinkState::Reconnecting { attempt: 1 }
    );
    assert_eq!(next_link(&mut events).await, LinkState::Connected);

    let mut second = server.await.expect("server task");

    client.shutdown().await;
    // Graceful teardown announces the leave on the live socket.
    let leave = support::recv_client(&mut second).await;
    assert!(matches!(leave, ClientMessage::RoomLeave(ref r) if r.room_id == "room-1"));
}

#[tokio::test]
async fn gives_up_after_exhausting_retries() {
    // Reserve a port, then free it so every connect is refused.
    let (listener, url) = support::bind().await;
    drop(listener);

    let mut config = test_config(url);
    config.reconnect_attempts = 2;
    config.reconnect_delay = Duration::from_millis(10);

    let (_client, mut events) = NetClient::start(config);

    assert_eq!(next_link(&mut events).await, LinkState::Connecting);
    assert_eq!(
        next_link(&mut events).await,
        LinkState::Reconnecting { attempt: 1 }
    );
    assert_eq!(
        next_link(&mut events).await,
        LinkState::Reconnecting { attempt: 2 }
    );
    assert_eq!(next_link(&mut events).await, LinkState::Failed);

    // The loop stopped: the channel closes and no further attempt is made.
    let trailing = timeout(Duration::from_secs(1), events.recv())
        .await
        .expect("channel should close promptly");
    assert!(trailing.is_none());
}

#[tokio::test]
async fn client_shutdown_does_not_retry() {
    let (listener, url) = support::bind().await;

    let server = tokio::spawn(async move {
        let mut socket = support::accept(&listener).await;
        let join = support::recv_client(&mut socket).await;
        assert!(matches!(join, ClientMessage::RoomJoin(_)));
        socket
    });

    let (mut client, mut events) = NetClient::start(test_config(url));
    assert_eq!(next_link(&mut events).await, LinkState::Connecting);
    assert_eq!(next_link(&mut events).await, LinkState::Connected);

    let mut socket = server.await.expect("server task");
    client.shutdown().await;

    let leave = support::recv_client(&mut socket).await;
    assert!(matches!(leave, ClientMessage::RoomLeave(_)));

    // Only the final Disconnected follows; never a reconnect attempt.
    let mut saw_disconnected = false;
    while let Some(event) = events.recv().await {
        match event {
            NetEvent::Link(LinkState::Disconnected) => saw_disconnected = true,
            NetEvent::Link(LinkState::Reconnecting { .. } | LinkState::Failed) => {
                panic!("shutdown must not trigger retries");
            }
            _ => {}
        }
    }
    assert!(saw_disconnected);
}

#[tokio::test]
async fn session_applies_the_first_snapshot() {
    let (listener, url) = support::bind().await;

    let server = tokio::spawn(async move {
        let mut socket = support::accept(&listener).await;
        let join = support::recv_client(&mut socket).await;
        assert!(matches!(join, ClientMessage::RoomJoin(_)));

        support::send_server(
            &mut socket,
            &ServerMessage::SyncState(SyncStateDto {
                phase: Some("voting".to_string()),
                room_id: Some("room-1".to_string()),
                ai_count: Some(1),
                turbidity: Some(0.2),
                items: Some(vec![
                    WireItem {
                        id: Some("f1".to_string()),
                        name: Some("Bloop".to_string()),
                        ..WireItem::default()
                    },
                    WireItem {
                        id: Some("f2".to_string()),
                        is_ai: true,
                        ..WireItem::default()
                    },
                ]),
                ..SyncStateDto::default()
            }),
        )
        .await;

        // Stay alive until the client leaves.
        let leave = support::recv_client(&mut socket).await;
        assert!(matches!(leave, ClientMessage::RoomLeave(_)));
    });

    let player_id = uuid::Uuid::new_v4().to_string();
    let mut session = NetworkedSession::connect(test_config(url), player_id);
    let stop = session.stop_handle();
    let (input_tx, mut input_rx) = mpsc::channel::<SessionInput>(8);

    let handle = tokio::spawn(async move {
        session.run(&mut input_rx).await;
        session
    });

    // Give the link time to connect and apply the snapshot.
    tokio::time::sleep(Duration::from_millis(500)).await;
    stop.notify_one();

    let session = timeout(Duration::from_secs(3), handle)
        .await
        .expect("session should stop")
        .expect("session task");
    drop(input_tx);

    let store = session.store();
    assert!(store.is_synced());
    assert_eq!(store.phase(), GamePhase::Voting);
    assert_eq!(store.total_items(), 2);
    assert_eq!(store.ai_count(), 1);
    assert_eq!(store.item("f1").unwrap().name, "Bloop");
    assert!(store.item("f2").unwrap().is_ai);

    server.await.expect("server assertions");
}
