use fishbowl::interface_adapters::clients::RoomsClient;
use fishbowl::{NetConfig, NetworkedSession, SessionInput};
use tokio::sync::mpsc;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

#[tokio::main]
async fn main() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let theme_id = std::env::var("FISHBOWL_THEME").unwrap_or_else(|_| "aquarium".to_string());
    let player_id = std::env::var("FISHBOWL_PLAYER_ID")
        .unwrap_or_else(|_| format!("player-{}", std::process::id()));

    let rooms = match RoomsClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "failed to build http client");
            return;
        }
    };
    let room = match rooms.get_or_create_room(&theme_id).await {
        Ok(room) => room,
        Err(e) => {
            tracing::error!(error = ?e, theme_id, "room lookup failed");
            return;
        }
    };
    tracing::info!(room_id = %room.room_id, players = room.player_count, "joining room");

    let mut session = NetworkedSession::connect(NetConfig::from_env(room.room_id.as_str()), player_id);
    let (input_tx, mut input_rx) = mpsc::channel::<SessionInput>(16);

    // Ctrl-C tears the session down; dropping the sender afterwards closes
    // the input channel as a fallback exit path.
    let stop = session.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.notify_one();
        }
        drop(input_tx);
    });

    session.run(&mut input_rx).await;
    tracing::info!("session ended");
}
