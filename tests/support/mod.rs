// Shared in-process WebSocket server primitives for the network tests.

use fishbowl::interface_adapters::protocol::{ClientMessage, ServerMessage};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

pub type ServerSocket = WebSocketStream<TcpStream>;

/// Binds an ephemeral port and returns the listener plus its ws:// URL.
pub async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test port");
    let url = format!("ws://{}", listener.local_addr().expect("local addr"));
    (listener, url)
}

pub async fn accept(listener: &TcpListener) -> ServerSocket {
    let (stream, _) = listener.accept().await.expect("accept");
    tokio_tungstenite::accept_async(stream)
        .await
        .expect("ws handshake")
}

/// Reads frames until a parseable client message arrives.
pub async fn recv_client(socket: &mut ServerSocket) -> ClientMessage {
    loop {
        match socket.next().await.expect("connection open").expect("ws frame") {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).expect("client message");
            }
            Message::Close(frame) => panic!("closed before a message arrived: {frame:?}"),
            _ => {}
        }
    }
}

pub async fn send_server(socket: &mut ServerSocket, message: &ServerMessage) {
    let json = serde_json::to_string(message).expect("serialize server message");
    socket.send(Message::Text(json.into())).await.expect("send frame");
}
