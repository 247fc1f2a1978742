//! HTTP surface: health probe plus the WebSocket upgrade
//!
//! Both live on the single listening port. Everything except `/ws` answers
//! the plain-text health probe, matching what sensor firmware expects.

use {
    crate::hub::BroadcastHub,
    axum::{
        extract::{
            ws::{Message, WebSocket},
            State, WebSocketUpgrade,
        },
        http::header,
        response::{IntoResponse, Response},
        routing::get,
        Router,
    },
    futures_util::{SinkExt, StreamExt},
    std::sync::Arc,
};

pub fn build_router(hub: Arc<BroadcastHub>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .fallback(health_handler)
        .with_state(hub)
}

async fn health_handler() -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/plain"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        "WebSocket Server is running\n",
    )
        .into_response()
}

async fn ws_handler(ws: WebSocketUpgrade, State(hub): State<Arc<BroadcastHub>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

/// Drive one WebSocket connection until it closes
///
/// The outbound half forwards the hub's per-connection queue; the inbound
/// half feeds text frames to the hub. Whichever half finishes first tears
/// the connection down.
async fn handle_socket(socket: WebSocket, hub: Arc<BroadcastHub>) {
    let (mut sink, mut stream) = socket.split();
    let (id, mut outbound) = hub.on_connect();

    let mut send_task = tokio::spawn(async move {
        while let Some(text) = outbound.recv().await {
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => hub.on_message(&text),
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // binary/ping/pong frames carry no readings
                    Some(Err(e)) => {
                        log::debug!("Client {} socket error: {}", id, e);
                        break;
                    }
                }
            }
            _ = &mut send_task => break,
        }
    }

    send_task.abort();
    hub.on_disconnect(id);
}
