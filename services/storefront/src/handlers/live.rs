use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, warn};

use bazaar_domain::entity::ServiceType;

use crate::domain::repository::CatalogPort;
use crate::domain::types::MAX_QUERY_LEN;
use crate::state::AppState;

/// `GET /search/live`: each text frame from the client is the full query.
pub async fn live<C: CatalogPort + Clone>(
    State(state): State<AppState<C>>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| run_socket(socket, state))
}

async fn run_socket<C: CatalogPort + Clone>(socket: WebSocket, state: AppState<C>) {
    let mut session = state
        .live_search()
        .spawn(state.feed.subscribe(&ServiceType::ALL));
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    session.keystroke(text.as_str().chars().take(MAX_QUERY_LEN).collect::<String>());
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(error = %e, "live search socket closed with error");
                    break;
                }
            },
            frame = session.next_frame() => {
                let Some(frame) = frame else { break };
                let json = match serde_json::to_string(&frame) {
                    Ok(json) => json,
                    Err(e) => {
                        warn!(error = %e, "failed to encode live search frame");
                        continue;
                    }
                };
                if sink.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    }
}
