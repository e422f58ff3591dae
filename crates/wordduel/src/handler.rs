//! Per-connection handler: decode inbound frames, drain outbound events.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Attach an outbound queue with the coordinator
//!   2. Loop: a frame from the socket is decoded and dispatched; an event
//!      from the queue is encoded and written to the socket
//!   3. On close or error: disconnect from the coordinator

use std::sync::Arc;

use wordduel_protocol::{ClientEvent, Codec, ServerEvent};
use wordduel_room::WordProvider;
use wordduel_transport::{Connection, ConnectionId, WebSocketConnection};

use crate::server::ServerState;
use crate::WordDuelError;

/// Drop guard that runs the coordinator's disconnect when the handler exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async lock.
struct DisconnectGuard<W: WordProvider, C: Codec> {
    connection: ConnectionId,
    state: Arc<ServerState<W, C>>,
}

impl<W: WordProvider, C: Codec> Drop for DisconnectGuard<W, C> {
    fn drop(&mut self) {
        let connection = self.connection;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.coordinator.lock().await.disconnect(connection);
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<W, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<W, C>>,
) -> Result<(), WordDuelError>
where
    W: WordProvider,
    C: Codec,
{
    let connection = conn.id();
    tracing::info!(%connection, "connection opened");

    // Attach and arm the guard back to back so a queue is never leaked.
    let mut outbound = state.coordinator.lock().await.connect(connection);
    let _guard = DisconnectGuard {
        connection,
        state: Arc::clone(&state),
    };

    loop {
        tokio::select! {
            incoming = conn.recv() => {
                let data = match incoming {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%connection, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%connection, error = %e, "recv error");
                        break;
                    }
                };
                handle_frame(&conn, &state, &data).await?;
            }
            Some(event) = outbound.recv() => {
                let frame = state.codec.encode(&event)?;
                conn.send(&frame).await?;
            }
        }
    }

    if let Err(e) = conn.close().await {
        tracing::debug!(%connection, error = %e, "close failed");
    }

    // _guard drops here → disconnect fires.
    Ok(())
}

/// Decodes one inbound frame and hands it to the coordinator.
///
/// A frame that is not a known event is answered with an `error` event
/// directly; the connection stays open.
async fn handle_frame<W, C>(
    conn: &WebSocketConnection,
    state: &ServerState<W, C>,
    data: &[u8],
) -> Result<(), WordDuelError>
where
    W: WordProvider,
    C: Codec,
{
    let connection = conn.id();
    let event: ClientEvent = match state.codec.decode(data) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(%connection, error = %e, "failed to decode event");
            let reply = ServerEvent::error(format!("Malformed event: {e}"));
            conn.send(&state.codec.encode(&reply)?).await?;
            return Ok(());
        }
    };

    tracing::trace!(%connection, ?event, "event received");
    state.coordinator.lock().await.dispatch(connection, event);
    Ok(())
}
