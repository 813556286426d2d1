//! WebSocket gateway.
//!
//! Accepts observer connections and runs one task per connection. Each task
//! multiplexes two streams until either side goes away:
//!
//! - inbound frames → [`Session::handle_text`] → optional reply
//! - the connection's bounded event queue → outbound `update` frames
//!
//! Dropping the session on exit removes the observer from every room.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::error::TransportError;
use super::message::{encode_update, ServerMessage};
use super::session::{GatewayContext, Session};
use crate::registry::ObserverHandle;

/// Listening WebSocket endpoint.
pub struct WebSocketGateway {
    listener: TcpListener,
    ctx: GatewayContext,
}

impl WebSocketGateway {
    /// Bind the listen socket. Port 0 picks a free port.
    pub async fn bind(addr: SocketAddr, ctx: GatewayContext) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "WebSocket gateway listening");
        Ok(Self { listener, ctx })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until cancelled.
    pub async fn run(self, cancellation: CancellationToken) {
        loop {
            tokio::select! {
                biased;

                _ = cancellation.cancelled() => {
                    info!("WebSocket gateway shutting down");
                    break;
                }

                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let ctx = self.ctx.clone();
                        let token = cancellation.child_token();
                        tokio::spawn(async move {
                            if let Err(e) = serve_connection(stream, peer, ctx, token).await {
                                debug!(%peer, error = %e, "Connection ended with error");
                            }
                        });
                    }
                    Err(e) => warn!(error = %e, "Failed to accept connection"),
                },
            }
        }
    }
}

async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    ctx: GatewayContext,
    cancellation: CancellationToken,
) -> Result<(), TransportError> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let (mut sink, mut source) = ws.split();

    let (observer, mut events) = ObserverHandle::channel(ctx.queue_capacity);
    let session = Session::new(ctx, observer);
    debug!(%peer, observer = %session.observer().id(), "Observer connected");

    loop {
        tokio::select! {
            _ = cancellation.cancelled() => {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }

            Some(event) = events.recv() => {
                sink.send(Message::Text(encode_update(&event)?)).await?;
            }

            frame = source.next() => match frame {
                None | Some(Ok(Message::Close(_))) => break,
                Some(Err(e)) => return Err(e.into()),
                Some(Ok(Message::Text(text))) => {
                    if let Some(reply) = session.handle_text(&text) {
                        sink.send(Message::Text(serde_json::to_string(&reply)?)).await?;
                    }
                }
                Some(Ok(Message::Binary(_))) => {
                    let reply = ServerMessage::error("Binary frames are not supported");
                    sink.send(Message::Text(serde_json::to_string(&reply)?)).await?;
                }
                // Pings are answered by tungstenite on the next write
                Some(Ok(_)) => {}
            },
        }
    }

    debug!(%peer, observer = %session.observer().id(), "Observer disconnected");
    Ok(())
}
