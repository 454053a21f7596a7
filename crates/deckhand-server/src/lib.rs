//! TCP control server for the deckhand engine.
//!
//! Accepts concurrent connections and feeds each inbound read to the
//! deck as one CRLF-delimited command batch. The deck mutex serializes
//! batches against key presses and reloads — every batch runs to
//! completion before the next begins. Each read is answered with the
//! single fixed acknowledgement line regardless of what it contained;
//! there is no other protocol-level feedback.
//!
//! Inherited wire contract: reads are parsed independently, so a
//! command line split across two TCP segments is not reassembled.

use std::io;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use deckhand_core::Deck;

/// The fixed reply written after every accepted batch.
pub const ACK_LINE: &str = "Command received.\r\n";

const READ_BUFFER_SIZE: usize = 4096;

/// Serve control connections until the token is cancelled.
pub async fn run(listener: TcpListener, deck: Arc<Mutex<Deck>>, cancel: CancellationToken) {
    match listener.local_addr() {
        Ok(addr) => info!(%addr, "control server listening"),
        Err(err) => warn!(%err, "control server listening on unknown address"),
    }

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                info!("control server shutting down");
                break;
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        debug!(%peer, "control connection accepted");
                        let deck = Arc::clone(&deck);
                        let cancel = cancel.clone();
                        tokio::spawn(async move {
                            if let Err(err) = handle_connection(stream, deck, cancel).await {
                                warn!(%peer, %err, "control connection error");
                            }
                            debug!(%peer, "control connection closed");
                        });
                    }
                    Err(err) => warn!(%err, "accept failed"),
                }
            }
        }
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    deck: Arc<Mutex<Deck>>,
    cancel: CancellationToken,
) -> io::Result<()> {
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let n = tokio::select! {
            () = cancel.cancelled() => return Ok(()),
            read = stream.read(&mut buf) => read?,
        };
        if n == 0 {
            return Ok(());
        }

        let batch = String::from_utf8_lossy(&buf[..n]);
        deck.lock().await.handle_batch(&batch);

        stream.write_all(ACK_LINE.as_bytes()).await?;
    }
}
