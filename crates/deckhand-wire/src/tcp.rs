// ── Raw TCP senders ──
//
// TCPMESSAGE and ROSSTALK are the same wire format (text line + CRLF)
// with different default ports; VideoHub speaks a fixed routing block
// over its telnet-style control port. Connections are opened per send
// and dropped without reading anything back.

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;

use crate::error::WireError;

/// Connect and write one text line terminated by CRLF.
pub async fn send_line(host: &str, port: u16, line: &str) -> Result<(), WireError> {
    debug!(host, port, "sending TCP line");
    let mut stream = TcpStream::connect((host, port)).await?;
    stream.write_all(format!("{line}\r\n").as_bytes()).await?;
    Ok(())
}

/// The literal VideoHub routing block, zero-based on both sides.
pub fn routing_block(destination: u32, source: u32) -> String {
    format!("VIDEO OUTPUT ROUTING:\r\n{destination} {source}\r\n\r\n")
}

/// Connect and write a single routing block.
pub async fn send_videohub_route(
    host: &str,
    port: u16,
    destination: u32,
    source: u32,
) -> Result<(), WireError> {
    debug!(host, port, destination, source, "sending VideoHub route");
    let mut stream = TcpStream::connect((host, port)).await?;
    stream
        .write_all(routing_block(destination, source).as_bytes())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::routing_block;

    #[test]
    fn routing_block_is_the_literal_wire_format() {
        assert_eq!(routing_block(0, 0), "VIDEO OUTPUT ROUTING:\r\n0 0\r\n\r\n");
        assert_eq!(routing_block(11, 6), "VIDEO OUTPUT ROUTING:\r\n11 6\r\n\r\n");
    }
}
