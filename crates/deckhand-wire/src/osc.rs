// ── OSC sender ──
//
// One UDP datagram per trigger, sent from a fixed local endpoint. The
// previous socket is dropped and the port re-bound on every send, so at
// most one OSC send is ever in flight.

use deckhand_core::{OscArg, OscMessageSpec};
use rosc::{OscMessage, OscPacket, OscType};
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::WireError;

/// Fixed local endpoint OSC datagrams are sent from.
pub const LOCAL_OSC_ADDR: &str = "127.0.0.1:57121";

/// Encode a message spec into a single OSC packet.
pub fn encode(message: &OscMessageSpec) -> Result<Vec<u8>, WireError> {
    let packet = OscPacket::Message(OscMessage {
        addr: message.address.clone(),
        args: message.args.iter().map(to_osc_type).collect(),
    });
    rosc::encoder::encode(&packet).map_err(|err| WireError::OscEncode(err.to_string()))
}

#[allow(clippy::as_conversions, clippy::cast_possible_truncation)]
fn to_osc_type(arg: &OscArg) -> OscType {
    match arg {
        OscArg::Bool(b) => OscType::Bool(*b),
        // i32 is the interoperable OSC int; widen only when it overflows.
        OscArg::Int(i) => i32::try_from(*i).map_or(OscType::Long(*i), OscType::Int),
        // float32 is the interoperable OSC float type.
        OscArg::Float(f) => OscType::Float(*f as f32),
        OscArg::Text(s) => OscType::String(s.clone()),
    }
}

/// Drop the previous local socket, re-bind the fixed endpoint, and send
/// one datagram.
pub async fn send(
    slot: &Mutex<Option<UdpSocket>>,
    host: &str,
    port: u16,
    message: &OscMessageSpec,
) -> Result<(), WireError> {
    let payload = encode(message)?;

    let mut guard = slot.lock().await;
    guard.take();
    let socket = UdpSocket::bind(LOCAL_OSC_ADDR).await?;
    debug!(host, port, address = %message.address, "sending OSC datagram");
    socket.send_to(&payload, (host, port)).await?;
    *guard = Some(socket);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn decode(bytes: &[u8]) -> OscMessage {
        let (_, packet) = rosc::decoder::decode_udp(bytes).unwrap();
        match packet {
            OscPacket::Message(msg) => msg,
            OscPacket::Bundle(b) => panic!("expected message, got bundle {b:?}"),
        }
    }

    #[test]
    fn encodes_address_only_message() {
        let bytes = encode(&OscMessageSpec {
            address: "/cue/5/start".into(),
            args: Vec::new(),
        })
        .unwrap();

        let msg = decode(&bytes);
        assert_eq!(msg.addr, "/cue/5/start");
        assert!(msg.args.is_empty());
    }

    #[test]
    fn encodes_typed_args() {
        let bytes = encode(&OscMessageSpec {
            address: "/mix/fader".into(),
            args: vec![
                OscArg::Int(3),
                OscArg::Float(0.5),
                OscArg::Text("main".into()),
                OscArg::Bool(true),
            ],
        })
        .unwrap();

        let msg = decode(&bytes);
        assert_eq!(
            msg.args,
            vec![
                OscType::Int(3),
                OscType::Float(0.5),
                OscType::String("main".into()),
                OscType::Bool(true),
            ]
        );
    }

    #[test]
    fn oversized_ints_widen_to_long() {
        let bytes = encode(&OscMessageSpec {
            address: "/big".into(),
            args: vec![OscArg::Int(i64::from(i32::MAX) + 1)],
        })
        .unwrap();

        let msg = decode(&bytes);
        assert_eq!(msg.args, vec![OscType::Long(i64::from(i32::MAX) + 1)]);
    }
}
