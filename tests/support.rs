//! Scripted in-memory server shared by the call-layer tests.

use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::task::JoinHandle;

use vgfs_client::xdr::Serialize;

/// One request/reply pair of a scripted conversation.
pub struct Exchange {
    /// Exact bytes the server expects to read for this call.
    pub expect: Vec<u8>,
    /// Bytes played back as the reply.
    pub reply: Vec<u8>,
}

/// Spawns the server half of a scripted conversation on an in-memory
/// duplex pipe: for every exchange it reads exactly the expected request
/// bytes, asserts them, and plays back the canned reply. The pipe drops
/// when the script runs out, so any further client read sees a closed
/// channel.
pub fn scripted_server(script: Vec<Exchange>) -> (DuplexStream, JoinHandle<()>) {
    let (client_end, mut server_end) = tokio::io::duplex(64 * 1024);
    let task = tokio::spawn(async move {
        for (step, exchange) in script.into_iter().enumerate() {
            let mut request = vec![0_u8; exchange.expect.len()];
            server_end.read_exact(&mut request).await.expect("read request");
            assert_eq!(request, exchange.expect, "request bytes mismatch at step {step}");
            server_end.write_all(&exchange.reply).await.expect("write reply");
        }
    });
    (client_end, task)
}

/// Serializes a wire value into a standalone buffer.
pub fn encoded(value: &impl Serialize) -> Vec<u8> {
    let mut buf = Vec::new();
    value.serialize(&mut buf).expect("serialize");
    buf
}

/// Request bytes for a call: the opcode word followed by the encoded
/// arguments.
pub fn call_bytes(opcode: u32, args: &impl Serialize) -> Vec<u8> {
    let mut buf = encoded(&opcode);
    buf.extend(encoded(args));
    buf
}

/// Reply bytes for a successful call carrying `payload`.
pub fn ok_reply(payload: &impl Serialize) -> Vec<u8> {
    let mut buf = encoded(&0_u32);
    buf.extend(encoded(payload));
    buf
}

/// Reply bytes for a failed call: the bare nonzero status word.
pub fn err_reply(status: u32) -> Vec<u8> {
    encoded(&status)
}
