//! Byte-level halves of one call: transmit, then receive.
//!
//! The transmit half serializes the opcode header and arguments into one
//! buffer and writes it out whole. The receive half reads exactly four
//! status bytes, and on success exactly the fixed encoded width of the
//! reply payload, before decoding. On a nonzero status not a single
//! payload byte is consumed from the stream.

use std::io::Cursor;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

use super::CallError;
use crate::protocol::xdr::fs::{CallHeader, Procedure, ReplyHeader};
use crate::protocol::xdr::{deserialize, Deserialize, FixedLen, Serialize};

/// Performs one full exchange on `channel`: send the opcode and
/// arguments, then block until the status word and result payload arrive.
///
/// `write_all`/`read_exact` uphold the framing contract: writes transmit
/// every byte before returning, and a channel that runs dry mid-read
/// fails with [`std::io::ErrorKind::UnexpectedEof`] instead of yielding a
/// short value.
pub async fn call<S, A, T>(channel: &mut S, proc: Procedure, args: &A) -> Result<T, CallError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    A: Serialize,
    T: Deserialize + Default + FixedLen,
{
    send_call(channel, proc, args).await?;
    recv_reply(channel, proc).await
}

async fn send_call<S, A>(channel: &mut S, proc: Procedure, args: &A) -> Result<(), CallError>
where
    S: AsyncWrite + Unpin,
    A: Serialize,
{
    let mut buf = Vec::new();
    CallHeader { proc }.serialize(&mut buf)?;
    args.serialize(&mut buf)?;

    trace!("sending {:?} call, {} bytes", proc, buf.len());
    channel.write_all(&buf).await?;
    channel.flush().await?;

    Ok(())
}

async fn recv_reply<S, T>(channel: &mut S, proc: Procedure) -> Result<T, CallError>
where
    S: AsyncRead + Unpin,
    T: Deserialize + Default + FixedLen,
{
    let mut header = [0_u8; 4];
    channel.read_exact(&mut header).await?;
    let reply = deserialize::<ReplyHeader>(&mut Cursor::new(&header))?;

    if reply.status != 0 {
        trace!("{:?} reply carries status {}", proc, reply.status);
        return Err(CallError::Remote { proc, status: reply.status });
    }

    if T::LEN == 0 {
        return Ok(T::default());
    }

    let mut payload = vec![0_u8; T::LEN];
    channel.read_exact(&mut payload).await?;
    trace!("{:?} reply, {} payload bytes", proc, payload.len());

    Ok(deserialize::<T>(&mut Cursor::new(payload))?)
}
