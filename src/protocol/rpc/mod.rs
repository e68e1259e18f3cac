//! Call/response layer of the VGFS protocol.
//!
//! Every remote operation is one synchronous exchange: the opcode and
//! arguments go out, then the status word and result payload come back.
//! The protocol carries no request identifiers, so replies are matched to
//! calls purely by stream order; the channel must therefore never have
//! more than one call in flight. Enforcement lives a layer up, in
//! [`crate::client::Client`], whose operations take `&mut self`.
//!
//! Failures split into two kinds with very different consequences for
//! the caller, see [`CallError`].

mod wire;

pub use wire::call;

use thiserror::Error;

use crate::protocol::xdr::fs::Procedure;

/// Failure of a single remote call.
///
/// A [`CallError::Transport`] failure poisons the channel: replies are
/// framed by stream position alone, so once a read or write dies mid-call
/// there is no way to resynchronize. The caller must drop the connection
/// and establish a new one before retrying anything.
///
/// A [`CallError::Remote`] failure leaves the channel aligned on a call
/// boundary; the connection stays usable. This layer never retries;
/// retry policy, if any, belongs to the caller.
#[derive(Debug, Error)]
pub enum CallError {
    /// The channel closed or failed mid-exchange.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// The server answered with a nonzero status word. Code meanings are
    /// server-defined and undocumented; the raw value is carried for
    /// diagnostics, not interpreted.
    #[error("{proc:?} failed with server status {status}")]
    Remote { proc: Procedure, status: u32 },
}
