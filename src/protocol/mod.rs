//! Protocol module implements the VGFS remote filesystem wire protocol.
//!
//! This module contains two layered components:
//!
//! - `xdr`: External Data Representation (XDR) serialization and
//!   deserialization of the primitive wire types, plus the protocol's
//!   data structures (handles, attribute snapshots, call arguments).
//!
//! - `rpc`: the call/response exchange (opcode header out, arguments
//!   out, status word in, result payload in) and the failure taxonomy of
//!   a single call.
//!
//! The protocol is strictly ordered: there are no request identifiers,
//! replies pair with calls by stream position, and one channel serves one
//! logical session.

pub mod rpc;
pub mod xdr;
