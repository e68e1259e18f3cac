//! Boundary between the protocol client and filesystem adapters.
//!
//! A mounted-filesystem adapter (a FUSE shim, a synthetic filesystem, a
//! test harness) consumes the six remote operations and maps their
//! results onto filesystem semantics: path resolution by repeated
//! `lookup`, metadata exposure via `stat`, absence surfaced as a nonzero
//! server status on `lookup` or `remove`. Expressing the surface as a
//! trait keeps adapters independent of the transport and lets tests
//! substitute a scripted implementation for a live connection.
//!
//! [`crate::client::Client`] is the wire implementation of this trait.

use async_trait::async_trait;

use crate::protocol::rpc::CallError;
use crate::protocol::xdr::fs::{Attributes, FsString, Handle};

/// The complete remote-call surface of one session.
///
/// Implementations perform one synchronous exchange per call and cache
/// nothing between calls. Handles handed to the caller stay valid for as
/// long as the remote side says they do; this layer attaches no expiry of
/// its own.
///
/// Methods take `&mut self`: a session admits one call in flight, and
/// exclusive access makes that a compile-time guarantee rather than a
/// calling convention.
#[async_trait]
pub trait RemoteFs {
    /// Liveness probe; succeeds exactly when the server answers status
    /// zero.
    async fn nop(&mut self) -> Result<(), CallError>;

    /// Opens a logical session against the named volume group and
    /// returns the root handle for subsequent calls.
    async fn login(&mut self, conn: &FsString, vg: &FsString) -> Result<Handle, CallError>;

    /// Fetches a fresh metadata snapshot for an existing handle.
    async fn stat(&mut self, handle: &Handle) -> Result<Attributes, CallError>;

    /// Resolves a child entry by name under a parent handle.
    async fn lookup(&mut self, parent: &Handle, name: &FsString) -> Result<Handle, CallError>;

    /// Creates a named entry under a parent handle with the given mode
    /// word and returns its handle.
    async fn create(
        &mut self,
        parent: &Handle,
        name: &FsString,
        mode: u32,
    ) -> Result<Handle, CallError>;

    /// Deletes a named entry under a parent handle.
    async fn remove(&mut self, parent: &Handle, name: &FsString) -> Result<(), CallError>;
}
