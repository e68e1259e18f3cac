//! VGFS client: a client implementation of the VGFS volume-group
//! filesystem wire protocol.
//!
//! The protocol is a binary call/response RPC layered directly over an
//! ordered, reliable byte stream. A client requests file-handle
//! operations (`nop`, `login`, `stat`, `lookup`, `create`, `remove`)
//! against a remote storage service that organizes objects into named
//! volume groups. Values use XDR encoding (big-endian scalars, four-byte
//! alignment), object references are opaque 268-byte handles replayed
//! byte-exact, and replies pair with calls purely by stream order.
//!
//! ## Main Components
//!
//! - `client`: the [`Client`] type. It owns one channel, exposes one method
//!   per remote operation, and enforces the one-call-in-flight discipline
//!   through `&mut self`.
//!
//! - `vfs`: the [`RemoteFs`] trait, the consumer-facing surface a
//!   filesystem adapter builds on.
//!
//! - `protocol`: the wire layer: XDR serialization of the primitive
//!   types and protocol structures, and the call/response exchange with
//!   its failure taxonomy ([`CallError`]).
//!
//! ## Usage
//!
//! ```
//! use vgfs_client::{Client, FsString};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = Client::connect("127.0.0.1:2323").await?;
//! let root = client.login(&FsString::from("conn1"), &FsString::from("vg1")).await?;
//! let attr = client.stat(&root).await?;
//! println!("root: {} bytes", attr.size);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod protocol;
pub mod vfs;

pub use client::Client;
pub use protocol::rpc::CallError;
pub use protocol::xdr;
pub use protocol::xdr::fs::{Attributes, FileKind, FsString, Handle, Procedure};
pub use vfs::RemoteFs;
