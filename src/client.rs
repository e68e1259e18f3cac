//! The protocol client: one channel, one call at a time.

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::debug;

use crate::protocol::rpc::{self, CallError};
use crate::protocol::xdr::fs::{
    Attributes, CreateArgs, FsString, Handle, LoginArgs, LookupArgs, Procedure, RemoveArgs,
    StatArgs,
};
use crate::vfs::RemoteFs;

/// A connected VGFS client.
///
/// Each instance owns exactly one channel and carries no other state:
/// handles returned by calls belong to the caller, nothing is cached
/// between calls, and independent sessions are simply independent
/// clients.
///
/// Every operation takes `&mut self` because the protocol admits only
/// one call in flight per channel: replies carry no request identifier
/// and pair with calls by stream order. To share a client across tasks,
/// wrap it in a single-owner lock such as [`tokio::sync::Mutex`]; the
/// client performs no internal locking.
///
/// No operation retries, times out, or cancels at this layer. A blocked
/// read or write blocks the caller until the channel itself gives up.
#[derive(Debug)]
pub struct Client<S> {
    channel: S,
}

impl Client<TcpStream> {
    /// Connects over TCP and disables Nagle batching, since every call is
    /// a small write followed by a blocking read.
    ///
    /// Connection lifecycle policy (timeouts, reconnects, TLS) is the
    /// caller's concern.
    pub async fn connect(addr: impl ToSocketAddrs) -> std::io::Result<Self> {
        let channel = TcpStream::connect(addr).await?;
        channel.set_nodelay(true)?;
        Ok(Self::new(channel))
    }
}

impl<S> Client<S> {
    /// Wraps an established channel. The channel must be an ordered,
    /// reliable byte stream; the protocol has no way to resynchronize on
    /// a lossy one.
    pub fn new(channel: S) -> Self {
        Self { channel }
    }

    /// Releases the underlying channel.
    pub fn into_inner(self) -> S {
        self.channel
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin + Send> Client<S> {
    /// Liveness probe. Succeeds exactly when the server answers status
    /// zero; no data moves either way.
    pub async fn nop(&mut self) -> Result<(), CallError> {
        rpc::call(&mut self.channel, Procedure::Nop, &()).await
    }

    /// Opens a logical session against the named volume group and
    /// returns its root handle.
    ///
    /// The root handle anchors all subsequent resolution; the client does
    /// not keep a copy.
    pub async fn login(&mut self, conn: &FsString, vg: &FsString) -> Result<Handle, CallError> {
        debug!("login({}, {})", conn, vg);
        let args = LoginArgs { conn: conn.clone(), vg: vg.clone() };
        let root: Handle = rpc::call(&mut self.channel, Procedure::Login, &args).await?;
        debug!("login -> {:?}", root);
        Ok(root)
    }

    /// Fetches a fresh metadata snapshot for `handle`.
    pub async fn stat(&mut self, handle: &Handle) -> Result<Attributes, CallError> {
        debug!("stat({:?})", handle);
        let args = StatArgs { handle: handle.clone() };
        let attr: Attributes = rpc::call(&mut self.channel, Procedure::Stat, &args).await?;
        debug!("stat -> {:?}", attr);
        Ok(attr)
    }

    /// Resolves the child entry `name` under `parent`.
    ///
    /// A missing entry comes back as a nonzero server status, not as a
    /// local condition; mapping it to filesystem not-found semantics is
    /// the caller's job.
    pub async fn lookup(&mut self, parent: &Handle, name: &FsString) -> Result<Handle, CallError> {
        debug!("lookup({:?}, {})", parent, name);
        let args = LookupArgs { parent: parent.clone(), name: name.clone() };
        let child: Handle = rpc::call(&mut self.channel, Procedure::Lookup, &args).await?;
        debug!("lookup -> {:?}", child);
        Ok(child)
    }

    /// Creates the entry `name` under `parent` with the given mode word
    /// and returns its handle.
    pub async fn create(
        &mut self,
        parent: &Handle,
        name: &FsString,
        mode: u32,
    ) -> Result<Handle, CallError> {
        debug!("create({:?}, {}, {:#o})", parent, name, mode);
        let args = CreateArgs { parent: parent.clone(), name: name.clone(), mode };
        let child: Handle = rpc::call(&mut self.channel, Procedure::Create, &args).await?;
        debug!("create -> {:?}", child);
        Ok(child)
    }

    /// Deletes the entry `name` under `parent`.
    pub async fn remove(&mut self, parent: &Handle, name: &FsString) -> Result<(), CallError> {
        debug!("remove({:?}, {})", parent, name);
        let args = RemoveArgs { parent: parent.clone(), name: name.clone() };
        rpc::call(&mut self.channel, Procedure::Remove, &args).await
    }
}

#[async_trait]
impl<S: AsyncRead + AsyncWrite + Unpin + Send> RemoteFs for Client<S> {
    async fn nop(&mut self) -> Result<(), CallError> {
        Client::nop(self).await
    }

    async fn login(&mut self, conn: &FsString, vg: &FsString) -> Result<Handle, CallError> {
        Client::login(self, conn, vg).await
    }

    async fn stat(&mut self, handle: &Handle) -> Result<Attributes, CallError> {
        Client::stat(self, handle).await
    }

    async fn lookup(&mut self, parent: &Handle, name: &FsString) -> Result<Handle, CallError> {
        Client::lookup(self, parent, name).await
    }

    async fn create(
        &mut self,
        parent: &Handle,
        name: &FsString,
        mode: u32,
    ) -> Result<Handle, CallError> {
        Client::create(self, parent, name, mode).await
    }

    async fn remove(&mut self, parent: &Handle, name: &FsString) -> Result<(), CallError> {
        Client::remove(self, parent, name).await
    }
}
