//! Wire data structures of the VGFS remote filesystem protocol.
//!
//! The protocol is a binary call/response RPC: every call starts with a
//! four-byte procedure number followed by the procedure's arguments, and
//! every reply starts with a four-byte status word (zero means success)
//! followed by the procedure's result payload. All values use the XDR
//! encoding rules implemented in the parent module.
//!
//! Objects are identified by [`Handle`]s, opaque fixed-size tokens minted
//! by the server and echoed back verbatim by the client. Object metadata
//! travels as an [`Attributes`] snapshot.

use std::fmt;
use std::io::{Read, Write};

use filetime::FileTime;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive as _, ToPrimitive as _};

use super::{deserialize, invalid_data, Deserialize, FixedLen, Serialize};
use crate::{DeserializeStruct, SerializeStruct};

/// Number of bytes in a handle: a 12-byte object id followed by a
/// 256-byte version vector (16 entries of two 64-bit counters).
///
/// The composition is documented for reference only; the client carries
/// the whole value opaque and never takes it apart.
pub const HANDLE_LEN: usize = 268;

/// Procedure numbers of the remote calls.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ToPrimitive)]
#[repr(u32)]
pub enum Procedure {
    /// Liveness probe; carries no arguments and no result.
    Nop = 0,
    /// Open a logical session against a named volume group; returns the
    /// root handle.
    Login = 1,
    /// Fetch the attribute snapshot for a handle.
    Stat = 2,
    /// Resolve a child entry by name under a parent handle.
    Lookup = 3,
    /// Create a named entry under a parent handle.
    Create = 4,
    /// Delete a named entry under a parent handle.
    Remove = 5,
}

/// Procedure numbers are sent as the unsigned opcode word that opens
/// every call, not as an XDR signed enum.
impl Serialize for Procedure {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        match self.to_u32() {
            Some(val) => val.serialize(dest),
            None => Err(invalid_data("procedure number out of range")),
        }
    }
}

/// Opaque token identifying a remote object across calls.
///
/// Handles are minted by the server (`login` returns the root handle,
/// `lookup` and `create` return child handles) and are replayed
/// byte-exact in later calls. The client never parses, mutates, or
/// fabricates one; two handles are the same object reference exactly when
/// their bytes are equal.
#[derive(Clone, PartialEq, Eq)]
pub struct Handle(pub [u8; HANDLE_LEN]);

impl Default for Handle {
    fn default() -> Self {
        Handle([0; HANDLE_LEN])
    }
}

impl AsRef<[u8]> for Handle {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle(")?;
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "..)")
    }
}

impl Serialize for Handle {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        self.0.serialize(dest)
    }
}

impl Deserialize for Handle {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        self.0.deserialize(src)
    }
}

impl FixedLen for Handle {
    const LEN: usize = HANDLE_LEN;
}

/// A name or label on the wire.
///
/// The protocol places no character-set restriction on names; this is a
/// byte string that happens to be printable most of the time.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct FsString(pub Vec<u8>);

impl FsString {
    /// Returns the length of the string in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the string is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for FsString {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<&[u8]> for FsString {
    fn from(value: &[u8]) -> Self {
        Self(value.into())
    }
}

impl From<&str> for FsString {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().into())
    }
}

impl AsRef<[u8]> for FsString {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for FsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Display for FsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl Serialize for FsString {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        self.0.serialize(dest)
    }
}

impl Deserialize for FsString {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        self.0.deserialize(src)
    }
}

/// Layout of the mode word carried in [`Attributes`] and passed to
/// `create`: an object-kind nibble in the high bits and permission bits
/// below it.
pub mod mode {
    /// Mask selecting the object-kind bits of a mode word.
    pub const KIND_MASK: u32 = 0xf000;
    /// Mask selecting the permission bits of a mode word.
    pub const PERM_MASK: u32 = 0x0fff;

    /// Sticky bit.
    pub const STICKY: u32 = 0x0200;
    /// Set-group-id bit.
    pub const SETGID: u32 = 0x0400;
    /// Set-user-id bit.
    pub const SETUID: u32 = 0x0800;
}

/// Object kind encoded in the kind bits of a mode word.
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum FileKind {
    /// Regular file
    Regular = 0x0000,
    /// Directory
    Directory = 0x1000,
    /// Named pipe
    Fifo = 0x2000,
    /// Character special device
    CharDevice = 0x3000,
    /// Block special device
    BlockDevice = 0x4000,
    /// Symbolic link
    Symlink = 0x5000,
    /// Socket
    Socket = 0x6000,
    /// Door
    Door = 0x7000,
}

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Timestamps travel as unsigned 64-bit nanosecond counts since the Unix
/// epoch and become absolute points in time on decode.
fn read_time<R: Read>(src: &mut R) -> std::io::Result<FileTime> {
    let nanos = deserialize::<u64>(src)?;
    Ok(FileTime::from_unix_time(
        (nanos / NANOS_PER_SEC) as i64,
        (nanos % NANOS_PER_SEC) as u32,
    ))
}

fn write_time<W: Write>(time: &FileTime, dest: &mut W) -> std::io::Result<()> {
    let seconds = u64::try_from(time.unix_seconds())
        .map_err(|_| invalid_data("timestamp before the epoch"))?;
    let nanos = seconds
        .checked_mul(NANOS_PER_SEC)
        .and_then(|n| n.checked_add(u64::from(time.nanoseconds())))
        .ok_or_else(|| invalid_data("timestamp not representable in nanoseconds"))?;

    nanos.serialize(dest)
}

/// Metadata snapshot for a remote object.
///
/// Produced fresh by every `stat` call; nothing is cached or invalidated
/// on the client side. Timestamps are absolute UTC points in time with
/// nanosecond precision.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Attributes {
    /// Object kind and permission bits, see [`mode`] and [`FileKind`].
    pub mode: u32,
    /// Number of directory entries referencing the object.
    pub nlink: u32,
    /// Object size in bytes.
    pub size: u64,
    /// Time of last access.
    pub atime: FileTime,
    /// Time of creation.
    pub btime: FileTime,
    /// Time of last status change.
    pub ctime: FileTime,
    /// Time of last modification.
    pub mtime: FileTime,
}

impl Default for Attributes {
    fn default() -> Self {
        Attributes {
            mode: 0,
            nlink: 0,
            size: 0,
            atime: FileTime::zero(),
            btime: FileTime::zero(),
            ctime: FileTime::zero(),
            mtime: FileTime::zero(),
        }
    }
}

impl Attributes {
    /// Object kind from the mode word, if the kind bits hold a known
    /// value.
    pub fn kind(&self) -> Option<FileKind> {
        FileKind::from_u32(self.mode & mode::KIND_MASK)
    }

    /// True when the mode word marks a directory.
    pub fn is_dir(&self) -> bool {
        self.kind() == Some(FileKind::Directory)
    }

    /// True when the mode word marks a regular file.
    pub fn is_regular(&self) -> bool {
        self.kind() == Some(FileKind::Regular)
    }

    /// Permission bits of the mode word.
    pub fn permissions(&self) -> u32 {
        self.mode & mode::PERM_MASK
    }
}

impl Serialize for Attributes {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        self.mode.serialize(dest)?;
        self.nlink.serialize(dest)?;
        self.size.serialize(dest)?;
        write_time(&self.atime, dest)?;
        write_time(&self.btime, dest)?;
        write_time(&self.ctime, dest)?;
        write_time(&self.mtime, dest)
    }
}

impl Deserialize for Attributes {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        self.mode.deserialize(src)?;
        self.nlink.deserialize(src)?;
        self.size.deserialize(src)?;
        self.atime = read_time(src)?;
        self.btime = read_time(src)?;
        self.ctime = read_time(src)?;
        self.mtime = read_time(src)?;
        Ok(())
    }
}

impl FixedLen for Attributes {
    // mode + nlink + size + four timestamps
    const LEN: usize = 4 + 4 + 8 + 4 * 8;
}

/// Every call opens with the procedure number.
#[derive(Debug)]
pub struct CallHeader {
    pub proc: Procedure,
}
SerializeStruct!(CallHeader, proc);

/// Every reply opens with a status word; zero means success. Nonzero
/// codes are server-defined and are surfaced raw.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplyHeader {
    pub status: u32,
}
SerializeStruct!(ReplyHeader, status);
DeserializeStruct!(ReplyHeader, status);

/// Arguments for the `login` call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoginArgs {
    /// Name the client identifies the connection by.
    pub conn: FsString,
    /// Volume group to open the session against.
    pub vg: FsString,
}
SerializeStruct!(LoginArgs, conn, vg);
DeserializeStruct!(LoginArgs, conn, vg);

/// Arguments for the `stat` call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatArgs {
    pub handle: Handle,
}
SerializeStruct!(StatArgs, handle);
DeserializeStruct!(StatArgs, handle);

/// Arguments for the `lookup` call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LookupArgs {
    pub parent: Handle,
    pub name: FsString,
}
SerializeStruct!(LookupArgs, parent, name);
DeserializeStruct!(LookupArgs, parent, name);

/// Arguments for the `create` call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CreateArgs {
    pub parent: Handle,
    pub name: FsString,
    /// Kind and permission bits of the new entry, see [`mode`].
    pub mode: u32,
}
SerializeStruct!(CreateArgs, parent, name, mode);
DeserializeStruct!(CreateArgs, parent, name, mode);

/// Arguments for the `remove` call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RemoveArgs {
    pub parent: Handle,
    pub name: FsString,
}
SerializeStruct!(RemoveArgs, parent, name);
DeserializeStruct!(RemoveArgs, parent, name);
