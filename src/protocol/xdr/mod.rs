//! XDR is a standard for the description and encoding of data.
//! It is useful for transferring data between different computer
//! architectures over a network, independent of byte order and word size.
//!
//! <https://datatracker.ietf.org/doc/html/rfc4506>
//!
//! This module implements the subset of XDR the VGFS wire protocol
//! actually uses: unsigned 32- and 64-bit integers, fixed-length opaque
//! data, variable-length opaque data (the protocol's strings), and void.
//! Where appropriate, the standard types of the XDR language have been
//! replaced by similar types of the Rust language: `unsigned int` is
//! `u32`, `unsigned hyper` is `u64`, `opaque<>` is `[u8]`.
//!
//! Every encoded item occupies a multiple of four bytes on the wire;
//! fixed- and variable-length opaque data is zero-padded up to the next
//! four-byte boundary, and the padding is consumed and discarded on
//! decode.

use std::io::{Read, Write};

use byteorder::BigEndian;
use byteorder::{ReadBytesExt, WriteBytesExt};
use num_traits::ToPrimitive;

pub mod fs;

/// XDR assumes big endian encoding.
pub type XdrEndian = BigEndian;

/// All encoded items are aligned to this many bytes.
pub const ALIGNMENT: usize = 4;

pub trait Serialize {
    /// Serializes the implementing type to the provided writer.
    ///
    /// The value is fully written, padding included, or an error is
    /// returned; a partial encoding is never left behind on success.
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()>;
}

pub trait Deserialize {
    /// Deserializes data from the provided reader into the implementing
    /// type.
    ///
    /// Exactly the encoded width of the value is consumed from `src`,
    /// padding included. A source that runs dry mid-value yields
    /// [`std::io::ErrorKind::UnexpectedEof`], never a short result.
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()>;
}

/// Deserialization based on the [Default] trait of the type T.
pub fn deserialize<T>(src: &mut impl Read) -> std::io::Result<T>
where
    T: Deserialize + Default,
{
    let mut val = T::default();
    val.deserialize(src)?;

    Ok(val)
}

/// Encoded width, in bytes, of types whose wire size never varies.
///
/// Reply payloads of this protocol are all fixed-width, which lets the
/// call layer read exactly one payload off the stream before handing the
/// bytes to [`Deserialize`].
pub trait FixedLen {
    const LEN: usize;
}

fn pad_len(src_len: usize) -> usize {
    (ALIGNMENT - src_len % ALIGNMENT) % ALIGNMENT
}

/// Rounds a payload length up to the next alignment boundary.
pub fn padded_len(src_len: usize) -> usize {
    src_len + pad_len(src_len)
}

pub(crate) fn write_padding(src_len: usize, dest: &mut impl Write) -> std::io::Result<()> {
    const ZEROES: [u8; ALIGNMENT] = [0; ALIGNMENT];
    dest.write_all(&ZEROES[..pad_len(src_len)])
}

pub(crate) fn read_padding(src_len: usize, src: &mut impl Read) -> std::io::Result<()> {
    // Padding bytes are discarded without validation.
    let mut scratch = [0_u8; ALIGNMENT];
    src.read_exact(&mut scratch[..pad_len(src_len)])
}

pub(crate) fn invalid_data(m: &str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, m)
}

/// XDR `unsigned int` type serialization implementation.
impl Serialize for u32 {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        dest.write_u32::<XdrEndian>(*self)
    }
}

/// XDR `unsigned int` type deserialization implementation.
impl Deserialize for u32 {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        *self = src.read_u32::<XdrEndian>()?;
        Ok(())
    }
}

/// XDR `unsigned hyper` type serialization implementation.
impl Serialize for u64 {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        dest.write_u64::<XdrEndian>(*self)
    }
}

/// XDR `unsigned hyper` type deserialization implementation.
impl Deserialize for u64 {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        *self = src.read_u64::<XdrEndian>()?;
        Ok(())
    }
}

/// XDR `void` serialization implementation: no bytes on the wire.
impl Serialize for () {
    fn serialize<W: Write>(&self, _dest: &mut W) -> std::io::Result<()> {
        Ok(())
    }
}

/// XDR `void` deserialization implementation: no bytes on the wire.
impl Deserialize for () {
    fn deserialize<R: Read>(&mut self, _src: &mut R) -> std::io::Result<()> {
        Ok(())
    }
}

impl FixedLen for () {
    const LEN: usize = 0;
}

/// XDR Fixed-Length Opaque Data serialization implementation.
///
/// ```
/// opaque identifier[n];
/// ```
impl<const N: usize> Serialize for [u8; N] {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        dest.write_all(self)?;
        write_padding(N, dest)?;

        Ok(())
    }
}

/// XDR Fixed-Length Opaque Data deserialization implementation.
///
/// ```
/// opaque identifier[n];
/// ```
impl<const N: usize> Deserialize for [u8; N] {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        src.read_exact(self)?;
        read_padding(N, src)?;

        Ok(())
    }
}

/// Object lengths in XDR are always serialized as [u32]. This wrapper
/// type provides a way to serialize the [usize] type common to Rust as
/// [u32].
#[derive(Default)]
struct UsizeAsU32(usize);

/// Try to convert [usize] to [u32] and serialize.
impl Serialize for UsizeAsU32 {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        let Some(val) = self.0.to_u32() else {
            return Err(invalid_data("cannot cast `usize` to `u32`"));
        };

        val.serialize(dest)
    }
}

/// Try to deserialize [u32] and convert to [usize].
impl Deserialize for UsizeAsU32 {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        let Some(val) = deserialize::<u32>(src)?.to_usize() else {
            return Err(invalid_data("cannot cast `u32` to `usize`"));
        };

        self.0 = val;
        Ok(())
    }
}

/// XDR Variable-Length Opaque Data serialization implementation.
///
/// A four-byte length prefix followed by the payload, padded to the next
/// four-byte boundary. The protocol's strings use this encoding and carry
/// arbitrary bytes, so no character-set restriction is applied here.
impl Serialize for [u8] {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        UsizeAsU32(self.len()).serialize(dest)?;
        dest.write_all(self)?;
        write_padding(self.len(), dest)?;

        Ok(())
    }
}

/// XDR Variable-Length Opaque Data deserialization implementation.
impl Deserialize for Vec<u8> {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        let length = deserialize::<UsizeAsU32>(src)?.0;
        self.resize(length, 0);

        src.read_exact(self)?;
        read_padding(length, src)?;

        Ok(())
    }
}

/// Macro for implementing XDR serialization for structs.
///
/// Serializes each named field in declaration order, which is exactly the
/// field order the wire expects.
#[macro_export]
macro_rules! SerializeStruct {
    (
        $t:ident,
        $($element:ident),*
    ) => {
        impl Serialize for $t {
            fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
                $(self.$element.serialize(dest)?;)*
                Ok(())
            }
        }
    };
}

/// Macro for implementing XDR deserialization for structs.
#[macro_export]
macro_rules! DeserializeStruct {
    (
        $t:ident,
        $($element:ident),*
    ) => {
        impl Deserialize for $t {
            fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
                $(self.$element.deserialize(src)?;)*
                Ok(())
            }
        }
    };
}

// Re-export public types for use in other modules
pub use crate::DeserializeStruct;
pub use crate::SerializeStruct;
