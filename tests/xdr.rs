use std::fmt::Debug;
use std::io::Cursor;

use filetime::FileTime;

use vgfs_client::xdr::fs::{
    mode, Attributes, CreateArgs, FileKind, FsString, Handle, LoginArgs, LookupArgs, RemoveArgs,
    ReplyHeader, StatArgs, HANDLE_LEN,
};
use vgfs_client::xdr::{deserialize, padded_len, Deserialize, FixedLen, Serialize};

#[derive(Default)]
struct Context {
    buf: Vec<u8>,
}

trait TestValue: Deserialize + Serialize + Eq + Default + Debug + Clone {}
impl<T: Deserialize + Serialize + Eq + Default + Debug + Clone> TestValue for T {}

impl Context {
    fn check<T: TestValue>(&mut self, src_value: &T) {
        self.buf.clear();
        src_value.serialize(&mut self.buf).expect("cannot serialize");
        assert_eq!(self.buf.len() % 4, 0, "encoding must stay four-byte aligned");

        let mut cursor = Cursor::new(self.buf.as_slice());
        let result_value = deserialize::<T>(&mut cursor).expect("cannot deserialize");
        assert_eq!(
            cursor.position() as usize,
            self.buf.len(),
            "decode must consume every encoded byte"
        );

        assert_eq!(src_value, &result_value);
    }
}

fn encoded<T: Serialize + ?Sized>(value: &T) -> Vec<u8> {
    let mut buf = Vec::new();
    value.serialize(&mut buf).expect("cannot serialize");
    buf
}

fn patterned_handle() -> Handle {
    let mut handle = Handle::default();
    for (i, byte) in handle.0.iter_mut().enumerate() {
        *byte = (i % 251) as u8;
    }
    handle
}

#[test]
fn test_scalar_bijection() {
    let mut ctx = Context::default();

    for value in [u32::MIN, 1_u32, 2, u32::MAX] {
        ctx.check(&value);
    }
    for value in [u64::MIN, 1_u64, 2, u64::MAX] {
        ctx.check(&value);
    }
}

#[test]
fn test_fixed_opaque_bijection() {
    let mut ctx = Context::default();

    ctx.check(&[0_u8; 0]);
    ctx.check(&[0xff_u8; 1]);
    ctx.check(&[1_u8, 2, 3]);
    ctx.check(&[9_u8; 4]);
    ctx.check(&[7_u8; 12]);
    ctx.check(&patterned_handle());
}

#[test]
fn test_fixed_opaque_wire_length() {
    assert_eq!(encoded(&[0_u8; 0]).len(), 0);
    assert_eq!(encoded(&[0_u8; 1]).len(), 4);
    assert_eq!(encoded(&[0_u8; 3]).len(), 4);
    assert_eq!(encoded(&[0_u8; 4]).len(), 4);
    assert_eq!(encoded(&[0_u8; 12]).len(), 12);
    assert_eq!(encoded(&patterned_handle()).len(), HANDLE_LEN);
    assert_eq!(Handle::LEN, HANDLE_LEN);

    // Padding bytes are zero, not leftovers of the payload.
    let bytes = encoded(&[0xaa_u8; 1]);
    assert_eq!(&bytes[1..], &[0, 0, 0]);
}

#[test]
fn test_string_bijection() {
    let mut ctx = Context::default();

    for text in ["", "a", "abc", "abcd", "a somewhat longer entry name"] {
        let value = FsString::from(text);
        ctx.check(&value);
        assert_eq!(encoded(&value).len(), 4 + padded_len(text.len()));
    }

    // Names are arbitrary byte strings, not character data.
    let raw = FsString::from(&[0xff_u8, 0x00, 0x7f][..]);
    ctx.check(&raw);
    assert_eq!(encoded(&raw).len(), 4 + padded_len(3));
}

#[test]
fn test_login_args_wire_layout() {
    let args = LoginArgs { conn: "conn1".into(), vg: "vg1".into() };

    let expected: Vec<u8> = [
        &[0, 0, 0, 5][..],
        b"conn1",
        &[0, 0, 0],
        &[0, 0, 0, 3],
        b"vg1",
        &[0],
    ]
    .concat();
    assert_eq!(encoded(&args), expected);
}

#[test]
fn test_timestamp_fidelity() {
    let mut ctx = Context::default();

    let attr = Attributes {
        mode: 0o100644,
        nlink: 1,
        size: 42,
        atime: FileTime::zero(),
        btime: FileTime::from_unix_time(1_704_067_200, 0),
        ctime: FileTime::from_unix_time(1_704_067_200, 999_999_999),
        mtime: FileTime::from_unix_time(1, 1),
    };
    ctx.check(&attr);

    let bytes = encoded(&attr);
    assert_eq!(bytes.len(), Attributes::LEN);

    // mode(4) + nlink(4) + size(8) + atime(8) puts btime at offset 24:
    // exactly the nanosecond count for 2024-01-01T00:00:00Z, no rounding.
    assert_eq!(&bytes[24..32], &1_704_067_200_000_000_000_u64.to_be_bytes());
    assert_eq!(&bytes[16..24], &0_u64.to_be_bytes());
}

#[test]
fn test_mode_word_accessors() {
    let mut attr = Attributes { mode: 0x1000 | 0o755, ..Attributes::default() };
    assert_eq!(attr.kind(), Some(FileKind::Directory));
    assert!(attr.is_dir());
    assert!(!attr.is_regular());
    assert_eq!(attr.permissions(), 0o755);

    attr.mode = 0o644;
    assert_eq!(attr.kind(), Some(FileKind::Regular));
    assert!(attr.is_regular());
    assert_eq!(attr.permissions(), 0o644);

    attr.mode = mode::SETUID | mode::SETGID | mode::STICKY | 0o111;
    assert_eq!(attr.permissions(), 0o7111);

    // Kind bits outside the known encoding decode to no kind at all.
    attr.mode = 0x8000;
    assert_eq!(attr.kind(), None);
}

#[test]
fn test_call_args_bijection() {
    let mut ctx = Context::default();
    let parent = patterned_handle();

    ctx.check(&ReplyHeader { status: 7 });
    ctx.check(&LoginArgs { conn: "conn1".into(), vg: "vg1".into() });
    ctx.check(&StatArgs { handle: parent.clone() });
    ctx.check(&LookupArgs { parent: parent.clone(), name: "etc".into() });
    ctx.check(&CreateArgs { parent: parent.clone(), name: "newfile".into(), mode: 0o755 });
    ctx.check(&RemoveArgs { parent, name: "stale".into() });
}
