//! Test fixtures: payloads of a given size with a plausible file signature.

use axum_test::multipart::Part;
use bytes::Bytes;

pub const MIB: usize = 1024 * 1024;

fn with_signature(signature: &[u8], size: usize) -> Bytes {
    let mut data = vec![0u8; size.max(signature.len())];
    data[..signature.len()].copy_from_slice(signature);
    Bytes::from(data)
}

pub fn jpeg(size: usize) -> Bytes {
    with_signature(&[0xFF, 0xD8, 0xFF, 0xE0], size)
}

pub fn png(size: usize) -> Bytes {
    with_signature(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A], size)
}

pub fn webp(size: usize) -> Bytes {
    with_signature(b"RIFF\0\0\0\0WEBP", size)
}

pub fn mp4(size: usize) -> Bytes {
    with_signature(b"\0\0\0\x18ftypmp42", size)
}

pub fn file_part(data: Bytes, file_name: &str, mime_type: &str) -> Part {
    Part::bytes(data).file_name(file_name).mime_type(mime_type)
}
