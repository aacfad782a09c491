//! Canonical varint encodings used by node hashing and proof bytes.
//!
//! Signed integers use zigzag varints; byte slices are prefixed with an
//! unsigned varint length. Both formats are fixed by the external proof
//! verifier, so they must never change shape.

use crate::domain::errors::TreeError;

/// Append an unsigned LEB128 varint.
pub fn write_uvarint(out: &mut Vec<u8>, mut v: u64) {
    while v >= 0x80 {
        out.push((v as u8 & 0x7f) | 0x80);
        v >>= 7;
    }
    out.push(v as u8);
}

/// Append a zigzag-encoded signed varint.
pub fn write_varint(out: &mut Vec<u8>, v: i64) {
    let zz = ((v << 1) ^ (v >> 63)) as u64;
    write_uvarint(out, zz);
}

/// Append a length-prefixed byte slice.
pub fn write_bytes(out: &mut Vec<u8>, b: &[u8]) {
    write_uvarint(out, b.len() as u64);
    out.extend_from_slice(b);
}

/// Read an unsigned varint, advancing `pos`.
pub fn read_uvarint(buf: &[u8], pos: &mut usize) -> Result<u64, TreeError> {
    let mut v: u64 = 0;
    let mut shift = 0u32;
    loop {
        let byte = *buf.get(*pos).ok_or(TreeError::CorruptProof)?;
        *pos += 1;
        if shift >= 64 {
            return Err(TreeError::CorruptProof);
        }
        v |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(v);
        }
        shift += 7;
    }
}

/// Read a zigzag-encoded signed varint, advancing `pos`.
pub fn read_varint(buf: &[u8], pos: &mut usize) -> Result<i64, TreeError> {
    let zz = read_uvarint(buf, pos)?;
    Ok(((zz >> 1) as i64) ^ -((zz & 1) as i64))
}

/// Read a length-prefixed byte slice, advancing `pos`.
pub fn read_bytes<'a>(buf: &'a [u8], pos: &mut usize) -> Result<&'a [u8], TreeError> {
    let len = read_uvarint(buf, pos)? as usize;
    let end = pos.checked_add(len).ok_or(TreeError::CorruptProof)?;
    if end > buf.len() {
        return Err(TreeError::CorruptProof);
    }
    let slice = &buf[*pos..end];
    *pos = end;
    Ok(slice)
}
