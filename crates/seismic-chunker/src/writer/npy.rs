//! NPY encoding for 2-D `f32` sample blocks.
//!
//! Writes format version 1.0 with a little-endian `<f4` payload in C order.
//! The header dictionary is padded with spaces so the payload starts on a
//! 64-byte boundary:
//!
//! ```text
//! \x93NUMPY 01 00 <u16 LE header len> {'descr': '<f4', 'fortran_order': False, 'shape': (r, c), }   ...\n
//! <r × c little-endian f32>
//! ```

use std::fs;
use std::path::Path;

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{ChunkerError, Result};
use crate::types::TraceBlock;

const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Payload alignment required of the preamble plus header.
const ALIGNMENT: usize = 64;

/// Magic, version and header length field for format 1.0.
const PREAMBLE_LEN_V1: usize = MAGIC.len() + 2 + 2;

/// Encode a block as an NPY file image.
pub fn encode(block: &TraceBlock) -> Vec<u8> {
    let (rows, cols) = block.shape();
    let mut header = format!(
        "{{'descr': '<f4', 'fortran_order': False, 'shape': ({}, {}), }}",
        rows, cols
    );
    // pad so preamble + header + '\n' is a multiple of ALIGNMENT
    let unpadded = PREAMBLE_LEN_V1 + header.len() + 1;
    let padding = (ALIGNMENT - unpadded % ALIGNMENT) % ALIGNMENT;
    header.extend(std::iter::repeat(' ').take(padding));
    header.push('\n');

    let mut buf = BytesMut::with_capacity(PREAMBLE_LEN_V1 + header.len() + block.len() * 4);
    buf.put_slice(MAGIC);
    buf.put_u8(1);
    buf.put_u8(0);
    buf.put_u16_le(header.len() as u16);
    buf.put_slice(header.as_bytes());
    for &value in block.data() {
        buf.put_f32_le(value);
    }
    buf.to_vec()
}

/// Decode an NPY file image holding a 2-D `<f4` C-order array.
pub fn decode(raw: &[u8]) -> Result<TraceBlock> {
    let mut buf = raw;
    if buf.remaining() < PREAMBLE_LEN_V1 || &buf[..MAGIC.len()] != MAGIC {
        return Err(ChunkerError::io_failure("not an NPY file"));
    }
    buf.advance(MAGIC.len());

    let major = buf.get_u8();
    let _minor = buf.get_u8();
    let header_len = match major {
        1 => buf.get_u16_le() as usize,
        2 | 3 => {
            if buf.remaining() < 4 {
                return Err(ChunkerError::io_failure("truncated NPY preamble"));
            }
            buf.get_u32_le() as usize
        }
        _ => {
            return Err(ChunkerError::io_failure(format!(
                "unsupported NPY version {}",
                major
            )))
        }
    };
    if buf.remaining() < header_len {
        return Err(ChunkerError::io_failure("truncated NPY header"));
    }

    let header = std::str::from_utf8(&buf[..header_len])
        .map_err(|_| ChunkerError::io_failure("NPY header is not text"))?;
    let (rows, cols) = parse_header(header)?;
    buf.advance(header_len);

    let expected = rows * cols * 4;
    if buf.remaining() != expected {
        return Err(ChunkerError::io_failure(format!(
            "NPY payload is {} bytes, shape ({}, {}) needs {}",
            buf.remaining(),
            rows,
            cols,
            expected
        )));
    }

    let mut data = Vec::with_capacity(rows * cols);
    while buf.has_remaining() {
        data.push(buf.get_f32_le());
    }
    TraceBlock::new(data, rows, cols)
}

/// Pull `(rows, cols)` out of the header dictionary, checking dtype and order.
fn parse_header(header: &str) -> Result<(usize, usize)> {
    let value_after = |key: &str| -> Result<&str> {
        let start = header
            .find(key)
            .ok_or_else(|| ChunkerError::io_failure(format!("NPY header has no {}", key)))?;
        Ok(header[start + key.len()..].trim_start_matches([':', ' ']))
    };

    if !value_after("'descr'")?.starts_with("'<f4'") {
        return Err(ChunkerError::io_failure(
            "NPY dtype is not little-endian float32",
        ));
    }
    if !value_after("'fortran_order'")?.starts_with("False") {
        return Err(ChunkerError::io_failure("Fortran-order NPY is not supported"));
    }

    let shape = value_after("'shape'")?;
    let inner = shape
        .strip_prefix('(')
        .and_then(|s| s.split(')').next())
        .ok_or_else(|| ChunkerError::io_failure("malformed NPY shape"))?;
    let dims = inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| ChunkerError::io_failure(format!("bad NPY dimension {:?}", s)))
        })
        .collect::<Result<Vec<_>>>()?;

    match dims.as_slice() {
        [rows, cols] => Ok((*rows, *cols)),
        _ => Err(ChunkerError::io_failure(format!(
            "expected a 2-D array, got shape {:?}",
            dims
        ))),
    }
}

/// Write `block` to `path` as NPY. Returns the number of bytes written.
pub fn write_npy(path: &Path, block: &TraceBlock) -> Result<u64> {
    let bytes = encode(block);
    fs::write(path, &bytes)
        .map_err(|e| ChunkerError::io_failure(format!("failed to write {}: {}", path.display(), e)))?;
    Ok(bytes.len() as u64)
}

/// Read an NPY file written by [`write_npy`] (or NumPy, for 2-D `<f4`).
pub fn read_npy(path: &Path) -> Result<TraceBlock> {
    let raw = fs::read(path)
        .map_err(|e| ChunkerError::io_failure(format!("failed to read {}: {}", path.display(), e)))?;
    decode(&raw)
}
