//! LZ77 decompression
//!
//! Decoding is the canonical half of the codec: any stream the game accepts must decode here
//! byte for byte. Malformed input is reported as [`StreamCorruption`] instead of panicking.

use bytes::Buf;
use log::trace;

use crate::file::{Fnt4Error, StreamCorruption};

use super::{CodeWidth, Layout};

/// Decompresses an LZ77 stream.
///
/// Decoding stops when the input is exhausted; a final control byte describing fewer than
/// 8 items is valid.
///
/// # Errors
///
/// Returns [`Fnt4Error::CorruptStream`] if a back-reference reaches before the start of the
/// output or the input ends inside a back-reference code.
pub fn decompress(input: &[u8], layout: Layout) -> Result<Vec<u8>, Fnt4Error> {
	let mut output = Vec::with_capacity(input.len() * 2);
	decompress_into(input, layout, &mut output)?;
	trace!("lz77: decoded {} bytes into {} bytes", input.len(), output.len());
	Ok(output)
}

/// Decompresses an LZ77 stream that must expand to exactly `expected` bytes.
///
/// # Errors
///
/// Same as [`decompress`], plus [`StreamCorruption::LengthMismatch`] when the decoded size
/// differs from `expected`.
pub fn decompress_exact(input: &[u8], layout: Layout, expected: usize) -> Result<Vec<u8>, Fnt4Error> {
	let mut output = Vec::with_capacity(expected);
	decompress_into(input, layout, &mut output)?;
	if output.len() != expected {
		return Err(StreamCorruption::LengthMismatch {
			expected,
			actual: output.len(),
		}
		.into());
	}
	Ok(output)
}

fn decompress_into(
	input: &[u8],
	layout: Layout,
	output: &mut Vec<u8>,
) -> Result<(), StreamCorruption> {
	let mut reader = input;

	while reader.has_remaining() {
		let map = reader.get_u8();
		for bit in 0..8 {
			if !reader.has_remaining() {
				break;
			}

			if (map >> bit) & 1 == 0 {
				output.push(reader.get_u8());
				continue;
			}

			let position = input.len() - reader.remaining();
			if reader.remaining() < layout.code_width() {
				return Err(StreamCorruption::TruncatedReference {
					position,
					width: layout.code_width(),
					remaining: reader.remaining(),
				});
			}

			// big-endian for the two-byte codes
			let code = match layout.width() {
				CodeWidth::Byte => u16::from(reader.get_u8()),
				CodeWidth::Word => reader.get_u16(),
			};
			let (length, distance) = layout.unpack(code);
			if distance > output.len() {
				return Err(StreamCorruption::BackReferenceUnderflow {
					position,
					distance,
					available: output.len(),
				});
			}

			// byte by byte: the source may overlap the bytes being written
			for _ in 0..length {
				let byte = output[output.len() - distance];
				output.push(byte);
			}
		}
	}

	Ok(())
}
