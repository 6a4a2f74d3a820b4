//! LZ77 compression
//!
//! ## Strategy
//!
//! The encoder is a greedy matcher over a sliding window:
//!
//! 1. Only the last [`Layout::max_distance`] bytes are searched, older bytes cannot be
//!    addressed by a code.
//! 2. The longest match wins, capped at [`Layout::max_length`]. Matches shorter than
//!    [`Layout::min_length`] are emitted as literals.
//! 3. A match may run past the current position into the bytes it is producing, so a
//!    run or a periodic pattern is encoded as one short-distance reference instead of being
//!    limited to what the window holds.
//! 4. Before committing to a match the encoder checks the next position; if a longer match
//!    starts there, the current byte goes out as a literal and matching restarts one byte
//!    later.
//!
//! The items are then packed 8 at a time behind a control byte, exactly as
//! [`decompress`](super::decompress) reads them. The output is not expected to be
//! byte-identical to the game's own packer, only to decode back to the input.

use bytes::BufMut;
use log::trace;

use crate::file::Fnt4Error;

use super::{CodeWidth, Layout};

/// One item of the encoded stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
	Literal(u8),
	Reference {
		length: usize,
		distance: usize,
	},
}

/// A candidate back-reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Match {
	length: usize,
	distance: usize,
}

/// State structure for the compressor
#[derive(Debug)]
struct CompressorState<'a> {
	input: &'a [u8],
	layout: Layout,
	read_position: usize,
	tokens: Vec<Token>,
}

impl<'a> CompressorState<'a> {
	fn new(input: &'a [u8], layout: Layout) -> Self {
		Self {
			input,
			layout,
			read_position: 0,
			tokens: Vec::with_capacity(input.len()),
		}
	}

	/// Finds the longest match for the bytes starting at `position`.
	///
	/// Distances are tried nearest first, so among equally long matches the closest wins.
	fn longest_match(&self, position: usize) -> Option<Match> {
		let max_length = self.layout.max_length().min(self.input.len() - position);
		if max_length < self.layout.min_length() {
			return None;
		}

		let window = self.layout.max_distance().min(position);
		let mut best: Option<Match> = None;

		for distance in 1..=window {
			let source = position - distance;
			if self.input[source] != self.input[position] {
				continue;
			}

			// source + length may pass `position`: the match then repeats itself
			let mut length = 1;
			while length < max_length
				&& self.input[source + length] == self.input[position + length]
			{
				length += 1;
			}

			if best.is_none_or(|b| length > b.length) {
				best = Some(Match {
					length,
					distance,
				});
				if length == max_length {
					break;
				}
			}
		}

		best.filter(|m| m.length >= self.layout.min_length())
	}

	fn emit_literal(&mut self) {
		self.tokens.push(Token::Literal(self.input[self.read_position]));
		self.read_position += 1;
	}

	fn emit_reference(&mut self, found: Match) {
		self.tokens.push(Token::Reference {
			length: found.length,
			distance: found.distance,
		});
		self.read_position += found.length;
	}

	/// Turns the whole input into literals and references
	fn tokenize(&mut self) {
		while self.read_position < self.input.len() {
			let Some(current) = self.longest_match(self.read_position) else {
				self.emit_literal();
				continue;
			};

			if current.length < self.layout.max_length() {
				let deferred = self.longest_match(self.read_position + 1);
				if deferred.is_some_and(|next| next.length > current.length) {
					self.emit_literal();
					continue;
				}
			}

			self.emit_reference(current);
		}
	}
}

/// Packs tokens into control-byte groups
fn pack_tokens(tokens: &[Token], layout: Layout) -> Result<Vec<u8>, Fnt4Error> {
	let mut output = Vec::with_capacity(tokens.len() + tokens.len() / 8 + 1);

	for group in tokens.chunks(8) {
		let map = group.iter().enumerate().fold(0u8, |map, (bit, token)| match token {
			Token::Literal(_) => map,
			Token::Reference {
				..
			} => map | (1 << bit),
		});
		output.put_u8(map);

		for token in group {
			match *token {
				Token::Literal(byte) => output.put_u8(byte),
				Token::Reference {
					length,
					distance,
				} => {
					let code = layout.pack(length, distance)?;
					match layout.width() {
						CodeWidth::Byte => output.put_u8(code as u8),
						CodeWidth::Word => output.put_u16(code),
					}
				}
			}
		}
	}

	Ok(output)
}

/// Compresses `input` into an LZ77 stream with the given layout.
///
/// An empty input produces an empty stream.
///
/// # Errors
///
/// Returns [`Fnt4Error::EncodeConstraintViolation`] if the matcher produced a reference the
/// layout cannot represent. This indicates a bug in the encoder, not bad input.
pub fn compress(input: &[u8], layout: Layout) -> Result<Vec<u8>, Fnt4Error> {
	let mut state = CompressorState::new(input, layout);
	state.tokenize();
	let output = pack_tokens(&state.tokens, layout)?;

	trace!(
		"lz77: encoded {} bytes into {} bytes ({} items)",
		input.len(),
		output.len(),
		state.tokens.len()
	);
	Ok(output)
}
