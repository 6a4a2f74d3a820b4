//! Shift-JIS character numbering for version 0 fonts.
//!
//! Version 0 character tables are indexed by a dense number instead of a code point. The
//! numbering used here walks the Shift-JIS code space in order:
//!
//! 1. single bytes `0x00..=0x7F`
//! 2. half-width katakana `0xA1..=0xDF`
//! 3. double-byte codes, lead `0x81..=0x9F | 0xE0..=0xFC`, trail `0x40..=0x7E | 0x80..=0xFC`
//!
//! keeping only codes that decode to exactly one character.

use std::{collections::HashMap, sync::LazyLock};

use encoding_rs::SHIFT_JIS;

struct SjisTable {
	codes: Vec<u16>,
	indices: HashMap<u16, u32>,
}

static TABLE: LazyLock<SjisTable> = LazyLock::new(SjisTable::build);

impl SjisTable {
	fn build() -> Self {
		let single = (0x00..=0x7Fu16).chain(0xA1..=0xDF);
		let double = (0x81..=0x9Fu16).chain(0xE0..=0xFC).flat_map(|lead| {
			(0x40..=0x7Eu16).chain(0x80..=0xFC).map(move |trail| (lead << 8) | trail)
		});

		let codes: Vec<u16> = single.chain(double).filter(|&code| decode_char(code).is_some()).collect();
		let indices = codes.iter().enumerate().map(|(index, &code)| (code, index as u32)).collect();

		log::trace!("sjis: {} mappable codes", codes.len());
		Self {
			codes,
			indices,
		}
	}
}

/// Returns the Shift-JIS code for a character table index.
pub fn map_sjis(index: u32) -> Option<u16> {
	TABLE.codes.get(index as usize).copied()
}

/// Returns the character table index of a Shift-JIS code.
pub fn sjis_index(code: u16) -> Option<u32> {
	TABLE.indices.get(&code).copied()
}

/// Number of codes in the numbering
pub fn code_count() -> usize {
	TABLE.codes.len()
}

/// Decodes a single- or double-byte Shift-JIS code.
///
/// Codes up to `0xFF` are single bytes, larger ones are `lead << 8 | trail`.
pub fn decode_char(code: u16) -> Option<char> {
	let [lead, trail] = code.to_be_bytes();
	let bytes: &[u8] = if lead == 0 {
		&[trail]
	} else {
		&[lead, trail]
	};

	let decoded = SHIFT_JIS.decode_without_bom_handling_and_without_replacement(bytes)?;
	let mut chars = decoded.chars();
	match (chars.next(), chars.next()) {
		(Some(c), None) => Some(c),
		_ => None,
	}
}

/// Encodes a character as a Shift-JIS code, the inverse of [`decode_char`].
pub fn encode_char(c: char) -> Option<u16> {
	let mut buffer = [0u8; 4];
	let (bytes, _, had_errors) = SHIFT_JIS.encode(c.encode_utf8(&mut buffer));
	if had_errors {
		return None;
	}
	match *bytes {
		[single] => Some(u16::from(single)),
		[lead, trail] => Some(u16::from_be_bytes([lead, trail])),
		_ => None,
	}
}
