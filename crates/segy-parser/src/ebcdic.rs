//! EBCDIC (code page 037) <-> ASCII for textual file headers.
//!
//! Only the printable subset that appears in real card-image headers is
//! mapped; anything else decodes to a space.

/// Decode one EBCDIC byte to ASCII.
pub fn ebcdic_to_ascii(byte: u8) -> u8 {
    match byte {
        0x40 => b' ',
        0x4B => b'.',
        0x4C => b'<',
        0x4D => b'(',
        0x4E => b'+',
        0x4F => b'|',
        0x50 => b'&',
        0x5A => b'!',
        0x5B => b'$',
        0x5C => b'*',
        0x5D => b')',
        0x5E => b';',
        0x5F => b'^',
        0x60 => b'-',
        0x61 => b'/',
        0x6B => b',',
        0x6C => b'%',
        0x6D => b'_',
        0x6E => b'>',
        0x6F => b'?',
        0x79 => b'`',
        0x7A => b':',
        0x7B => b'#',
        0x7C => b'@',
        0x7D => b'\'',
        0x7E => b'=',
        0x7F => b'"',
        0x81..=0x89 => b'a' + (byte - 0x81),
        0x91..=0x99 => b'j' + (byte - 0x91),
        0xA1 => b'~',
        0xA2..=0xA9 => b's' + (byte - 0xA2),
        0xBA => b'[',
        0xBB => b']',
        0xC0 => b'{',
        0xC1..=0xC9 => b'A' + (byte - 0xC1),
        0xD0 => b'}',
        0xD1..=0xD9 => b'J' + (byte - 0xD1),
        0xE0 => b'\\',
        0xE2..=0xE9 => b'S' + (byte - 0xE2),
        0xF0..=0xF9 => b'0' + (byte - 0xF0),
        _ => b' ',
    }
}

/// Encode one ASCII byte to EBCDIC. Unmapped characters become a space.
pub fn ascii_to_ebcdic(byte: u8) -> u8 {
    match byte {
        b' ' => 0x40,
        b'.' => 0x4B,
        b'<' => 0x4C,
        b'(' => 0x4D,
        b'+' => 0x4E,
        b'|' => 0x4F,
        b'&' => 0x50,
        b'!' => 0x5A,
        b'$' => 0x5B,
        b'*' => 0x5C,
        b')' => 0x5D,
        b';' => 0x5E,
        b'^' => 0x5F,
        b'-' => 0x60,
        b'/' => 0x61,
        b',' => 0x6B,
        b'%' => 0x6C,
        b'_' => 0x6D,
        b'>' => 0x6E,
        b'?' => 0x6F,
        b'`' => 0x79,
        b':' => 0x7A,
        b'#' => 0x7B,
        b'@' => 0x7C,
        b'\'' => 0x7D,
        b'=' => 0x7E,
        b'"' => 0x7F,
        b'a'..=b'i' => 0x81 + (byte - b'a'),
        b'j'..=b'r' => 0x91 + (byte - b'j'),
        b'~' => 0xA1,
        b's'..=b'z' => 0xA2 + (byte - b's'),
        b'[' => 0xBA,
        b']' => 0xBB,
        b'{' => 0xC0,
        b'A'..=b'I' => 0xC1 + (byte - b'A'),
        b'}' => 0xD0,
        b'J'..=b'R' => 0xD1 + (byte - b'J'),
        b'\\' => 0xE0,
        b'S'..=b'Z' => 0xE2 + (byte - b'S'),
        b'0'..=b'9' => 0xF0 + (byte - b'0'),
        _ => 0x40,
    }
}

/// Heuristic: card-image headers start with 'C' in either encoding.
/// EBCDIC text is dominated by bytes >= 0x40 with the high bit set for
/// letters and digits, ASCII text never sets the high bit.
pub fn looks_like_ebcdic(raw: &[u8]) -> bool {
    match raw.first() {
        Some(0xC3) => true,
        Some(b'C') => false,
        _ => {
            let high = raw.iter().filter(|&&b| b >= 0x80).count();
            high * 4 > raw.len()
        }
    }
}

/// Decode a textual header block into 80-column lines joined by newlines.
pub fn decode_textual_header(raw: &[u8]) -> String {
    let ebcdic = looks_like_ebcdic(raw);
    let ascii: Vec<u8> = raw
        .iter()
        .map(|&b| {
            let c = if ebcdic { ebcdic_to_ascii(b) } else { b };
            if c.is_ascii_graphic() || c == b' ' {
                c
            } else {
                b' '
            }
        })
        .collect();

    ascii
        .chunks(80)
        .map(|line| String::from_utf8_lossy(line).trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
