//! WinAnsiEncoding (code page 1252) as used by the standard PDF fonts.

/// Byte printed for characters the encoding has no glyph for.
pub const REPLACEMENT: u8 = b'?';

/// Encoding byte for `ch`, or `None` if WinAnsi has no glyph for it.
pub fn win_ansi_byte(ch: char) -> Option<u8> {
    let byte = match ch {
        ' '..='~' => ch as u8,
        '\u{a0}'..='\u{ff}' => ch as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

/// Byte actually printed for `ch`: tabs print as a space, characters
/// without a glyph as [`REPLACEMENT`].
pub fn printed_byte(ch: char) -> u8 {
    if ch == '\t' {
        return b' ';
    }
    win_ansi_byte(ch).unwrap_or(REPLACEMENT)
}

/// Encode `text` for a WinAnsi font, one byte per character.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(printed_byte).collect()
}
