//! Keyboard usage codes and the US-layout ASCII lookup table.

pub const KEY_NONE: u8 = 0x00;
pub const KEY_A: u8 = 0x04;
pub const KEY_B: u8 = 0x05;
pub const KEY_Z: u8 = 0x1D;
pub const KEY_1: u8 = 0x1E;
pub const KEY_2: u8 = 0x1F;
pub const KEY_3: u8 = 0x20;
pub const KEY_4: u8 = 0x21;
pub const KEY_5: u8 = 0x22;
pub const KEY_6: u8 = 0x23;
pub const KEY_7: u8 = 0x24;
pub const KEY_8: u8 = 0x25;
pub const KEY_9: u8 = 0x26;
pub const KEY_0: u8 = 0x27;
pub const KEY_RETURN: u8 = 0x28;
pub const KEY_ESCAPE: u8 = 0x29;
pub const KEY_BACKSPACE: u8 = 0x2A;
pub const KEY_TAB: u8 = 0x2B;
pub const KEY_SPACE: u8 = 0x2C;
pub const KEY_MINUS: u8 = 0x2D;
pub const KEY_EQUAL: u8 = 0x2E;
pub const KEY_BRACKET_LEFT: u8 = 0x2F;
pub const KEY_BRACKET_RIGHT: u8 = 0x30;
pub const KEY_BACKSLASH: u8 = 0x31;
pub const KEY_SEMICOLON: u8 = 0x33;
pub const KEY_APOSTROPHE: u8 = 0x34;
pub const KEY_GRAVE: u8 = 0x35;
pub const KEY_COMMA: u8 = 0x36;
pub const KEY_PERIOD: u8 = 0x37;
pub const KEY_SLASH: u8 = 0x38;
pub const KEY_DELETE: u8 = 0x4C;

/// One entry of the ASCII table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyMapping {
    /// Left Shift must be held.
    pub shift: bool,
    /// Usage code, `KEY_NONE` when the character has no key.
    pub keycode: u8,
}

impl KeyMapping {
    pub const NONE: Self = Self::plain(KEY_NONE);

    const fn plain(keycode: u8) -> Self {
        Self {
            shift: false,
            keycode,
        }
    }

    const fn shifted(keycode: u8) -> Self {
        Self {
            shift: true,
            keycode,
        }
    }
}

/// ASCII (0x00-0x7F) to key mapping, US layout.
pub static ASCII_TO_KEYCODE: [KeyMapping; 128] = build_ascii_table();

/// Look up a character. Anything outside ASCII maps to [`KeyMapping::NONE`].
pub fn ascii_to_keycode(ch: char) -> KeyMapping {
    let code = ch as u32;
    if code < 128 {
        ASCII_TO_KEYCODE[code as usize]
    } else {
        KeyMapping::NONE
    }
}

const fn build_ascii_table() -> [KeyMapping; 128] {
    let mut t = [KeyMapping::NONE; 128];

    // Control characters
    t[0x08] = KeyMapping::plain(KEY_BACKSPACE);
    t[0x09] = KeyMapping::plain(KEY_TAB);
    t[0x0A] = KeyMapping::plain(KEY_RETURN);
    t[0x0D] = KeyMapping::plain(KEY_RETURN);
    t[0x1B] = KeyMapping::plain(KEY_ESCAPE);

    // Letters
    let mut i = 0;
    while i < 26 {
        t[b'a' as usize + i] = KeyMapping::plain(KEY_A + i as u8);
        t[b'A' as usize + i] = KeyMapping::shifted(KEY_A + i as u8);
        i += 1;
    }

    // Digits: '1'..'9' are contiguous, '0' comes after '9'
    let mut d = 0;
    while d < 9 {
        t[b'1' as usize + d] = KeyMapping::plain(KEY_1 + d as u8);
        d += 1;
    }
    t[b'0' as usize] = KeyMapping::plain(KEY_0);

    t[b' ' as usize] = KeyMapping::plain(KEY_SPACE);
    t[b'!' as usize] = KeyMapping::shifted(KEY_1);
    t[b'"' as usize] = KeyMapping::shifted(KEY_APOSTROPHE);
    t[b'#' as usize] = KeyMapping::shifted(KEY_3);
    t[b'$' as usize] = KeyMapping::shifted(KEY_4);
    t[b'%' as usize] = KeyMapping::shifted(KEY_5);
    t[b'&' as usize] = KeyMapping::shifted(KEY_7);
    t[b'\'' as usize] = KeyMapping::plain(KEY_APOSTROPHE);
    t[b'(' as usize] = KeyMapping::shifted(KEY_9);
    t[b')' as usize] = KeyMapping::shifted(KEY_0);
    t[b'*' as usize] = KeyMapping::shifted(KEY_8);
    t[b'+' as usize] = KeyMapping::shifted(KEY_EQUAL);
    t[b',' as usize] = KeyMapping::plain(KEY_COMMA);
    t[b'-' as usize] = KeyMapping::plain(KEY_MINUS);
    t[b'.' as usize] = KeyMapping::plain(KEY_PERIOD);
    t[b'/' as usize] = KeyMapping::plain(KEY_SLASH);
    t[b':' as usize] = KeyMapping::shifted(KEY_SEMICOLON);
    t[b';' as usize] = KeyMapping::plain(KEY_SEMICOLON);
    t[b'<' as usize] = KeyMapping::shifted(KEY_COMMA);
    t[b'=' as usize] = KeyMapping::plain(KEY_EQUAL);
    t[b'>' as usize] = KeyMapping::shifted(KEY_PERIOD);
    t[b'?' as usize] = KeyMapping::shifted(KEY_SLASH);
    t[b'@' as usize] = KeyMapping::shifted(KEY_2);
    t[b'[' as usize] = KeyMapping::plain(KEY_BRACKET_LEFT);
    t[b'\\' as usize] = KeyMapping::plain(KEY_BACKSLASH);
    t[b']' as usize] = KeyMapping::plain(KEY_BRACKET_RIGHT);
    t[b'^' as usize] = KeyMapping::shifted(KEY_6);
    t[b'_' as usize] = KeyMapping::shifted(KEY_MINUS);
    t[b'`' as usize] = KeyMapping::plain(KEY_GRAVE);
    t[b'{' as usize] = KeyMapping::shifted(KEY_BRACKET_LEFT);
    t[b'|' as usize] = KeyMapping::shifted(KEY_BACKSLASH);
    t[b'}' as usize] = KeyMapping::shifted(KEY_BRACKET_RIGHT);
    t[b'~' as usize] = KeyMapping::shifted(KEY_GRAVE);
    t[0x7F] = KeyMapping::plain(KEY_DELETE);

    t
}
