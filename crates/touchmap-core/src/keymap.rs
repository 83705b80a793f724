//! Host key-code constants and name lookups.
//!
//! Key codes are the host input framework's numeric codes, passed through the
//! engine untouched. Names exist only for configuration files and log output;
//! the engine itself compares raw codes.

/// A host key code as delivered by the input source.
pub type KeyCode = i32;

pub const KEYCODE_0: KeyCode = 2000;
pub const KEYCODE_1: KeyCode = 2001;
pub const KEYCODE_2: KeyCode = 2002;
pub const KEYCODE_3: KeyCode = 2003;
pub const KEYCODE_4: KeyCode = 2004;
pub const KEYCODE_5: KeyCode = 2005;
pub const KEYCODE_6: KeyCode = 2006;
pub const KEYCODE_7: KeyCode = 2007;
pub const KEYCODE_8: KeyCode = 2008;
pub const KEYCODE_9: KeyCode = 2009;
pub const KEYCODE_DPAD_UP: KeyCode = 2012;
pub const KEYCODE_DPAD_DOWN: KeyCode = 2013;
pub const KEYCODE_DPAD_LEFT: KeyCode = 2014;
pub const KEYCODE_DPAD_RIGHT: KeyCode = 2015;
pub const KEYCODE_A: KeyCode = 2017;
pub const KEYCODE_D: KeyCode = 2020;
pub const KEYCODE_E: KeyCode = 2021;
pub const KEYCODE_F: KeyCode = 2022;
pub const KEYCODE_Q: KeyCode = 2033;
pub const KEYCODE_R: KeyCode = 2034;
pub const KEYCODE_S: KeyCode = 2035;
pub const KEYCODE_W: KeyCode = 2039;
pub const KEYCODE_ALT_LEFT: KeyCode = 2045;
pub const KEYCODE_ALT_RIGHT: KeyCode = 2046;
pub const KEYCODE_SHIFT_LEFT: KeyCode = 2047;
pub const KEYCODE_SHIFT_RIGHT: KeyCode = 2048;
pub const KEYCODE_TAB: KeyCode = 2049;
pub const KEYCODE_SPACE: KeyCode = 2050;
pub const KEYCODE_ENTER: KeyCode = 2054;
pub const KEYCODE_ESCAPE: KeyCode = 2070;
pub const KEYCODE_CTRL_LEFT: KeyCode = 2072;
pub const KEYCODE_CTRL_RIGHT: KeyCode = 2073;

/// Name table. Letters are generated by [`key_name_to_code`] and are not
/// listed here.
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("0", KEYCODE_0),
    ("1", KEYCODE_1),
    ("2", KEYCODE_2),
    ("3", KEYCODE_3),
    ("4", KEYCODE_4),
    ("5", KEYCODE_5),
    ("6", KEYCODE_6),
    ("7", KEYCODE_7),
    ("8", KEYCODE_8),
    ("9", KEYCODE_9),
    ("Up", KEYCODE_DPAD_UP),
    ("Down", KEYCODE_DPAD_DOWN),
    ("Left", KEYCODE_DPAD_LEFT),
    ("Right", KEYCODE_DPAD_RIGHT),
    ("LAlt", KEYCODE_ALT_LEFT),
    ("RAlt", KEYCODE_ALT_RIGHT),
    ("LShift", KEYCODE_SHIFT_LEFT),
    ("RShift", KEYCODE_SHIFT_RIGHT),
    ("Tab", KEYCODE_TAB),
    ("Space", KEYCODE_SPACE),
    ("Enter", KEYCODE_ENTER),
    ("Escape", KEYCODE_ESCAPE),
    ("LCtrl", KEYCODE_CTRL_LEFT),
    ("RCtrl", KEYCODE_CTRL_RIGHT),
];

/// Resolves a key name (`"W"`, `"Space"`, `"LShift"`, ...) to its host code.
///
/// Matching is case-insensitive. A purely numeric string that is not a digit
/// key name is parsed as a raw code, so configuration files can refer to keys
/// that have no name here.
pub fn key_name_to_code(name: &str) -> Option<KeyCode> {
    let name = name.trim();
    if let Some(&(_, code)) = NAMED_KEYS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
    {
        return Some(code);
    }
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            let offset = (c.to_ascii_uppercase() as u8 - b'A') as KeyCode;
            return Some(KEYCODE_A + offset);
        }
    }
    name.parse().ok()
}

/// Returns a display name for `code`, falling back to the number itself.
pub fn key_code_to_name(code: KeyCode) -> String {
    if let Some(&(name, _)) = NAMED_KEYS.iter().find(|(_, c)| *c == code) {
        return name.to_string();
    }
    if (KEYCODE_A..KEYCODE_A + 26).contains(&code) {
        return char::from(b'A' + (code - KEYCODE_A) as u8).to_string();
    }
    code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_resolve_to_contiguous_codes() {
        assert_eq!(key_name_to_code("A"), Some(KEYCODE_A));
        assert_eq!(key_name_to_code("w"), Some(KEYCODE_W));
        assert_eq!(key_name_to_code("S"), Some(KEYCODE_S));
        assert_eq!(key_name_to_code("d"), Some(KEYCODE_D));
    }

    #[test]
    fn test_named_keys_are_case_insensitive() {
        assert_eq!(key_name_to_code("space"), Some(KEYCODE_SPACE));
        assert_eq!(key_name_to_code("LSHIFT"), Some(KEYCODE_SHIFT_LEFT));
        assert_eq!(key_name_to_code(" Up "), Some(KEYCODE_DPAD_UP));
    }

    #[test]
    fn test_digit_names_win_over_raw_codes() {
        assert_eq!(key_name_to_code("7"), Some(KEYCODE_7));
        assert_eq!(key_name_to_code("10"), Some(10));
    }

    #[test]
    fn test_unknown_name_returns_none() {
        assert_eq!(key_name_to_code("NotAKey"), None);
        assert_eq!(key_name_to_code(""), None);
    }

    #[test]
    fn test_code_to_name_round_trips_named_and_letter_keys() {
        assert_eq!(key_code_to_name(KEYCODE_W), "W");
        assert_eq!(key_code_to_name(KEYCODE_SPACE), "Space");
        assert_eq!(key_code_to_name(12345), "12345");
    }
}
