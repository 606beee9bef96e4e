//! Global tokens and tag-byte flags.
//!
//! Byte values follow the WBXML 1.3 global token table. Only the tokens the
//! tag-tree model needs are produced; the rest are recognised so the decoder
//! can reject them by name instead of misreading them as tags.

/// Switch the current code page; followed by one page byte.
pub const SWITCH_PAGE: u8 = 0x00;
/// Close the innermost open element.
pub const END: u8 = 0x01;
pub const ENTITY: u8 = 0x02;
/// Inline string; followed by UTF-8 bytes and a `0x00` terminator.
pub const STR_I: u8 = 0x03;
pub const LITERAL: u8 = 0x04;
pub const EXT_I_0: u8 = 0x40;
pub const EXT_I_2: u8 = 0x42;
pub const PI: u8 = 0x43;
pub const LITERAL_C: u8 = 0x44;
pub const EXT_T_0: u8 = 0x80;
pub const EXT_T_2: u8 = 0x82;
pub const STR_T: u8 = 0x83;
pub const LITERAL_A: u8 = 0x84;
pub const EXT_0: u8 = 0xC0;
pub const EXT_2: u8 = 0xC2;
/// Opaque block; followed by a variable-length length and the raw bytes.
pub const OPAQUE: u8 = 0xC3;
pub const LITERAL_AC: u8 = 0xC4;

/// Tag byte bit marking an element that carries content and an `END`.
pub const CONTENT_FLAG: u8 = 0x40;
/// Tag byte bit marking an attribute list. Attributes are not modelled.
pub const ATTRIBUTE_FLAG: u8 = 0x80;
/// Low six bits of a tag byte.
pub const CODE_MASK: u8 = 0x3F;

/// Lowest code a tag may use; `0x00..=0x04` are global tokens.
pub const MIN_TAG_CODE: u8 = 0x05;
/// Highest code that fits beside the two flag bits.
pub const MAX_TAG_CODE: u8 = CODE_MASK;

/// Default document version byte (WBXML 1.3).
pub const VERSION_1_3: u8 = 0x03;
/// Public identifier held in the string table; an index follows it.
pub const PUBLIC_ID_STRING_TABLE: u32 = 0x00;
/// Public identifier "unknown or missing".
pub const PUBLIC_ID_UNKNOWN: u32 = 0x01;
/// IANA MIBenum for UTF-8.
pub const CHARSET_UTF8: u32 = 0x6A;

/// Builds the on-wire tag byte for a code.
pub const fn tag_byte(code: u8, has_content: bool) -> u8 {
    if has_content {
        code | CONTENT_FLAG
    } else {
        code
    }
}

/// Returns true when `code` can be written as a tag.
pub const fn is_valid_tag_code(code: u8) -> bool {
    code >= MIN_TAG_CODE && code <= MAX_TAG_CODE
}

/// Returns true for the global tokens that may appear where a tag is
/// expected but that this codec does not support.
pub fn is_unsupported_global(byte: u8) -> bool {
    matches!(
        byte,
        ENTITY
            | LITERAL
            | EXT_I_0..=EXT_I_2
            | PI
            | LITERAL_C
            | EXT_T_0..=EXT_T_2
            | STR_T
            | LITERAL_A
            | EXT_0..=EXT_2
            | OPAQUE
            | LITERAL_AC
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_byte_sets_content_flag() {
        assert_eq!(tag_byte(0x05, true), 0x45);
        assert_eq!(tag_byte(0x05, false), 0x05);
        assert_eq!(tag_byte(0x3F, true), 0x7F);
    }

    #[test]
    fn code_range_excludes_global_tokens() {
        for code in 0..MIN_TAG_CODE {
            assert!(!is_valid_tag_code(code));
        }
        assert!(is_valid_tag_code(0x05));
        assert!(is_valid_tag_code(0x3F));
        assert!(!is_valid_tag_code(0x40));
    }

    #[test]
    fn unsupported_globals_never_include_model_tokens() {
        for byte in [SWITCH_PAGE, END, STR_I] {
            assert!(!is_unsupported_global(byte));
        }
        assert!(is_unsupported_global(PI));
        assert!(is_unsupported_global(OPAQUE));
    }
}
