//! # wbxml-codec
//!
//! Compact binary tag-tree codec: the paged WBXML encoding used by Exchange
//! ActiveSync. Elements are written as one-byte tags drawn from numbered code
//! pages, text as NUL-terminated inline strings and binary payloads as
//! length-prefixed opaque blocks.
//!
//! ## Wire Format
//!
//! ```text
//! [version:1][public_id:mb][charset:mb][strtbl_len:mb]  body...
//!   0x03        0x01         0x6A        0x00
//!
//! element := [SWITCH_PAGE page]? tag (content* END)?
//! tag     := code:6 | CONTENT_FLAG(0x40)
//! content := STR_I utf8 0x00 | OPAQUE len:mb bytes | element
//! ```
//!
//! The codec only guarantees the binary shape of what it is given. Which tags
//! appear, and in what order, is decided by the caller; tag names come from an
//! injected [`TagRegistry`].
//!
//! ## Example
//!
//! ```rust
//! use wbxml_codec::{Decoder, Encoder, Event, TagTable};
//!
//! let mut table = TagTable::new();
//! table.add_page(21, "ComposeMail", &[("SendMail", 0x05), ("Mime", 0x10)])?;
//!
//! let mut enc = Encoder::new(&table);
//! enc.open("ComposeMail:SendMail")?;
//! enc.open("ComposeMail:Mime")?.opaque(b"From: a@b\r\n")?.close()?;
//! enc.close()?;
//! let bytes = enc.finish()?;
//!
//! let events = Decoder::new(&table).decode_events(&bytes)?;
//! assert_eq!(events.len(), 5);
//! assert!(matches!(&events[2], Event::Opaque(data) if data.starts_with(b"From")));
//! # Ok::<(), wbxml_codec::CodecError>(())
//! ```

pub mod buffer;
pub mod config;
pub mod decoder;
pub mod document;
pub mod encoder;
pub mod error;
pub mod opcode;
pub mod parser;
pub mod registry;
pub mod varint;

pub use config::{CodecConfig, PageSchema, Schema};
pub use decoder::{Decoder, Event, EventReader, Preamble};
pub use document::{encode_document, Body, Element};
pub use encoder::Encoder;
pub use error::{CodecError, Result};
pub use parser::Parser;
pub use registry::{TagCode, TagName, TagRegistry, TagTable};
