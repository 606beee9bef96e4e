//! Cursor-style parser for sync-protocol response handlers.
//!
//! Handlers walk a document element by element, pulling the value of the
//! leaves they care about and skipping the rest:
//!
//! ```rust
//! use wbxml_codec::{CodecConfig, Encoder, Parser, TagTable};
//!
//! let mut table = TagTable::new();
//! table.add_page(0, "AirSync", &[("Delete", 0x09), ("ServerId", 0x0D), ("Class", 0x10)])?;
//!
//! let mut enc = Encoder::new(&table);
//! enc.open("AirSync:Delete")?
//!     .text("AirSync:Class", "Email")?
//!     .text("AirSync:ServerId", "7:12")?
//!     .close()?;
//! let bytes = enc.finish()?;
//!
//! let mut parser = Parser::new(&table, &bytes)?;
//! let delete = parser.next_tag(None)?.expect("root element");
//! let mut server_id = None;
//! while let Some(tag) = parser.next_tag(Some(&delete))? {
//!     match tag.as_ref() {
//!         "AirSync:ServerId" => server_id = Some(parser.value()?),
//!         _ => parser.skip_tag()?,
//!     }
//! }
//! assert_eq!(server_id.as_deref(), Some("7:12"));
//! # Ok::<(), wbxml_codec::CodecError>(())
//! ```

use crate::config::CodecConfig;
use crate::decoder::{Event, EventReader, Preamble};
use crate::error::{CodecError, Result};
use crate::registry::TagRegistry;

pub struct Parser<'a, R: TagRegistry> {
    reader: EventReader<'a, R>,
    current: Option<R::Tag>,
}

impl<'a, R: TagRegistry> Parser<'a, R> {
    pub fn new(registry: &'a R, bytes: &'a [u8]) -> Result<Self> {
        Self::with_config(registry, &CodecConfig::default(), bytes)
    }

    pub fn with_config(registry: &'a R, config: &CodecConfig, bytes: &'a [u8]) -> Result<Self> {
        Ok(Self { reader: EventReader::new(registry, config, bytes)?, current: None })
    }

    pub fn preamble(&self) -> Option<&Preamble> {
        self.reader.preamble()
    }

    /// The tag most recently returned by [`Parser::next_tag`].
    pub fn current(&self) -> Option<&R::Tag> {
        self.current.as_ref()
    }

    pub fn depth(&self) -> usize {
        self.reader.depth()
    }

    /// Advances to the next start tag.
    ///
    /// Returns `None` when the end of `within` is reached, or at the end of
    /// the document when `within` is `None`. Stray content between tags is
    /// skipped.
    pub fn next_tag(&mut self, within: Option<&R::Tag>) -> Result<Option<R::Tag>> {
        while let Some(event) = self.reader.next_event()? {
            match event {
                Event::Start { tag, .. } => {
                    self.current = Some(tag.clone());
                    return Ok(Some(tag));
                }
                Event::End(tag) if within == Some(&tag) => {
                    self.current = None;
                    return Ok(None);
                }
                Event::End(_) | Event::Text(_) | Event::Opaque(_) => {}
            }
        }
        self.current = None;
        Ok(None)
    }

    /// Reads the text of the element just started and consumes its end.
    /// An element with no content reads as an empty string.
    pub fn value(&mut self) -> Result<String> {
        let mut value = String::new();
        loop {
            match self.expect_event()? {
                Event::Text(text) => value.push_str(&text),
                Event::End(_) => return Ok(value),
                Event::Opaque(_) | Event::Start { .. } => return Err(self.mixed()),
            }
        }
    }

    pub fn value_int(&mut self) -> Result<i64> {
        let value = self.value()?;
        value.trim().parse().map_err(|_| CodecError::InvalidInteger(value))
    }

    /// Reads the opaque payload of the element just started.
    pub fn opaque_value(&mut self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        loop {
            match self.expect_event()? {
                Event::Opaque(chunk) => data.extend_from_slice(&chunk),
                Event::End(_) => return Ok(data),
                Event::Text(_) | Event::Start { .. } => return Err(self.mixed()),
            }
        }
    }

    /// Consumes the rest of the current element, children included.
    pub fn skip_tag(&mut self) -> Result<()> {
        let Some(target) = self.reader.depth().checked_sub(1) else {
            return Ok(());
        };
        loop {
            if let Event::End(_) = self.expect_event()? {
                if self.reader.depth() == target {
                    return Ok(());
                }
            }
        }
    }

    fn expect_event(&mut self) -> Result<Event<R::Tag>> {
        let offset = self.reader.offset();
        self.reader.next_event()?.ok_or(CodecError::Truncated { offset, needed: 1 })
    }

    fn mixed(&self) -> CodecError {
        CodecError::MixedContent(format!("{:?}", self.current))
    }
}
