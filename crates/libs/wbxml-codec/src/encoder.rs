//! Document encoder.
//!
//! Bytes are appended strictly in call order. The only state is the current
//! code page, the stack of open elements and the output buffer, all owned by
//! one [`Encoder`].

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use std::io::Read;

use crate::buffer::OutputBuffer;
use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::opcode;
use crate::registry::{TagCode, TagRegistry};
use crate::varint;

/// Stateful writer for one document.
///
/// Writers return `&mut Self` so calls chain:
///
/// ```rust
/// use wbxml_codec::{Encoder, TagTable};
///
/// let mut table = TagTable::new();
/// table.add_page(0, "AirSync", &[("Delete", 0x09), ("ServerId", 0x0D)]).unwrap();
///
/// let mut enc = Encoder::new(&table);
/// enc.open("AirSync:Delete")?.text("AirSync:ServerId", "1:1")?.close()?;
/// let bytes = enc.finish()?;
/// assert_eq!(&bytes[4..], &[0x49, 0x4D, 0x03, b'1', b':', b'1', 0x00, 0x01, 0x01]);
/// # Ok::<(), wbxml_codec::CodecError>(())
/// ```
#[derive(Debug)]
pub struct Encoder<R: TagRegistry> {
    registry: R,
    out: OutputBuffer,
    stack: Vec<TagCode>,
    page: u8,
}

impl<R: TagRegistry> Encoder<R> {
    /// Creates an encoder that writes the default WBXML 1.3 preamble.
    pub fn new(registry: R) -> Self {
        Self::with_config(registry, &CodecConfig::default())
    }

    pub fn with_config(registry: R, config: &CodecConfig) -> Self {
        let mut out = OutputBuffer::with_capacity(64);
        if config.write_preamble {
            out.write_byte(config.version);
            varint::write_u32(out.as_mut_vec(), config.public_id);
            if config.public_id == opcode::PUBLIC_ID_STRING_TABLE {
                // Index of the public id string in the (empty) string table.
                out.write_byte(0x00);
            }
            varint::write_u32(out.as_mut_vec(), config.charset);
            // Empty string table.
            out.write_byte(0x00);
        }
        Self { registry, out, stack: Vec::new(), page: 0 }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Number of elements opened and not yet closed.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn current_page(&self) -> u8 {
        self.page
    }

    /// Bytes written so far, preamble included.
    pub fn encoded_len(&self) -> usize {
        self.out.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.out.as_slice()
    }

    fn resolve(&self, tag: &R::Tag) -> Result<TagCode> {
        self.registry.lookup(tag)?.validate()
    }

    fn switch_page(&mut self, page: u8) {
        if page != self.page {
            log::trace!("wbxml: switch page {} -> {}", self.page, page);
            self.out.chain_write(&[opcode::SWITCH_PAGE, page]);
            self.page = page;
        }
    }

    fn write_tag(&mut self, code: TagCode, has_content: bool) {
        self.switch_page(code.page);
        self.out.write_byte(opcode::tag_byte(code.code, has_content));
    }

    fn require_open(&self, what: &'static str) -> Result<()> {
        if self.stack.is_empty() {
            return Err(CodecError::UnbalancedElement(what));
        }
        Ok(())
    }

    /// Opens an element that will carry content and a closing `END`.
    pub fn open(&mut self, tag: impl Into<R::Tag>) -> Result<&mut Self> {
        let code = self.resolve(&tag.into())?;
        self.write_tag(code, true);
        self.stack.push(code);
        Ok(self)
    }

    /// Closes the innermost open element.
    pub fn close(&mut self) -> Result<&mut Self> {
        if self.stack.pop().is_none() {
            return Err(CodecError::UnbalancedElement("close() with no open element"));
        }
        self.out.write_byte(opcode::END);
        Ok(self)
    }

    /// Writes a self-terminating element with no content.
    pub fn empty_tag(&mut self, tag: impl Into<R::Tag>) -> Result<&mut Self> {
        let code = self.resolve(&tag.into())?;
        self.write_tag(code, false);
        Ok(self)
    }

    /// Writes an element holding one inline string. An empty value writes
    /// nothing at all.
    pub fn text(&mut self, tag: impl Into<R::Tag>, value: &str) -> Result<&mut Self> {
        if value.is_empty() {
            return Ok(self);
        }
        check_terminator(value)?;
        let code = self.resolve(&tag.into())?;
        self.write_tag(code, true);
        self.write_inline(value);
        self.out.write_byte(opcode::END);
        Ok(self)
    }

    /// Writes an integer value as its decimal string.
    pub fn text_int(&mut self, tag: impl Into<R::Tag>, value: i64) -> Result<&mut Self> {
        self.text(tag, &value.to_string())
    }

    /// Writes `tag` with the value stored under `key`, or nothing when the
    /// key is absent.
    pub fn conditional_text<K, V, S, Q>(
        &mut self,
        values: &HashMap<K, V, S>,
        key: &Q,
        tag: impl Into<R::Tag>,
    ) -> Result<&mut Self>
    where
        K: Borrow<Q> + Hash + Eq,
        Q: Hash + Eq + ?Sized,
        V: AsRef<str>,
        S: BuildHasher,
    {
        match values.get(key) {
            Some(value) => self.text(tag, value.as_ref()),
            None => Ok(self),
        }
    }

    /// Writes `STR_I`, the UTF-8 bytes of `value` and a NUL terminator into
    /// the open element.
    pub fn inline_string(&mut self, value: &str) -> Result<&mut Self> {
        self.require_open("inline string outside of an open element")?;
        check_terminator(value)?;
        self.write_inline(value);
        Ok(self)
    }

    fn write_inline(&mut self, value: &str) {
        self.out.write_byte(opcode::STR_I);
        self.out.write(value.as_bytes());
        self.out.write_byte(0x00);
    }

    /// Writes an opaque block holding a copy of `data`.
    pub fn opaque(&mut self, data: &[u8]) -> Result<&mut Self> {
        let length = self.opaque_length(data.len())?;
        self.out.as_mut_vec().reserve(1 + varint::encoded_len(length) + data.len());
        self.opaque_header(length)?;
        self.out.write(data);
        Ok(self)
    }

    /// Writes an opaque block of exactly `length` bytes read from `reader`.
    ///
    /// On a short read the encoder is left as it was before the call.
    pub fn opaque_from_reader(&mut self, reader: impl Read, length: u32) -> Result<&mut Self> {
        let mark = self.out.len();
        self.opaque_header(length)?;
        let copied = reader.take(u64::from(length)).read_to_end(self.out.as_mut_vec());
        match copied {
            Ok(n) if n == length as usize => Ok(self),
            Ok(n) => {
                self.out.as_mut_vec().truncate(mark);
                Err(CodecError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("opaque source ended after {n} of {length} bytes"),
                )))
            }
            Err(err) => {
                self.out.as_mut_vec().truncate(mark);
                Err(err.into())
            }
        }
    }

    /// Writes only the `OPAQUE` marker and length. The payload is expected
    /// to follow out of band, so `encoded_len() + length` gives the size of
    /// the full transfer.
    pub fn opaque_header(&mut self, length: u32) -> Result<&mut Self> {
        self.require_open("opaque data outside of an open element")?;
        self.out.write_byte(opcode::OPAQUE);
        varint::write_u32(self.out.as_mut_vec(), length);
        Ok(self)
    }

    fn opaque_length(&self, len: usize) -> Result<u32> {
        u32::try_from(len).map_err(|_| CodecError::MalformedLength { offset: self.out.len() })
    }

    /// Returns the finished document. Every opened element must be closed.
    pub fn finish(self) -> Result<Vec<u8>> {
        if !self.stack.is_empty() {
            return Err(CodecError::UnbalancedElement("finish() with open elements"));
        }
        log::debug!("wbxml: finished document of {} bytes", self.out.len());
        Ok(self.out.into_vec())
    }
}

fn check_terminator(value: &str) -> Result<()> {
    match value.bytes().position(|b| b == 0) {
        Some(position) => Err(CodecError::EmbeddedTerminator { position }),
        None => Ok(()),
    }
}
