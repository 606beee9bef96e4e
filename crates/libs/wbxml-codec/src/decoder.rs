//! Document decoder.
//!
//! [`EventReader`] walks the token stream and yields start, content and end
//! events; [`Decoder`] is the entry point that reads the preamble and
//! collects events or element trees.

use crate::buffer::InputBuffer;
use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::opcode;
use crate::registry::{TagCode, TagRegistry};
use crate::varint;

/// Document header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preamble {
    pub version: u8,
    pub public_id: u32,
    /// String-table index of the public id, present only when `public_id`
    /// is 0.
    pub public_id_index: Option<u32>,
    pub charset: u32,
    pub string_table_len: u32,
}

/// One decoded step of a document.
///
/// Every `Start` is matched by exactly one `End`, including elements written
/// without the content flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<T> {
    Start { tag: T, has_content: bool },
    Text(String),
    Opaque(Vec<u8>),
    End(T),
}

/// Pull-style event stream over one document.
#[derive(Debug)]
pub struct EventReader<'a, R: TagRegistry> {
    input: InputBuffer<'a>,
    registry: &'a R,
    max_varint_bytes: usize,
    preamble: Option<Preamble>,
    page: u8,
    stack: Vec<R::Tag>,
    pending_end: Option<R::Tag>,
    failed: bool,
}

impl<'a, R: TagRegistry> EventReader<'a, R> {
    /// Reads the preamble (when configured) and positions at the body.
    pub fn new(registry: &'a R, config: &CodecConfig, bytes: &'a [u8]) -> Result<Self> {
        let mut input = InputBuffer::new(bytes);
        let preamble = if config.write_preamble {
            Some(read_preamble(&mut input, config.max_varint_bytes)?)
        } else {
            None
        };
        Ok(Self {
            input,
            registry,
            max_varint_bytes: config.max_varint_bytes,
            preamble,
            page: 0,
            stack: Vec::new(),
            pending_end: None,
            failed: false,
        })
    }

    pub fn preamble(&self) -> Option<&Preamble> {
        self.preamble.as_ref()
    }

    /// Elements started and not yet ended.
    pub fn depth(&self) -> usize {
        self.stack.len() + usize::from(self.pending_end.is_some())
    }

    pub fn current_page(&self) -> u8 {
        self.page
    }

    pub fn offset(&self) -> usize {
        self.input.offset()
    }

    /// Returns the next event, or `None` once the body is exhausted with no
    /// element left open.
    pub fn next_event(&mut self) -> Result<Option<Event<R::Tag>>> {
        if let Some(tag) = self.pending_end.take() {
            return Ok(Some(Event::End(tag)));
        }
        loop {
            let offset = self.input.offset();
            let Some(token) = self.input.peek_byte() else {
                if self.stack.is_empty() {
                    return Ok(None);
                }
                return Err(CodecError::Truncated { offset, needed: 1 });
            };
            self.input.read_byte()?;

            match token {
                opcode::SWITCH_PAGE => {
                    let page = self.input.read_byte()?;
                    log::trace!("wbxml: switch page {} -> {} at {}", self.page, page, offset);
                    self.page = page;
                }
                opcode::END => {
                    let tag = self
                        .stack
                        .pop()
                        .ok_or(CodecError::UnbalancedElement("END with no open element"))?;
                    return Ok(Some(Event::End(tag)));
                }
                opcode::STR_I => {
                    self.require_open(token, offset)?;
                    let bytes = self.input.read_until(0x00)?;
                    let text = core::str::from_utf8(bytes)
                        .map_err(|_| CodecError::InvalidUtf8 { offset })?;
                    return Ok(Some(Event::Text(text.to_owned())));
                }
                opcode::OPAQUE => {
                    self.require_open(token, offset)?;
                    let length = varint::read_u32(&mut self.input, self.max_varint_bytes)?;
                    let data = self.input.read_slice(length as usize)?;
                    return Ok(Some(Event::Opaque(data.to_vec())));
                }
                _ if token & opcode::ATTRIBUTE_FLAG != 0 || opcode::is_unsupported_global(token) => {
                    return Err(CodecError::UnsupportedToken { token, offset });
                }
                _ => {
                    let has_content = token & opcode::CONTENT_FLAG != 0;
                    let code = TagCode::new(self.page, token & opcode::CODE_MASK);
                    let tag = self.registry.lookup_reverse(code)?;
                    if has_content {
                        self.stack.push(tag.clone());
                    } else {
                        self.pending_end = Some(tag.clone());
                    }
                    return Ok(Some(Event::Start { tag, has_content }));
                }
            }
        }
    }

    fn require_open(&self, token: u8, offset: usize) -> Result<()> {
        if self.stack.is_empty() {
            return Err(CodecError::UnsupportedToken { token, offset });
        }
        Ok(())
    }
}

impl<'a, R: TagRegistry> Iterator for EventReader<'a, R> {
    type Item = Result<Event<R::Tag>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_event() {
            Ok(event) => event.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

fn read_preamble(input: &mut InputBuffer<'_>, max_varint_bytes: usize) -> Result<Preamble> {
    let version = input.read_byte()?;
    let public_id = varint::read_u32(input, max_varint_bytes)?;
    let public_id_index = if public_id == opcode::PUBLIC_ID_STRING_TABLE {
        Some(varint::read_u32(input, max_varint_bytes)?)
    } else {
        None
    };
    let charset = varint::read_u32(input, max_varint_bytes)?;
    let string_table_len = varint::read_u32(input, max_varint_bytes)?;
    if string_table_len > 0 {
        log::debug!("wbxml: skipping {string_table_len} byte string table");
        input.read_slice(string_table_len as usize)?;
    }
    Ok(Preamble { version, public_id, public_id_index, charset, string_table_len })
}

/// Entry point for whole-buffer decoding.
#[derive(Debug, Clone)]
pub struct Decoder<R: TagRegistry> {
    registry: R,
    config: CodecConfig,
}

impl<R: TagRegistry> Decoder<R> {
    pub fn new(registry: R) -> Self {
        Self::with_config(registry, CodecConfig::default())
    }

    pub fn with_config(registry: R, config: CodecConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn events<'a>(&'a self, bytes: &'a [u8]) -> Result<EventReader<'a, R>> {
        EventReader::new(&self.registry, &self.config, bytes)
    }

    /// Decodes the whole body into a flat event list.
    pub fn decode_events(&self, bytes: &[u8]) -> Result<Vec<Event<R::Tag>>> {
        self.events(bytes)?.collect()
    }

    pub fn preamble(&self, bytes: &[u8]) -> Result<Option<Preamble>> {
        Ok(self.events(bytes)?.preamble().copied())
    }
}
