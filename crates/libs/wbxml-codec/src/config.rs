use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{CodecError, Result};
use crate::opcode;
use crate::registry::TagTable;
use crate::varint;

/// Preamble values and decoder limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    pub version: u8,
    pub public_id: u32,
    pub charset: u32,
    /// Write (and expect) the document preamble. Off for bare fragments.
    pub write_preamble: bool,
    /// Upper bound on bytes read for one variable-length integer.
    pub max_varint_bytes: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            version: opcode::VERSION_1_3,
            public_id: opcode::PUBLIC_ID_UNKNOWN,
            charset: opcode::CHARSET_UTF8,
            write_preamble: true,
            max_varint_bytes: varint::MAX_U32_LEN,
        }
    }
}

impl CodecConfig {
    /// Config for fragments without a preamble.
    pub fn headerless() -> Self {
        Self { write_preamble: false, ..Self::default() }
    }

    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()
    }

    pub fn validate(self) -> Result<Self> {
        if !(1..=varint::MAX_U32_LEN).contains(&self.max_varint_bytes) {
            return Err(CodecError::Config(format!(
                "max_varint_bytes must be within 1..={}, got {}",
                varint::MAX_U32_LEN,
                self.max_varint_bytes
            )));
        }
        Ok(self)
    }
}

/// One code page in a schema file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageSchema {
    pub page: u8,
    pub name: String,
    #[serde(default)]
    pub tags: BTreeMap<String, u8>,
}

/// A TOML tag schema with optional codec settings.
///
/// ```toml
/// [codec]
/// charset = 106
///
/// [[pages]]
/// page = 21
/// name = "ComposeMail"
/// [pages.tags]
/// SendMail = 5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Schema {
    pub codec: CodecConfig,
    pub pages: Vec<PageSchema>,
}

impl Schema {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let mut schema: Self = toml::from_str(input)?;
        schema.codec = schema.codec.validate()?;
        Ok(schema)
    }

    pub fn registry(&self) -> Result<TagTable> {
        let mut table = TagTable::new();
        for page in &self.pages {
            let tags: Vec<(&str, u8)> =
                page.tags.iter().map(|(name, code)| (name.as_str(), *code)).collect();
            table.add_page(page.page, &page.name, &tags)?;
        }
        log::debug!("schema: loaded {} tags on {} page(s)", table.len(), self.pages.len());
        Ok(table)
    }
}
