//! Symbolic tag registry.
//!
//! The codec never hard-wires tag names. Every encoder, decoder and parser is
//! generic over a [`TagRegistry`], so the same core serves any schema: a
//! compile-time enum table, or a [`TagTable`] built from static data or a TOML
//! schema file.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::error::{CodecError, Result};
use crate::opcode;

/// Owned symbolic tag name, cheap to clone.
pub type TagName = Arc<str>;

/// A tag's numeric identity: code page plus 6-bit local code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagCode {
    pub page: u8,
    pub code: u8,
}

impl TagCode {
    pub const fn new(page: u8, code: u8) -> Self {
        Self { page, code }
    }

    /// Fails with `CodeOutOfRange` unless the code fits a tag byte.
    pub fn validate(self) -> Result<Self> {
        if opcode::is_valid_tag_code(self.code) {
            Ok(self)
        } else {
            Err(CodecError::CodeOutOfRange { page: self.page, code: self.code })
        }
    }
}

impl fmt::Display for TagCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:0x{:02x}", self.page, self.code)
    }
}

/// Bidirectional mapping between symbolic tags and `(page, code)` pairs.
///
/// Both directions are total-or-error: a miss is `UnknownTag`.
pub trait TagRegistry {
    type Tag: Clone + PartialEq + fmt::Debug;

    fn lookup(&self, tag: &Self::Tag) -> Result<TagCode>;

    fn lookup_reverse(&self, code: TagCode) -> Result<Self::Tag>;
}

impl<R: TagRegistry + ?Sized> TagRegistry for &R {
    type Tag = R::Tag;

    fn lookup(&self, tag: &Self::Tag) -> Result<TagCode> {
        (**self).lookup(tag)
    }

    fn lookup_reverse(&self, code: TagCode) -> Result<Self::Tag> {
        (**self).lookup_reverse(code)
    }
}

impl<R: TagRegistry + ?Sized> TagRegistry for Arc<R> {
    type Tag = R::Tag;

    fn lookup(&self, tag: &Self::Tag) -> Result<TagCode> {
        (**self).lookup(tag)
    }

    fn lookup_reverse(&self, code: TagCode) -> Result<Self::Tag> {
        (**self).lookup_reverse(code)
    }
}

/// Immutable-after-build name table.
///
/// Names are qualified with their page name, `"ComposeMail:SendMail"`, since
/// local names repeat across pages.
#[derive(Debug, Clone, Default)]
pub struct TagTable {
    by_name: HashMap<TagName, TagCode>,
    by_code: HashMap<TagCode, TagName>,
    pages: BTreeMap<u8, TagName>,
}

impl TagTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one fully qualified name.
    pub fn insert(&mut self, name: impl Into<TagName>, code: TagCode) -> Result<()> {
        let name = name.into();
        let code = code.validate()?;
        if self.by_name.contains_key(&name) {
            return Err(CodecError::DuplicateTag(name.to_string()));
        }
        if let Some(existing) = self.by_code.get(&code) {
            return Err(CodecError::DuplicateTag(format!("{code} ({existing} and {name})")));
        }
        self.by_name.insert(name.clone(), code);
        self.by_code.insert(code, name);
        Ok(())
    }

    /// Registers a page of local names, qualifying each with `page_name`.
    pub fn add_page(&mut self, page: u8, page_name: &str, tags: &[(&str, u8)]) -> Result<()> {
        if let Some(existing) = self.pages.get(&page) {
            if existing.as_ref() != page_name {
                return Err(CodecError::DuplicateTag(format!(
                    "page {page} ({existing} and {page_name})"
                )));
            }
        }
        self.pages.insert(page, page_name.into());
        for (local, code) in tags {
            self.insert(format!("{page_name}:{local}"), TagCode::new(page, *code))?;
        }
        Ok(())
    }

    pub fn code_of(&self, name: &str) -> Option<TagCode> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, code: TagCode) -> Option<&TagName> {
        self.by_code.get(&code)
    }

    pub fn page_name(&self, page: u8) -> Option<&str> {
        self.pages.get(&page).map(|name| name.as_ref())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Entries ordered by `(page, code)`.
    pub fn entries(&self) -> Vec<(TagCode, TagName)> {
        let mut entries: Vec<_> =
            self.by_code.iter().map(|(code, name)| (*code, name.clone())).collect();
        entries.sort_by_key(|(code, _)| *code);
        entries
    }
}

impl TagRegistry for TagTable {
    type Tag = TagName;

    fn lookup(&self, tag: &TagName) -> Result<TagCode> {
        self.code_of(tag).ok_or_else(|| CodecError::UnknownTag(tag.to_string()))
    }

    fn lookup_reverse(&self, code: TagCode) -> Result<TagName> {
        self.name_of(code).cloned().ok_or_else(|| CodecError::unknown_code(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compose() -> TagTable {
        let mut table = TagTable::new();
        table
            .add_page(21, "ComposeMail", &[("SendMail", 0x05), ("Mime", 0x10)])
            .expect("valid page");
        table
    }

    #[test]
    fn lookups_are_bidirectional() {
        let table = compose();
        let code = table.lookup(&"ComposeMail:Mime".into()).expect("known");
        assert_eq!(code, TagCode::new(21, 0x10));
        assert_eq!(table.lookup_reverse(code).expect("known").as_ref(), "ComposeMail:Mime");
        assert_eq!(table.page_name(21), Some("ComposeMail"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn misses_are_unknown_tag() {
        let table = compose();
        assert!(matches!(table.lookup(&"Mime".into()), Err(CodecError::UnknownTag(_))));
        assert!(matches!(
            table.lookup_reverse(TagCode::new(0, 0x05)),
            Err(CodecError::UnknownTag(_))
        ));
    }

    #[test]
    fn rejects_codes_outside_tag_range() {
        let mut table = TagTable::new();
        assert!(matches!(
            table.insert("Wide", TagCode::new(0, 0x40)),
            Err(CodecError::CodeOutOfRange { page: 0, code: 0x40 })
        ));
        assert!(matches!(
            table.insert("Global", TagCode::new(0, 0x03)),
            Err(CodecError::CodeOutOfRange { .. })
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn rejects_duplicate_names_and_codes() {
        let mut table = compose();
        assert!(matches!(
            table.insert("ComposeMail:Mime", TagCode::new(21, 0x11)),
            Err(CodecError::DuplicateTag(_))
        ));
        assert!(matches!(
            table.insert("ComposeMail:Other", TagCode::new(21, 0x10)),
            Err(CodecError::DuplicateTag(_))
        ));
        assert!(matches!(
            table.add_page(21, "Compose", &[]),
            Err(CodecError::DuplicateTag(_))
        ));
    }

    #[test]
    fn entries_are_sorted_by_code() {
        let mut table = compose();
        table.add_page(0, "AirSync", &[("Sync", 0x05)]).expect("page");
        let codes: Vec<_> = table.entries().into_iter().map(|(code, _)| code).collect();
        assert_eq!(
            codes,
            vec![TagCode::new(0, 0x05), TagCode::new(21, 0x05), TagCode::new(21, 0x10)]
        );
    }
}
