//! String Interner - Deduplicate names across the tree
//!
//! Local names, prefixes, namespace URIs and PI targets repeat heavily in
//! real documents. Each distinct string is stored once and referenced by a
//! 4-byte handle.

use std::collections::HashMap;

use crate::names::{XMLNS_NAMESPACE, XML_NAMESPACE};

/// Interned string ID - just 4 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct InternedString(pub u32);

impl InternedString {
    /// Empty string
    pub const EMPTY: InternedString = InternedString(0);
    /// The `xml` prefix
    pub const XML: InternedString = InternedString(1);
    /// The `xmlns` prefix (and qualified name)
    pub const XMLNS: InternedString = InternedString(2);
    /// The fixed XML namespace URI
    pub const XML_NS: InternedString = InternedString(3);
    /// The fixed XMLNS namespace URI
    pub const XMLNS_NS: InternedString = InternedString(4);
}

/// Offset and length of one interned string
#[derive(Debug, Clone, Copy)]
struct StringEntry {
    offset: u32,
    len: u32,
}

/// String interner for deduplicating names
///
/// All strings are stored in one contiguous buffer; lengths are kept
/// separately so any content (including `\0`) round-trips.
#[derive(Debug, Clone)]
pub struct StringInterner {
    buffer: String,
    map: HashMap<Box<str>, u32>,
    entries: Vec<StringEntry>,
}

impl StringInterner {
    /// Create a new interner with the reserved XML names pre-interned
    pub fn new() -> Self {
        let mut interner = Self {
            buffer: String::with_capacity(1024),
            map: HashMap::with_capacity(64),
            entries: Vec::with_capacity(64),
        };

        // Order must match the InternedString constants
        for reserved in ["", "xml", "xmlns", XML_NAMESPACE, XMLNS_NAMESPACE] {
            interner.intern(reserved);
        }

        interner
    }

    /// Intern a string, returning its ID
    pub fn intern(&mut self, s: &str) -> InternedString {
        if let Some(&index) = self.map.get(s) {
            return InternedString(index);
        }

        let index = self.entries.len() as u32;
        let offset = self.buffer.len() as u32;
        self.buffer.push_str(s);
        self.entries.push(StringEntry {
            offset,
            len: s.len() as u32,
        });
        self.map.insert(s.into(), index);

        InternedString(index)
    }

    /// Look up a string without interning it
    pub fn lookup(&self, s: &str) -> Option<InternedString> {
        self.map.get(s).map(|&index| InternedString(index))
    }

    /// Get the string for an interned ID
    #[inline]
    pub fn get(&self, id: InternedString) -> &str {
        match self.entries.get(id.0 as usize) {
            Some(entry) => {
                let start = entry.offset as usize;
                &self.buffer[start..start + entry.len as usize]
            }
            None => "",
        }
    }

    /// Number of interned strings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
