//! CharacterData storage and editing
//!
//! Data is kept as UTF-16 code units, the unit every offset and length is
//! measured in. An edit may leave an unpaired surrogate behind; it stays in
//! the buffer untouched, so splitting a pair and joining the halves again
//! gives back the original text. Only conversion to a Rust `String`
//! substitutes U+FFFD for unpaired surrogates.
//!
//! Out-of-range offsets are clamped into `[0, length]` instead of rejected,
//! and the edited range is `[clamp(offset), clamp(offset + count))`.

use std::fmt;

use crate::{DomError, DomResult, DomTree, NodeData, NodeId};

/// Character data as UTF-16 code units
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct CharData(Vec<u16>);

impl CharData {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Wrap raw code units, unpaired surrogates included
    pub fn from_units(units: Vec<u16>) -> Self {
        Self(units)
    }

    #[inline]
    pub fn units(&self) -> &[u16] {
        &self.0
    }

    /// Length in code units
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode to a `String`, replacing unpaired surrogates with U+FFFD
    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.0)
    }

    /// Code units `[start, end)`
    pub(crate) fn slice(&self, start: usize, end: usize) -> CharData {
        Self(self.0[start..end].to_vec())
    }

    pub(crate) fn push(&mut self, other: &CharData) {
        self.0.extend_from_slice(&other.0);
    }

    /// Replace code units `[start, end)` with `insert`
    pub(crate) fn splice(&mut self, start: usize, end: usize, insert: &CharData) {
        self.0.splice(start..end, insert.0.iter().copied());
    }

    /// Keep `[0, at)`, returning `[at, len)`
    pub(crate) fn split_off(&mut self, at: usize) -> CharData {
        Self(self.0.split_off(at))
    }
}

impl From<&str> for CharData {
    fn from(s: &str) -> Self {
        Self(s.encode_utf16().collect())
    }
}

impl From<String> for CharData {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<&CharData> for CharData {
    fn from(data: &CharData) -> Self {
        data.clone()
    }
}

impl PartialEq<str> for CharData {
    fn eq(&self, other: &str) -> bool {
        self.0.iter().copied().eq(other.encode_utf16())
    }
}

impl PartialEq<&str> for CharData {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl fmt::Display for CharData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl fmt::Debug for CharData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.to_string_lossy(), f)
    }
}

/// Clamp `offset`/`count` to a code-unit range within `len`
fn clamp_range(len: usize, offset: i64, count: Option<usize>) -> (usize, usize) {
    let clamp = |v: i64| v.clamp(0, len as i64) as usize;
    let start = clamp(offset);
    let end = match count {
        Some(count) => clamp(offset.saturating_add(count.min(i64::MAX as usize) as i64)),
        None => len,
    };
    (start, end.max(start))
}

impl DomTree {
    /// Character data of a Text, CDATA, Comment or PI node
    pub fn data(&self, id: NodeId) -> DomResult<&CharData> {
        self.node(id)?
            .character_data()
            .ok_or(DomError::TypeMismatch { expected: "character data" })
    }

    pub fn set_data(&mut self, id: NodeId, data: impl Into<CharData>) -> DomResult<()> {
        self.data(id)?;
        if let Some(d) = self.node_mut(id).character_data_mut() {
            *d = data.into();
        }
        Ok(())
    }

    /// Length in UTF-16 code units
    pub fn length(&self, id: NodeId) -> DomResult<usize> {
        Ok(self.data(id)?.len())
    }

    pub fn substring_data(
        &self,
        id: NodeId,
        offset: i64,
        count: Option<usize>,
    ) -> DomResult<CharData> {
        let data = self.data(id)?;
        let (start, end) = clamp_range(data.len(), offset, count);
        Ok(data.slice(start, end))
    }

    pub fn append_data(&mut self, id: NodeId, text: impl Into<CharData>) -> DomResult<()> {
        self.data(id)?;
        let text = text.into();
        if let Some(d) = self.node_mut(id).character_data_mut() {
            d.push(&text);
        }
        Ok(())
    }

    pub fn insert_data(
        &mut self,
        id: NodeId,
        offset: i64,
        text: impl Into<CharData>,
    ) -> DomResult<()> {
        self.replace_data(id, offset, Some(0), text)
    }

    pub fn delete_data(&mut self, id: NodeId, offset: i64, count: Option<usize>) -> DomResult<()> {
        self.replace_data(id, offset, count, CharData::new())
    }

    /// Delete the clamped range and insert `text` at its start, in one step
    pub fn replace_data(
        &mut self,
        id: NodeId,
        offset: i64,
        count: Option<usize>,
        text: impl Into<CharData>,
    ) -> DomResult<()> {
        let len = self.data(id)?.len();
        let (start, end) = clamp_range(len, offset, count);
        let text = text.into();
        if start == end && text.is_empty() {
            return Ok(());
        }
        if let Some(d) = self.node_mut(id).character_data_mut() {
            d.splice(start, end, &text);
        }
        Ok(())
    }

    /// Split a Text or CDATA node at `offset`.
    ///
    /// The original keeps the data before the offset; the returned node of
    /// the same kind holds the rest and, if the original is attached, is
    /// inserted right after it.
    pub fn split_text(&mut self, id: NodeId, offset: i64) -> DomResult<NodeId> {
        let is_cdata = match &self.node(id)?.data {
            NodeData::Text(_) => false,
            NodeData::CDataSection(_) => true,
            _ => return Err(DomError::TypeMismatch { expected: "text" }),
        };

        let len = self.data(id)?.len();
        let (start, _) = clamp_range(len, offset, None);
        let tail = match self.node_mut(id).character_data_mut() {
            Some(d) => d.split_off(start),
            None => CharData::new(),
        };

        let doc = self.node_document(id);
        let new_node = self.alloc(
            doc,
            if is_cdata { NodeData::CDataSection(tail) } else { NodeData::Text(tail) },
        );

        let (parent, next) = {
            let node = self.raw(id);
            (node.parent, node.next_sibling)
        };
        if parent.is_valid() {
            self.link_before(parent, new_node, next);
        }
        tracing::trace!("Split {:?} at {} into {:?}", id, start, new_node);
        Ok(new_node)
    }
}
