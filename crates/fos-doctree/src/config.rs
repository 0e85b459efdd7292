//! Tree Configuration

/// Document tree configuration options
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Number of arena slots reserved up front
    pub initial_capacity: usize,

    /// Also enforce doctype-before-element ordering inside a Document.
    ///
    /// Off by default: a Document only rejects a second Element or a second
    /// DocumentType child, whatever order the caller inserts them in.
    pub enforce_doctype_order: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
            enforce_doctype_order: false,
        }
    }
}
