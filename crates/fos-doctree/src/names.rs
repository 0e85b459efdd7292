//! Name & Namespace Validation
//!
//! Pure checks gating every node-creation entry point. Character classes
//! follow the XML 1.0 (Fifth Edition) `Name` production; qualified names
//! follow Namespaces in XML 1.0 `QName`.

use crate::{DomError, DomResult};

/// The fixed XML namespace URI bound to the `xml` prefix
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// The fixed namespace URI for namespace declarations
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9'
            | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

/// `Name` production without the colon
fn is_ncname(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c != ':' && is_name_start_char(c) => {}
        _ => return false,
    }
    chars.all(|c| c != ':' && is_name_char(c))
}

/// Check that `name` is a legal XML name
///
/// Rejects empty names, characters outside the `Name` production, and
/// names made of more than two colon-separated parts.
pub fn validate_name(name: &str) -> DomResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => is_name_start_char(first) && chars.all(is_name_char),
        None => false,
    };
    if !valid || name.split(':').count() > 2 {
        return Err(DomError::InvalidCharacter(format!(
            "\"{name}\" is not a valid name"
        )));
    }
    Ok(())
}

/// Check that `name` matches the `QName` production
pub fn validate_qname(name: &str) -> DomResult<()> {
    let valid = match name.split_once(':') {
        Some((prefix, local)) => is_ncname(prefix) && is_ncname(local),
        None => is_ncname(name),
    };
    if !valid {
        return Err(DomError::InvalidCharacter(format!(
            "\"{name}\" is not a valid qualified name"
        )));
    }
    Ok(())
}

/// Validate a (namespace, qualified name) pair and split it
///
/// Returns the namespace (empty string normalized to `None`), the prefix
/// and the local name.
pub fn validate_qualified_name<'a>(
    namespace: Option<&'a str>,
    qualified_name: &'a str,
) -> DomResult<(Option<&'a str>, Option<&'a str>, &'a str)> {
    let namespace = namespace.filter(|ns| !ns.is_empty());

    validate_qname(qualified_name)?;

    let (prefix, local_name) = match qualified_name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qualified_name),
    };

    if prefix.is_some() && namespace.is_none() {
        return Err(DomError::Namespace(format!(
            "prefix in \"{qualified_name}\" requires a namespace"
        )));
    }

    if prefix == Some("xml") && namespace != Some(XML_NAMESPACE) {
        return Err(DomError::Namespace(
            "the xml prefix is bound to the XML namespace".to_string(),
        ));
    }

    let is_xmlns = qualified_name == "xmlns" || prefix == Some("xmlns");
    if is_xmlns && namespace != Some(XMLNS_NAMESPACE) {
        return Err(DomError::Namespace(
            "xmlns names are bound to the XMLNS namespace".to_string(),
        ));
    }

    if namespace == Some(XMLNS_NAMESPACE) && !is_xmlns {
        return Err(DomError::Namespace(
            "the XMLNS namespace is reserved for xmlns names".to_string(),
        ));
    }

    Ok((namespace, prefix, local_name))
}
