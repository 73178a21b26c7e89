//! Repair of the appliance's non-conforming collection encoding.
//!
//! Collection members such as `file`, `CryptoCertificate` and `CryptoKey` are
//! rendered as a bare object when exactly one item exists and as an array
//! otherwise. Every response that carries such a member goes through
//! [`wrap_single_item`] on the raw body before it is decoded.

use crate::utils::errors::{AgentError, Result};

/// Wrap every object-valued `"field": {...}` occurrence in `[` `]`.
///
/// Array values, scalar values and string contents are left untouched.
pub fn wrap_single_item(body: &str, field: &str) -> Result<String> {
    let bytes = body.as_bytes();
    let mut out = String::with_capacity(body.len() + 8);
    let mut cursor = 0;

    while let Some(value_start) = find_member_value(body, field, cursor) {
        if bytes[value_start] != b'{' {
            out.push_str(&body[cursor..value_start]);
            cursor = value_start;
            continue;
        }

        let value_end = matching_brace(body, value_start).ok_or_else(|| {
            AgentError::MalformedResponse(format!("unbalanced object for member \"{field}\""))
        })?;

        out.push_str(&body[cursor..value_start]);
        out.push('[');
        out.push_str(&body[value_start..=value_end]);
        out.push(']');
        cursor = value_end + 1;
    }

    out.push_str(&body[cursor..]);
    Ok(out)
}

/// True when the body carries a top-level style `"field":` member anywhere
pub fn has_member(body: &str, field: &str) -> bool {
    find_member_value(body, field, 0).is_some()
}

/// Appliance wording for an empty configuration listing
pub fn is_empty_listing(body: &str) -> bool {
    body.contains("No configuration retrieved")
}

/// Byte offset of the first non-whitespace character after `"field" :`, searching from `from`
fn find_member_value(body: &str, field: &str, from: usize) -> Option<usize> {
    let needle = format!("\"{field}\"");
    let bytes = body.as_bytes();
    let mut search = from;

    while let Some(rel) = body.get(search..)?.find(&needle) {
        let key_end = search + rel + needle.len();
        let colon = skip_whitespace(bytes, key_end);
        if colon < bytes.len() && bytes[colon] == b':' {
            let value = skip_whitespace(bytes, colon + 1);
            if value < bytes.len() {
                return Some(value);
            }
            return None;
        }
        search = key_end;
    }

    None
}

fn skip_whitespace(bytes: &[u8], mut index: usize) -> usize {
    while index < bytes.len() && bytes[index].is_ascii_whitespace() {
        index += 1;
    }
    index
}

/// Index of the `}` closing the object opened at `open`, honouring strings and escapes
fn matching_brace(body: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in body.as_bytes()[open..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }

    None
}
