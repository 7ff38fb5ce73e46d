//! Session identifier shape validation.

/// Check whether a string is a canonical dashed UUID (8-4-4-4-12 hex).
///
/// Tools that key sessions by UUID are validated against this shape before
/// an id is trusted; braced, URN, and undashed forms are rejected.
pub fn is_canonical_uuid(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    for (i, b) in bytes.iter().enumerate() {
        match i {
            8 | 13 | 18 | 23 => {
                if *b != b'-' {
                    return false;
                }
            }
            _ => {
                if !b.is_ascii_hexdigit() {
                    return false;
                }
            }
        }
    }
    uuid::Uuid::parse_str(s).is_ok()
}

/// Find the first canonical UUID substring in `s`, if any.
///
/// Used for session ids embedded in longer filenames, e.g.
/// `rollout-2024-05-01T12-00-00-<uuid>`.
pub fn extract_uuid(s: &str) -> Option<String> {
    if s.len() < 36 {
        return None;
    }
    for start in 0..=s.len() - 36 {
        if !s.is_char_boundary(start) || !s.is_char_boundary(start + 36) {
            continue;
        }
        let window = &s[start..start + 36];
        if is_canonical_uuid(window) {
            return Some(window.to_string());
        }
    }
    None
}
