//! Comma splitting for list-valued properties

/// Split `raw` on commas not preceded by a backslash.
///
/// `\,` yields a literal comma and the backslash is dropped. A backslash in
/// front of anything else, including a trailing one, is kept as is. No
/// whitespace is trimmed and empty parts are kept, except that an empty
/// input yields no parts at all.
pub fn split_escaped(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&',') => {
                chars.next();
                current.push(',');
            }
            ',' => parts.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    parts.push(current);

    parts
}
