//! Text normalization

/// Convert a camel-case name into lower-case words separated by underscores.
///
/// An underscore goes before every upper-case letter that follows a
/// lower-case one, or that starts a new word (is followed by something other
/// than an upper-case letter). Leading and trailing underscores are dropped.
pub fn normalize_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut normalized = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let after_lower = i > 0 && chars[i - 1].is_ascii_lowercase();
            let starts_word = chars
                .get(i + 1)
                .is_some_and(|next| !next.is_ascii_uppercase());

            if after_lower || starts_word {
                normalized.push('_');
            }
        }

        normalized.extend(c.to_lowercase());
    }

    normalized.trim_matches('_').to_string()
}
