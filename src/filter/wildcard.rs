use regex::{Regex, RegexBuilder};

/// Convert a wildcard pattern into an anchored, case-insensitive regex.
///
/// `*` matches zero or more characters, `_` matches exactly one; everything
/// else matches literally (regex metacharacters are escaped).
pub fn wildcard_regex(pattern: &str) -> Option<Regex> {
    let mut body = String::with_capacity(pattern.len() * 2);
    for c in pattern.chars() {
        match c {
            '*' => body.push_str(".*"),
            '_' => body.push('.'),
            c => body.push_str(&regex::escape(&c.to_string())),
        }
    }

    RegexBuilder::new(&format!("^{}$", body))
        .case_insensitive(true)
        .build()
        .ok()
}
