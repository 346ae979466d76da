//! Token and name syntax shared by arguments and flags.

use std::sync::LazyLock;

use regex::Regex;

static FLAG_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-([a-zA-Z])$|^--([a-zA-Z][a-zA-Z]+)$").expect("static regex must compile")
});
static FLAG_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+$").expect("static regex must compile"));
static VAR_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-zA-Z\-_]+$").expect("static regex must compile"));
static CONSTANT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^-\s]").expect("static regex must compile"));

/// Returns the flag name a token refers to, if the token has flag syntax.
///
/// One-letter names use a single dash (`-x`), longer names two (`--xx`).
/// Anything else, including `--x` and `-xx`, is not a flag.
pub fn flag_name(token: &str) -> Option<&str> {
    let caps = FLAG_TOKEN_RE.captures(token)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

/// Returns `true` when the token has flag syntax.
pub fn looks_like_flag(token: &str) -> bool {
    FLAG_TOKEN_RE.is_match(token)
}

/// Renders a flag name the way it is typed on the command line.
pub fn render_flag(name: &str) -> String {
    if name.chars().count() == 1 {
        format!("-{name}")
    } else {
        format!("--{name}")
    }
}

pub fn is_valid_flag_name(name: &str) -> bool {
    FLAG_NAME_RE.is_match(name)
}

pub fn is_valid_var_name(name: &str) -> bool {
    VAR_NAME_RE.is_match(name)
}

/// Constants need at least one character that is neither a dash nor
/// whitespace.
pub fn is_valid_constant(text: &str) -> bool {
    CONSTANT_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_name_extraction() {
        assert_eq!(flag_name("-x"), Some("x"));
        assert_eq!(flag_name("--xx"), Some("xx"));
        assert_eq!(flag_name("--verbose"), Some("verbose"));
        assert_eq!(flag_name("--x"), None);
        assert_eq!(flag_name("-xx"), None);
        assert_eq!(flag_name("x"), None);
        assert_eq!(flag_name("-1"), None);
        assert_eq!(flag_name("--"), None);
    }

    #[test]
    fn test_render_flag() {
        assert_eq!(render_flag("v"), "-v");
        assert_eq!(render_flag("verbose"), "--verbose");
    }

    #[test]
    fn test_names() {
        assert!(is_valid_var_name("file_name-2"));
        assert!(!is_valid_var_name("file name"));
        assert!(!is_valid_var_name(""));
        assert!(is_valid_flag_name("abc"));
        assert!(!is_valid_flag_name("a1"));
        assert!(is_valid_constant("run"));
        assert!(!is_valid_constant("--"));
        assert!(!is_valid_constant("  "));
        assert!(!is_valid_constant(""));
    }
}
