//! Small text utilities shared by the parser and the composition operations.

/// Split `text` on `split`, dropping empty tokens.
pub fn tokenize(split: char, text: &str) -> Vec<String> {
    text.split(split)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// True when `text` is a non-empty run of ASCII digits.
pub fn is_integer(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Characters the fURI parser keeps. Everything else (non-ASCII, whitespace, control) is skipped.
pub fn is_furi_char(c: char) -> bool {
    c.is_ascii_graphic()
}

/// Remove the first (`forward`) or last occurrence of `search` from `text`.
pub fn remove_once(text: &str, search: &str, forward: bool) -> String {
    if search.is_empty() {
        return text.to_string();
    }
    let found = if forward {
        text.find(search)
    } else {
        text.rfind(search)
    };
    match found {
        Some(at) => {
            let mut out = String::with_capacity(text.len() - search.len());
            out.push_str(&text[..at]);
            out.push_str(&text[at + search.len()..]);
            out
        }
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_skips_empty_tokens() {
        assert_eq!(tokenize('/', "a//b/"), vec!["a", "b"]);
        assert_eq!(tokenize('&', "x=1&y=2"), vec!["x=1", "y=2"]);
        assert!(tokenize('/', "").is_empty());
    }

    #[test]
    fn integers_are_digit_runs() {
        assert!(is_integer("8080"));
        assert!(!is_integer(""));
        assert!(!is_integer("-1"));
        assert!(!is_integer("80a"));
    }

    #[test]
    fn skipped_characters() {
        assert!(is_furi_char('a'));
        assert!(is_furi_char('/'));
        assert!(!is_furi_char(' '));
        assert!(!is_furi_char('\n'));
        assert!(!is_furi_char('é'));
    }

    #[test]
    fn remove_once_in_both_directions() {
        assert_eq!(remove_once("a/b/a/b", "a/", true), "b/a/b");
        assert_eq!(remove_once("a/b/a/b", "a/", false), "a/b/b");
        assert_eq!(remove_once("a/b", "zz", true), "a/b");
    }
}
