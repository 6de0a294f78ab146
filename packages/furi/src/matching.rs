//! Wildcard matching of a fURI against a pattern.
//!
//! `+` matches exactly one value (an authority field or a path segment) and `#` matches everything
//! from its position on. Matching is asymmetric: the receiver is the subject, the argument is the
//! pattern. Branch/node form is significant at a trailing `+`, mirroring MQTT topic filters.

use crate::furi::Furi;

enum Field {
    Matched,
    Continue,
    Failed,
}

fn match_field(subject: Option<&str>, pattern: Option<&str>, must_exist: bool) -> Field {
    let subject = subject.unwrap_or("");
    let pattern = pattern.unwrap_or("");
    if pattern == "#" {
        return Field::Matched;
    }
    if must_exist && subject.is_empty() && !pattern.is_empty() {
        return Field::Failed;
    }
    if pattern != "+" && subject != pattern {
        return Field::Failed;
    }
    Field::Continue
}

impl Furi {
    /// True if the text contains a `+` or `#` wildcard anywhere.
    pub fn is_pattern(&self) -> bool {
        let text = self.to_string();
        text.contains('#') || text.contains('+')
    }

    /// True if any path segment contains `wildcard`.
    pub fn has_wildcard(&self, wildcard: char) -> bool {
        self.segments.iter().any(|s| s.contains(wildcard))
    }

    /// Match this fURI against `pattern`.
    ///
    /// ```rust
    /// use fhatos_furi::furi;
    ///
    /// assert!(furi!("/soc/pin/1").matches(&furi!("/soc/pin/+")));
    /// assert!(furi!("a/b/c/d").matches(&furi!("a/#")));
    /// assert!(!furi!("a/b/x/c").matches(&furi!("a/+/c")));
    /// assert!(furi!("/fhatos/:name").matches(&furi!(":name")));
    /// ```
    pub fn matches(&self, pattern: &Furi) -> bool {
        if self == pattern {
            return true;
        }
        let pattern_text = pattern.to_string();
        if pattern_text.starts_with(':') {
            return self.name() == pattern_text;
        }
        if pattern_text == "#" {
            return true;
        }
        if !pattern_text.contains('+') && !pattern_text.contains('#') {
            return self.to_string() == pattern_text;
        }
        let fields = [
            (self.scheme(), pattern.scheme(), true),
            (self.host(), pattern.host(), true),
            (self.user(), pattern.user(), false),
            (self.password(), pattern.password(), false),
        ];
        for (subject, wanted, must_exist) in fields {
            match match_field(subject, wanted, must_exist) {
                Field::Matched => return true,
                Field::Failed => return false,
                Field::Continue => {}
            }
        }
        let last = pattern.segments.len().saturating_sub(1);
        for (i, wanted) in pattern.segments.iter().enumerate() {
            if wanted == "#" {
                return true;
            }
            if i == 0 && self.sprefix != pattern.sprefix {
                return false;
            }
            if wanted == "+" {
                if self.segment(i) == "#" {
                    return false;
                }
                if i == last && self.is_branch() != pattern.is_branch() {
                    return false;
                }
                if self.segments.len() <= i && self.spostfix {
                    return true;
                }
            }
            if self.segments.len() <= i {
                return false;
            }
            let segment = self.segment(i);
            if (segment.is_empty() && !wanted.is_empty()) || (wanted != "+" && segment != wanted) {
                return false;
            }
        }
        let query_ok = match pattern.query() {
            None | Some("") => true,
            Some(query) => self.query() == Some(query),
        };
        query_ok && self.segments.len() == pattern.segments.len()
    }

    /// `self.matches(other) || other.matches(self)`
    pub fn bimatches(&self, other: &Furi) -> bool {
        self.matches(other) || other.matches(self)
    }

    /// Strictly narrower than `pattern`.
    pub fn is_subpattern(&self, pattern: &Furi) -> bool {
        self.matches(pattern) && !pattern.matches(self)
    }
}
