//! Path composition: every operation here builds a new [`Furi`] from an existing one.

use std::mem::take;

use crate::error::FuriError;
use crate::furi::{Furi, COMPONENT_SEPARATOR};
use crate::string_helper;

impl Furi {
    fn pathless(&self) -> Furi {
        let mut furi = self.clone();
        furi.segments.clear();
        furi.spostfix = false;
        furi.sprefix = furi.scheme.is_some()
            || furi.host.is_some()
            || furi.user.is_some()
            || furi.password.is_some();
        furi
    }

    /// Replace the path by splitting `path` on `/`.
    ///
    /// Leading slashes set `sprefix`, a trailing slash sets `spostfix`. A scheme or a host always
    /// roots the path. Splitting stops at the first whitespace or non-ASCII character.
    pub fn with_path(&self, path: &str) -> Furi {
        let path = path.trim();
        let mut furi = self.pathless();
        let mut segment = String::new();
        for c in path.chars() {
            if c.is_whitespace() || !c.is_ascii() {
                break;
            }
            if c == '/' {
                if segment.is_empty() && furi.segments.is_empty() {
                    furi.sprefix = true;
                } else {
                    furi.segments.push(take(&mut segment));
                }
            } else {
                segment.push(c);
            }
        }
        if segment.is_empty() {
            furi.spostfix = !path.is_empty();
        } else {
            furi.segments.push(segment);
            furi.spostfix = false;
        }
        if path.ends_with('/') {
            furi.spostfix = true;
        }
        if furi.host.is_some() || furi.scheme.is_some() {
            furi.sprefix = true;
        }
        furi
    }

    /// Replace segment `index` with the text of `replacement`. An index past the end leaves the
    /// path unchanged, except that an empty path takes the replacement at index 0.
    pub fn with_segment(&self, index: usize, replacement: &Furi) -> Furi {
        if index == 0 && self.segments.is_empty() {
            return self.with_path(&replacement.to_string());
        }
        if index >= self.segments.len() {
            return self.clone();
        }
        let mut path = String::new();
        if self.sprefix {
            path.push('/');
        }
        let last = self.segments.len().saturating_sub(1);
        for (i, segment) in self.segments.iter().enumerate() {
            if i == index {
                path.push_str(&replacement.to_string());
            } else {
                path.push_str(segment);
            }
            if i < last {
                path.push('/');
            }
        }
        if self.spostfix {
            path.push('/');
        }
        self.with_path(&path)
    }

    /// Append a path extension. An empty extension turns this fURI into a branch.
    ///
    /// ```rust
    /// use fhatos_furi::furi;
    ///
    /// assert_eq!(furi!("//127.0.0.1").extend("a").extend("b"), furi!("//127.0.0.1/a/b"));
    /// assert_eq!(furi!("a/b/").extend("c"), furi!("a/b/c"));
    /// assert_eq!(furi!("/a").extend(""), furi!("/a/"));
    /// ```
    pub fn extend(&self, extension: &str) -> Furi {
        if extension.is_empty() {
            return self.as_branch();
        }
        if self.host.as_deref() == Some("") && self.segments.is_empty() {
            let parts = string_helper::tokenize('/', extension);
            let mut furi = self.clone();
            if let Some(first) = parts.first() {
                furi.host = Some(first.clone());
            }
            if parts.len() > 1 {
                furi.sprefix = true;
            }
            for part in parts.iter().skip(1) {
                furi = furi.extend(part);
            }
            if extension.ends_with('/') {
                furi.spostfix = true;
            }
            return furi;
        }
        let path = self.path();
        if path.is_empty() || path == "/" {
            let mut furi = self.with_path(extension);
            furi.sprefix = true;
            return furi;
        }
        let mut new_path = path;
        if !self.spostfix && !extension.starts_with('/') {
            new_path.push('/');
        }
        new_path.push_str(extension);
        self.with_path(&new_path)
    }

    /// Append the path of `other`.
    pub fn extend_furi(&self, other: &Furi) -> Furi {
        self.extend(&other.path())
    }

    /// Drop the last segment.
    pub fn retract(&self) -> Furi {
        self.retract_n(1)
    }

    /// Drop the last `steps` segments. A dangling `::` is dropped along with them.
    pub fn retract_n(&self, steps: usize) -> Furi {
        if steps == 0 {
            return self.clone();
        }
        let keep = self.segments.len().saturating_sub(steps);
        let mut furi = if self.segments.is_empty() {
            self.pathless()
        } else {
            self.clone()
        };
        furi.segments.truncate(keep);
        let dangling = furi.segments.last().map(String::as_str) == Some(COMPONENT_SEPARATOR);
        if furi.segments.len() > 1 && dangling {
            furi.retract()
        } else {
            furi
        }
    }

    /// Drop `postfix`'s segments from the end, if this fURI ends with them.
    pub fn retract_postfix(&self, postfix: &Furi) -> Furi {
        if self.ends_with(postfix) {
            self.retract_n(postfix.segments.len())
        } else {
            self.clone()
        }
    }

    /// Drop the first segment.
    pub fn pretract(&self) -> Furi {
        self.pretract_n(1)
    }

    /// Drop the first `steps` segments. The result is never rooted.
    pub fn pretract_n(&self, steps: usize) -> Furi {
        if steps == 0 {
            return self.clone();
        }
        let mut furi = self.pathless();
        if steps < self.segments.len() {
            furi.segments = self.segments[steps..].to_vec();
            furi.spostfix = self.spostfix;
        } else {
            furi.spostfix = false;
        }
        furi.sprefix = false;
        if furi.segments.len() > 1 && furi.segments[0] == COMPONENT_SEPARATOR {
            furi.pretract()
        } else {
            furi
        }
    }

    /// Drop `prefix`'s segments from the front, if this fURI starts with them.
    pub fn pretract_prefix(&self, prefix: &Furi) -> Furi {
        if self.starts_with(prefix) {
            self.pretract_n(prefix.segments.len())
        } else {
            self.clone()
        }
    }

    /// Insert a path in front of this one. A rooted fURI stays rooted.
    pub fn prepend(&self, extension: &str) -> Furi {
        if extension.is_empty() {
            let mut furi = self.clone();
            furi.sprefix = true;
            return furi;
        }
        let old_path = self.path();
        let mut new_path = extension.to_string();
        if !old_path.starts_with('/') && !new_path.ends_with('/') {
            new_path.push('/');
        }
        if old_path.starts_with('/') && new_path.ends_with('/') {
            new_path.push_str(&old_path[1..]);
        } else {
            new_path.push_str(&old_path);
        }
        let mut furi = self.with_path(&new_path);
        if self.sprefix {
            furi.sprefix = true;
        }
        furi
    }

    pub fn prepend_furi(&self, other: &Furi) -> Furi {
        self.prepend(&other.path())
    }

    pub fn starts_with(&self, prefix: &Furi) -> bool {
        self.sprefix == prefix.sprefix && self.segments.starts_with(&prefix.segments)
    }

    pub fn ends_with(&self, postfix: &Furi) -> bool {
        self.spostfix == postfix.spostfix && self.segments.ends_with(&postfix.segments)
    }

    /// The first segment as its own fURI.
    pub fn head(&self) -> Furi {
        if self.empty() {
            return self.clone();
        }
        Furi::default().with_path(self.segment(0))
    }

    /// Truncate the path at the first `+` or `#` segment.
    pub fn retract_pattern(&self) -> Furi {
        match self.segments.iter().position(|s| s == "+" || s == "#") {
            Some(at) => {
                let mut furi = self.clone();
                furi.segments.truncate(at);
                furi
            }
            None => self.clone(),
        }
    }

    /// Drop the leading `/`.
    pub fn as_relative(&self) -> Furi {
        let mut furi = self.clone();
        furi.sprefix = false;
        furi
    }

    /// Remove the first (`forward`) or last occurrence of `subpath` from the rendered text.
    pub fn remove_subpath(&self, subpath: &str, forward: bool) -> Result<Furi, FuriError> {
        Furi::parse(&string_helper::remove_once(
            &self.to_string(),
            subpath,
            forward,
        ))
    }

    /// Textual concatenation, re-parsed.
    pub fn append(&self, other: &Furi) -> Result<Furi, FuriError> {
        Furi::parse(&format!("{}{}", self, other))
    }

    pub fn has_components(&self) -> bool {
        self.segments.iter().any(|s| s == COMPONENT_SEPARATOR)
    }

    /// `self::component`
    pub fn add_component(&self, component: &Furi) -> Furi {
        self.extend(COMPONENT_SEPARATOR).extend_furi(component)
    }

    /// Split the path on `::`. The first component keeps the leading `/`.
    ///
    /// ```rust
    /// use fhatos_furi::furi;
    ///
    /// let parts = furi!("/mmadt/int::zero").components();
    /// assert_eq!(parts, vec![furi!("/mmadt/int"), furi!("zero")]);
    /// ```
    pub fn components(&self) -> Vec<Furi> {
        let mut components = vec![Furi::default()];
        for (i, segment) in self.segments.iter().enumerate() {
            if segment == COMPONENT_SEPARATOR {
                components.push(Furi::default());
                continue;
            }
            let current = components.pop().unwrap_or_default();
            let next = if current.empty() {
                let root = if i == 0 && self.sprefix { "/" } else { "" };
                Furi::default().with_path(&format!("{}{}", root, segment))
            } else {
                current.extend(segment)
            };
            components.push(next);
        }
        if components.last().is_some_and(Furi::empty) {
            components.pop();
        }
        components
    }

    /// Resolve `other` against this fURI.
    ///
    /// A plain relative path replaces the last segment unless this fURI is a branch. A path with
    /// `.` or `..` segments is folded onto this path as it stands, so `/a/b` with `../c/d` gives
    /// `/a/c/d`. A `:` boundary on either side concatenates the texts directly
    /// (`abc` + `:loop` = `abc:loop`), and a scheme path with a different scheme is appended as a
    /// literal suffix.
    ///
    /// ```rust
    /// use fhatos_furi::furi;
    ///
    /// assert_eq!(furi!("/a/b").resolve(&furi!("../c/d")).unwrap(), furi!("/a/c/d"));
    /// assert_eq!(furi!("/a/b").resolve(&furi!("c")).unwrap(), furi!("/a/c"));
    /// ```
    pub fn resolve(&self, other: &Furi) -> Result<Furi, FuriError> {
        if self.is_pattern() && other.matches(self) {
            return Ok(other.clone());
        }
        let other_query = other.query().unwrap_or("");
        let other_text = other.to_string();
        if other_text.starts_with(':') || self.to_string().ends_with(':') {
            let joined = format!("{}{}", self.retract_pattern(), other_text);
            return Ok(Furi::parse(&joined)?.with_query(other_query));
        }
        if other.is_scheme_path() {
            let literal = match &self.scheme {
                None if other.sprefix => return Ok(other.clone()),
                None => true,
                Some(scheme) => other.scheme.as_ref() != Some(scheme),
            };
            if literal {
                return Ok(self
                    .retract_pattern()
                    .extend(&other_text)
                    .with_query(other_query));
            }
        }
        if other.segments.is_empty() {
            return Ok(self.clone());
        }
        let path = self.path();
        let end_slash = path.ends_with('/') || self.spostfix;
        let start_slash = path.starts_with('/') || self.sprefix;
        let other_path = other.path();
        if !other_path.contains('.') {
            let other_rooted = other_path.starts_with('/');
            let resolved = if end_slash || self.segments.is_empty() {
                if other_rooted {
                    self.with_path(&other_path)
                } else {
                    self.extend(&other_path)
                }
            } else if other_rooted {
                self.with_path(&other_path)
            } else if self.segments.len() == 1 {
                if start_slash {
                    self.with_path(&format!("/{}", other_path))
                } else {
                    self.with_path(&other_path)
                }
            } else {
                self.retract().extend(&other_path)
            };
            return Ok(resolved.with_query(other_query));
        }
        // dot segments walk from this path itself, so `..` steps to its parent
        let mut resolved = self.clone();
        let last = other.segments.len() - 1;
        for (i, segment) in other.segments.iter().enumerate() {
            if segment == ".." {
                if resolved.has_path() {
                    resolved = resolved.retract();
                }
            } else if segment != "." {
                resolved = resolved.extend(segment);
            }
            if i == last {
                resolved.spostfix = other.spostfix;
            }
        }
        Ok(resolved.with_query(other_query))
    }
}
