//! Path rewriting: replace the first match of a rule's prefix pattern.
//!
//! The prefix is compiled as a regular expression exactly as written, so
//! `/(api-v2|api)` matches either segment. Replacement text understands the
//! usual string-replace patterns: `$$`, `$&`, `` $` ``, `$'`, `$1`-`$99`
//! and `$<name>`.

use regex::{Captures, Regex};
use serde::ser::{Serialize, SerializeStruct, Serializer};

#[derive(Debug, Clone)]
pub struct PathRewrite {
    pattern: Regex,
    replacement: String,
}

impl PathRewrite {
    pub fn new(prefix: &str, replacement: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(prefix)?,
            replacement: replacement.into(),
        })
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    #[must_use]
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Rewrite `path`, leaving it unchanged when the pattern does not match.
    #[must_use]
    pub fn apply(&self, path: &str) -> String {
        let Some(caps) = self.pattern.captures(path) else {
            return path.to_string();
        };
        let Some(whole) = caps.get(0) else {
            return path.to_string();
        };

        let mut out = String::with_capacity(path.len() + self.replacement.len());
        out.push_str(&path[..whole.start()]);
        if self.replacement.contains('$') {
            self.expand_into(&caps, path, &mut out);
        } else {
            out.push_str(&self.replacement);
        }
        out.push_str(&path[whole.end()..]);
        out
    }

    /// The rewrite as a plain closure, the shape host tools expect.
    pub fn as_fn(&self) -> impl Fn(&str) -> String + Send + Sync + '_ {
        move |path| self.apply(path)
    }

    fn expand_into(&self, caps: &Captures<'_>, haystack: &str, out: &mut String) {
        let rep = self.replacement.as_str();
        let bytes = rep.as_bytes();
        let group_count = caps.len() - 1;
        let has_names = self.pattern.capture_names().flatten().next().is_some();
        let (start, end) = caps.get(0).map_or((0, 0), |m| (m.start(), m.end()));

        let mut i = 0;
        let mut literal_from = 0;
        while i < bytes.len() {
            if bytes[i] != b'$' || i + 1 >= bytes.len() {
                i += 1;
                continue;
            }
            out.push_str(&rep[literal_from..i]);
            let next = bytes[i + 1];
            let consumed = match next {
                b'$' => {
                    out.push('$');
                    2
                }
                b'&' => {
                    out.push_str(&haystack[start..end]);
                    2
                }
                b'`' => {
                    out.push_str(&haystack[..start]);
                    2
                }
                b'\'' => {
                    out.push_str(&haystack[end..]);
                    2
                }
                b'0'..=b'9' => {
                    let one = usize::from(next - b'0');
                    let two = bytes
                        .get(i + 2)
                        .filter(|b| b.is_ascii_digit())
                        .map(|b| one * 10 + usize::from(b - b'0'));
                    match two {
                        Some(n) if (1..=group_count).contains(&n) => {
                            push_group(out, caps, n);
                            3
                        }
                        _ if (1..=group_count).contains(&one) => {
                            push_group(out, caps, one);
                            2
                        }
                        _ => {
                            out.push('$');
                            1
                        }
                    }
                }
                b'<' if has_names => match rep[i + 2..].find('>') {
                    Some(close) => {
                        let name = &rep[i + 2..i + 2 + close];
                        if let Some(m) = caps.name(name) {
                            out.push_str(m.as_str());
                        }
                        close + 3
                    }
                    None => {
                        out.push('$');
                        1
                    }
                },
                _ => {
                    out.push('$');
                    1
                }
            };
            i += consumed;
            literal_from = i;
        }
        out.push_str(&rep[literal_from..]);
    }
}

fn push_group(out: &mut String, caps: &Captures<'_>, index: usize) {
    // A group that did not participate expands to nothing.
    if let Some(m) = caps.get(index) {
        out.push_str(m.as_str());
    }
}

impl PartialEq for PathRewrite {
    fn eq(&self, other: &Self) -> bool {
        self.pattern.as_str() == other.pattern.as_str() && self.replacement == other.replacement
    }
}

impl Serialize for PathRewrite {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PathRewrite", 2)?;
        state.serialize_field("pattern", self.pattern.as_str())?;
        state.serialize_field("replacement", &self.replacement)?;
        state.end()
    }
}
