//! Slash-separated key names.

use std::fmt;
use std::str::FromStr;

/// The name of a key: an ordered list of path segments.
///
/// Names order segment by segment, so a name sorts directly before
/// everything below it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct KeyName {
    segments: Vec<String>,
}

impl KeyName {
    /// Parse a name such as `user:/tests/toml`.
    ///
    /// Segments are separated by `/`; `\/` and `\\` escape a literal slash
    /// or backslash. Empty segments are dropped except a leading one, which
    /// keeps cascading names like `/tests` distinct from `tests`.
    pub fn parse(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(escaped) => current.push(escaped),
                    None => current.push('\\'),
                },
                '/' => {
                    if !current.is_empty() || segments.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
                c => current.push(c),
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        Self { segments }
    }

    /// Build a name from raw (unescaped) segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// The raw segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the name has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a segment.
    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    /// A new name with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> KeyName {
        let mut child = self.clone();
        child.push(segment);
        child
    }

    /// The name with its last segment removed.
    pub fn parent(&self) -> Option<KeyName> {
        let (_, rest) = self.segments.split_last()?;
        Some(KeyName {
            segments: rest.to_vec(),
        })
    }

    /// The last segment.
    pub fn base_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Whether `self` lies strictly below `ancestor`.
    pub fn is_below(&self, ancestor: &KeyName) -> bool {
        self.segments.len() > ancestor.segments.len() && self.segments.starts_with(&ancestor.segments)
    }

    /// Whether `self` equals `ancestor` or lies below it.
    pub fn is_below_or_same(&self, ancestor: &KeyName) -> bool {
        self.segments.starts_with(&ancestor.segments)
    }

    /// The segments of `self` after `ancestor`, if `self` is below or equal to it.
    pub fn relative_to(&self, ancestor: &KeyName) -> Option<&[String]> {
        if self.is_below_or_same(ancestor) {
            Some(&self.segments[ancestor.segments.len()..])
        } else {
            None
        }
    }
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str("/")?;
            }
            for c in segment.chars() {
                if c == '/' || c == '\\' {
                    f.write_str("\\")?;
                }
                write!(f, "{c}")?;
            }
        }
        // a bare namespace like `user:` is written `user:/`
        if let [only] = self.segments.as_slice()
            && only.ends_with(':')
        {
            f.write_str("/")?;
        }
        Ok(())
    }
}

impl FromStr for KeyName {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(KeyName::parse(s))
    }
}

impl From<&str> for KeyName {
    fn from(s: &str) -> Self {
        KeyName::parse(s)
    }
}

/// The segment naming array element `index`.
///
/// Indices sort lexically in numeric order: `#0`..`#9`, then `#_10`..`#_99`,
/// `#__100`, one underscore per digit beyond the first.
pub fn array_index(index: usize) -> String {
    let digits = index.to_string();
    let mut segment = String::with_capacity(digits.len() * 2);
    segment.push('#');
    for _ in 1..digits.len() {
        segment.push('_');
    }
    segment.push_str(&digits);
    segment
}

/// Parse a segment produced by [`array_index`].
pub fn parse_array_index(segment: &str) -> Option<usize> {
    let rest = segment.strip_prefix('#')?;
    let digits = rest.trim_start_matches('_');
    let underscores = rest.len() - digits.len();
    if digits.is_empty()
        || digits.len() != underscores + 1
        || !digits.bytes().all(|b| b.is_ascii_digit())
        || (digits.len() > 1 && digits.starts_with('0'))
    {
        return None;
    }
    digits.parse().ok()
}
