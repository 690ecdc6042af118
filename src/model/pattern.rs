use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern must start with '/'")]
    MissingLeadingSlash,
    #[error("segment '{0}' has an empty placeholder")]
    EmptyPlaceholder(String),
    #[error("segment '{0}' mixes literal text and placeholder braces")]
    EmbeddedPlaceholder(String),
    #[error("placeholder '{0}' appears more than once")]
    DuplicatePlaceholder(String),
}

/// One `/`-separated piece of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

impl Segment {
    fn parse(raw: &str) -> Result<Self, PatternError> {
        if let Some(name) = raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            if name.is_empty() {
                return Err(PatternError::EmptyPlaceholder(raw.to_string()));
            }
            if name.contains(['{', '}']) {
                return Err(PatternError::EmbeddedPlaceholder(raw.to_string()));
            }
            return Ok(Segment::Placeholder(name.to_string()));
        }

        if raw.contains(['{', '}']) {
            return Err(PatternError::EmbeddedPlaceholder(raw.to_string()));
        }
        Ok(Segment::Literal(raw.to_string()))
    }

    /// Literal segments compare exactly (case-sensitive); placeholders take any non-empty value.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Segment::Literal(literal) => literal == value,
            Segment::Placeholder(_) => !value.is_empty(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Segment::Placeholder(_))
    }
}

/// Path parameters bound by a match, kept in the order they appear in the pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    entries: Vec<(String, String)>,
}

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A parsed endpoint pattern such as `/vnms/dashboard/appliance/{Uuid}`.
///
/// Placeholders always occupy a whole segment, so they can never span a `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
}

impl Pattern {
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        if !raw.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash);
        }

        let segments = raw
            .split('/')
            .map(Segment::parse)
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen: Vec<&str> = Vec::new();
        for segment in &segments {
            if let Segment::Placeholder(name) = segment {
                if seen.contains(&name.as_str()) {
                    return Err(PatternError::DuplicatePlaceholder(name.clone()));
                }
                seen.push(name);
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Specificity rank: the number of `/`-separated segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn literal_count(&self) -> usize {
        self.segments.iter().filter(|s| !s.is_placeholder()).count()
    }

    pub fn is_literal(&self) -> bool {
        self.segments.iter().all(|s| !s.is_placeholder())
    }

    pub fn placeholder_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// True when `path` has exactly as many segments as the pattern and every segment is accepted.
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('/').collect();
        parts.len() == self.segments.len()
            && self
                .segments
                .iter()
                .zip(&parts)
                .all(|(segment, part)| segment.accepts(part))
    }

    /// Binds every placeholder to the matching path segment.
    ///
    /// Returns empty params when the path does not match this pattern.
    pub fn extract_params(&self, path: &str) -> PathParams {
        if !self.matches(path) {
            return PathParams::default();
        }

        let entries = self
            .segments
            .iter()
            .zip(path.split('/'))
            .filter_map(|(segment, part)| match segment {
                Segment::Placeholder(name) => Some((name.clone(), part.to_string())),
                Segment::Literal(_) => None,
            })
            .collect();

        PathParams { entries }
    }

    /// Whether some concrete path could match both patterns.
    pub fn overlaps(&self, other: &Pattern) -> bool {
        self.segment_count() == other.segment_count()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| match (a, b) {
                    (Segment::Literal(x), Segment::Literal(y)) => x == y,
                    // an empty literal only ever appears where both patterns have one
                    (Segment::Literal(x), Segment::Placeholder(_))
                    | (Segment::Placeholder(_), Segment::Literal(x)) => !x.is_empty(),
                    (Segment::Placeholder(_), Segment::Placeholder(_)) => true,
                })
    }

    /// Every path matched by `self` is also matched by `general`.
    pub fn refines(&self, general: &Pattern) -> bool {
        self.segment_count() == general.segment_count()
            && self
                .segments
                .iter()
                .zip(&general.segments)
                .all(|(specific, general)| match (specific, general) {
                    (_, Segment::Placeholder(_)) => true,
                    (Segment::Literal(x), Segment::Literal(y)) => x == y,
                    (Segment::Placeholder(_), Segment::Literal(_)) => false,
                })
    }

    /// Overlapping patterns where neither strictly refines the other, so a path could bind
    /// different parameters depending on which one is tried first.
    pub fn is_ambiguous_with(&self, other: &Pattern) -> bool {
        if !self.overlaps(other) {
            return false;
        }
        let forward = self.refines(other);
        let backward = other.refines(self);
        forward == backward
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
