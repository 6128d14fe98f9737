//! Path normalization

/// A path reduced to lowercase segments, without scheme, host or drive
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    segments: Vec<String>,
}

impl NormalizedPath {
    /// Last segment, if any
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Directory segments, outermost first
    pub fn parents(&self) -> &[String] {
        match self.segments.split_last() {
            Some((_, parents)) => parents,
            None => &[],
        }
    }

    /// Number of trailing directory segments shared with `other`
    pub fn common_parent_suffix(&self, other: &NormalizedPath) -> usize {
        self.parents()
            .iter()
            .rev()
            .zip(other.parents().iter().rev())
            .take_while(|(a, b)| a == b)
            .count()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

/// Normalize a Kodi or Jellyfin path
///
/// Both separators are accepted. `scheme://host`, UNC hosts (`\\nas`) and
/// drive letters are dropped since they name the mount, not the file.
pub fn normalize(path: &str) -> NormalizedPath {
    let mut rest = path.trim();
    let mut skip_host = false;

    if let Some((_, after)) = rest.split_once("://") {
        rest = after;
        skip_host = !rest.starts_with(['/', '\\']);
    } else if rest.starts_with("\\\\") || rest.starts_with("//") {
        rest = &rest[2..];
        skip_host = true;
    }

    let mut segments = rest
        .split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != ".")
        .map(str::to_lowercase)
        .collect::<Vec<_>>();

    if skip_host && !segments.is_empty() {
        segments.remove(0);
    }

    if is_drive(segments.first()) {
        segments.remove(0);
    }

    NormalizedPath { segments }
}

fn is_drive(segment: Option<&String>) -> bool {
    match segment.map(|s| s.as_bytes()) {
        Some([letter, b':']) => letter.is_ascii_alphabetic(),
        _ => false,
    }
}

/// Lookup key for a normalized path: its file name, optionally without extension
pub fn match_key(path: &NormalizedPath, ignore_extension: bool) -> Option<String> {
    let name = path.file_name()?;

    if ignore_extension {
        if let Some((stem, _)) = name.rsplit_once('.') {
            if !stem.is_empty() {
                return Some(stem.to_string());
            }
        }
    }

    Some(name.to_string())
}
