//! Strategies for choosing between library items that share a match key

use super::normalize::NormalizedPath;

/// Picks one candidate for `target`, or none if the choice would be a guess
pub trait TieBreak {
    /// `candidates` always holds at least two paths. Returns the winner's index.
    fn choose(&self, target: &NormalizedPath, candidates: &[&NormalizedPath]) -> Option<usize>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Prefer the candidate sharing the most trailing directories with the Kodi
/// path, then an exact file name (extension included). A tie at the top is
/// left unresolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongestSuffix;

impl TieBreak for LongestSuffix {
    fn choose(&self, target: &NormalizedPath, candidates: &[&NormalizedPath]) -> Option<usize> {
        let scores: Vec<(usize, bool)> = candidates
            .iter()
            .map(|c| {
                (
                    target.common_parent_suffix(c),
                    target.file_name() == c.file_name(),
                )
            })
            .collect();

        let best = scores.iter().max()?;
        let mut winners = scores
            .iter()
            .enumerate()
            .filter(|(_, score)| *score == best)
            .map(|(i, _)| i);

        let winner = winners.next()?;
        if winners.next().is_some() {
            return None;
        }
        Some(winner)
    }

    fn name(&self) -> &'static str {
        "longest-suffix"
    }
}

/// Never resolve: every shared key is reported as ambiguous
#[derive(Debug, Clone, Copy, Default)]
pub struct Strict;

impl TieBreak for Strict {
    fn choose(&self, _target: &NormalizedPath, _candidates: &[&NormalizedPath]) -> Option<usize> {
        None
    }

    fn name(&self) -> &'static str {
        "strict"
    }
}

/// Selectable tie-break strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreakStrategy {
    #[default]
    LongestSuffix,
    Strict,
}

impl TieBreakStrategy {
    pub fn build(self) -> Box<dyn TieBreak> {
        match self {
            TieBreakStrategy::LongestSuffix => Box::new(LongestSuffix),
            TieBreakStrategy::Strict => Box::new(Strict),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::normalize;

    #[test]
    fn test_longest_suffix_picks_deeper_match() {
        let target = normalize("smb://nas/TV/Doctor Who (2005)/Season 01/Rose.mkv");
        let a = normalize("/media/tv/Doctor Who (1963)/Season 01/Rose.mkv");
        let b = normalize("/media/tv/Doctor Who (2005)/Season 01/Rose.mkv");

        assert_eq!(LongestSuffix.choose(&target, &[&a, &b]), Some(1));
    }

    #[test]
    fn test_longest_suffix_refuses_tie() {
        let target = normalize("smb://nas/Movies/Heat.mkv");
        let a = normalize("/a/movies/Heat.mkv");
        let b = normalize("/b/movies/Heat.mkv");

        assert_eq!(LongestSuffix.choose(&target, &[&a, &b]), None);
    }

    #[test]
    fn test_exact_extension_breaks_equal_suffix() {
        let target = normalize("/m/Movies/Heat.mkv");
        let a = normalize("/x/movies/Heat.mp4");
        let b = normalize("/x/movies/Heat.mkv");

        assert_eq!(LongestSuffix.choose(&target, &[&a, &b]), Some(1));
    }

    #[test]
    fn test_strict_never_chooses() {
        let target = normalize("/m/Movies/Heat.mkv");
        let a = normalize("/x/m/movies/Heat.mkv");
        let b = normalize("/y/Heat.mkv");

        assert_eq!(Strict.choose(&target, &[&a, &b]), None);
    }
}
