//! Correlating Kodi paths with Jellyfin library items
//!
//! Kodi and Jellyfin rarely see a file through the same mount point
//! (`smb://nas/media/...` vs `/mnt/media/...`), so matching is done on the
//! normalized file name. When several items share a name, a [`TieBreak`]
//! strategy decides, or refuses to.

mod index;
mod normalize;
mod tiebreak;

pub use index::{LibraryIndex, MatchResult};
pub use normalize::{match_key, normalize, NormalizedPath};
pub use tiebreak::{LongestSuffix, Strict, TieBreak, TieBreakStrategy};
