/// A media file known to Jellyfin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JellyfinLibraryItem {
    /// Key joining the item to its per-user data (Jellyfin's UserDataKey)
    pub item_id: String,

    /// Source file path as Jellyfin sees it
    pub path: String,
}

/// A Jellyfin account whose watch state gets updated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JellyfinUser {
    pub username: String,

    /// Integer id used by the `UserDatas` table
    pub internal_id: i64,
}
