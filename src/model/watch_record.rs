use chrono::NaiveDateTime;

/// One watched file from Kodi's `files`/`path` tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KodiWatchRecord {
    /// 1-based line in the export, for reporting
    pub line: u64,

    /// Kodi `strPath`, as exported (usually ends with a separator)
    pub directory_path: String,

    /// Kodi `strFileName`
    pub file_name: String,

    /// Kodi `lastPlayed`; None when the export had NULL
    pub last_played: Option<NaiveDateTime>,

    /// Kodi `playCount`, always >= 1
    pub play_count: u32,
}

impl KodiWatchRecord {
    /// Full path as Kodi knows it
    ///
    /// Kodi stores directories with a trailing separator, so the two columns
    /// concatenate directly. A missing separator is added.
    pub fn path(&self) -> String {
        if self.directory_path.is_empty()
            || self.directory_path.ends_with('/')
            || self.directory_path.ends_with('\\')
        {
            format!("{}{}", self.directory_path, self.file_name)
        } else {
            let sep = if self.directory_path.contains('\\') && !self.directory_path.contains('/') {
                '\\'
            } else {
                '/'
            };
            format!("{}{}{}", self.directory_path, sep, self.file_name)
        }
    }
}
