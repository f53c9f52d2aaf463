//! Template folder domain model.

/// Name of the folder every account falls back to.
pub const DEFAULT_FOLDER_NAME: &str = "Default";

/// Which folder an update asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderTarget {
    /// The account's default folder.
    Default,
    /// A folder with exactly this name.
    Named(String),
}

impl FolderTarget {
    /// Maps a requested folder name to its target.
    ///
    /// Blank names and the default folder's own name resolve to `Default`.
    pub fn from_name(name: &str) -> Self {
        if name.trim().is_empty() || name == DEFAULT_FOLDER_NAME {
            FolderTarget::Default
        } else {
            FolderTarget::Named(name.to_string())
        }
    }

    /// The folder name to look up or create.
    pub fn name(&self) -> &str {
        match self {
            FolderTarget::Default => DEFAULT_FOLDER_NAME,
            FolderTarget::Named(name) => name,
        }
    }
}
