//! Actions a system user may perform on an asset.

use bitflags::bitflags;

bitflags! {
    /// Action bitset attached to a system user by a permission record.
    ///
    /// Grants are additive: overlapping records are combined with `|`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    pub struct Actions: u32 {
        /// Open an interactive session.
        const CONNECT         = 1 << 0;
        /// Upload files to the asset.
        const UPLOAD          = 1 << 1;
        /// Download files from the asset.
        const DOWNLOAD        = 1 << 2;
        /// Copy from the remote clipboard.
        const CLIPBOARD_COPY  = 1 << 3;
        /// Paste into the remote clipboard.
        const CLIPBOARD_PASTE = 1 << 4;

        const UPDOWNLOAD = Self::UPLOAD.bits() | Self::DOWNLOAD.bits();
        const CLIPBOARD_COPY_PASTE = Self::CLIPBOARD_COPY.bits() | Self::CLIPBOARD_PASTE.bits();
        const ALL = Self::CONNECT.bits()
            | Self::UPDOWNLOAD.bits()
            | Self::CLIPBOARD_COPY_PASTE.bits();
    }
}

const ACTION_NAMES: [(Actions, &str); 5] = [
    (Actions::CONNECT, "connect"),
    (Actions::UPLOAD, "upload"),
    (Actions::DOWNLOAD, "download"),
    (Actions::CLIPBOARD_COPY, "clipboard_copy"),
    (Actions::CLIPBOARD_PASTE, "clipboard_paste"),
];

impl Actions {
    /// Names of the single actions contained in this set, in bit order.
    pub fn names(&self) -> Vec<&'static str> {
        ACTION_NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}
