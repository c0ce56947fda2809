//! Storage abstraction for mounted file systems

/// Read-only access to a mounted file system.
pub trait Storage {
    /// Error type
    type Error: core::fmt::Debug;
    /// Open file handle. May borrow the storage for its lifetime.
    type File<'a>: File
    where
        Self: 'a;

    /// Open file for reading.
    ///
    /// `path` is absolute and starts with the mount point, e.g. `/sdcard/2.wav`.
    fn open_file<'a>(
        &'a mut self,
        path: &str,
    ) -> impl core::future::Future<Output = Result<Self::File<'a>, Self::Error>>;

    /// Check if path exists
    fn exists(
        &mut self,
        path: &str,
    ) -> impl core::future::Future<Output = Result<bool, Self::Error>>;
}

/// File trait for reading files
pub trait File {
    /// Error type
    type Error: core::fmt::Debug;

    /// Read from current position. Returns 0 at end of file.
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, Self::Error>>;

    /// Seek to an absolute position. Seeking past the end is allowed and
    /// makes the next read return 0.
    fn seek(&mut self, pos: u64) -> impl core::future::Future<Output = Result<u64, Self::Error>>;

    /// Get file size
    fn size(&self) -> u64;
}

/// Strip `mount_point` from an absolute `path`, returning the path relative
/// to the volume root.
///
/// Returns `None` if `path` is not below `mount_point`.
#[must_use]
pub fn relative_to_mount<'p>(mount_point: &str, path: &'p str) -> Option<&'p str> {
    let rest = path.strip_prefix(mount_point)?;
    if rest.is_empty() {
        return Some("");
    }
    rest.strip_prefix('/')
}

#[cfg(test)]
mod tests {
    use super::relative_to_mount;

    #[test]
    fn strips_mount_point() {
        assert_eq!(relative_to_mount("/sdcard", "/sdcard/2.wav"), Some("2.wav"));
        assert_eq!(
            relative_to_mount("/sdcard", "/sdcard/music/a.wav"),
            Some("music/a.wav")
        );
    }

    #[test]
    fn mount_point_itself_is_root() {
        assert_eq!(relative_to_mount("/sdcard", "/sdcard"), Some(""));
    }

    #[test]
    fn foreign_paths_rejected() {
        assert_eq!(relative_to_mount("/sdcard", "/flash/2.wav"), None);
        assert_eq!(relative_to_mount("/sdcard", "/sdcard2/x.wav"), None);
        assert_eq!(relative_to_mount("/sdcard", "2.wav"), None);
    }
}
