//! File arrival events.

use std::path::PathBuf;

use chrono::{DateTime, Local};

/// A file fully moved into a watched directory.
///
/// Consumed exactly once by one unit of work; never mutated; discarded when
/// processing completes or fails terminally.
#[derive(Debug, Clone)]
pub struct FileEvent {
    pub path: PathBuf,
    pub detected_at: DateTime<Local>,
}

impl FileEvent {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            detected_at: Local::now(),
        }
    }

    /// UTF-8 file name component, if the path has one.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_component() {
        let event = FileEvent::new(PathBuf::from("/watch/xml/20240101_VXSE53.xml"));
        assert_eq!(event.file_name(), Some("20240101_VXSE53.xml"));
    }

    #[test]
    fn test_file_name_missing() {
        let event = FileEvent::new(PathBuf::from("/"));
        assert_eq!(event.file_name(), None);
    }
}
