use std::collections::HashMap;
use std::io::Cursor;
use std::io::Read;

use bytes::Bytes;

use super::{File, FileSystem, FsError, NodeKind, Stat};

/// In-memory filesystem. Directories exist implicitly for every file's parents.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: HashMap<String, Bytes>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, contents: impl Into<Bytes>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: &str, contents: impl Into<Bytes>) {
        self.files.insert(normalize(path).to_string(), contents.into());
    }

    fn is_dir(&self, path: &str) -> bool {
        if path.is_empty() {
            return true;
        }
        let dir = path.trim_end_matches('/');
        self.files
            .keys()
            .any(|f| f.strip_prefix(dir).is_some_and(|rest| rest.starts_with('/')))
    }
}

fn normalize(path: &str) -> &str {
    path.trim_start_matches('/')
}

fn check(path: &str) -> Result<&str, FsError> {
    let path = normalize(path);
    if path.split('/').any(|seg| seg == "..") {
        return Err(FsError::Invalid);
    }
    Ok(path)
}

impl FileSystem for MemoryFs {
    fn stat(&self, path: &str) -> Result<Stat, FsError> {
        let path = check(path)?;
        if let Some(data) = self.files.get(path) {
            return Ok(Stat {
                size: data.len() as u64,
                kind: NodeKind::File,
            });
        }
        if self.is_dir(path) {
            return Ok(Stat {
                size: 0,
                kind: NodeKind::Dir,
            });
        }
        Err(FsError::NotFound)
    }

    fn open(&self, path: &str) -> Result<Box<dyn File>, FsError> {
        let path = check(path)?;
        let data = self.files.get(path).ok_or(FsError::NotFound)?;
        Ok(Box::new(MemoryFile {
            cursor: Cursor::new(data.clone()),
        }))
    }
}

struct MemoryFile {
    cursor: Cursor<Bytes>,
}

impl File for MemoryFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError> {
        Ok(self.cursor.read(buf)?)
    }

    fn seek(&mut self, offset: u64) -> Result<(), FsError> {
        self.cursor.set_position(offset);
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), FsError> {
        Ok(())
    }
}
