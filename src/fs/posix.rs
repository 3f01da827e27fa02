use std::fs;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Component, Path, PathBuf};

use super::{File, FileSystem, FsError, NodeKind, Stat};

/// Filesystem backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct PosixFs {
    root: PathBuf,
}

impl PosixFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the root directory (and parents) if it does not exist.
    pub fn ensure_root(&self) -> Result<(), FsError> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Maps a relative path under the root, refusing anything that could
    /// leave it.
    fn resolve(&self, path: &str) -> Result<PathBuf, FsError> {
        let relative = Path::new(path.trim_start_matches('/'));
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(FsError::Invalid);
                }
            }
        }
        Ok(resolved)
    }
}

fn not_found_or(e: io::Error) -> FsError {
    match e.kind() {
        io::ErrorKind::NotFound => FsError::NotFound,
        _ => FsError::Io(e),
    }
}

impl FileSystem for PosixFs {
    fn stat(&self, path: &str) -> Result<Stat, FsError> {
        let real = self.resolve(path)?;
        // Symlinks are reported as what they are, not followed.
        let meta = fs::symlink_metadata(&real).map_err(not_found_or)?;

        let kind = if meta.is_file() {
            NodeKind::File
        } else if meta.is_dir() {
            NodeKind::Dir
        } else {
            NodeKind::Unknown
        };

        Ok(Stat {
            size: meta.len(),
            kind,
        })
    }

    fn open(&self, path: &str) -> Result<Box<dyn File>, FsError> {
        let real = self.resolve(path)?;
        let file = fs::File::open(&real).map_err(not_found_or)?;
        Ok(Box::new(PosixFile { file }))
    }
}

struct PosixFile {
    file: fs::File,
}

impl File for PosixFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError> {
        loop {
            match self.file.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => return other.map_err(FsError::Io),
            }
        }
    }

    fn seek(&mut self, offset: u64) -> Result<(), FsError> {
        self.file.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), FsError> {
        drop(self.file);
        Ok(())
    }
}
