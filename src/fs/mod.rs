//! Virtual filesystem capability
//!
//! The static-file router only sees the [`FileSystem`] and [`File`] traits.
//! Backends decide where paths are rooted and must refuse paths that escape
//! their root.

pub mod memory;
pub mod posix;

pub use memory::MemoryFs;
pub use posix::PosixFs;

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsError {
    #[error("not found")]
    NotFound,
    #[error("invalid path")]
    Invalid,
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Dir,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub size: u64,
    pub kind: NodeKind,
}

/// Read-only filesystem rooted somewhere implementation-defined.
///
/// Paths are relative to the root; a leading `/` is ignored. Calls are
/// synchronous and may block the calling thread on disk I/O; the accept loop
/// serves one connection at a time, so no other request waits behind them.
pub trait FileSystem: Send + Sync {
    fn stat(&self, path: &str) -> Result<Stat, FsError>;
    fn open(&self, path: &str) -> Result<Box<dyn File>, FsError>;
}

/// An open file. Reads return 0 at EOF.
pub trait File: Send {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError>;
    fn seek(&mut self, offset: u64) -> Result<(), FsError>;
    fn close(self: Box<Self>) -> Result<(), FsError>;
}

/// Reads until `buf` is full or EOF. Returns the number of bytes read.
pub fn read_all(file: &mut dyn File, buf: &mut [u8]) -> Result<usize, FsError> {
    let mut total = 0;
    while total < buf.len() {
        let n = file.read(&mut buf[total..])?;
        if n == 0 {
            break;
        }
        total += n;
    }
    Ok(total)
}
