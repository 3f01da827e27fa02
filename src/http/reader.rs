use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

/// Reads up to `buf.len()` bytes from `reader`.
///
/// Returns `Ok(0)` on a clean EOF. Interrupted reads are retried and never
/// reach the caller.
pub async fn read_some<R>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize>
where
    R: AsyncRead + Unpin + ?Sized,
{
    loop {
        match reader.read(buf).await {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

/// Reads until `buf` is full or the peer hits EOF.
///
/// The returned count is the exact number of bytes delivered; a short count
/// means EOF and is not an error. A transport error aborts the read.
pub async fn read_exactly<R>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut total = 0;
    while total < buf.len() {
        let n = read_some(reader, &mut buf[total..]).await?;
        if n == 0 {
            break;
        }
        total += n;
    }
    Ok(total)
}
