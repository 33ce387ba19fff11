use std::{io::ErrorKind, path::Path};

use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{self, AsyncReadExt, AsyncWriteExt},
};
use tracing::debug;

/// Reads the whole file under a shared lock. A missing file is reported as [None] instead of an
/// error. The contents are returned as they are, decoding is up to the caller.
pub async fn read_locked(path: &Path) -> Result<Option<Vec<u8>>, io::Error> {
    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    file.lock_shared()?;
    let mut contents = Vec::new();
    let result = file.read_to_end(&mut contents).await;
    file.unlock_async().await?;
    result?;
    debug!("Read {} bytes from {path:?}", contents.len());
    Ok(Some(contents))
}

/// Replaces the contents of a file under an exclusive lock, creating it when needed.
pub async fn write_locked(path: &Path, contents: &[u8]) -> Result<(), io::Error> {
    let mut file = File::options()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .await?;
    // Truncated only after the lock is taken.
    file.lock_exclusive()?;
    let result = overwrite(&mut file, contents).await;
    file.unlock_async().await?;
    result?;
    debug!("Wrote {} bytes to {path:?}", contents.len());
    Ok(())
}

async fn overwrite(file: &mut File, contents: &[u8]) -> Result<(), io::Error> {
    file.set_len(0).await?;
    file.write_all(contents).await?;
    file.flush().await?;
    file.sync_data().await
}

/// Removes a file. Removing a file that doesn't exist is fine.
pub async fn remove_if_exists(path: &Path) -> Result<(), io::Error> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
