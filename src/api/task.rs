// Async variants: the synchronous operation moved onto tokio's blocking pool.
#![allow(clippy::result_large_err)]

use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::files::{self, ApiResult};
use crate::core::error::{Error, ErrorKind};
use crate::core::policy::{ReadOptions, WriteOptions};

async fn run_blocking<R, F>(job: F) -> ApiResult<R>
where
    R: Send + 'static,
    F: FnOnce() -> ApiResult<R> + Send + 'static,
{
    tokio::task::spawn_blocking(job).await.map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("blocking json task failed")
            .with_source(err)
    })?
}

/// Runs `write` on a blocking worker. Requires a tokio runtime.
pub async fn write_async<T>(
    path: impl Into<PathBuf>,
    data: T,
    options: WriteOptions,
) -> ApiResult<()>
where
    T: Serialize + Send + 'static,
{
    let path = path.into();
    run_blocking(move || files::write(&path, &data, options)).await
}

/// Runs the untagged `read` on a blocking worker. Requires a tokio runtime.
pub async fn read_async<T>(path: impl Into<PathBuf>) -> ApiResult<T>
where
    T: DeserializeOwned + Send + 'static,
{
    let path = path.into();
    run_blocking(move || files::read(&path, ReadOptions::default())).await
}
