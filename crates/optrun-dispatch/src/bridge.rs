use std::future::Future;

use anyhow::{Context, Result};

/// Runs an asynchronous implementation to completion from a synchronous
/// entry point on a throwaway current-thread runtime.
///
/// This is the one deliberate blocking point of synchronous dispatch over
/// an async-only target. It must not be entered from a thread already
/// driving a tokio runtime; async hosts call the async entry points.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime for synchronous dispatch")?;
    Ok(runtime.block_on(future))
}
