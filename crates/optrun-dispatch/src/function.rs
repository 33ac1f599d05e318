use std::fmt;
use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use async_trait::async_trait;
use optrun_core::capability::downcast_options;
use optrun_core::{CommandOptions, DispatchError, ExecutionContext};
use tracing::debug;

use crate::bridge;
use crate::strategy::CommandStrategy;

/// Boxed synchronous command function.
pub type CommandFn<T> = Box<dyn Fn(&ExecutionContext, &T) -> Result<i32> + Send + Sync>;

/// Future returned by a boxed asynchronous command function.
pub type CommandFuture<'a> = Pin<Box<dyn Future<Output = Result<i32>> + Send + 'a>>;

/// Boxed asynchronous command function.
pub type AsyncCommandFn<T> =
    Box<dyn for<'a> Fn(&'a ExecutionContext, &'a T) -> CommandFuture<'a> + Send + Sync>;

fn box_async<T, F, Fut>(f: F) -> AsyncCommandFn<T>
where
    T: CommandOptions,
    F: Fn(&ExecutionContext, &T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<i32>> + Send + 'static,
{
    Box::new(move |ctx, options| Box::pin(f(ctx, options)))
}

/// Strategy wrapping command functions registered inline, without a
/// dedicated options or executor type.
///
/// Two callable shapes are accepted, and the compiler enforces them:
/// `Fn(&ExecutionContext, &T) -> Result<i32>` for the synchronous slot and
/// the same signature returning a future for the asynchronous one. A
/// strategy holds one or both; holding neither is rejected at
/// construction.
pub struct FunctionExecutor<T> {
    sync_fn: Option<CommandFn<T>>,
    async_fn: Option<AsyncCommandFn<T>>,
}

impl<T: CommandOptions> FunctionExecutor<T> {
    fn with_slots(sync_fn: Option<CommandFn<T>>, async_fn: Option<AsyncCommandFn<T>>) -> Self {
        debug!(
            options = std::any::type_name::<T>(),
            sync = sync_fn.is_some(),
            asynchronous = async_fn.is_some(),
            "registered function executor"
        );
        Self { sync_fn, async_fn }
    }

    /// Builds the strategy from an explicit slot pair.
    pub fn new(
        sync_fn: Option<CommandFn<T>>,
        async_fn: Option<AsyncCommandFn<T>>,
    ) -> Result<Self, DispatchError> {
        if sync_fn.is_none() && async_fn.is_none() {
            return Err(DispatchError::NoCommandFunction);
        }
        Ok(Self::with_slots(sync_fn, async_fn))
    }

    /// Wraps a synchronous command function.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&ExecutionContext, &T) -> Result<i32> + Send + Sync + 'static,
    {
        Self::with_slots(Some(Box::new(f)), None)
    }

    /// Wraps an asynchronous command function. The returned future owns
    /// what it needs; anything borrowed from the arguments is copied out
    /// before the function returns.
    pub fn from_async_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(&ExecutionContext, &T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<i32>> + Send + 'static,
    {
        Self::with_slots(None, Some(box_async(f)))
    }

    /// Fills the synchronous slot of an async-first strategy.
    pub fn with_sync<F>(mut self, f: F) -> Self
    where
        F: Fn(&ExecutionContext, &T) -> Result<i32> + Send + Sync + 'static,
    {
        self.sync_fn = Some(Box::new(f));
        self
    }

    /// Fills the asynchronous slot of a sync-first strategy.
    pub fn with_async<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(&ExecutionContext, &T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<i32>> + Send + 'static,
    {
        self.async_fn = Some(box_async(f));
        self
    }
}

impl<T: CommandOptions> fmt::Debug for FunctionExecutor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionExecutor")
            .field("sync", &self.sync_fn.is_some())
            .field("asynchronous", &self.async_fn.is_some())
            .finish()
    }
}

#[async_trait]
impl<T: CommandOptions> CommandStrategy for FunctionExecutor<T> {
    fn name(&self) -> &'static str {
        "function"
    }

    fn execute(&self, ctx: &ExecutionContext, options: &dyn CommandOptions) -> Result<i32> {
        let options = downcast_options::<T>(options)?;
        if let Some(command) = &self.sync_fn {
            return command(ctx, options);
        }
        if let Some(command) = &self.async_fn {
            debug!(command = %ctx.command(), "blocking on asynchronous command function");
            return bridge::block_on(command(ctx, options))?;
        }
        Err(DispatchError::CommandFunctionUnavailable.into())
    }

    async fn execute_async(
        &self,
        ctx: &ExecutionContext,
        options: &dyn CommandOptions,
    ) -> Result<i32> {
        let options = downcast_options::<T>(options)?;
        if let Some(command) = &self.async_fn {
            return command(ctx, options).await;
        }
        if let Some(command) = &self.sync_fn {
            // Synchronous result doubles as the already-completed future.
            return command(ctx, options);
        }
        Err(DispatchError::CommandFunctionUnavailable.into())
    }

    #[cfg(test)]
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
