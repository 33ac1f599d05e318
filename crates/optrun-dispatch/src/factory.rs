use std::future::Future;

use anyhow::Result;
use optrun_core::{CommandOptions, CommandService, DispatchError, ExecutionContext, SharedService};

use crate::direct::DirectExecutor;
use crate::external::ExternalExecutor;
use crate::function::{AsyncCommandFn, CommandFn, FunctionExecutor};
use crate::strategy::CommandStrategy;

/// Produces registry-ready boxed strategies from registration
/// declarations, propagating the constructors' shape failures.
///
/// The declaration shape picks the strategy: a self-executing options type
/// gets a [`DirectExecutor`], an options/executor type pair an
/// [`ExternalExecutor`], a command function a [`FunctionExecutor`].
pub struct ExecutorFactory;

impl ExecutorFactory {
    pub fn direct<T: CommandOptions>() -> Result<Box<dyn CommandStrategy>, DispatchError> {
        Ok(Box::new(DirectExecutor::for_options::<T>()?))
    }

    pub fn external<T, E>(
        existing: Option<SharedService>,
    ) -> Result<Box<dyn CommandStrategy>, DispatchError>
    where
        T: CommandOptions,
        E: CommandService<T> + 'static,
    {
        Ok(Box::new(ExternalExecutor::<T>::new::<E>(existing)?))
    }

    pub fn from_fn<T, F>(f: F) -> Box<dyn CommandStrategy>
    where
        T: CommandOptions,
        F: Fn(&ExecutionContext, &T) -> Result<i32> + Send + Sync + 'static,
    {
        Box::new(FunctionExecutor::from_fn(f))
    }

    pub fn from_async_fn<T, F, Fut>(f: F) -> Box<dyn CommandStrategy>
    where
        T: CommandOptions,
        F: Fn(&ExecutionContext, &T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<i32>> + Send + 'static,
    {
        Box::new(FunctionExecutor::from_async_fn(f))
    }

    pub fn from_fns<T: CommandOptions>(
        sync_fn: Option<CommandFn<T>>,
        async_fn: Option<AsyncCommandFn<T>>,
    ) -> Result<Box<dyn CommandStrategy>, DispatchError> {
        Ok(Box::new(FunctionExecutor::new(sync_fn, async_fn)?))
    }
}
