use anyhow::Result;
use async_trait::async_trait;
use optrun_core::{CommandOptions, DeclaredType, DispatchError, ExecutionContext};
use tracing::debug;

use crate::bridge;
use crate::strategy::CommandStrategy;

/// Strategy for options types that execute themselves.
///
/// Construction captures the registered options type as a [`DeclaredType`]
/// token; every call re-checks that the supplied value is of exactly that
/// type before handing control to the value's own capability impls.
#[derive(Debug)]
pub struct DirectExecutor {
    declared: DeclaredType,
}

impl DirectExecutor {
    /// Builds the strategy for a declared options type.
    ///
    /// Fails when the type declares no execution capability at all; an
    /// inert options bag cannot be registered for direct execution.
    pub fn new(declared: DeclaredType) -> Result<Self, DispatchError> {
        if declared.capabilities().is_empty() {
            return Err(DispatchError::NotExecutable {
                declared: declared.name(),
            });
        }
        debug!(
            declared = declared.name(),
            capabilities = ?declared.capabilities(),
            "registered direct executor"
        );
        Ok(Self { declared })
    }

    pub fn for_options<T: CommandOptions>() -> Result<Self, DispatchError> {
        Self::new(DeclaredType::of::<T>())
    }

    fn check_type(&self, options: &dyn CommandOptions) -> Result<(), DispatchError> {
        if !self.declared.matches(options) {
            return Err(DispatchError::OptionsTypeMismatch {
                declared: self.declared.name(),
                actual: options.type_name(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CommandStrategy for DirectExecutor {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn execute(&self, ctx: &ExecutionContext, options: &dyn CommandOptions) -> Result<i32> {
        self.check_type(options)?;
        if let Some(executable) = options.as_executable() {
            return executable.execute_command(ctx);
        }
        if let Some(executable) = options.as_async_executable() {
            debug!(command = %ctx.command(), "blocking on asynchronous implementation");
            return bridge::block_on(executable.execute_command(ctx))?;
        }
        Err(DispatchError::ExecutableNotExposed {
            declared: self.declared.name(),
        }
        .into())
    }

    async fn execute_async(
        &self,
        ctx: &ExecutionContext,
        options: &dyn CommandOptions,
    ) -> Result<i32> {
        self.check_type(options)?;
        if let Some(executable) = options.as_async_executable() {
            return executable.execute_command(ctx).await;
        }
        if let Some(executable) = options.as_executable() {
            // Synchronous result doubles as the already-completed future.
            return executable.execute_command(ctx);
        }
        Err(DispatchError::ExecutableNotExposed {
            declared: self.declared.name(),
        }
        .into())
    }

    #[cfg(test)]
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
