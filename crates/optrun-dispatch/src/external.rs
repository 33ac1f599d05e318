use std::any::{Any, TypeId};
use std::fmt;
use std::sync::OnceLock;

use anyhow::Result;
use async_trait::async_trait;
use optrun_core::capability::downcast_options;
use optrun_core::{
    CommandOptions, CommandService, DispatchError, ExecutionContext, SharedService,
    ValidationResult,
};
use tracing::debug;

use crate::bridge;
use crate::strategy::CommandStrategy;

type ServiceCast<T> = fn(&(dyn Any + Send + Sync)) -> Option<&dyn CommandService<T>>;

fn cast_to<E, T>(instance: &(dyn Any + Send + Sync)) -> Option<&dyn CommandService<T>>
where
    T: CommandOptions,
    E: CommandService<T> + 'static,
{
    instance
        .downcast_ref::<E>()
        .map(|concrete| concrete as &dyn CommandService<T>)
}

/// Strategy delegating execution of options `T` to a separately registered
/// executor type resolved through the context's service locator.
///
/// The first call resolves the delegate and latches the raw outcome, hit
/// or miss, for the strategy's lifetime; the resolver is never consulted
/// again. Supplying an instance up front seeds the same cell, so resolution
/// is skipped entirely.
pub struct ExternalExecutor<T> {
    delegate: &'static str,
    delegate_id: TypeId,
    cast: ServiceCast<T>,
    instance: OnceLock<Option<SharedService>>,
}

impl<T: CommandOptions> ExternalExecutor<T> {
    /// Binds the delegate executor type `E` for options `T`.
    ///
    /// Fails when `E` declares no execution capability for `T`, or when a
    /// supplied instance is not an `E`.
    pub fn new<E>(existing: Option<SharedService>) -> Result<Self, DispatchError>
    where
        E: CommandService<T> + 'static,
    {
        if E::capabilities().is_empty() {
            return Err(DispatchError::NotACommandExecutor {
                delegate: std::any::type_name::<E>(),
                options: std::any::type_name::<T>(),
            });
        }
        let instance = OnceLock::new();
        if let Some(supplied) = existing {
            if !supplied.as_ref().is::<E>() {
                return Err(DispatchError::InstanceTypeMismatch {
                    delegate: std::any::type_name::<E>(),
                });
            }
            let _ = instance.set(Some(supplied));
        }
        let cast: ServiceCast<T> = cast_to::<E, T>;
        debug!(
            delegate = std::any::type_name::<E>(),
            options = std::any::type_name::<T>(),
            seeded = instance.get().is_some(),
            "registered external executor"
        );
        Ok(Self {
            delegate: std::any::type_name::<E>(),
            delegate_id: TypeId::of::<E>(),
            cast,
            instance,
        })
    }

    /// Returns the delegate service, resolving it on first use.
    fn service(&self, ctx: &ExecutionContext) -> Result<&dyn CommandService<T>, DispatchError> {
        let slot = self.instance.get_or_init(|| {
            let resolved = ctx.services().resolve(self.delegate_id);
            debug!(
                delegate = self.delegate,
                resolved = resolved.is_some(),
                "resolved delegate executor"
            );
            resolved
        });
        let instance = slot.as_deref().ok_or(DispatchError::DelegateUnresolved {
            delegate: self.delegate,
        })?;
        (self.cast)(instance).ok_or(DispatchError::ResolvedInstanceMismatch {
            delegate: self.delegate,
        })
    }
}

impl<T: CommandOptions> fmt::Debug for ExternalExecutor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalExecutor")
            .field("delegate", &self.delegate)
            .field("latched", &self.instance.get().is_some())
            .finish()
    }
}

#[async_trait]
impl<T: CommandOptions> CommandStrategy for ExternalExecutor<T> {
    fn name(&self) -> &'static str {
        "external"
    }

    fn execute(&self, ctx: &ExecutionContext, options: &dyn CommandOptions) -> Result<i32> {
        let options = downcast_options::<T>(options)?;
        let service = self.service(ctx)?;
        if let Some(executor) = service.as_executor() {
            return executor.execute_command(ctx, options);
        }
        if let Some(executor) = service.as_async_executor() {
            debug!(command = %ctx.command(), "blocking on asynchronous delegate");
            return bridge::block_on(executor.execute_command(ctx, options))?;
        }
        Err(DispatchError::ExecutorNotExposed {
            delegate: self.delegate,
            options: std::any::type_name::<T>(),
        }
        .into())
    }

    async fn execute_async(
        &self,
        ctx: &ExecutionContext,
        options: &dyn CommandOptions,
    ) -> Result<i32> {
        let options = downcast_options::<T>(options)?;
        let service = self.service(ctx)?;
        if let Some(executor) = service.as_async_executor() {
            return executor.execute_command(ctx, options).await;
        }
        if let Some(executor) = service.as_executor() {
            // Synchronous result doubles as the already-completed future.
            return executor.execute_command(ctx, options);
        }
        Err(DispatchError::ExecutorNotExposed {
            delegate: self.delegate,
            options: std::any::type_name::<T>(),
        }
        .into())
    }

    /// Delegates to the resolved instance's validator when it has one.
    /// Anything short of that, including an unresolvable delegate, is
    /// trivial success.
    fn validate_options(
        &self,
        ctx: &ExecutionContext,
        options: &dyn CommandOptions,
    ) -> Result<ValidationResult> {
        let options = downcast_options::<T>(options)?;
        let Ok(service) = self.service(ctx) else {
            return Ok(ValidationResult::Valid);
        };
        match service.as_validator() {
            Some(validator) => {
                let result = validator.validate_options(ctx, options);
                debug!(
                    command = %ctx.command(),
                    delegate = self.delegate,
                    valid = result.is_valid(),
                    "delegated options validation"
                );
                Ok(result)
            }
            None => Ok(ValidationResult::Valid),
        }
    }

    #[cfg(test)]
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
