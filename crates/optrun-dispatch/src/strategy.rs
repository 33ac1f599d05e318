use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use optrun_core::{CommandOptions, ExecutionContext, ValidationResult};

/// Uniform dispatch surface over the executor strategies.
///
/// A registry stores one boxed strategy per command registration; the
/// dispatch loop validates the parsed options, then executes through
/// whichever entry point matches its own convention. Both entry points
/// honor the same preference rule: `execute` favors a synchronous
/// implementation, `execute_async` an asynchronous one, and each bridges
/// to the other convention only when its own is missing.
#[async_trait]
pub trait CommandStrategy: Send + Sync + fmt::Debug {
    /// Strategy identifier echoed into tracing events.
    fn name(&self) -> &'static str;

    /// Synchronous entry point. Blocks on an asynchronous implementation
    /// when no synchronous one is available.
    fn execute(&self, ctx: &ExecutionContext, options: &dyn CommandOptions) -> Result<i32>;

    /// Asynchronous entry point. Falls back to a synchronous
    /// implementation, whose result is returned as already completed.
    async fn execute_async(
        &self,
        ctx: &ExecutionContext,
        options: &dyn CommandOptions,
    ) -> Result<i32>;

    /// Pre-execution semantic validation. Strategies without a validation
    /// source accept unconditionally; failed validation is data, not an
    /// error.
    fn validate_options(
        &self,
        _ctx: &ExecutionContext,
        _options: &dyn CommandOptions,
    ) -> Result<ValidationResult> {
        Ok(ValidationResult::Valid)
    }

    #[cfg(test)]
    fn as_any(&self) -> &dyn std::any::Any;
}
