use std::any::{Any, TypeId};

use anyhow::Result;
use async_trait::async_trait;

use crate::context::ExecutionContext;
use crate::error::DispatchError;
use crate::validation::ValidationResult;

/// Synchronous execution capability for self-executing options types.
///
/// The options value carries its own implementation: `self` is the parsed
/// options, the context supplies everything else.
pub trait Executable: Send + Sync {
    fn execute_command(&self, ctx: &ExecutionContext) -> Result<i32>;
}

/// Asynchronous execution capability for self-executing options types.
///
/// A type may implement this alongside [`Executable`]; dispatch picks the
/// variant matching the caller's entry point and bridges otherwise.
#[async_trait]
pub trait AsyncExecutable: Send + Sync {
    async fn execute_command(&self, ctx: &ExecutionContext) -> Result<i32>;
}

/// Synchronous execution capability for delegate executors serving options
/// of type `T`.
pub trait CommandExecutor<T>: Send + Sync {
    fn execute_command(&self, ctx: &ExecutionContext, options: &T) -> Result<i32>;
}

/// Asynchronous execution capability for delegate executors serving options
/// of type `T`.
#[async_trait]
pub trait AsyncCommandExecutor<T>: Send + Sync {
    async fn execute_command(&self, ctx: &ExecutionContext, options: &T) -> Result<i32>;
}

/// Semantic validation capability, orthogonal to execution.
///
/// Validation outcomes are data, not errors: a failed validation is an
/// [`Invalid`](ValidationResult::Invalid) result, while machinery failures
/// (wrong options type and the like) surface through the error channel.
pub trait OptionsValidator<T>: Send + Sync {
    fn validate_options(&self, ctx: &ExecutionContext, options: &T) -> ValidationResult;
}

/// The execution surface a registered type declares: synchronous,
/// asynchronous, both, or neither.
///
/// Declarations are checked when a strategy is constructed; the capability
/// accessors on [`CommandOptions`] and [`CommandService`] remain the source
/// of truth at call time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutionCapabilities {
    sync: bool,
    asynchronous: bool,
}

impl ExecutionCapabilities {
    pub const NONE: Self = Self {
        sync: false,
        asynchronous: false,
    };
    pub const SYNC: Self = Self {
        sync: true,
        asynchronous: false,
    };
    pub const ASYNC: Self = Self {
        sync: false,
        asynchronous: true,
    };
    pub const FULL: Self = Self {
        sync: true,
        asynchronous: true,
    };

    pub fn has_sync(&self) -> bool {
        self.sync
    }

    pub fn has_async(&self) -> bool {
        self.asynchronous
    }

    pub fn is_empty(&self) -> bool {
        !self.sync && !self.asynchronous
    }
}

/// Registration surface for options types.
///
/// Every type bound by the parsing layer implements this umbrella. The
/// defaulted members describe an inert options bag; self-executing types
/// override [`capabilities`](CommandOptions::capabilities) together with
/// the matching accessors:
///
/// ```ignore
/// impl CommandOptions for BuildOptions {
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
///     fn capabilities() -> ExecutionCapabilities {
///         ExecutionCapabilities::SYNC
///     }
///     fn as_executable(&self) -> Option<&dyn Executable> {
///         Some(self)
///     }
/// }
/// ```
///
/// The declaration and the accessors must agree; dispatch reports a type
/// that declares a capability but exposes no accessor for it as an
/// invalid-operation failure.
pub trait CommandOptions: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// Capabilities instances of this type expose.
    fn capabilities() -> ExecutionCapabilities
    where
        Self: Sized,
    {
        ExecutionCapabilities::NONE
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn as_executable(&self) -> Option<&dyn Executable> {
        None
    }

    fn as_async_executable(&self) -> Option<&dyn AsyncExecutable> {
        None
    }
}

/// Registration surface for delegate executor types serving options of
/// type `T`.
///
/// Delegates are resolved through the service locator as `dyn Any` and
/// probed through these accessors, so the same concrete type can serve
/// several options types with different capability sets. The validator
/// accessor needs no declaration: validation is optional and its absence
/// is trivial success.
pub trait CommandService<T>: Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// Capabilities this type declares for options of type `T`.
    fn capabilities() -> ExecutionCapabilities
    where
        Self: Sized,
    {
        ExecutionCapabilities::NONE
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn as_executor(&self) -> Option<&dyn CommandExecutor<T>> {
        None
    }

    fn as_async_executor(&self) -> Option<&dyn AsyncCommandExecutor<T>> {
        None
    }

    fn as_validator(&self) -> Option<&dyn OptionsValidator<T>> {
        None
    }
}

/// Runtime token for a registered options type: identity, display name and
/// declared capabilities, captured once at registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeclaredType {
    id: TypeId,
    name: &'static str,
    capabilities: ExecutionCapabilities,
}

impl DeclaredType {
    pub fn of<T: CommandOptions>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            capabilities: T::capabilities(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn capabilities(&self) -> ExecutionCapabilities {
        self.capabilities
    }

    /// Whether the runtime type of `options` is the declared type.
    pub fn matches(&self, options: &dyn CommandOptions) -> bool {
        options.as_any().type_id() == self.id
    }
}

/// Downcasts a type-erased options value to the declared type `T`,
/// reporting a type mismatch with both type names otherwise.
pub fn downcast_options<T: CommandOptions>(
    options: &dyn CommandOptions,
) -> Result<&T, DispatchError> {
    options
        .as_any()
        .downcast_ref::<T>()
        .ok_or(DispatchError::OptionsTypeMismatch {
            declared: std::any::type_name::<T>(),
            actual: options.type_name(),
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::{CommandDescriptor, ServiceMap};

    fn ctx() -> ExecutionContext {
        ExecutionContext::new(
            Arc::new(ServiceMap::new()),
            CommandDescriptor::new("probe"),
        )
    }

    struct InertOptions;

    impl CommandOptions for InertOptions {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct SyncOptions;

    impl CommandOptions for SyncOptions {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn capabilities() -> ExecutionCapabilities {
            ExecutionCapabilities::SYNC
        }

        fn as_executable(&self) -> Option<&dyn Executable> {
            Some(self)
        }
    }

    impl Executable for SyncOptions {
        fn execute_command(&self, _ctx: &ExecutionContext) -> Result<i32> {
            Ok(0)
        }
    }

    struct AsyncOptions;

    impl CommandOptions for AsyncOptions {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn capabilities() -> ExecutionCapabilities {
            ExecutionCapabilities::ASYNC
        }

        fn as_async_executable(&self) -> Option<&dyn AsyncExecutable> {
            Some(self)
        }
    }

    #[async_trait]
    impl AsyncExecutable for AsyncOptions {
        async fn execute_command(&self, _ctx: &ExecutionContext) -> Result<i32> {
            Ok(7)
        }
    }

    #[test]
    fn test_capability_set_consts() {
        assert!(ExecutionCapabilities::NONE.is_empty());
        assert!(ExecutionCapabilities::SYNC.has_sync());
        assert!(!ExecutionCapabilities::SYNC.has_async());
        assert!(ExecutionCapabilities::ASYNC.has_async());
        assert!(!ExecutionCapabilities::ASYNC.has_sync());
        assert!(ExecutionCapabilities::FULL.has_sync());
        assert!(ExecutionCapabilities::FULL.has_async());
        assert!(!ExecutionCapabilities::FULL.is_empty());
    }

    #[test]
    fn test_inert_options_defaults() {
        let opts = InertOptions;
        assert_eq!(InertOptions::capabilities(), ExecutionCapabilities::NONE);
        assert!(opts.as_executable().is_none());
        assert!(opts.as_async_executable().is_none());
        assert!(opts.type_name().contains("InertOptions"));
    }

    #[test]
    fn test_sync_options_expose_executable() {
        let opts = SyncOptions;
        let exec = opts.as_executable().unwrap();
        assert_eq!(exec.execute_command(&ctx()).unwrap(), 0);
        assert!(opts.as_async_executable().is_none());
    }

    #[tokio::test]
    async fn test_async_options_expose_async_executable() {
        let opts = AsyncOptions;
        let exec = opts.as_async_executable().unwrap();
        assert_eq!(exec.execute_command(&ctx()).await.unwrap(), 7);
        assert!(opts.as_executable().is_none());
    }

    #[test]
    fn test_declared_type_captures_capabilities() {
        let declared = DeclaredType::of::<SyncOptions>();
        assert_eq!(declared.capabilities(), ExecutionCapabilities::SYNC);
        assert!(declared.name().contains("SyncOptions"));
        assert_eq!(declared.id(), TypeId::of::<SyncOptions>());
    }

    #[test]
    fn test_declared_type_matches_runtime_identity() {
        let declared = DeclaredType::of::<SyncOptions>();
        assert!(declared.matches(&SyncOptions));
        assert!(!declared.matches(&InertOptions));
    }

    #[test]
    fn test_type_name_reports_concrete_type_via_trait_object() {
        let opts: &dyn CommandOptions = &InertOptions;
        assert!(opts.type_name().contains("InertOptions"));
    }

    struct UnitService;

    impl CommandService<InertOptions> for UnitService {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_service_defaults_expose_nothing() {
        let svc = UnitService;
        assert_eq!(
            <UnitService as CommandService<InertOptions>>::capabilities(),
            ExecutionCapabilities::NONE
        );
        assert!(svc.as_executor().is_none());
        assert!(svc.as_async_executor().is_none());
        assert!(svc.as_validator().is_none());
    }

    #[test]
    fn test_downcast_options_recovers_concrete_type() {
        let opts: &dyn CommandOptions = &SyncOptions;
        assert!(downcast_options::<SyncOptions>(opts).is_ok());
    }

    #[test]
    fn test_downcast_options_reports_both_type_names() {
        let opts: &dyn CommandOptions = &InertOptions;
        let err = downcast_options::<SyncOptions>(opts).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("SyncOptions"));
        assert!(message.contains("InertOptions"));
    }
}
