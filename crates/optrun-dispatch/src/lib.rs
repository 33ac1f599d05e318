//! Executor strategies that resolve and dispatch CLI commands.

mod bridge;
pub mod direct;
pub mod external;
pub mod factory;
pub mod function;
pub mod strategy;

pub use direct::DirectExecutor;
pub use external::ExternalExecutor;
pub use factory::ExecutorFactory;
pub use function::{AsyncCommandFn, CommandFn, CommandFuture, FunctionExecutor};
pub use optrun_core::{
    CliError, CommandDescriptor, CommandOptions, DispatchError, ErrorKind, ExecutionContext,
    ServiceMap, ServiceResolver, ValidationResult,
};
pub use strategy::CommandStrategy;
