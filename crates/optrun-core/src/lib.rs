//! Core contracts for command execution: context, capability traits,
//! validation outcomes and the dispatch error taxonomy.

pub mod capability;
pub mod context;
pub mod error;
pub mod validation;

pub use capability::{
    AsyncCommandExecutor, AsyncExecutable, CommandExecutor, CommandOptions, CommandService,
    DeclaredType, Executable, ExecutionCapabilities, OptionsValidator, downcast_options,
};
pub use context::{CommandDescriptor, ExecutionContext, ServiceMap, ServiceResolver, SharedService};
pub use error::{DispatchError, ErrorKind};
pub use validation::{CliError, ValidationResult};
