/// Broad failure categories mirrored by hosts when mapping dispatch
/// failures onto exit codes or user messages.
///
/// Misconfigured registrations surface as `InvalidArgument` at
/// construction time; contracts that only break once a live instance is
/// inspected surface as `InvalidOperation` at call time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidOperation,
}

#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    #[error("Options value of type '{actual}' is not assignable to declared options type '{declared}'")]
    OptionsTypeMismatch {
        declared: &'static str,
        actual: &'static str,
    },

    #[error("Type '{declared}' implements neither Executable nor AsyncExecutable")]
    NotExecutable { declared: &'static str },

    #[error("Type '{delegate}' implements neither CommandExecutor<{options}> nor AsyncCommandExecutor<{options}>")]
    NotACommandExecutor {
        delegate: &'static str,
        options: &'static str,
    },

    #[error("Supplied executor instance is not a '{delegate}'")]
    InstanceTypeMismatch { delegate: &'static str },

    #[error("Function executor requires a synchronous or an asynchronous command function")]
    NoCommandFunction,

    #[error("Options type '{declared}' declares execution capabilities but exposes neither Executable nor AsyncExecutable")]
    ExecutableNotExposed { declared: &'static str },

    #[error("Service resolver returned no instance of executor type '{delegate}'")]
    DelegateUnresolved { delegate: &'static str },

    #[error("Service resolver returned an instance that is not a '{delegate}'")]
    ResolvedInstanceMismatch { delegate: &'static str },

    #[error("Resolved executor '{delegate}' exposes neither CommandExecutor<{options}> nor AsyncCommandExecutor<{options}>")]
    ExecutorNotExposed {
        delegate: &'static str,
        options: &'static str,
    },

    #[error("Function executor has no synchronous or asynchronous implementation to invoke")]
    CommandFunctionUnavailable,
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::OptionsTypeMismatch { .. }
            | DispatchError::NotExecutable { .. }
            | DispatchError::NotACommandExecutor { .. }
            | DispatchError::InstanceTypeMismatch { .. }
            | DispatchError::NoCommandFunction => ErrorKind::InvalidArgument,

            DispatchError::ExecutableNotExposed { .. }
            | DispatchError::DelegateUnresolved { .. }
            | DispatchError::ResolvedInstanceMismatch { .. }
            | DispatchError::ExecutorNotExposed { .. }
            | DispatchError::CommandFunctionUnavailable => ErrorKind::InvalidOperation,
        }
    }
}
