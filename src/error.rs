use thiserror::Error;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_BAD_ARGS: i32 = 1;
pub const EXIT_BAD_FILE: i32 = 2;
pub const EXIT_LIB_ERROR: i32 = 3;
pub const EXIT_INTERNAL: i32 = 4;

/// A malformed invocation. Always fatal: reported with the usage text and the
/// bad-arguments exit code before anything runs.
#[derive(Error, Debug)]
pub enum UsageError {
    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("option {0} requires an argument")]
    MissingArgument(String),

    #[error("invalid sort specification '{0}': expected <order>:<data-type>:<case-order>")]
    InvalidSortSpec(String),

    #[error("--sort must follow --match or another --sort")]
    SortWithoutMatch,

    #[error("{0} without a preceding --if")]
    ElseWithoutIf(String),

    #[error("--template must be followed by at least one action")]
    EmptyTemplate,

    #[error("no template options found")]
    NoTemplates,

    #[error("invalid namespace binding '{0}': expected <prefix>=<uri>")]
    InvalidNamespaceBinding(String),
}

/// A failure reported by the external transformation engine while executing
/// the generated stylesheet against one input document.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to run transformation engine: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("input document could not be parsed (engine status {status})")]
    DocumentParse { status: i32 },

    #[error("transformation engine failed with status {status}")]
    Failed { status: i32 },

    #[error("engine produced invalid UTF-8 output: {0}")]
    Output(String),
}

impl EngineError {
    pub fn exit_code(&self) -> i32 {
        match self {
            EngineError::DocumentParse { .. } => EXIT_BAD_FILE,
            _ => EXIT_LIB_ERROR,
        }
    }
}

#[derive(Error, Debug)]
pub enum SelectError {
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error("cannot read '{path}': {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("failed to serialize stylesheet: {0}")]
    Serialize(String),
}

impl SelectError {
    pub fn exit_code(&self) -> i32 {
        match self {
            SelectError::Usage(_) => EXIT_BAD_ARGS,
            SelectError::File { .. } => EXIT_BAD_FILE,
            SelectError::Engine(e) => e.exit_code(),
            SelectError::Serialize(_) => EXIT_INTERNAL,
        }
    }
}
