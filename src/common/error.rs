use std::fmt;
use thiserror::Error;

use crate::common::types::VertexId;

/// Numeric error codes, stable across releases so reporting tools can match on them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ErrorCode {
    // General errors
    NoError = 0,
    Failed = 1,
    SystemError = 2,
    Internal = 4,
    BadParameter = 10,
    FileNotFound = 14,
    ParseError = 37,

    // Configuration errors
    ConfigInvalid = 100,

    // Graph errors
    GraphInvalidVertex = 1922,
    GraphEmpty = 1951,

    // Landmark errors
    LandmarkCountInvalid = 2001,
    LandmarkStrategyUnsupported = 2002,
}

impl ErrorCode {
    pub fn as_u32(&self) -> u32 {
        *self as u32
    }

    pub fn from_u32(value: u32) -> Self {
        match value {
            0 => ErrorCode::NoError,
            1 => ErrorCode::Failed,
            2 => ErrorCode::SystemError,
            10 => ErrorCode::BadParameter,
            14 => ErrorCode::FileNotFound,
            37 => ErrorCode::ParseError,
            100 => ErrorCode::ConfigInvalid,
            1922 => ErrorCode::GraphInvalidVertex,
            1951 => ErrorCode::GraphEmpty,
            2001 => ErrorCode::LandmarkCountInvalid,
            2002 => ErrorCode::LandmarkStrategyUnsupported,
            _ => ErrorCode::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::NoError => write!(f, "no error"),
            ErrorCode::Failed => write!(f, "failed"),
            ErrorCode::SystemError => write!(f, "system error"),
            ErrorCode::Internal => write!(f, "internal error"),
            ErrorCode::BadParameter => write!(f, "bad parameter"),
            ErrorCode::FileNotFound => write!(f, "file not found"),
            ErrorCode::ParseError => write!(f, "parse error"),
            ErrorCode::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorCode::GraphInvalidVertex => write!(f, "vertex not found"),
            ErrorCode::GraphEmpty => write!(f, "graph is empty"),
            ErrorCode::LandmarkCountInvalid => write!(f, "invalid landmark count"),
            ErrorCode::LandmarkStrategyUnsupported => write!(f, "unsupported landmark strategy"),
        }
    }
}

/// Main error type for graph analysis operations
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Invalid argument ({code}): {message}")]
    InvalidArgument {
        code: ErrorCode,
        message: String,
    },

    #[error("Vertex {0} not found in graph")]
    VertexNotFound(VertexId),

    #[error("Unsupported landmark selection strategy: {0}")]
    UnsupportedStrategy(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse {
        line: usize,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl GraphError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        GraphError::InvalidArgument {
            code: ErrorCode::BadParameter,
            message: message.into(),
        }
    }

    pub fn empty_graph(operation: &str) -> Self {
        GraphError::InvalidArgument {
            code: ErrorCode::GraphEmpty,
            message: format!("{} is undefined on an empty graph", operation),
        }
    }

    pub fn landmark_count(requested: usize, available: usize) -> Self {
        GraphError::InvalidArgument {
            code: ErrorCode::LandmarkCountInvalid,
            message: format!(
                "requested {} landmarks but the graph has {} vertices",
                requested, available
            ),
        }
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        GraphError::Parse {
            line,
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            GraphError::InvalidArgument { code, .. } => *code,
            GraphError::VertexNotFound(_) => ErrorCode::GraphInvalidVertex,
            GraphError::UnsupportedStrategy(_) => ErrorCode::LandmarkStrategyUnsupported,
            GraphError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            GraphError::Io(_) => ErrorCode::SystemError,
            GraphError::Parse { .. } => ErrorCode::ParseError,
            GraphError::Config(_) => ErrorCode::ConfigInvalid,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self.error_code(),
            ErrorCode::GraphInvalidVertex | ErrorCode::FileNotFound
        )
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, GraphError::InvalidArgument { .. })
    }
}

/// Result type alias for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Macro for creating an invalid-argument error with a specific code
#[macro_export]
macro_rules! graph_error {
    ($code:expr, $($arg:tt)*) => {
        $crate::common::error::GraphError::InvalidArgument {
            code: $code,
            message: format!($($arg)*),
        }
    };
}

/// Macro for early return on error
#[macro_export]
macro_rules! graph_bail {
    ($code:expr, $($arg:tt)*) => {
        return Err($crate::graph_error!($code, $($arg)*))
    };
}

/// Macro for ensuring a condition or returning an error
#[macro_export]
macro_rules! graph_ensure {
    ($cond:expr, $code:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::graph_bail!($code, $($arg)*);
        }
    };
}
