use std::error;
use std::fmt;
use std::io;
use std::path::PathBuf;
use crate::expression;
use crate::grid::Shape;




#[derive(Debug)]


/**
 * Error to represent an invalid sweep definition, or a failure to build or
 * plan a mesh from one.
 */
pub enum Error {
    InvalidAxis { label: String, reason: &'static str },
    FunctionNotFound(String),
    ShapeMismatch { label: String, expected: Shape, found: Shape },
    MeshNotGenerated,
    RowOutOfRange { row: usize, rows: usize },
    UnknownLabel(String),
    Expression(expression::Error),
    Config(serde_yaml::Error),
    Encode(String),
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        use Error::*;

        match self {
            InvalidAxis { label, reason } => write!(fmt, "invalid axis '{}': {}", label, reason),
            FunctionNotFound(name) => write!(fmt, "mesh function not found: {}", name),
            ShapeMismatch { label, expected, found } => write!(fmt,
                "grid '{}' has shape {:?}, expected {:?}", label, found, expected),
            MeshNotGenerated => write!(fmt, "the mesh has not been generated"),
            RowOutOfRange { row, rows } => write!(fmt, "row {} out of range for a mesh with {} rows", row, rows),
            UnknownLabel(label) => write!(fmt, "no mesh grid is labeled '{}'", label),
            Expression(e) => write!(fmt, "{}", e),
            Config(e) => write!(fmt, "bad configuration: {}", e),
            Encode(e) => write!(fmt, "could not encode row plans: {}", e),
            Io { path, source } => write!(fmt, "{}: {}", path.display(), source),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Expression(e) => Some(e),
            Error::Config(e) => Some(e),
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<expression::Error> for Error {
    fn from(e: expression::Error) -> Self {
        Error::Expression(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Config(e)
    }
}

impl Error {

    /**
     * Attach the path of the file being read or written to an I/O error.
     */
    pub fn io<P: Into<PathBuf>>(path: P) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Error::Io { path, source }
    }
}
