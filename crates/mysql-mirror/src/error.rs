//! Error types for the mirror library.

use thiserror::Error;

/// Main error type for mirror operations.
#[derive(Error, Debug)]
pub enum MirrorError {
    /// Configuration error (bad batch size, identical endpoints, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A database handle could not be opened.
    #[error("Connecting to {0} failed")]
    Connection(String),

    /// The database does not expose the expected `titles` layout.
    #[error("Database: {0} is not compatible for this operation")]
    IncompatibleSchema(String),

    /// Error reported by the MySQL server, with its error code.
    #[error("MySQL Error [{code}]: {message}")]
    Database { code: u16, message: String },

    /// Client-side driver error (I/O, protocol, URL parsing)
    #[error("Driver error: {0}")]
    Driver(mysql_async::Error),

    /// A row from the source could not be decoded into a title record.
    #[error("Row decode failed for column {column}: {message}")]
    Decode { column: String, message: String },

    /// Reading from the source failed part-way through the copy.
    #[error("Read failed from {database}: {source}")]
    Read {
        database: String,
        #[source]
        source: Box<MirrorError>,
    },

    /// The final commit on the target was rejected.
    #[error("Commit failed on {database}: {source}")]
    Commit {
        database: String,
        #[source]
        source: Box<MirrorError>,
    },

    /// Some batches failed and the caller asked for a complete mirror.
    #[error("Copy incomplete: {failed} of {attempted} batches failed")]
    PartialCopy { failed: usize, attempted: usize },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<mysql_async::Error> for MirrorError {
    fn from(err: mysql_async::Error) -> Self {
        match err {
            mysql_async::Error::Server(server) => MirrorError::Database {
                code: server.code,
                message: server.message,
            },
            other => MirrorError::Driver(other),
        }
    }
}

impl MirrorError {
    /// Create a Decode error
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        MirrorError::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Wrap a source-side failure that happened mid-copy.
    pub fn read(database: impl Into<String>, source: MirrorError) -> Self {
        MirrorError::Read {
            database: database.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a rejected commit.
    pub fn commit(database: impl Into<String>, source: MirrorError) -> Self {
        MirrorError::Commit {
            database: database.into(),
            source: Box::new(source),
        }
    }

    /// Server error code, if the database reported one.
    pub fn code(&self) -> Option<u16> {
        match self {
            MirrorError::Database { code, .. } => Some(*code),
            MirrorError::Read { source, .. } | MirrorError::Commit { source, .. } => source.code(),
            _ => None,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            MirrorError::Config(_) => 2,
            MirrorError::Connection(_) => 3,
            MirrorError::IncompatibleSchema(_) => 4,
            MirrorError::PartialCopy { .. } => 5,
            _ => 1,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for mirror operations.
pub type Result<T> = std::result::Result<T, MirrorError>;
