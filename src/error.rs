//! Error types for gettsim-personas
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - Exit codes for CLI

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for persona operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoNotFound = 203,

    // Date errors (3xx)
    InvalidDate = 300,
    InvalidPeriod = 301,

    // Persona definition errors (4xx)
    PidNotConsecutive = 400,
    PidElementCount = 401,
    OverlappingQnames = 402,
    DescriptionCount = 403,
    CyclicDependency = 404,
    MissingArguments = 405,
    LengthMismatch = 406,
    InvalidIdColumn = 407,
    TreeConflict = 408,
    OverlappingVariants = 409,
    DuplicatePersona = 410,

    // Lookup errors (5xx)
    PersonaNotImplemented = 500,
    PersonaNotFound = 501,
    ColumnNotFound = 502,

    // Upsert errors (6xx)
    UpsertEmpty = 600,
    UpsertLengthsDiffer = 601,
    UpsertNotMultiple = 602,
    ColumnType = 603,
    InvalidBasePid = 604,

    // Linspace grid errors (7xx)
    InvalidLinspaceGrid = 700,

    // Serialization errors (8xx)
    JsonError = 800,
    TomlError = 801,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10, // Config errors
            200..=299 => 20, // IO errors
            300..=399 => 30, // Date errors
            400..=499 => 40, // Definition errors
            500..=599 => 50, // Lookup errors
            600..=699 => 60, // Upsert errors
            700..=799 => 70, // Grid errors
            800..=899 => 80, // Serialization errors
            900..=999 => 90, // Internal errors
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // Date Errors
    // ─────────────────────────────────────────────────────────────

    /// A date string is not a dashed ISO date
    #[error("Date {input} neither matches the format YYYY-MM-DD nor is a valid date.")]
    InvalidDate { input: String },

    /// Start of an active period lies after its end
    #[error("The start date {start} must be before the end date {end}.")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },

    // ─────────────────────────────────────────────────────────────
    // Persona Definition Errors
    // ─────────────────────────────────────────────────────────────

    /// p_id values are not 0, 1, ..., n-1
    #[error("p_ids must be consecutive starting at zero. Got: {values:?}")]
    PidNotConsecutive { values: Vec<i64> },

    /// A persona definition has zero or several p_id elements
    #[error("Expected exactly one p_id array in {persona}. Found {found}.")]
    PidElementCount { persona: String, found: usize },

    /// Several active elements target the same qualified name
    #[error("Active qnames overlap at {persona}. Overlapping qnames: {qnames:?}")]
    OverlappingQnames { persona: String, qnames: Vec<String> },

    /// No description or more than one description is active
    #[error("{}", describe_description_count(.persona, *.found))]
    DescriptionCount { persona: String, found: usize },

    /// Input elements depend on each other in a cycle
    #[error("Circular dependency between input elements: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    /// Input elements need arguments nobody provides
    #[error(
        "The following parameters are needed to create the input data for this persona: {arguments:?}."
    )]
    MissingArguments { arguments: Vec<String> },

    /// An input column differs in length from the p_id column
    #[error(
        "The input data for {qname} has a different length than the p_id array. \
         The length of {qname} is {actual}, but the length of p_id is {expected}."
    )]
    LengthMismatch {
        qname: String,
        expected: usize,
        actual: usize,
    },

    /// ID variables must start at zero and be weakly consecutive increasing
    #[error(
        "ID variables must start from 0 and be weakly consecutive increasing. \
         Incorrectly specified: {}", .qnames.join(", ")
    )]
    InvalidIdColumn { qnames: Vec<String> },

    /// A qualified name is both a leaf and a branch
    #[error("Cannot build a nested tree: '{qname}' is used both as a leaf and as a branch.")]
    TreeConflict { qname: String },

    /// Two variants of one persona are active at the same date
    #[error(
        "Multiple personas are active at the same date. \
         Overlapping periods: {first_start} - {first_end} and {second_start} - {second_end}."
    )]
    OverlappingVariants {
        first_start: NaiveDate,
        first_end: NaiveDate,
        second_start: NaiveDate,
        second_end: NaiveDate,
    },

    /// Two collections registered under one path
    #[error("A persona is already registered under {path}.")]
    DuplicatePersona { path: String },

    // ─────────────────────────────────────────────────────────────
    // Lookup Errors
    // ─────────────────────────────────────────────────────────────

    /// The persona is not available at the requested policy date
    #[error("{message}")]
    PersonaNotImplemented { message: String },

    /// No persona is registered under this path
    #[error("Persona not found: {path}")]
    PersonaNotFound { path: String },

    /// A derived input asked for a column that was not computed
    #[error("Column not found: {qname}")]
    ColumnNotFound { qname: String },

    // ─────────────────────────────────────────────────────────────
    // Upsert Errors
    // ─────────────────────────────────────────────────────────────

    /// Nothing to upsert, or an empty base dataset
    #[error("{what} must contain at least one non-empty column.")]
    UpsertEmpty { what: &'static str },

    /// Leaves of the upsert data differ in length
    #[error(
        "The length of data in data_to_upsert differs, which is not allowed. \
         Expected length: {expected}. Found lengths: {found:?}"
    )]
    UpsertLengthsDiffer {
        expected: usize,
        found: Vec<(String, usize)>,
    },

    /// Upsert length is not a multiple of the persona length
    #[error(
        "The length of data in data_to_upsert is not a multiple of the length of data in \
         data_from_persona. Lengths: data_to_upsert: {upsert_len}, data_from_persona: {base_len}"
    )]
    UpsertNotMultiple { upsert_len: usize, base_len: usize },

    /// Column has the wrong element type for the requested operation
    #[error("Column {qname} must hold {expected} values, found {actual}.")]
    ColumnType {
        qname: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// The persona p_id column cannot be broadcast
    #[error("Persona p_id does not start with 0 or increment in steps of 1. Found: {values:?}")]
    InvalidBasePid { values: Vec<i64> },

    // ─────────────────────────────────────────────────────────────
    // Linspace Grid Errors
    // ─────────────────────────────────────────────────────────────

    /// Invalid earnings grid
    #[error("Invalid linspace grid: {message}")]
    InvalidLinspaceGrid { message: String },

    // ─────────────────────────────────────────────────────────────
    // Serialization Errors
    // ─────────────────────────────────────────────────────────────

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

fn describe_description_count(persona: &str, found: usize) -> String {
    if found == 0 {
        format!("No PersonaDescription found at {}.", persona)
    } else {
        format!("More than one PersonaDescription is active at {}.", persona)
    }
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                _ => ErrorCode::IoRead,
            },

            Error::InvalidDate { .. } => ErrorCode::InvalidDate,
            Error::InvalidPeriod { .. } => ErrorCode::InvalidPeriod,

            Error::PidNotConsecutive { .. } => ErrorCode::PidNotConsecutive,
            Error::PidElementCount { .. } => ErrorCode::PidElementCount,
            Error::OverlappingQnames { .. } => ErrorCode::OverlappingQnames,
            Error::DescriptionCount { .. } => ErrorCode::DescriptionCount,
            Error::CyclicDependency { .. } => ErrorCode::CyclicDependency,
            Error::MissingArguments { .. } => ErrorCode::MissingArguments,
            Error::LengthMismatch { .. } => ErrorCode::LengthMismatch,
            Error::InvalidIdColumn { .. } => ErrorCode::InvalidIdColumn,
            Error::TreeConflict { .. } => ErrorCode::TreeConflict,
            Error::OverlappingVariants { .. } => ErrorCode::OverlappingVariants,
            Error::DuplicatePersona { .. } => ErrorCode::DuplicatePersona,

            Error::PersonaNotImplemented { .. } => ErrorCode::PersonaNotImplemented,
            Error::PersonaNotFound { .. } => ErrorCode::PersonaNotFound,
            Error::ColumnNotFound { .. } => ErrorCode::ColumnNotFound,

            Error::UpsertEmpty { .. } => ErrorCode::UpsertEmpty,
            Error::UpsertLengthsDiffer { .. } => ErrorCode::UpsertLengthsDiffer,
            Error::UpsertNotMultiple { .. } => ErrorCode::UpsertNotMultiple,
            Error::ColumnType { .. } => ErrorCode::ColumnType,
            Error::InvalidBasePid { .. } => ErrorCode::InvalidBasePid,

            Error::InvalidLinspaceGrid { .. } => ErrorCode::InvalidLinspaceGrid,

            Error::Json(_) => ErrorCode::JsonError,
            Error::Toml(_) => ErrorCode::TomlError,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Check if the error stems from a broken persona definition rather than
    /// from user input
    pub fn is_definition_error(&self) -> bool {
        matches!(self.code() as u16, 400..=499)
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'gettsim-personas config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'gettsim-personas config validate' to see details."
            ),
            Error::ConfigValidation { .. } => Some(
                "Review the configuration file and fix the invalid values."
            ),

            Error::InvalidDate { .. } => Some(
                "Pass dates as dashed ISO strings, e.g. 2025-01-01."
            ),

            Error::PersonaNotFound { .. } => Some(
                "Run 'gettsim-personas list' to see all available personas."
            ),
            Error::PersonaNotImplemented { .. } => Some(
                "Run 'gettsim-personas list --date <DATE>' to see the personas available at that date."
            ),

            Error::UpsertNotMultiple { .. } | Error::UpsertLengthsDiffer { .. } => Some(
                "All upserted columns must share one length that is a multiple of the persona size."
            ),

            Error::InvalidLinspaceGrid { .. } => Some(
                "Pass one --bruttolohn value per person, either BOTTOM:TOP or a constant."
            ),

            _ if self.is_definition_error() => Some(
                "The persona definition is inconsistent. Run 'gettsim-personas validate' for details."
            ),

            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let code = self.code();
        let suggestion = self.suggestion();

        let mut output = format!(
            "\x1b[31mError [{}]\x1b[0m: {}\n",
            code.as_str(),
            self
        );

        if let Some(hint) = suggestion {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        let code = self.code();
        format!("[{}] {}", code.as_str(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors (for ergonomic error creation)
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a config parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Error::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create a config validation error
    pub fn config_validation(message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a persona-not-implemented error
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Error::PersonaNotImplemented {
            message: message.into(),
        }
    }

    /// Create an invalid linspace grid error
    pub fn invalid_grid(message: impl Into<String>) -> Self {
        Error::InvalidLinspaceGrid {
            message: message.into(),
        }
    }

    /// Create a column type error
    pub fn column_type(
        qname: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Error::ColumnType {
            qname: qname.into(),
            expected,
            actual,
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
