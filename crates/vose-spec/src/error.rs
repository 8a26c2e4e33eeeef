//! Error types for request validation and processing.

use thiserror::Error;

/// Error codes for render request validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// E001: Note has an empty source reference
    MissingSourceRef,
    /// E002: Note has no analysis frames
    EmptyNote,
    /// E003: Expression curves disagree in length with the pitch curve
    CurveLengthMismatch,
    /// E004: Pitch curve contains NaN or infinite values
    NonFinitePitch,
    /// E005: Velocity outside 0..=127
    InvalidVelocity,
    /// E006: Negative or non-finite start time / pre-utterance
    InvalidTiming,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::MissingSourceRef => "E001",
            ErrorCode::EmptyNote => "E002",
            ErrorCode::CurveLengthMismatch => "E003",
            ErrorCode::NonFinitePitch => "E004",
            ErrorCode::InvalidVelocity => "E005",
            ErrorCode::InvalidTiming => "E006",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Warning codes for render request validation and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W001: Expression curve value outside [0, 1] (clamped when shaping)
    CurveOutOfRange,
    /// W002: Non-positive pitch frames are synthesized as unvoiced
    UnvoicedFrames,
    /// W003: Cached analysis frame count differs from the note's frame count
    AnalysisFrameMismatch,
    /// W004: A segment was truncated or dropped to stay inside the output buffer
    BufferOverrunPrevented,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::CurveOutOfRange => "W001",
            WarningCode::UnvoicedFrames => "W002",
            WarningCode::AnalysisFrameMismatch => "W003",
            WarningCode::BufferOverrunPrevented => "W004",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Path to the problematic field (e.g., "notes\[2\].gender_curve").
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation error with a field path.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validation warning with code, message, and optional field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The warning code.
    pub code: WarningCode,
    /// Human-readable warning message.
    pub message: String,
    /// Path to the problematic field.
    pub path: Option<String>,
}

impl ValidationWarning {
    /// Creates a new validation warning.
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation warning with a field path.
    pub fn with_path(
        code: WarningCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Top-level error type for request and config operations.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Config or request validation failed.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of request validation.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether validation passed (no errors).
    pub ok: bool,
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of validation warnings.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Creates a successful validation result.
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Creates a failed validation result.
    pub fn failure(errors: Vec<ValidationError>) -> Self {
        Self {
            ok: false,
            errors,
            warnings: Vec::new(),
        }
    }

    /// Adds an error, marking the result as failed.
    pub fn add_error(&mut self, error: ValidationError) {
        self.ok = false;
        self.errors.push(error);
    }

    /// Adds a warning.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Returns true if validation passed.
    pub fn is_ok(&self) -> bool {
        self.ok && self.errors.is_empty()
    }

    /// Returns true if validation failed.
    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }

    /// Returns true if any error carries the given code.
    pub fn has_error(&self, code: ErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// Returns true if any warning carries the given code.
    pub fn has_warning(&self, code: WarningCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    /// Merges another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.errors.is_empty() {
            self.ok = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}

/// Common interface for engine errors.
///
/// Gives every error a stable machine-readable code so hosts can react to
/// failures without matching on message text.
///
/// # Example
///
/// ```
/// use vose_spec::error::BackendError;
///
/// fn handle_error<E: BackendError>(err: E) {
///     eprintln!("[{}] {}", err.code(), err.message());
/// }
/// ```
pub trait BackendError: std::error::Error {
    /// Get the error code for reporting.
    ///
    /// Returns a static string like "VOSE_001". These codes are stable.
    fn code(&self) -> &'static str;

    /// Get a human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Get the error category (e.g., "store", "analysis", "render").
    fn category(&self) -> &'static str;
}
