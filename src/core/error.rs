//! Purpose: Model decode failures with a small, stable error taxonomy.
//! Exports: `Error`, `ErrorKind`, `to_exit_code`.
//! Role: Single error type threaded through registry, engine, resolvers and CLI.
//! Invariants: Every error carries a kind; value/target context is attached where known.
//! Invariants: Exit-code mapping is stable once published.
use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    Internal,
    Usage,
    /// Registry miss on direct lookup.
    NotFound,
    /// The target type classifies as unknown.
    UnsupportedType,
    /// Value does not match the target shape.
    Value,
    /// Structurally wrong kind of input.
    Type,
    FileNotFound,
    /// Tagged-enumeration member lookup miss.
    Key,
    ZeroDivision,
    Io,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Internal => "Internal",
            ErrorKind::Usage => "Usage",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::UnsupportedType => "UnsupportedType",
            ErrorKind::Value => "ValueError",
            ErrorKind::Type => "TypeError",
            ErrorKind::FileNotFound => "FileNotFound",
            ErrorKind::Key => "KeyError",
            ErrorKind::ZeroDivision => "ZeroDivision",
            ErrorKind::Io => "Io",
        }
    }

    /// Kinds a union branch may absorb before trying the next member.
    pub fn is_recoverable_mismatch(self) -> bool {
        matches!(
            self,
            ErrorKind::Value | ErrorKind::Type | ErrorKind::Key | ErrorKind::UnsupportedType
        )
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    value: Option<String>,
    target: Option<String>,
    hint: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            value: None,
            target: None,
            hint: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Debug rendering of the value that failed to decode.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Fill in value/target context without overwriting what a deeper layer set.
    pub(crate) fn or_context(mut self, value: impl FnOnce() -> String, target: &str) -> Self {
        if self.value.is_none() {
            self.value = Some(value());
        }
        if self.target.is_none() {
            self.target = Some(target.to_string());
        }
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.as_str())?;
        match (&self.value, &self.target) {
            (Some(value), Some(target)) => write!(f, ": could not decode {value} as {target}")?,
            (Some(value), None) => write!(f, ": could not decode {value}")?,
            (None, Some(target)) => write!(f, ": could not decode as {target}")?,
            (None, None) => {}
        }
        if let Some(message) = &self.message {
            if self.value.is_some() || self.target.is_some() {
                write!(f, "; {message}")?;
            } else {
                write!(f, ": {message}")?;
            }
        }
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::NotFound => 3,
        ErrorKind::UnsupportedType => 4,
        ErrorKind::Value => 5,
        ErrorKind::Type => 6,
        ErrorKind::FileNotFound => 7,
        ErrorKind::Key => 8,
        ErrorKind::ZeroDivision => 9,
        ErrorKind::Io => 10,
    }
}
