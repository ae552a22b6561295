//! Error handling types for the parser
//!
//! This module provides custom error types that give detailed information
//! about parsing failures, including the input byte offset where available.

use std::{error::Error, fmt};

/// Main error type for parsing operations
#[derive(Debug)]
pub struct ParseError {
    /// The specific kind of error
    kind: ParseErrorKind,
    /// Location where the error occurred
    location: Option<Location>,
    /// Source error that caused this error
    source: Option<Box<dyn Error>>,
    /// Additional context for the error
    context: Option<String>,
}

/// Represents a location in the input stream.
///
/// The underlying XML tokenizer reports byte offsets rather than line and
/// column numbers, so that is what gets recorded here.
#[derive(Debug, Clone, Copy)]
pub struct Location {
    /// Byte offset into the input (0-based)
    pub offset: u64,
}

/// Top-level error categories
#[derive(Debug, Clone)]
pub enum ParseErrorKind {
    Collection(CollectionError),
    IO(IOError),
    Malformed(MalformedError),
    Pattern(PatternError),
    Structural(StructuralError),
}

/// Document structure errors: the configured root element was never found
#[derive(Debug, Clone)]
pub enum StructuralError {
    /// Reached end of stream without ever seeing the configured root element
    RootNotFound(String),
    /// A configured element name is empty
    EmptyElementName(String),
}

/// Malformed XML reported by the tokenizer, or a stream that ends mid-event
#[derive(Debug, Clone)]
pub enum MalformedError {
    /// The XML tokenizer rejected the input
    Syntax(String),
    /// The stream ended while elements were still open
    UnexpectedEof(String),
    /// Element or text content could not be decoded as UTF-8
    InvalidEncoding,
}

/// IO operation errors
#[derive(Debug, Clone)]
pub enum IOError {
    /// File not found
    FileNotFound(String),
    /// Permission denied
    PermissionDenied(String),
    /// Error reading from a stream
    ReadError(String),
}

/// Record query errors
#[derive(Debug, Clone)]
pub enum PatternError {
    /// A search pattern failed to compile
    InvalidPattern(String),
}

/// Collection access errors
#[derive(Debug, Clone)]
pub enum CollectionError {
    /// Record index outside `0..len`
    IndexOutOfRange { index: usize, len: usize },
    /// Selection cursor outside `0..len`
    SelectionOutOfRange { index: usize, len: usize },
}

impl Location {
    pub fn new(offset: u64) -> Self {
        Self { offset }
    }
}

impl ParseError {
    pub fn new(kind: ParseErrorKind) -> Self {
        Self {
            kind,
            location: None,
            source: None,
            context: None,
        }
    }

    pub fn with_location(mut self, offset: u64) -> Self {
        self.location = Some(Location { offset });
        self
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Start with base error description
        let base_error = match &self.kind {
            ParseErrorKind::Collection(err) => err.to_string(),
            ParseErrorKind::IO(err) => err.to_string(),
            ParseErrorKind::Malformed(err) => err.to_string(),
            ParseErrorKind::Pattern(err) => err.to_string(),
            ParseErrorKind::Structural(err) => err.to_string(),
        };

        // Format with location if available
        if let Some(loc) = &self.location {
            write!(f, "at byte {}: {}", loc.offset, base_error)?;
        } else {
            write!(f, "Error: {}", base_error)?;
        }

        // Add context if available
        if let Some(ctx) = &self.context {
            write!(f, "\nContext: {}", ctx)?;
        }

        // Add source if available
        if let Some(source) = &self.source {
            write!(f, "\nCaused by: {}", source)?;
        }

        Ok(())
    }
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound(name) => {
                write!(f, "Root element <{}> not found in document", name)
            }
            Self::EmptyElementName(which) => {
                write!(f, "Configured {} element name is empty", which)
            }
        }
    }
}

impl fmt::Display for MalformedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(msg) => write!(f, "Malformed XML: {}", msg),
            Self::UnexpectedEof(what) => {
                write!(f, "Unexpected end of stream: {}", what)
            }
            Self::InvalidEncoding => write!(f, "Input is not valid UTF-8"),
        }
    }
}

impl fmt::Display for IOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound(path) => write!(f, "File not found: {}", path),
            Self::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            Self::ReadError(msg) => write!(f, "Read error: {}", msg),
        }
    }
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPattern(pat) => write!(f, "Invalid search pattern: '{}'", pat),
        }
    }
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "Record index {} out of range (len {})", index, len)
            }
            Self::SelectionOutOfRange { index, len } => {
                write!(f, "Selection index {} out of range (len {})", index, len)
            }
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(Box::as_ref)
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
