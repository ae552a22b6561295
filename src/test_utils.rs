mod fixtures;
mod helpers;
mod sinks;

pub use fixtures::{event_doc, mismatched_root_doc, simple_event_doc, truncated_doc};
pub use helpers::tmp_file_path;
pub use sinks::RecordingSink;

// Re-export common test types/traits
pub use crate::{
    collection::{CollectionChange, EventCollection},
    error::{
        CollectionError, IOError, MalformedError, ParseError, ParseErrorKind, PatternError,
        Result, StructuralError,
    },
    event::{compile_pattern, EventRecord},
    intern::FieldName,
    parse_file,
    parser::{
        config::{ParserConfig, DEFAULT_BATCH_SIZE, DEFAULT_PROGRESS_BYTE_THRESHOLD},
        stream::{ParseSummary, StreamingXmlParser},
    },
    sink::EventSink,
    utils::{parse_log_file, parse_str},
};
