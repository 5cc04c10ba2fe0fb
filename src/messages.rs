use crate::backend::ai_backend::AiError;
use std::path::PathBuf;
use std::time::Duration;

/// Response messages from background operations
pub enum ResponseMessage {
    RevisionFinished {
        generation: u64,
        elapsed: Duration,
        result: Result<String, AiError>,
    },
    ExportFinished(Result<PathBuf, String>), // saved path, error
}
