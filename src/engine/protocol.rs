use std::path::PathBuf;

use crate::model::prompt_spec::Stage;

/// Final text produced by one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutput {
    pub stage: Stage,
    pub role: String,
    pub text: String,
}

/// A coworker's answer to a delegated question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consultation {
    pub coworker: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Answered,
    Failed,
}

/// What the engine hands back to the shell after one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedRequest {
    pub outcome: RequestOutcome,
    pub response_text: String,
    pub path: PathBuf,
}
