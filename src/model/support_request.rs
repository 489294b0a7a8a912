use chrono::{Local, NaiveDateTime};

/// A support request as typed by the user, whitespace included.
///
/// `submitted_at` is when the user hit enter. The saved record is stamped
/// separately by the store clock at save time, so the two can differ by the
/// length of the pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportRequest {
    text: String,
    submitted_at: NaiveDateTime,
}

impl SupportRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self::at(text, Local::now().naive_local())
    }

    pub fn at(text: impl Into<String>, submitted_at: NaiveDateTime) -> Self {
        Self {
            text: text.into(),
            submitted_at,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn submitted_at(&self) -> NaiveDateTime {
        self.submitted_at
    }
}
