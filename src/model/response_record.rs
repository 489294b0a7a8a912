use chrono::{NaiveDateTime, Timelike};

const HEADER: &str = "=== Resposta do Suporte Google Workspace ===";
const RESPONSE_SEPARATOR: &str = "=== Resposta ===";
const PREFIX_CHARS: usize = 30;

/// One persisted request/response exchange. Failures use the same shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRecord {
    pub timestamp: NaiveDateTime,
    pub user_input: String,
    pub response_text: String,
}

impl ResponseRecord {
    pub fn new(
        timestamp: NaiveDateTime,
        user_input: impl Into<String>,
        response_text: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            user_input: user_input.into(),
            response_text: response_text.into(),
        }
    }

    /// `YYYYMMDD_HHMMSS_<sanitized prefix>`
    pub fn file_stem(&self) -> String {
        format!(
            "{}_{}",
            self.timestamp.format("%Y%m%d_%H%M%S"),
            sanitize_prefix(&self.user_input)
        )
    }

    /// File name for the n-th attempt; attempts after the first get a `_n` suffix.
    pub fn file_name(&self, attempt: u32) -> String {
        if attempt <= 1 {
            format!("{}.txt", self.file_stem())
        } else {
            format!("{}_{}.txt", self.file_stem(), attempt)
        }
    }

    /// ISO-8601 local time; microseconds only when non-zero.
    pub fn iso_timestamp(&self) -> String {
        if self.timestamp.nanosecond() / 1_000 == 0 {
            self.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()
        } else {
            self.timestamp.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
        }
    }

    pub fn render(&self) -> String {
        let mut doc = String::new();
        doc.push_str(HEADER);
        doc.push_str("\n\n");
        doc.push_str(&format!("Data/Hora: {}\n", self.iso_timestamp()));
        doc.push_str(&format!("Solicitação: {}\n", self.user_input));
        doc.push('\n');
        doc.push_str(RESPONSE_SEPARATOR);
        doc.push('\n');
        doc.push_str(&self.response_text);
        doc
    }
}

/// First 30 characters, alphanumerics and whitespace only, whitespace as `_`.
pub fn sanitize_prefix(input: &str) -> String {
    let kept: String = input
        .chars()
        .take(PREFIX_CHARS)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    kept.trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}
