/// A single chat turn handed to the model collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    System(String),
    User(String),
}

impl Message {
    pub fn role(&self) -> &'static str {
        match self {
            Message::System(_) => "system",
            Message::User(_) => "user",
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Message::System(text) | Message::User(text) => text,
        }
    }
}
