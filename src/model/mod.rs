pub mod error;
pub mod message;
pub mod prompt_spec;
pub mod response_record;
pub mod support_request;
