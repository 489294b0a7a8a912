pub mod engine;
pub mod protocol;

pub mod delegation_parser;
pub mod llm_client;
pub mod pipeline;
pub mod prompt_builder;
