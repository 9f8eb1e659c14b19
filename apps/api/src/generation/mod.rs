// Content Generation: resume input in, typed slide content out.
// All backend calls go through llm_client; nothing here talks HTTP directly.

pub mod generator;
pub mod handlers;
pub mod models;
pub mod prompts;
