//! Text generation for the Newsdesk pipeline
//!
//! Wraps the external generation API behind the [`TextGenerator`] trait,
//! with an OpenAI chat-completion implementation, the prompt builders used
//! by the services, and the defensive parser that digs ranked ids out of
//! free-form model replies.

pub mod error;
pub mod generator;
pub mod parse;
pub mod prompt;

pub use error::AiError;
pub use generator::{GeneratorConfig, OpenAiGenerator, TextGenerator};
pub use parse::first_int_array;
pub use prompt::{digest_prompt, ranking_prompt, summary_prompt, RankCandidate};
