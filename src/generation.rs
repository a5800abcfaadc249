//! Generator trait for producing answers from rendered prompts.

use async_trait::async_trait;

use crate::error::Result;

/// A text-generation model invoked with a fully rendered prompt.
///
/// The pipeline sends one prompt and expects one complete answer; streaming,
/// tool calls, and conversation state are out of scope at this seam.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a natural-language answer for the rendered prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// The identifier of the model backing this generator.
    fn model(&self) -> &str;
}
