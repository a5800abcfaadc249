//! Prompt templates with `{context}` and `{question}` slots.

use crate::error::{RagError, Result};

/// Slot for the assembled retrieval context.
const CONTEXT_SLOT: &str = "{context}";

/// Slot for the user's question.
const QUESTION_SLOT: &str = "{question}";

/// A format string with named slots, filled in before being sent to the
/// generation model.
///
/// Both `{context}` and `{question}` must appear in the template; this is
/// checked once at construction so rendering cannot fail.
///
/// # Example
///
/// ```rust,ignore
/// use ragline::PromptTemplate;
///
/// let template = PromptTemplate::new("Context: {context}\nQ: {question}")?;
/// let prompt = template.render("some context", "some question");
/// ```
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Create a template, validating that both slots are present.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `{context}` or `{question}` is missing.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        for slot in [CONTEXT_SLOT, QUESTION_SLOT] {
            if !template.contains(slot) {
                return Err(RagError::Config(format!("prompt template is missing the {slot} slot")));
            }
        }
        Ok(Self { template })
    }

    /// Render the template with the given context and question.
    pub fn render(&self, context: &str, question: &str) -> String {
        self.template.replace(CONTEXT_SLOT, context).replace(QUESTION_SLOT, question)
    }
}

impl Default for PromptTemplate {
    /// The stock question-answering template: answer from the supplied
    /// context only, admit not knowing, keep it to three sentences.
    fn default() -> Self {
        Self {
            template: "\
Use the following pieces of context to answer the question at the end.
If you don't know the answer, just say you don't know, don't try to make up an answer.
Use three sentences maximum and keep the answer as concise as possible.
Always say \"thanks for asking!\" at the end of your answer.

{context}

Question: {question}

Helpful answer:"
                .to_string(),
        }
    }
}
