//! Context assembly for prompting.

use crate::document::ScoredChunk;

/// Concatenate retrieved chunk texts, in ranked order, into one context block.
///
/// Chunks are joined by a blank line. No deduplication, truncation, or
/// reordering happens here; the result is deterministic for the same input.
pub fn assemble(ranked: &[ScoredChunk]) -> String {
    ranked.iter().map(|r| r.chunk.text.as_str()).collect::<Vec<_>>().join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Chunk;

    fn scored(text: &str, score: f32) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk {
                id: text.to_string(),
                text: text.to_string(),
                embedding: Vec::new(),
                metadata: Default::default(),
                document_id: "doc".to_string(),
            },
            score,
        }
    }

    #[test]
    fn joins_in_ranked_order_with_blank_line() {
        let context = assemble(&[scored("first", 0.9), scored("second", 0.4)]);
        assert_eq!(context, "first\n\nsecond");
    }

    #[test]
    fn empty_input_yields_empty_context() {
        assert_eq!(assemble(&[]), "");
    }
}
