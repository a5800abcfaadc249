//! HTTP tests for the Pinecone index client, against a mocked data plane.

use std::collections::HashMap;

use httpmock::prelude::*;
use serde_json::json;

use ragline::{Chunk, PineconeIndex, RagError, VectorIndex};

fn chunk(id: &str, text: &str, embedding: Vec<f32>) -> Chunk {
    Chunk {
        id: id.to_string(),
        text: text.to_string(),
        embedding,
        metadata: HashMap::from([("chunk_index".to_string(), "0".to_string())]),
        document_id: "doc".to_string(),
    }
}

#[tokio::test]
async fn upsert_sends_vectors_with_flattened_metadata() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/vectors/upsert")
                .header("Api-Key", "test-key")
                .json_body_partial(
                    r#"{"vectors": [{"id": "doc_0", "values": [1.0, 0.0],
                        "metadata": {"text": "hello", "document_id": "doc", "chunk_index": "0"}}]}"#,
                );
            then.status(200).json_body(json!({"upsertedCount": 1}));
        })
        .await;

    let index = PineconeIndex::with_endpoint("test-key", server.base_url());
    index.upsert(&[chunk("doc_0", "hello", vec![1.0, 0.0])]).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn upsert_of_no_chunks_skips_the_request() {
    let server = MockServer::start_async().await;
    let index = PineconeIndex::with_endpoint("test-key", server.base_url());
    index.upsert(&[]).await.unwrap();
}

#[tokio::test]
async fn rejected_upsert_is_a_write_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/vectors/upsert");
            then.status(403).body("forbidden");
        })
        .await;

    let index = PineconeIndex::with_endpoint("bad-key", server.base_url());
    let err = index.upsert(&[chunk("doc_0", "hello", vec![1.0])]).await.unwrap_err();

    match err {
        RagError::IndexWrite { backend, message } => {
            assert_eq!(backend, "pinecone");
            assert!(message.contains("403"));
        }
        other => panic!("expected an index write error, got: {other}"),
    }
}

#[tokio::test]
async fn query_maps_matches_back_into_scored_chunks() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/query");
            then.status(200).json_body(json!({
                "matches": [
                    {
                        "id": "doc_1",
                        "score": 0.92,
                        "metadata": {
                            "text": "relevant text",
                            "document_id": "doc",
                            "chunk_index": "1"
                        }
                    },
                    {"id": "doc_7", "score": 0.41, "metadata": {"text": "less relevant"}}
                ]
            }));
        })
        .await;

    let index = PineconeIndex::with_endpoint("test-key", server.base_url());
    let results = index.similarity_query(&[1.0, 0.0], 2).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].chunk.id, "doc_1");
    assert_eq!(results[0].chunk.text, "relevant text");
    assert_eq!(results[0].chunk.document_id, "doc");
    assert_eq!(results[0].chunk.metadata["chunk_index"], "1");
    assert!((results[0].score - 0.92).abs() < 1e-6);
    assert_eq!(results[1].chunk.text, "less relevant");
}

#[tokio::test]
async fn query_against_unreachable_index_is_a_query_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/query");
            then.status(404).body("index not found");
        })
        .await;

    let index = PineconeIndex::with_endpoint("test-key", server.base_url());
    let err = index.similarity_query(&[1.0], 4).await.unwrap_err();
    assert!(matches!(err, RagError::IndexQuery { .. }));
}
