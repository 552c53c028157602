use pretty_assertions::assert_eq;
use recollect_rs_core::{
    NO_CONTEXT_SENTINEL, Pipeline, PipelineError, PipelineErrorKind, PipelineOptions,
    PipelineRequest, PipelineStage,
};
use recollect_rs_memory::{Exchange, FileMemoryStore, MemoryStore, Metadata, ScopeKey};
use recollect_rs_test_utils::{
    FailingCompletion, FailingStore, FixedCompletion, RecordingCompletion, RecordingStore,
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::tempdir;

const SEMANTIC_SCOPE: &str = "insurance_semantic_agent";

fn options(recall_limit: usize) -> PipelineOptions {
    PipelineOptions {
        recall_limit,
        semantic_scope: SEMANTIC_SCOPE.to_string(),
    }
}

fn individual(id: &str) -> ScopeKey {
    ScopeKey::Individual(id.to_string())
}

fn collective() -> ScopeKey {
    ScopeKey::Collective(SEMANTIC_SCOPE.to_string())
}

#[tokio::test]
async fn returning_requester_gets_history_and_new_exchange() {
    let store = Arc::new(RecordingStore::new());
    store.seed(
        &individual("CUST-45678"),
        "User: My basement flooded last spring | Assistant: Claim WD-1 opened for water damage",
    );
    let completion = Arc::new(RecordingCompletion::new(
        "Since your earlier water damage claim, here is what to do next.",
    ));
    let pipeline = Pipeline::new(store.clone(), completion.clone(), options(5));

    let response = pipeline
        .handle(PipelineRequest::episodic(
            "CUST-45678",
            "I have water damage again in my kitchen",
        ))
        .await
        .expect("handle");

    assert_eq!(response.history_count, 1);
    assert_eq!(response.had_prior_history(), Some(true));
    let prompt = completion.last_prompt().expect("prompt");
    assert!(prompt.contains("Claim WD-1 opened for water damage"));
    assert!(prompt.contains("Returning requester: true"));

    let items = store.items(&individual("CUST-45678"));
    assert_eq!(items.len(), 2);
    let adds = store.add_calls();
    assert_eq!(adds.len(), 1);
    assert_eq!(adds[0].scope, individual("CUST-45678"));
    assert_eq!(
        adds[0].exchange,
        Exchange::new(
            "I have water damage again in my kitchen",
            "Since your earlier water damage claim, here is what to do next."
        )
    );
    assert_eq!(
        adds[0].metadata.get("scope"),
        Some(&Value::String("episodic".to_string()))
    );
}

#[tokio::test]
async fn first_time_requester_sees_sentinel() {
    let store = Arc::new(RecordingStore::new());
    store.seed(&individual("CUST-OTHER"), "User: hi | Assistant: hello");
    let completion = Arc::new(RecordingCompletion::new("Welcome! How can I help?"));
    let pipeline = Pipeline::new(store.clone(), completion.clone(), options(5));

    let response = pipeline
        .handle(PipelineRequest::episodic("CUST-NEW", "I need to file a claim"))
        .await
        .expect("handle");

    assert_eq!(response.history_count, 0);
    assert_eq!(response.had_prior_history(), Some(false));
    let prompt = completion.last_prompt().expect("prompt");
    assert!(prompt.contains(NO_CONTEXT_SENTINEL));
    assert!(!prompt.contains("User: hi"));
    assert_eq!(store.items(&individual("CUST-NEW")).len(), 1);
}

#[tokio::test]
async fn semantic_request_uses_collective_knowledge() {
    let store = Arc::new(RecordingStore::new());
    store.seed(
        &collective(),
        "User: Who pays when a tree falls in a storm? | Assistant: The owner of the damaged \
property claims on their own policy unless the tree owner was negligent.",
    );
    let completion = Arc::new(RecordingCompletion::new(
        "Your own policy usually covers the garage.",
    ));
    let pipeline = Pipeline::new(store.clone(), completion.clone(), options(5));

    let response = pipeline
        .handle(PipelineRequest::semantic(
            "NEW-777",
            "My neighbor's tree fell on my garage during a storm",
        ))
        .await
        .expect("handle");

    assert_eq!(response.history_count, 1);
    assert_eq!(response.had_prior_history(), None);
    let prompt = completion.last_prompt().expect("prompt");
    assert!(prompt.contains("unless the tree owner was negligent"));
    assert!(!prompt.contains("NEW-777"));

    let adds = store.add_calls();
    assert_eq!(adds.len(), 1);
    assert_eq!(adds[0].scope, collective());
    assert_eq!(
        adds[0].metadata.get("scope"),
        Some(&Value::String("semantic".to_string()))
    );
    assert!(store.items(&individual("NEW-777")).is_empty());
}

#[tokio::test]
async fn semantic_requesters_share_one_scope() {
    let store = Arc::new(RecordingStore::new());
    let completion = Arc::new(FixedCompletion::new("answer"));
    let pipeline = Pipeline::new(store.clone(), completion, options(5));

    for requester in ["CUST-1", "CUST-2"] {
        pipeline
            .handle(PipelineRequest::semantic(requester, "roof hail coverage"))
            .await
            .expect("handle");
    }

    let scopes: Vec<_> = store
        .search_calls()
        .into_iter()
        .map(|call| call.scope)
        .collect();
    assert_eq!(scopes, vec![collective(), collective()]);
    assert_eq!(store.items(&collective()).len(), 2);
}

#[tokio::test]
async fn retrieve_failure_stops_before_generation() {
    let store = Arc::new(FailingStore::new());
    let completion = Arc::new(FixedCompletion::new("unused"));
    let pipeline = Pipeline::new(store.clone(), completion.clone(), options(5));

    let err = pipeline
        .handle(PipelineRequest::episodic("CUST-45678", "status of my claim"))
        .await
        .expect_err("store offline");

    assert_eq!(err.kind(), PipelineErrorKind::StoreUnavailable);
    assert!(matches!(
        err,
        PipelineError::StoreUnavailable {
            stage: PipelineStage::Retrieve,
            ..
        }
    ));
    assert_eq!(completion.calls(), 0);
    assert_eq!(store.add_count(), 0);
}

#[tokio::test]
async fn store_failure_after_generation_is_reported() {
    let store = Arc::new(FailingStore::failing_add());
    let completion = Arc::new(FixedCompletion::new("generated"));
    let pipeline = Pipeline::new(store.clone(), completion.clone(), options(5));

    let err = pipeline
        .handle(PipelineRequest::episodic("CUST-1", "question"))
        .await
        .expect_err("add fails");

    assert!(matches!(
        err,
        PipelineError::StoreUnavailable {
            stage: PipelineStage::Store,
            ..
        }
    ));
    assert_eq!(completion.calls(), 1);
    assert_eq!(store.add_count(), 1);
}

#[tokio::test]
async fn model_failure_is_tagged_and_nothing_is_stored() {
    let store = Arc::new(RecordingStore::new());
    let completion = Arc::new(FailingCompletion::new("backend returned 503"));
    let pipeline = Pipeline::new(store.clone(), completion.clone(), options(5));

    let err = pipeline
        .handle(PipelineRequest::episodic("CUST-1", "question"))
        .await
        .expect_err("model down");

    assert_eq!(err.kind(), PipelineErrorKind::ModelUnavailable);
    assert_eq!(completion.calls(), 1);
    assert!(store.add_calls().is_empty());
}

#[tokio::test]
async fn history_is_capped_by_recall_limit() {
    let store = Arc::new(RecordingStore::new());
    for idx in 0..8 {
        store.seed(&individual("CUST-1"), format!("claim {idx}"));
    }
    let pipeline = Pipeline::new(
        store.clone(),
        Arc::new(FixedCompletion::new("ok")),
        options(3),
    );

    let response = pipeline
        .handle(PipelineRequest::episodic("CUST-1", "claims"))
        .await
        .expect("handle");

    assert_eq!(response.history_count, 3);
    assert_eq!(store.search_calls()[0].limit, 3);
}

#[tokio::test]
async fn episodic_partitions_stay_isolated() {
    let store = Arc::new(RecordingStore::new());
    let completion = Arc::new(RecordingCompletion::new("noted"));
    let pipeline = Pipeline::new(store.clone(), completion.clone(), options(5));

    pipeline
        .handle(PipelineRequest::episodic("CUST-A", "my policy number is A-100"))
        .await
        .expect("first");
    let response = pipeline
        .handle(PipelineRequest::episodic("CUST-B", "what is my policy number"))
        .await
        .expect("second");

    assert_eq!(response.history_count, 0);
    let prompt = completion.last_prompt().expect("prompt");
    assert!(!prompt.contains("A-100"));
}

#[tokio::test]
async fn file_store_round_trip_across_requests() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(FileMemoryStore::new(temp.path()).expect("store"));
    store
        .add(
            &Exchange::new(
                "Is storm damage from a fallen tree covered?",
                "Yes, fallen tree damage from storms is covered under dwelling coverage.",
            ),
            &collective(),
            Metadata::new(),
        )
        .await
        .expect("seed");
    let completion = Arc::new(RecordingCompletion::new("Dwelling coverage applies.").with_responses(
        vec!["You are covered for the fallen tree.".to_string()],
    ));
    let pipeline = Pipeline::new(store.clone(), completion.clone(), options(5));

    let first = pipeline
        .handle(PipelineRequest::semantic(
            "NEW-1",
            "A tree fell on my shed in the storm",
        ))
        .await
        .expect("first");
    assert_eq!(first.response, "You are covered for the fallen tree.");
    assert_eq!(first.history_count, 1);

    let second = pipeline
        .handle(PipelineRequest::semantic("NEW-2", "storm tree damage"))
        .await
        .expect("second");
    assert_eq!(second.history_count, 2);
    assert_eq!(second.response, "Dwelling coverage applies.");

    let prompts = completion.prompts();
    assert!(prompts[1].contains("You are covered for the fallen tree."));

    let episodic = pipeline
        .recall(&PipelineRequest::episodic("NEW-1", "tree"), None)
        .await
        .expect("recall");
    assert!(episodic.is_empty());
}
