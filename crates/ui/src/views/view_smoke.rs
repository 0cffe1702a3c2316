use std::sync::Arc;

use async_trait::async_trait;
use dioxus::prelude::ReadableExt;
use quiz_core::Visibility;
use quiz_core::model::SessionSnapshot;
use services::bundled_bank;
use storage::repository::{InMemoryRepository, KeyValueRepository, Storage, StorageError};
use tokio::sync::Notify;

use super::test_harness::{
    setup_view_harness, setup_view_harness_unloaded, setup_view_harness_with_storage,
};
use crate::vm::QuizIntent;

/// Holds reads until the test releases them.
struct HeldReads {
    inner: InMemoryRepository,
    release: Arc<Notify>,
}

#[async_trait]
impl KeyValueRepository for HeldReads {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.release.notified().await;
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.put(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.inner.delete(key).await
    }
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_starts_blocked() {
    let harness = setup_view_harness().await;
    let html = harness.render();
    assert!(
        html.contains("Please take the test in full view mode."),
        "missing blocker in {html}"
    );
    assert!(html.contains("Enter Full Screen"), "missing control in {html}");
    assert!(!html.contains("Question 1 / 10"), "question leaked in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_answers_and_advances() {
    let mut harness = setup_view_harness().await;
    let bank = bundled_bank().unwrap();
    harness.with_guard(|guard| {
        guard.on_fullscreen_change(true);
    });

    let html = harness.render();
    assert!(html.contains("Question 1 / 10"), "missing progress in {html}");
    assert!(html.contains(bank.get(0).unwrap().prompt()), "missing prompt in {html}");

    let answer = bank.get(0).unwrap().correct_answer().to_string();
    harness.dispatch(QuizIntent::Select(answer.clone()));
    harness.dispatch(QuizIntent::Advance);
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Question 2 / 10"), "did not advance in {html}");

    let stored = harness.storage.snapshots().load().await.unwrap().unwrap();
    assert_eq!(stored.current_question, 0);
    assert_eq!(stored.selected_option.as_deref(), Some(answer.as_str()));
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_shows_violation_notice_once_per_hidden_edge() {
    let mut harness = setup_view_harness().await;
    harness.with_guard(|guard| {
        guard.on_fullscreen_change(true);
        guard.on_visibility_change(Visibility::Hidden);
        guard.on_visibility_change(Visibility::Hidden);
    });

    let html = harness.render();
    assert!(
        html.contains("You have 1 violation(s) for moving from the screen."),
        "missing violation notice in {html}"
    );

    harness.with_guard(|guard| {
        guard.on_visibility_change(Visibility::Visible);
    });
    let html = harness.render();
    assert!(html.contains("Question 1 / 10"), "question not restored in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_resumes_stored_session() {
    let storage = Storage::in_memory();
    let bank = bundled_bank().unwrap();
    let selected = bank.get(3).unwrap().options()[1].clone();
    storage
        .snapshots()
        .save(&SessionSnapshot {
            current_question: 3,
            selected_option: Some(selected),
            violations: 2,
            marks: 1,
        })
        .await
        .unwrap();

    let mut harness = setup_view_harness_with_storage(storage).await;
    harness.with_guard(|guard| {
        guard.on_fullscreen_change(true);
    });
    let html = harness.render();
    assert!(html.contains("Question 4 / 10"), "did not resume in {html}");

    let violations = harness.handles.guard();
    let count = harness.dom.in_runtime(|| violations.peek().violation_count());
    assert_eq!(count, 2);
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_completes_and_restarts() {
    let mut harness = setup_view_harness().await;
    let bank = bundled_bank().unwrap();
    harness.with_guard(|guard| {
        guard.on_fullscreen_change(true);
    });

    for question in bank.questions() {
        harness.dispatch(QuizIntent::Select(question.correct_answer().to_string()));
        harness.dispatch(QuizIntent::Advance);
        harness.drive_async().await;
    }

    let html = harness.render();
    assert!(html.contains("Quiz Completed!"), "missing completion in {html}");
    assert!(html.contains("Your marks: 10 / 10"), "missing marks in {html}");
    assert!(html.contains("Violations: 0"), "missing violations in {html}");

    harness.dispatch(QuizIntent::Restart);
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Question 1 / 10"), "did not restart in {html}");
    assert_eq!(harness.storage.snapshots().load().await.unwrap(), None);
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_keeps_hidden_edges_seen_while_loading() {
    let inner = InMemoryRepository::new();
    Storage {
        kv: Arc::new(inner.clone()),
    }
    .snapshots()
    .save(&SessionSnapshot {
        current_question: 2,
        selected_option: None,
        violations: 2,
        marks: 1,
    })
    .await
    .unwrap();

    let release = Arc::new(Notify::new());
    let storage = Storage {
        kv: Arc::new(HeldReads {
            inner,
            release: Arc::clone(&release),
        }),
    };
    let mut harness = setup_view_harness_unloaded(storage);
    let html = harness.render();
    assert!(html.contains("Loading..."), "load finished early in {html}");

    harness.with_guard(|guard| {
        guard.on_fullscreen_change(true);
        guard.on_visibility_change(Visibility::Hidden);
    });
    release.notify_one();
    harness.drive_async().await;

    let html = harness.render();
    assert!(
        html.contains("You have 3 violation(s) for moving from the screen."),
        "violations during load were lost in {html}"
    );

    harness.with_guard(|guard| {
        guard.on_visibility_change(Visibility::Visible);
    });
    let html = harness.render();
    assert!(html.contains("Question 3 / 10"), "did not resume in {html}");
}
