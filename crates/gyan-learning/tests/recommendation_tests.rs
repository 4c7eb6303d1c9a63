use crate::common::{TestStateBuilder, quiz, quiz_with_gaps};
use chrono::{Duration, Utc};
use gyan_adaptive::{MasteryRecord, RecommendationKind, recommend::NEW_TOPIC_LABEL};
use gyan_learning::{ProfileStore, recommendation::recommendations, submission::submit_quiz};

#[tokio::test]
async fn test_new_student_gets_new_topic() {
    let state = TestStateBuilder::new().build_in_memory();

    let list = recommendations(&state, "STU-1").await.unwrap();

    assert!(list.success);
    assert_eq!(list.recommendations.len(), 1);
    let only = &list.recommendations[0];
    assert_eq!(only.kind, RecommendationKind::NewTopic);
    assert_eq!(only.topic, NEW_TOPIC_LABEL);
    assert_eq!(only.action.route, "/study-plan");

    // Reading does not create a profile
    assert!(state.store.is_empty().await);
}

#[tokio::test]
async fn test_fresh_practice_is_not_due() {
    let state = TestStateBuilder::new().build_in_memory();
    submit_quiz(&state, quiz("STU-1", "Algebra", 9.0))
        .await
        .unwrap();

    let list = recommendations(&state, "STU-1").await.unwrap();

    assert_eq!(list.recommendations.len(), 1);
    assert_eq!(list.recommendations[0].kind, RecommendationKind::NewTopic);
}

#[tokio::test]
async fn test_open_gap_is_recommended_first() {
    let state = TestStateBuilder::new().build_in_memory();
    let outcome = submit_quiz(
        &state,
        quiz_with_gaps("STU-1", "Calculus", 3.0, &["Chain rule"]),
    )
    .await
    .unwrap();

    let list = recommendations(&state, "STU-1").await.unwrap();

    let first = &list.recommendations[0];
    assert_eq!(first.kind, RecommendationKind::Remedial);
    assert_eq!(first.sub_topic.as_deref(), Some("Chain rule"));
    assert_eq!(first.action.params["gapId"], outcome.new_gaps[0].id);
    assert_eq!(
        list.recommendations.last().unwrap().kind,
        RecommendationKind::NewTopic
    );
}

#[tokio::test]
async fn test_stale_topic_is_due_for_review() {
    let state = TestStateBuilder::new().build_in_memory();
    state
        .store
        .update_profile("STU-1", |profile| {
            profile.performance_data.insert(
                "Optics".to_string(),
                MasteryRecord {
                    score: 0.6,
                    stability: 1.0,
                    last_practiced: Some(Utc::now() - Duration::days(10)),
                    ..MasteryRecord::default()
                },
            );
            Ok(())
        })
        .await
        .unwrap();

    let list = recommendations(&state, "STU-1").await.unwrap();

    let review = &list.recommendations[0];
    assert_eq!(review.kind, RecommendationKind::Review);
    assert_eq!(review.topic, "Optics");
    assert_eq!(review.reason, "It's been 10 days since you practiced Optics.");
    assert_eq!(review.action.route, "/quiz/generate");
}

#[tokio::test]
async fn test_list_is_capped() {
    let state = TestStateBuilder::new().build_in_memory();
    submit_quiz(
        &state,
        quiz_with_gaps("STU-1", "Calculus", 2.0, &["Chain rule", "Limits", "Series"]),
    )
    .await
    .unwrap();
    submit_quiz(
        &state,
        quiz_with_gaps("STU-1", "Physics", 2.0, &["Torque"]),
    )
    .await
    .unwrap();

    let list = recommendations(&state, "STU-1").await.unwrap();

    assert_eq!(list.recommendations.len(), 3);
    assert!(
        list.recommendations
            .iter()
            .all(|r| r.kind == RecommendationKind::Remedial)
    );
}

#[tokio::test]
async fn test_invalid_student_id_is_rejected() {
    let state = TestStateBuilder::new().build_in_memory();

    let err = recommendations(&state, "").await.unwrap_err();
    assert_eq!(err.status_code(), 400);
}
