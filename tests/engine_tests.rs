//! End-to-end tests for the profile engine over the in-memory
//! repositories: refresh cadences, cache invalidation, and the
//! serialization guarantee for concurrent bursts.

use std::sync::Arc;

use darsak_core::engine::ProfileEngine;
use darsak_core::interactions::InteractionLog;
use darsak_core::persistence::{InteractionRepository, MemoryProfileStore, ProfileRepository};
use darsak_core::types::{
    ConfusionLevel, Interaction, Methodology, QuestionType, Role, StudentLevel, TeachingContext,
    Trend,
};
use darsak_core::{CoreConfig, CoreError};

const FIXED_TIMESTAMP: i64 = 1_700_000_000_000;

fn sample_interaction(student_id: &str, concept: &str, success: f64, seq: i64) -> Interaction {
    Interaction {
        id: String::new(),
        student_id: student_id.to_string(),
        session_id: "session-1".to_string(),
        concept: concept.to_string(),
        subject: "mathematics".to_string(),
        methodology: "worked_example".to_string(),
        success,
        difficulty: 5,
        response_time_seconds: 45.0,
        timestamp_ms: FIXED_TIMESTAMP + seq * 60_000,
    }
}

fn sample_context() -> TeachingContext {
    TeachingContext {
        student_level: StudentLevel::Beginner,
        subject: "mathematics".to_string(),
        question_type: QuestionType::Procedural,
        confusion_level: ConfusionLevel::None,
        previous_attempts: 0,
        preferred_style: None,
    }
}

async fn engine_with_student(student_id: &str) -> (Arc<ProfileEngine>, Arc<MemoryProfileStore>) {
    let log = Arc::new(InteractionLog::new());
    let store = Arc::new(MemoryProfileStore::new());
    store.register_student(student_id).await;
    let engine = Arc::new(ProfileEngine::new(
        CoreConfig::default(),
        log as Arc<dyn InteractionRepository>,
        store.clone(),
    ));
    (engine, store)
}

#[tokio::test]
async fn unknown_student_is_a_hard_error() {
    let (engine, _) = engine_with_student("s1").await;
    let err = engine
        .record_interaction(sample_interaction("ghost", "fractions", 0.8, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::UnknownStudent(id) if id == "ghost"));

    let err = engine.refresh_learning_style("ghost").await.unwrap_err();
    assert!(matches!(err, CoreError::UnknownStudent(_)));
}

#[tokio::test]
async fn recording_assigns_ids_and_sanitizes() {
    let (engine, _) = engine_with_student("s1").await;
    let mut raw = sample_interaction("s1", "fractions", 1.5, 0);
    raw.difficulty = 12;
    let stored = engine.record_interaction(raw).await.unwrap();
    assert!(!stored.id.is_empty());
    assert_eq!(stored.success, 1.0);
    assert_eq!(stored.difficulty, 10);
}

#[tokio::test]
async fn mastery_refresh_counts_all_attempts() {
    let (engine, store) = engine_with_student("s1").await;
    for i in 0..8 {
        engine
            .record_interaction(sample_interaction("s1", "fractions", 0.9, i))
            .await
            .unwrap();
    }
    let record = engine
        .refresh_concept_mastery("s1", "fractions")
        .await
        .unwrap();
    assert_eq!(record.attempts_count, 8);
    assert!(record.mastery_level > 0);
    assert_eq!(record.last_practiced_ms, FIXED_TIMESTAMP + 7 * 60_000);
    assert_eq!(record.version, 1);

    // A second refresh is an upsert, not an append.
    let again = engine
        .refresh_concept_mastery("s1", "fractions")
        .await
        .unwrap();
    assert_eq!(again.attempts_count, 8);
    assert_eq!(again.version, 2);
    let stored = store.load_mastery("s1", "fractions").await.unwrap().unwrap();
    assert_eq!(stored.version, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_burst_loses_no_attempts() {
    let (engine, _) = engine_with_student("s1").await;
    let mut handles = Vec::new();
    for i in 0..20 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine
                .record_interaction(sample_interaction("s1", "fractions", 0.7, i))
                .await
                .unwrap();
            engine
                .refresh_concept_mastery("s1", "fractions")
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let record = engine
        .refresh_concept_mastery("s1", "fractions")
        .await
        .unwrap();
    assert_eq!(record.attempts_count, 20);
}

#[tokio::test]
async fn style_refresh_is_idempotent() {
    let (engine, _) = engine_with_student("s1").await;
    let methods = ["visual_demo", "socratic", "worked_example", "problem_based"];
    for i in 0..40 {
        let mut interaction =
            sample_interaction("s1", "fractions", if i % 3 == 0 { 0.5 } else { 0.9 }, i);
        interaction.methodology = methods[i as usize % methods.len()].to_string();
        engine.record_interaction(interaction).await.unwrap();
    }

    let first = engine.refresh_learning_style("s1").await.unwrap();
    let second = engine.refresh_learning_style("s1").await.unwrap();
    assert_eq!(first.preferences.visual, second.preferences.visual);
    assert_eq!(first.preferences.reading, second.preferences.reading);
    assert_eq!(first.confidence, second.confidence);
    assert_eq!(first.optimal_pace, second.optimal_pace);
    assert_eq!(first.sample_count, second.sample_count);
    assert!((first.preferences.sum() - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn sparse_student_gets_neutral_profile() {
    let (engine, _) = engine_with_student("s1").await;
    for i in 0..3 {
        engine
            .record_interaction(sample_interaction("s1", "fractions", 1.0, i))
            .await
            .unwrap();
    }
    let profile = engine.refresh_learning_style("s1").await.unwrap();
    assert_eq!(profile.preferences.visual, 25.0);
    assert_eq!(profile.confidence, 0.1);

    // The read path serves the same default when nothing was ever computed.
    let served = engine.style_profile("s1").await.unwrap();
    assert_eq!(served.preferences.reading, 25.0);
}

#[tokio::test]
async fn process_interaction_can_score_synchronously() {
    let (engine, _) = engine_with_student("s1").await;
    let ctx = sample_context();
    let (record, recommendation) = engine
        .process_interaction(sample_interaction("s1", "fractions", 0.8, 0), Some(&ctx))
        .await
        .unwrap();
    assert!(!record.id.is_empty());
    let rec = recommendation.unwrap();
    // beginner + procedural + "mathematics" is the worked-example case.
    assert_eq!(rec.method, Methodology::WorkedExample);
    assert_eq!(rec.score, 12.0);

    let (_, none) = engine
        .process_interaction(sample_interaction("s1", "fractions", 0.8, 1), None)
        .await
        .unwrap();
    assert!(none.is_none());
}

#[tokio::test]
async fn short_histories_report_conservative_defaults() {
    let (engine, _) = engine_with_student("s1").await;
    // Rising success over only three records is still "stable".
    for (i, success) in [0.6, 0.8, 0.9].into_iter().enumerate() {
        engine
            .record_interaction(sample_interaction("s1", "limits", success, i as i64))
            .await
            .unwrap();
    }
    let report = engine.progress_report("s1", "limits").await.unwrap();
    assert_eq!(report.trend, Trend::Stable);
    // Under five records velocity is 0, so the estimate is undeterminable.
    assert_eq!(report.learning_velocity, 0.0);
    assert_eq!(report.estimated_hours_to_mastery, -1);
    assert_eq!(report.retention_rate, 0.5);
}

#[tokio::test]
async fn mastered_concept_reports_zero_hours() {
    let (engine, _) = engine_with_student("s1").await;
    for i in 0..12 {
        engine
            .record_interaction(sample_interaction("s1", "addition", 1.0, i))
            .await
            .unwrap();
    }
    let report = engine.progress_report("s1", "addition").await.unwrap();
    assert_eq!(report.current_mastery, 100);
    assert_eq!(report.estimated_hours_to_mastery, 0);

    let record = engine
        .refresh_concept_mastery("s1", "addition")
        .await
        .unwrap();
    assert_eq!(record.estimated_minutes_to_mastery, 0);
}

#[tokio::test]
async fn refresh_student_mastery_covers_every_concept() {
    let (engine, _) = engine_with_student("s1").await;
    for i in 0..4 {
        engine
            .record_interaction(sample_interaction("s1", "fractions", 0.8, i))
            .await
            .unwrap();
        engine
            .record_interaction(sample_interaction("s1", "limits", 0.4, i + 10))
            .await
            .unwrap();
    }
    let refreshed = engine.refresh_student_mastery("s1").await.unwrap();
    let mut concepts: Vec<&str> = refreshed.iter().map(|r| r.concept.as_str()).collect();
    concepts.sort();
    assert_eq!(concepts, vec!["fractions", "limits"]);
}

#[tokio::test]
async fn batch_style_refresh_skips_nothing_registered() {
    let log = Arc::new(InteractionLog::new());
    let store = Arc::new(MemoryProfileStore::new());
    store.register_student("s1").await;
    store.register_student("s2").await;
    let engine = ProfileEngine::new(
        CoreConfig::default(),
        log as Arc<dyn InteractionRepository>,
        store,
    );
    let refreshed = engine.refresh_all_learning_styles().await.unwrap();
    assert_eq!(refreshed, 2);
}

#[tokio::test]
async fn role_adaptation_reaches_through_the_engine() {
    let (engine, _) = engine_with_student("s1").await;
    let ctx = sample_context();
    let admin = engine
        .recommend_for_role("s1", &ctx, Role::Admin)
        .await
        .unwrap();
    assert!(admin.next_steps.is_empty());
    assert!(admin.follow_up_questions.is_empty());

    let student = engine
        .recommend_for_role("s1", &ctx, Role::Student)
        .await
        .unwrap();
    assert!(!student.next_steps.is_empty());
}
