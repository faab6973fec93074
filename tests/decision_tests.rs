//! Scorer and adaptation behavior at the crate boundary: the additive
//! table, tie-breaking, overrides, and role fan-out.

use darsak_core::decision::{AdaptationRegistry, MethodologyScorer};
use darsak_core::types::{
    ConfusionLevel, LearningStyleProfile, Methodology, QuestionType, Role, StudentLevel,
    StylePreferences, TeachingContext,
};

fn context(subject: &str) -> TeachingContext {
    TeachingContext {
        student_level: StudentLevel::Intermediate,
        subject: subject.to_string(),
        question_type: QuestionType::Conceptual,
        confusion_level: ConfusionLevel::None,
        previous_attempts: 0,
        preferred_style: None,
    }
}

#[test]
fn worked_example_case_from_the_scoring_table() {
    let scorer = MethodologyScorer::default();
    let ctx = TeachingContext {
        student_level: StudentLevel::Beginner,
        subject: "mathematics".to_string(),
        question_type: QuestionType::Procedural,
        confusion_level: ConfusionLevel::None,
        previous_attempts: 0,
        preferred_style: None,
    };
    let rec = scorer.recommend(&ctx, None);
    assert_eq!(rec.method, Methodology::WorkedExample);
    assert_eq!(rec.score, 12.0);
    assert!(!rec.next_steps.is_empty());
    assert!(!rec.follow_up_questions.is_empty());
}

#[test]
fn priority_order_settles_exact_ties() {
    let scorer = MethodologyScorer::default();
    // Advanced + analytical puts socratic and problem_based both at 10.
    let ctx = TeachingContext {
        student_level: StudentLevel::Advanced,
        question_type: QuestionType::Analytical,
        ..context("physics")
    };
    let rec = scorer.recommend(&ctx, None);
    assert_eq!(rec.method, Methodology::Socratic);
}

#[test]
fn history_keyword_boosts_narrative_in_both_languages() {
    let scorer = MethodologyScorer::default();
    for subject in ["world history", "تاريخ العالم"] {
        let mut ctx = context(subject);
        ctx.question_type = QuestionType::Factual;
        let rec = scorer.recommend(&ctx, None);
        assert_eq!(rec.method, Methodology::Narrative, "subject: {subject}");
    }
}

#[test]
fn programming_keyword_stacks_with_level() {
    let scorer = MethodologyScorer::default();
    let ctx = TeachingContext {
        student_level: StudentLevel::Beginner,
        question_type: QuestionType::Procedural,
        ..context("برمجة بايثون")
    };
    let rec = scorer.recommend(&ctx, None);
    // worked_example: 5 + 2 (beginner) + 3 (procedural) + 2 (programming).
    assert_eq!(rec.method, Methodology::WorkedExample);
    assert_eq!(rec.score, 12.0);
}

#[test]
fn override_wins_regardless_of_context() {
    let scorer = MethodologyScorer::default();
    for method in Methodology::PRIORITY {
        let mut ctx = context("mathematics");
        ctx.confusion_level = ConfusionLevel::High;
        ctx.preferred_style = Some(method);
        let rec = scorer.recommend(&ctx, None);
        assert_eq!(rec.method, method);
        assert_eq!(rec.confidence, 1.0);
    }
}

#[test]
fn recommendation_is_reproducible_with_profile() {
    let scorer = MethodologyScorer::default();
    let mut profile = LearningStyleProfile::neutral("s1", 0);
    profile.confidence = 0.9;
    profile.preferences = StylePreferences {
        visual: 40.0,
        auditory: 30.0,
        kinesthetic: 20.0,
        reading: 10.0,
    };
    let ctx = context("art");
    let a = scorer.recommend(&ctx, Some(&profile));
    let b = scorer.recommend(&ctx, Some(&profile));
    assert_eq!(a.method, b.method);
    assert_eq!(a.score, b.score);
    assert_eq!(a.reasoning, b.reasoning);
    assert_eq!(a.next_steps, b.next_steps);
}

#[test]
fn reasoning_names_the_dominant_signals() {
    let scorer = MethodologyScorer::default();
    let ctx = TeachingContext {
        student_level: StudentLevel::Beginner,
        question_type: QuestionType::Factual,
        confusion_level: ConfusionLevel::High,
        ..context("biology")
    };
    let rec = scorer.recommend(&ctx, None);
    assert_eq!(rec.method, Methodology::DirectInstruction);
    assert!(rec.reasoning.contains("student level beginner"));
    assert!(rec.reasoning.contains("question type factual"));
    // The audit trail keeps every positive adjustment, largest first.
    assert!(rec.adjustments.windows(2).all(|w| w[0].delta >= w[1].delta));
}

#[test]
fn every_role_has_a_default_policy() {
    let registry = AdaptationRegistry::with_defaults();
    let scorer = MethodologyScorer::default();
    let rec = scorer.recommend(&context("mathematics"), None);
    for role in [
        Role::Student,
        Role::Instructor,
        Role::Admin,
        Role::ContentCreator,
        Role::Mentor,
    ] {
        let adapted = registry.adapt_for(role, &rec);
        assert_eq!(adapted.method, rec.method);
        assert_eq!(adapted.score, rec.score);
    }
}

#[test]
fn instructor_and_mentor_prepend_framing() {
    let registry = AdaptationRegistry::with_defaults();
    let scorer = MethodologyScorer::default();
    let rec = scorer.recommend(&context("mathematics"), None);
    let instructor = registry.adapt_for(Role::Instructor, &rec);
    assert!(instructor.next_steps.len() > rec.next_steps.len());
    let mentor = registry.adapt_for(Role::Mentor, &rec);
    assert!(mentor.next_steps[0].contains("acknowledging"));
}
