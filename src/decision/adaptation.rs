use crate::types::{MethodologyRecommendation, Role};
use std::collections::HashMap;

/// Reshapes a recommendation for one audience role. Policies are looked up
/// in the registry so new roles can be added without touching the scorer.
pub trait AdaptationPolicy: Send + Sync {
    fn adapt(&self, recommendation: &mut MethodologyRecommendation);
}

pub struct AdaptationRegistry {
    policies: HashMap<Role, Box<dyn AdaptationPolicy>>,
}

impl AdaptationRegistry {
    pub fn empty() -> Self {
        Self {
            policies: HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Role::Student, Box::new(StudentView));
        registry.register(Role::Instructor, Box::new(InstructorView));
        registry.register(Role::Admin, Box::new(AdminView));
        registry.register(Role::ContentCreator, Box::new(ContentCreatorView));
        registry.register(Role::Mentor, Box::new(MentorView));
        registry
    }

    pub fn register(&mut self, role: Role, policy: Box<dyn AdaptationPolicy>) {
        self.policies.insert(role, policy);
    }

    /// Returns an adapted copy; roles without a registered policy see the
    /// recommendation unchanged.
    pub fn adapt_for(
        &self,
        role: Role,
        recommendation: &MethodologyRecommendation,
    ) -> MethodologyRecommendation {
        let mut adapted = recommendation.clone();
        if let Some(policy) = self.policies.get(&role) {
            policy.adapt(&mut adapted);
        }
        adapted
    }
}

impl Default for AdaptationRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// The learner is already the audience the scorer writes for.
struct StudentView;

impl AdaptationPolicy for StudentView {
    fn adapt(&self, _recommendation: &mut MethodologyRecommendation) {}
}

struct InstructorView;

impl AdaptationPolicy for InstructorView {
    fn adapt(&self, recommendation: &mut MethodologyRecommendation) {
        recommendation.next_steps.insert(
            0,
            format!(
                "Plan the next session around '{}' and watch whether the signals in the rationale persist",
                recommendation.method.as_str()
            ),
        );
    }
}

struct AdminView;

impl AdaptationPolicy for AdminView {
    fn adapt(&self, recommendation: &mut MethodologyRecommendation) {
        // Oversight surfaces keep the decision and its score, not the
        // learner-facing material.
        recommendation.next_steps.clear();
        recommendation.follow_up_questions.clear();
    }
}

struct ContentCreatorView;

impl AdaptationPolicy for ContentCreatorView {
    fn adapt(&self, recommendation: &mut MethodologyRecommendation) {
        if recommendation.confidence < 0.5 {
            recommendation.next_steps.push(format!(
                "Low-confidence selection: consider authoring more '{}' material for this subject",
                recommendation.method.as_str()
            ));
        }
    }
}

struct MentorView;

impl AdaptationPolicy for MentorView {
    fn adapt(&self, recommendation: &mut MethodologyRecommendation) {
        recommendation.next_steps.insert(
            0,
            "Open by acknowledging recent effort before switching approach".to_string(),
        );
    }
}
