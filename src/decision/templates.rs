use crate::types::Methodology;

/// Static next-step and follow-up material attached to a recommendation.
pub struct StrategyTemplate {
    pub next_steps: &'static [&'static str],
    pub follow_up_questions: &'static [&'static str],
}

pub fn template_for(method: Methodology) -> &'static StrategyTemplate {
    match method {
        Methodology::DirectInstruction => &StrategyTemplate {
            next_steps: &[
                "State the rule or definition plainly, then show one canonical case",
                "Check recall with a short closed question before moving on",
            ],
            follow_up_questions: &[
                "Can you restate the rule in your own words?",
                "Which part of the definition matters most here?",
            ],
        },
        Methodology::Socratic => &StrategyTemplate {
            next_steps: &[
                "Ask a probing question instead of giving the answer",
                "Let the student articulate the contradiction before resolving it",
            ],
            follow_up_questions: &[
                "What would happen if the opposite were true?",
                "What assumption is that conclusion resting on?",
            ],
        },
        Methodology::WorkedExample => &StrategyTemplate {
            next_steps: &[
                "Walk through a fully solved example step by step",
                "Fade the support: leave the last step for the student",
            ],
            follow_up_questions: &[
                "Which step would change if the numbers were different?",
                "Can you solve a near-identical problem on your own now?",
            ],
        },
        Methodology::ProblemBased => &StrategyTemplate {
            next_steps: &[
                "Pose an open problem before introducing any theory",
                "Debrief the attempted strategies, successful or not",
            ],
            follow_up_questions: &[
                "What did you try first, and why?",
                "Where exactly did the approach break down?",
            ],
        },
        Methodology::Scaffolding => &StrategyTemplate {
            next_steps: &[
                "Break the task into ordered sub-goals with hints available",
                "Remove one layer of support each time a sub-goal lands",
            ],
            follow_up_questions: &[
                "Which sub-step still feels shaky?",
                "Can you do the same task with one fewer hint?",
            ],
        },
        Methodology::Narrative => &StrategyTemplate {
            next_steps: &[
                "Frame the concept inside a short story or historical account",
                "Ask the student to retell the story with the concept in place",
            ],
            follow_up_questions: &[
                "How does the story map onto the concept?",
                "What changes in the story if the concept is violated?",
            ],
        },
        Methodology::AnalogyBased => &StrategyTemplate {
            next_steps: &[
                "Anchor the new idea to something the student already knows",
                "Stress-test the analogy: find where it stops holding",
            ],
            follow_up_questions: &[
                "Where does the analogy break down?",
                "Can you propose a better analogy of your own?",
            ],
        },
        Methodology::VisualDemo => &StrategyTemplate {
            next_steps: &[
                "Sketch or animate the structure before any formalism",
                "Have the student annotate the diagram themselves",
            ],
            follow_up_questions: &[
                "What does each part of the diagram correspond to?",
                "How would the picture change for the edge case?",
            ],
        },
    }
}
