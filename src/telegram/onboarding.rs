//! Onboarding conversation: a linear questionnaire that ends in a profile
//!
//! The step machine here is pure. The dispatcher loads the current state,
//! calls [`advance`] with the user's answer, and carries out the outcome
//! (send prompt, save state, persist profile).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use teloxide::types::{KeyboardButton, KeyboardMarkup};

/// Steps of the questionnaire, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OnboardingStep {
    Start,
    Goal,
    Event,
    TimeAvailable,
    TrainingDays,
    CurrentTraining,
    Experience,
    Injuries,
    Preferences,
    Done,
}

/// A question with optional one-tap answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prompt {
    pub text: &'static str,
    pub suggestions: &'static [&'static [&'static str]],
}

impl Prompt {
    /// Suggested-reply keyboard, if the prompt has suggestions
    pub fn keyboard(&self) -> Option<KeyboardMarkup> {
        if self.suggestions.is_empty() {
            return None;
        }
        let rows = self
            .suggestions
            .iter()
            .map(|row| row.iter().map(|label| KeyboardButton::new(*label)).collect::<Vec<_>>());
        Some(KeyboardMarkup::new(rows).resize_keyboard().one_time_keyboard())
    }
}

pub const DONE_TEXT: &str = "✅ Thanks, your training profile is saved! Ask me anything with /coach <question>.";
pub const CANCEL_TEXT: &str = "Onboarding cancelled. Send /onboard whenever you want to start again.";
pub const NOTHING_TO_CANCEL_TEXT: &str = "Nothing to cancel. Send /onboard to set up your training profile.";

impl OnboardingStep {
    /// Answer field stored while in this step
    pub fn field(self) -> Option<&'static str> {
        match self {
            Self::Goal => Some("goal"),
            Self::Event => Some("event"),
            Self::TimeAvailable => Some("time_available"),
            Self::TrainingDays => Some("training_days"),
            Self::CurrentTraining => Some("current_training"),
            Self::Experience => Some("experience"),
            Self::Injuries => Some("injuries"),
            Self::Preferences => Some("preferences"),
            Self::Start | Self::Done => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Start => Self::Goal,
            Self::Goal => Self::Event,
            Self::Event => Self::TimeAvailable,
            Self::TimeAvailable => Self::TrainingDays,
            Self::TrainingDays => Self::CurrentTraining,
            Self::CurrentTraining => Self::Experience,
            Self::Experience => Self::Injuries,
            Self::Injuries => Self::Preferences,
            Self::Preferences | Self::Done => Self::Done,
        }
    }

    /// Question sent when entering this step
    pub fn prompt(self) -> Option<Prompt> {
        let prompt = match self {
            Self::Goal => Prompt {
                text: "🏁 Let's set up your training profile (send /cancel to stop).\n\nWhat is your main goal right now?",
                suggestions: &[&["Finish a race", "Get faster"], &["Build strength", "General fitness"]],
            },
            Self::Event => Prompt {
                text: "📅 Are you training for a specific event? Tell me the name and date, or say \"none\".",
                suggestions: &[&["None"]],
            },
            Self::TimeAvailable => Prompt {
                text: "⏱ How many hours per week can you train?",
                suggestions: &[&["< 3 h", "3-5 h"], &["5-8 h", "8+ h"]],
            },
            Self::TrainingDays => Prompt {
                text: "🗓 How many days per week can you train?",
                suggestions: &[&["2", "3", "4"], &["5", "6", "7"]],
            },
            Self::CurrentTraining => Prompt {
                text: "🏃 Describe your current training in a sentence or two.",
                suggestions: &[],
            },
            Self::Experience => Prompt {
                text: "📈 How would you rate your experience?",
                suggestions: &[&["Beginner", "Intermediate", "Advanced"]],
            },
            Self::Injuries => Prompt {
                text: "🩹 Any injuries or limitations I should know about?",
                suggestions: &[&["None"]],
            },
            Self::Preferences => Prompt {
                text: "⭐ Last one: any preferences? Indoor or outdoor, gym access, favourite sessions...",
                suggestions: &[&["No preference"]],
            },
            Self::Start | Self::Done => return None,
        };
        Some(prompt)
    }
}

/// Progress of one user through the questionnaire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingState {
    pub step: OnboardingStep,
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
}

/// What the dispatcher must do after an answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Save `state` and ask `prompt`
    Continue { state: OnboardingState, prompt: Prompt },
    /// Persist the answers, acknowledge, clear the state
    Completed { answers: BTreeMap<String, String> },
}

/// Starts (or restarts) the questionnaire: empty answers, first question.
pub fn begin() -> StepOutcome {
    let step = OnboardingStep::Start.next();
    StepOutcome::Continue {
        state: OnboardingState {
            step,
            answers: BTreeMap::new(),
        },
        prompt: first_prompt(),
    }
}

/// Records `answer` for the current step and moves on.
///
/// A state that was somehow saved at `Start` or `Done` restarts the
/// questionnaire instead of storing anything.
pub fn advance(mut state: OnboardingState, answer: &str) -> StepOutcome {
    let Some(field) = state.step.field() else {
        return begin();
    };
    state.answers.insert(field.to_string(), answer.to_string());

    let next = state.step.next();
    match next.prompt() {
        Some(prompt) => {
            state.step = next;
            StepOutcome::Continue { state, prompt }
        }
        None => StepOutcome::Completed { answers: state.answers },
    }
}

fn first_prompt() -> Prompt {
    match OnboardingStep::Goal.prompt() {
        Some(prompt) => prompt,
        None => Prompt {
            text: "What is your main goal right now?",
            suggestions: &[],
        },
    }
}
