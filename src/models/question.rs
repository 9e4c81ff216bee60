use serde::{Deserialize, Serialize};

/// Closed set of question type tags. Content normalization dispatches on
/// this; tags outside the set pass through untouched so newer documents
/// survive older code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoiceSingle,
    MultipleChoiceMultiple,
    TrueFalseNotGiven,
    YesNoNotGiven,
    ShortAnswer,
    SentenceCompletion,
    MatchingHeadings,
    Essay,
    SpeakingPrompt,
}

impl QuestionType {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "multiple_choice_single" => Some(QuestionType::MultipleChoiceSingle),
            "multiple_choice_multiple" => Some(QuestionType::MultipleChoiceMultiple),
            "true_false_not_given" => Some(QuestionType::TrueFalseNotGiven),
            "yes_no_not_given" => Some(QuestionType::YesNoNotGiven),
            "short_answer" => Some(QuestionType::ShortAnswer),
            "sentence_completion" => Some(QuestionType::SentenceCompletion),
            "matching_headings" => Some(QuestionType::MatchingHeadings),
            "essay" => Some(QuestionType::Essay),
            "speaking_prompt" => Some(QuestionType::SpeakingPrompt),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoiceSingle => "multiple_choice_single",
            QuestionType::MultipleChoiceMultiple => "multiple_choice_multiple",
            QuestionType::TrueFalseNotGiven => "true_false_not_given",
            QuestionType::YesNoNotGiven => "yes_no_not_given",
            QuestionType::ShortAnswer => "short_answer",
            QuestionType::SentenceCompletion => "sentence_completion",
            QuestionType::MatchingHeadings => "matching_headings",
            QuestionType::Essay => "essay",
            QuestionType::SpeakingPrompt => "speaking_prompt",
        }
    }
}
