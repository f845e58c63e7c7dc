//! Risk-profiling questionnaire: the static question catalog and the
//! answer record built up while a user works through it.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of the question that captures the sovereignty preference.
pub const SOVEREIGNTY_QUESTION: &str = "sovereignty";

pub const MIN_OPTION_VALUE: u8 = 1;
pub const MAX_OPTION_VALUE: u8 = 4;

/// Thematic preference an option can signal independently of its risk weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Sovereignty,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionOption {
    pub id: String,
    pub text: String,
    pub value: u8,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub signals: Vec<Theme>,
}

impl QuestionOption {
    pub fn signals(&self, theme: Theme) -> bool {
        self.signals.contains(&theme)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<QuestionOption>,
}

impl Question {
    pub fn option(&self, option_id: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// Ids of the `n` highest-valued options. Ties keep catalog order.
    pub fn top_option_ids(&self, n: usize) -> Vec<&str> {
        let mut ranked: Vec<&QuestionOption> = self.options.iter().collect();
        ranked.sort_by(|a, b| b.value.cmp(&a.value));
        ranked.into_iter().take(n).map(|o| o.id.as_str()).collect()
    }
}

fn question(id: &str, prompt: &str, options: &[(&str, u8)]) -> Question {
    Question {
        id: id.to_string(),
        prompt: prompt.to_string(),
        options: options
            .iter()
            .enumerate()
            .map(|(i, (text, value))| QuestionOption {
                id: format!("{}-{}", id, i + 1),
                text: text.to_string(),
                value: *value,
                signals: Vec::new(),
            })
            .collect(),
    }
}

fn signal(question: &mut Question, option_id: &str, theme: Theme) {
    if let Some(opt) = question.options.iter_mut().find(|o| o.id == option_id) {
        opt.signals.push(theme);
    }
}

static CATALOG: Lazy<Vec<Question>> = Lazy::new(|| {
    let mut sovereignty = question(
        SOVEREIGNTY_QUESTION,
        "How important is it that your savings finance French and European companies?",
        &[
            ("Not important, only performance matters", 1),
            ("Somewhat important, all else being equal", 2),
            ("Important, I would accept a narrower choice", 3),
            ("Essential, I want a sovereign portfolio", 4),
        ],
    );
    signal(&mut sovereignty, "sovereignty-3", Theme::Sovereignty);
    signal(&mut sovereignty, "sovereignty-4", Theme::Sovereignty);

    let mut objective = question(
        "objective",
        "What is your main objective for this investment?",
        &[
            ("Preserve my capital", 1),
            ("Generate regular income", 2),
            ("Grow my savings by backing French and European industry", 3),
            ("Maximise long-term growth", 4),
        ],
    );
    signal(&mut objective, "objective-3", Theme::Sovereignty);

    vec![
        question(
            "horizon",
            "How long do you plan to keep this money invested?",
            &[
                ("Less than 2 years", 1),
                ("2 to 5 years", 2),
                ("5 to 10 years", 3),
                ("More than 10 years", 4),
            ],
        ),
        question(
            "experience",
            "How would you describe your investing experience?",
            &[
                ("None, I only use savings accounts", 1),
                ("I hold a few funds or life insurance contracts", 2),
                ("I regularly invest in funds and individual stocks", 3),
                ("I actively manage my own portfolio", 4),
            ],
        ),
        question(
            "loss_reaction",
            "Your portfolio loses 20% in one month. What do you do?",
            &[
                ("Sell everything to stop the losses", 1),
                ("Sell part of it", 2),
                ("Hold and wait for a recovery", 3),
                ("Invest more while prices are low", 4),
            ],
        ),
        question(
            "income_stability",
            "How stable are your income and professional situation?",
            &[
                ("Uncertain, I could lose my income soon", 1),
                ("Somewhat unstable", 2),
                ("Stable", 3),
                ("Very stable with income growth expected", 4),
            ],
        ),
        objective,
        question(
            "volatility_comfort",
            "Which yearly swing in value are you comfortable with?",
            &[
                ("Up to 5%", 1),
                ("Up to 10%", 2),
                ("Up to 20%", 3),
                ("More than 20%", 4),
            ],
        ),
        question(
            "emergency_fund",
            "How many months of expenses do you keep in available savings?",
            &[
                ("Less than 1 month", 1),
                ("1 to 3 months", 2),
                ("3 to 6 months", 3),
                ("More than 6 months", 4),
            ],
        ),
        sovereignty,
    ]
});

/// The built-in questionnaire.
pub fn catalog() -> &'static [Question] {
    &CATALOG
}

pub fn find_question(id: &str) -> Option<&'static Question> {
    catalog().iter().find(|q| q.id == id)
}

/// One recorded answer. `text` carries optional free text typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub option_id: String,
    pub value: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Answer {
    pub fn new(option_id: impl Into<String>, value: u8) -> Self {
        Answer { option_id: option_id.into(), value, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Answers keyed by question id. Re-answering a question overwrites it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerRecord {
    answers: BTreeMap<String, Answer>,
}

impl AnswerRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the `{questionId: {optionId, value}}` object, rejecting values outside 1-4.
    pub fn from_json(json: &str) -> Result<Self> {
        let record: AnswerRecord = serde_json::from_str(json)?;
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<()> {
        for (question, answer) in &self.answers {
            if !(MIN_OPTION_VALUE..=MAX_OPTION_VALUE).contains(&answer.value) {
                return Err(Error::InvalidAnswerValue {
                    question: question.clone(),
                    value: answer.value,
                });
            }
        }
        Ok(())
    }

    /// Record a raw answer without consulting the catalog.
    pub fn insert(&mut self, question_id: impl Into<String>, answer: Answer) -> Option<Answer> {
        self.answers.insert(question_id.into(), answer)
    }

    /// Record the chosen option of a catalog question, returning the answer it replaced.
    pub fn answer(&mut self, question_id: &str, option_id: &str) -> Result<Option<Answer>> {
        let question = find_question(question_id)
            .ok_or_else(|| Error::UnknownQuestion(question_id.to_string()))?;
        let option = question.option(option_id).ok_or_else(|| Error::UnknownOption {
            question: question_id.to_string(),
            option: option_id.to_string(),
        })?;
        Ok(self.insert(question_id, Answer::new(option.id.clone(), option.value)))
    }

    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Answer)> {
        self.answers.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }

    pub fn missing_questions(&self, questions: &[Question]) -> Vec<String> {
        questions
            .iter()
            .filter(|q| !self.answers.contains_key(&q.id))
            .map(|q| q.id.clone())
            .collect()
    }

    pub fn is_complete(&self, questions: &[Question]) -> bool {
        self.missing_questions(questions).is_empty()
    }
}
