use crate::error::Error;
use crate::questionnaire::{find_question, Answer, AnswerRecord, Theme, SOVEREIGNTY_QUESTION};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Score thresholds for the risk-based pick
const BALANCED_MIN_SCORE: u8 = 40;
const GROWTH_MIN_SCORE: u8 = 70;
// A moderate sovereignty answer only overrides for scores at or above this
const MODERATE_SOVEREIGNTY_MIN_SCORE: u8 = 50;
// Option value on the sovereignty question that counts as a strong preference
const STRONG_SOVEREIGNTY_VALUE: u8 = 3;
const MODERATE_SOVEREIGNTY_VALUE: u8 = 2;

// Keywords matched at the start of a word, case-insensitively.
// Applied to the sovereignty answer's own free text.
static SOVEREIGNTY_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:france|europe|français|européen|souveraineté)")
        .expect("sovereignty keyword pattern is valid")
});
// Applied to every other answer's free text.
static SOVEREIGNTY_TEXT_BROAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:france|europe|français|européen|souveraineté|national|local|patriot)",
    )
    .expect("broad sovereignty keyword pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortfolioId {
    Conservative,
    Balanced,
    Growth,
    Wareconomy,
}

impl PortfolioId {
    pub const ALL: [PortfolioId; 4] = [
        PortfolioId::Conservative,
        PortfolioId::Balanced,
        PortfolioId::Growth,
        PortfolioId::Wareconomy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PortfolioId::Conservative => "conservative",
            PortfolioId::Balanced => "balanced",
            PortfolioId::Growth => "growth",
            PortfolioId::Wareconomy => "wareconomy",
        }
    }

    /// Ordinal used only to compare two portfolios for relative risk.
    pub fn risk_rank(&self) -> u8 {
        match self {
            PortfolioId::Conservative => 1,
            PortfolioId::Balanced | PortfolioId::Wareconomy => 2,
            PortfolioId::Growth => 3,
        }
    }

    pub fn template(&self) -> &'static PortfolioTemplate {
        let index = match self {
            PortfolioId::Conservative => 0,
            PortfolioId::Balanced => 1,
            PortfolioId::Growth => 2,
            PortfolioId::Wareconomy => 3,
        };
        &TEMPLATES[index]
    }

    /// Risk-based pick, ignoring any thematic preference.
    pub fn for_score(score: u8) -> Self {
        if score < BALANCED_MIN_SCORE {
            PortfolioId::Conservative
        } else if score < GROWTH_MIN_SCORE {
            PortfolioId::Balanced
        } else {
            PortfolioId::Growth
        }
    }
}

impl fmt::Display for PortfolioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PortfolioId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PortfolioId::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::UnknownPortfolio(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSlice {
    pub label: String,
    pub percentage: u8,
}

pub(crate) fn slices(parts: &[(&str, u8)]) -> Vec<AllocationSlice> {
    parts
        .iter()
        .map(|(label, percentage)| AllocationSlice {
            label: label.to_string(),
            percentage: *percentage,
        })
        .collect()
}

/// Predefined asset-allocation template behind a portfolio identifier.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioTemplate {
    pub id: PortfolioId,
    pub name: String,
    pub summary: String,
    pub allocation: Vec<AllocationSlice>,
}

// Indexed by PortfolioId::template
static TEMPLATES: Lazy<Vec<PortfolioTemplate>> = Lazy::new(|| {
    vec![
        PortfolioTemplate {
            id: PortfolioId::Conservative,
            name: "Conservative".to_string(),
            summary: "Capital preservation through high-grade bonds and money market funds."
                .to_string(),
            allocation: slices(&[
                ("Government bonds", 45),
                ("Investment-grade corporate bonds", 25),
                ("Money market", 15),
                ("Global equities", 15),
            ]),
        },
        PortfolioTemplate {
            id: PortfolioId::Balanced,
            name: "Balanced".to_string(),
            summary: "An even mix of equities and bonds for steady growth with moderate swings."
                .to_string(),
            allocation: slices(&[
                ("Global equities", 45),
                ("Bonds", 35),
                ("Real estate", 10),
                ("Money market", 10),
            ]),
        },
        PortfolioTemplate {
            id: PortfolioId::Growth,
            name: "Growth".to_string(),
            summary: "Equity-heavy allocation aiming at long-term capital growth.".to_string(),
            allocation: slices(&[
                ("Global equities", 60),
                ("Emerging markets", 15),
                ("Thematic equities", 15),
                ("Bonds", 10),
            ]),
        },
        PortfolioTemplate {
            id: PortfolioId::Wareconomy,
            name: "Wareconomy".to_string(),
            summary: "French and European companies in defence, energy and strategic industry."
                .to_string(),
            allocation: slices(&[
                ("European defence and aerospace", 30),
                ("European energy and infrastructure", 25),
                ("French and European industrials", 25),
                ("Euro sovereign bonds", 20),
            ]),
        },
    ]
});

fn option_signals_sovereignty(question_id: &str, answer: &Answer) -> bool {
    find_question(question_id)
        .and_then(|q| q.option(&answer.option_id))
        .is_some_and(|o| o.signals(Theme::Sovereignty))
}

fn text_matches(answer: &Answer, pattern: &Regex) -> bool {
    answer.text.as_deref().is_some_and(|t| pattern.is_match(t))
}

/// Pick the portfolio for a score, letting a sovereignty preference override
/// the risk-based choice.
///
/// Precedence:
/// 1. sovereignty answer is one of its two heaviest options, or value >= 3
/// 2. sovereignty answer value == 2 and score >= 50
/// 3. sovereignty answer free text mentions France/Europe/sovereignty
/// 4. any other answer signals sovereignty (option theme or free text)
/// 5. score thresholds: < 40 conservative, < 70 balanced, else growth
pub fn recommend_portfolio(score: u8, answers: &AnswerRecord) -> PortfolioId {
    if let Some(sov) = answers.get(SOVEREIGNTY_QUESTION) {
        let top = find_question(SOVEREIGNTY_QUESTION)
            .map(|q| q.top_option_ids(2))
            .unwrap_or_default();

        if top.contains(&sov.option_id.as_str()) || sov.value >= STRONG_SOVEREIGNTY_VALUE {
            tracing::debug!(option = %sov.option_id, "strong sovereignty preference");
            return PortfolioId::Wareconomy;
        }
        if sov.value == MODERATE_SOVEREIGNTY_VALUE && score >= MODERATE_SOVEREIGNTY_MIN_SCORE {
            tracing::debug!(score, "moderate sovereignty preference with sufficient score");
            return PortfolioId::Wareconomy;
        }
        if text_matches(sov, &SOVEREIGNTY_TEXT) {
            tracing::debug!("sovereignty answer text mentions a sovereignty keyword");
            return PortfolioId::Wareconomy;
        }
    }

    let signalled = answers
        .iter()
        .filter(|(id, _)| *id != SOVEREIGNTY_QUESTION)
        .find(|(id, a)| option_signals_sovereignty(id, a) || text_matches(a, &SOVEREIGNTY_TEXT_BROAD));
    if let Some((id, _)) = signalled {
        tracing::debug!(question = id, "sovereignty preference signalled by another answer");
        return PortfolioId::Wareconomy;
    }

    PortfolioId::for_score(score)
}

/// Whether `selected` carries a higher risk rank than `recommended`.
/// Unknown identifiers are logged and treated as not riskier.
pub fn is_portfolio_more_risky(selected: &str, recommended: &str) -> bool {
    match (selected.parse::<PortfolioId>(), recommended.parse::<PortfolioId>()) {
        (Ok(s), Ok(r)) => s.risk_rank() > r.risk_rank(),
        (s, r) => {
            tracing::warn!(
                selected,
                recommended,
                selected_known = s.is_ok(),
                recommended_known = r.is_ok(),
                "cannot compare portfolio risk, unknown identifier"
            );
            false
        }
    }
}
