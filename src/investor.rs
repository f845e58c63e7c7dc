use crate::portfolio::{recommend_portfolio, slices, AllocationSlice, PortfolioId};
use crate::questionnaire::AnswerRecord;
use crate::scoring::calculate_risk_score;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileType {
    Conservative, // score < 40
    Balanced,     // 40-69
    Growth,       // 70+
}

impl ProfileType {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=39 => ProfileType::Conservative,
            40..=69 => ProfileType::Balanced,
            _ => ProfileType::Growth,
        }
    }

    fn index(&self) -> usize {
        match self {
            ProfileType::Conservative => 0,
            ProfileType::Balanced => 1,
            ProfileType::Growth => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAnalysis {
    pub title: String,
    pub description: String,
    pub traits: Vec<String>,
    pub suitable_investments: Vec<String>,
    pub risks: Vec<String>,
    pub time_horizon: String,
    pub allocation: Vec<AllocationSlice>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

static BANDS: Lazy<[ProfileAnalysis; 3]> = Lazy::new(|| {
    [
        ProfileAnalysis {
            title: "Conservative investor".to_string(),
            description: "You favour the safety of your capital over performance and prefer \
                          predictable returns even if they are modest."
                .to_string(),
            traits: strings(&[
                "Low tolerance for losses",
                "Preference for stability",
                "Short to medium horizon",
            ]),
            suitable_investments: strings(&[
                "Government and investment-grade bonds",
                "Money market funds",
                "Euro-denominated life insurance funds",
            ]),
            risks: strings(&[
                "Returns may not keep up with inflation",
                "Limited long-term growth",
            ]),
            time_horizon: "1 to 3 years".to_string(),
            allocation: slices(&[("Bonds", 60), ("Money market", 25), ("Equities", 15)]),
        },
        ProfileAnalysis {
            title: "Balanced investor".to_string(),
            description: "You accept moderate fluctuations in exchange for better long-term \
                          returns and value diversification."
                .to_string(),
            traits: strings(&[
                "Moderate tolerance for losses",
                "Seeks a mix of income and growth",
                "Medium horizon",
            ]),
            suitable_investments: strings(&[
                "Diversified mixed funds",
                "Global equity ETFs",
                "Corporate bonds",
                "Listed real estate",
            ]),
            risks: strings(&[
                "Temporary losses during market downturns",
                "Equity exposure adds volatility",
            ]),
            time_horizon: "3 to 7 years".to_string(),
            allocation: slices(&[
                ("Equities", 50),
                ("Bonds", 35),
                ("Real estate", 10),
                ("Money market", 5),
            ]),
        },
        ProfileAnalysis {
            title: "Growth investor".to_string(),
            description: "You aim for maximum long-term growth and are ready to live with \
                          large swings in the value of your portfolio."
                .to_string(),
            traits: strings(&[
                "High tolerance for losses",
                "Focus on capital growth",
                "Long horizon",
            ]),
            suitable_investments: strings(&[
                "Global and emerging market equities",
                "Thematic and sector funds",
                "Small and mid caps",
            ]),
            risks: strings(&[
                "Drawdowns of 30% or more are possible",
                "Concentration in equities",
                "Recovery can take several years",
            ]),
            time_horizon: "7 years or more".to_string(),
            allocation: slices(&[
                ("Equities", 75),
                ("Emerging markets", 15),
                ("Bonds", 10),
            ]),
        },
    ]
});

/// Static analysis record for the band the score falls in.
pub fn investor_profile_analysis(score: u8, _answers: &AnswerRecord) -> ProfileAnalysis {
    BANDS[ProfileType::from_score(score).index()].clone()
}

fn answer_value(answers: &AnswerRecord, question_id: &str) -> Option<u8> {
    answers.get(question_id).map(|a| a.value)
}

/// Short personalised remarks derived from individual answers.
pub fn investment_style_insights(score: u8, answers: &AnswerRecord) -> Vec<String> {
    let analysis = &BANDS[ProfileType::from_score(score).index()];
    let mut insights = vec![format!(
        "Your risk score of {}/100 places you in the {} profile.",
        score,
        analysis.title.to_lowercase()
    )];

    match answer_value(answers, "horizon") {
        Some(v) if v >= 3 => insights.push(
            "Your long investment horizon lets you ride out full market cycles.".to_string(),
        ),
        Some(_) => insights.push(
            "Your short horizon favours liquid assets with limited volatility.".to_string(),
        ),
        None => {}
    }

    match answer_value(answers, "loss_reaction") {
        Some(1) => insights.push(
            "Market drops worry you: diversification and scheduled contributions help avoid \
             selling at the bottom."
                .to_string(),
        ),
        Some(v) if v >= 3 => insights.push(
            "You keep calm during drawdowns, which is key to capturing long-term returns."
                .to_string(),
        ),
        _ => {}
    }

    match answer_value(answers, "experience") {
        Some(1) => insights.push(
            "As a first-time investor, start with diversified funds and regular contributions."
                .to_string(),
        ),
        Some(4) => insights.push(
            "Your experience allows direct equity positions alongside core funds.".to_string(),
        ),
        _ => {}
    }

    if matches!(answer_value(answers, "emergency_fund"), Some(v) if v <= 2) {
        insights.push(
            "Build a safety cushion of at least three months of expenses before taking more risk."
                .to_string(),
        );
    }

    if recommend_portfolio(score, answers) == PortfolioId::Wareconomy {
        insights.push(
            "Your preference for French and European companies is reflected in a \
             sovereignty-focused allocation."
                .to_string(),
        );
    }

    insights
}

/// Final profile record handed to the profile store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    pub score: u8,
    pub profile_type: ProfileType,
    pub analysis: ProfileAnalysis,
    pub investment_style_insights: Vec<String>,
    pub answers: AnswerRecord,
    pub recommended_portfolio: PortfolioId,
    pub created_at: DateTime<Utc>,
}

impl ProfileSnapshot {
    pub fn build(answers: &AnswerRecord) -> Self {
        let score = calculate_risk_score(answers);
        ProfileSnapshot {
            score,
            profile_type: ProfileType::from_score(score),
            analysis: investor_profile_analysis(score, answers),
            investment_style_insights: investment_style_insights(score, answers),
            answers: answers.clone(),
            recommended_portfolio: recommend_portfolio(score, answers),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::{catalog, Answer, SOVEREIGNTY_QUESTION};

    fn full_record(value: u8) -> AnswerRecord {
        let mut r = AnswerRecord::new();
        for q in catalog() {
            let opt = q.options.iter().find(|o| o.value == value).unwrap();
            r.answer(&q.id, &opt.id).unwrap();
        }
        r
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(ProfileType::from_score(0), ProfileType::Conservative);
        assert_eq!(ProfileType::from_score(39), ProfileType::Conservative);
        assert_eq!(ProfileType::from_score(40), ProfileType::Balanced);
        assert_eq!(ProfileType::from_score(69), ProfileType::Balanced);
        assert_eq!(ProfileType::from_score(70), ProfileType::Growth);
    }

    #[test]
    fn analysis_allocations_sum_to_100() {
        let empty = AnswerRecord::new();
        for score in [10, 55, 90] {
            let a = investor_profile_analysis(score, &empty);
            let total: u32 = a.allocation.iter().map(|s| u32::from(s.percentage)).sum();
            assert_eq!(total, 100, "{}", a.title);
            assert!(!a.traits.is_empty());
        }
    }

    #[test]
    fn analysis_follows_band() {
        let empty = AnswerRecord::new();
        assert_eq!(investor_profile_analysis(39, &empty).title, "Conservative investor");
        assert_eq!(investor_profile_analysis(40, &empty).title, "Balanced investor");
        assert_eq!(investor_profile_analysis(70, &empty).title, "Growth investor");
    }

    #[test]
    fn insights_reflect_answers() {
        let mut r = AnswerRecord::new();
        r.answer("horizon", "horizon-4").unwrap();
        r.answer("loss_reaction", "loss_reaction-1").unwrap();
        r.answer("emergency_fund", "emergency_fund-1").unwrap();
        let insights = investment_style_insights(50, &r);
        assert!(insights[0].contains("50/100"));
        assert!(insights.iter().any(|i| i.contains("long investment horizon")));
        assert!(insights.iter().any(|i| i.contains("Market drops worry you")));
        assert!(insights.iter().any(|i| i.contains("safety cushion")));
        assert!(!insights.iter().any(|i| i.contains("sovereignty-focused")));
    }

    #[test]
    fn insights_mention_sovereignty_override() {
        let mut r = AnswerRecord::new();
        r.insert(SOVEREIGNTY_QUESTION, Answer::new("sovereignty-4", 4));
        let insights = investment_style_insights(30, &r);
        assert!(insights.iter().any(|i| i.contains("sovereignty-focused")));
    }

    #[test]
    fn snapshot_from_all_max_answers() {
        let snapshot = ProfileSnapshot::build(&full_record(4));
        assert_eq!(snapshot.score, 100);
        assert_eq!(snapshot.profile_type, ProfileType::Growth);
        // the sovereignty question is answered at its top option
        assert_eq!(snapshot.recommended_portfolio, PortfolioId::Wareconomy);
    }

    #[test]
    fn snapshot_from_all_min_answers() {
        let snapshot = ProfileSnapshot::build(&full_record(1));
        assert_eq!(snapshot.score, 25);
        assert_eq!(snapshot.profile_type, ProfileType::Conservative);
        assert_eq!(snapshot.recommended_portfolio, PortfolioId::Conservative);
    }

    #[test]
    fn snapshot_json_uses_camel_case() {
        let json = serde_json::to_value(ProfileSnapshot::build(&full_record(2))).unwrap();
        assert_eq!(json["score"], 50);
        assert_eq!(json["profileType"], "balanced");
        assert!(json["investmentStyleInsights"].is_array());
        assert!(json["analysis"]["suitableInvestments"].is_array());
        assert_eq!(json["answers"]["horizon"]["optionId"], "horizon-2");
        assert_eq!(json["recommendedPortfolio"], "wareconomy");
    }
}
