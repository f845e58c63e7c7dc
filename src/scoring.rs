use crate::questionnaire::{AnswerRecord, MAX_OPTION_VALUE};

/// Risk score in [0, 100]: the sum of answer values over the maximum
/// attainable for the answered questions. An empty record scores 0.
pub fn calculate_risk_score(answers: &AnswerRecord) -> u8 {
    if answers.is_empty() {
        return 0;
    }

    let total: u32 = answers.iter().map(|(_, a)| u32::from(a.value)).sum();
    let max = answers.len() as f64 * f64::from(MAX_OPTION_VALUE);
    let ratio = (f64::from(total) / max * 100.0).round();

    ratio.clamp(0.0, 100.0) as u8
}
