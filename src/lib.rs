//! Risk profiling for retail investors.
//!
//! Scores a completed questionnaire, maps the score to an investor profile
//! and a recommended portfolio, and flags user-chosen portfolios that are
//! riskier than the recommendation.

pub mod config;
pub mod error;
pub mod investor;
pub mod portfolio;
pub mod questionnaire;
pub mod scoring;
pub mod session;
pub mod store;

pub use error::{Error, Result};
pub use investor::{
    investment_style_insights, investor_profile_analysis, ProfileAnalysis, ProfileSnapshot,
    ProfileType,
};
pub use portfolio::{is_portfolio_more_risky, recommend_portfolio, PortfolioId};
pub use questionnaire::{catalog, Answer, AnswerRecord};
pub use scoring::calculate_risk_score;
pub use session::Session;
pub use store::ProfileStore;
