use crate::error::{Error, Result};
use crate::investor::ProfileSnapshot;
use crate::portfolio::{recommend_portfolio, PortfolioId};
use crate::questionnaire::{catalog, Answer, AnswerRecord};
use crate::scoring::calculate_risk_score;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Answers collected so far for one user, optionally backed by a JSON cache file.
///
/// This is the only place that reads previously saved answers; the scoring and
/// recommendation functions always receive the record explicitly.
#[derive(Debug, Default)]
pub struct Session {
    answers: AnswerRecord,
    path: Option<PathBuf>,
}

impl Session {
    pub fn new(answers: AnswerRecord) -> Self {
        Session { answers, path: None }
    }

    /// Load the answers cached at `path`. A missing or unreadable file starts an empty session.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let answers = match Self::read(path) {
            Ok(record) => record,
            Err(Error::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                AnswerRecord::new()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read answers cache, starting fresh");
                AnswerRecord::new()
            }
        };
        Session { answers, path: Some(path.to_path_buf()) }
    }

    /// Load answers from a file that must exist and be valid.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let answers = Self::read(path)?;
        Ok(Session { answers, path: Some(path.to_path_buf()) })
    }

    /// Like `open`, but a missing file starts an empty session. Any other
    /// failure is returned so a damaged cache is never overwritten.
    pub fn open_or_new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match Self::open(path) {
            Err(Error::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(Session { answers: AnswerRecord::new(), path: Some(path.to_path_buf()) })
            }
            other => other,
        }
    }

    fn read(path: &Path) -> Result<AnswerRecord> {
        let s = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        AnswerRecord::from_json(&s)
    }

    /// Persist the answers to the cache file, if the session has one.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.answers)?;
        fs::write(path, json).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    pub fn answer(&mut self, question_id: &str, option_id: &str) -> Result<Option<Answer>> {
        self.answers.answer(question_id, option_id)
    }

    pub fn missing_questions(&self) -> Vec<String> {
        self.answers.missing_questions(catalog())
    }

    pub fn is_complete(&self) -> bool {
        self.answers.is_complete(catalog())
    }

    /// Score of the completed questionnaire; `None` while questions remain unanswered.
    pub fn score(&self) -> Option<u8> {
        self.is_complete().then(|| calculate_risk_score(&self.answers))
    }

    /// Score over whatever has been answered so far.
    pub fn partial_score(&self) -> u8 {
        calculate_risk_score(&self.answers)
    }

    fn require_complete(&self) -> Result<()> {
        let missing = self.missing_questions();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::IncompleteAnswers(missing))
        }
    }

    pub fn recommended_portfolio(&self) -> Result<PortfolioId> {
        self.require_complete()?;
        Ok(recommend_portfolio(self.partial_score(), &self.answers))
    }

    pub fn snapshot(&self) -> Result<ProfileSnapshot> {
        self.require_complete()?;
        Ok(ProfileSnapshot::build(&self.answers))
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer_all(session: &mut Session, index: usize) {
        for q in catalog() {
            session.answer(&q.id, &q.options[index].id).unwrap();
        }
    }

    #[test]
    fn score_is_none_until_complete() {
        let mut session = Session::default();
        session.answer("horizon", "horizon-4").unwrap();
        assert_eq!(session.score(), None);
        assert_eq!(session.partial_score(), 100);
        assert!(matches!(
            session.recommended_portfolio(),
            Err(Error::IncompleteAnswers(missing)) if missing.len() == catalog().len() - 1
        ));

        answer_all(&mut session, 0);
        assert_eq!(session.score(), Some(25));
        assert_eq!(session.recommended_portfolio().unwrap(), PortfolioId::Conservative);
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");

        let mut session = Session::load(&path);
        assert!(session.answers().is_empty());
        answer_all(&mut session, 2);
        session.save().unwrap();

        let reloaded = Session::load(&path);
        assert_eq!(reloaded.answers(), session.answers());
        assert_eq!(reloaded.score(), Some(75));
    }

    #[test]
    fn corrupt_cache_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        fs::write(&path, "{not json").unwrap();
        assert!(Session::load(&path).answers().is_empty());
    }

    #[test]
    fn directory_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Session::load(dir.path()).answers().is_empty());
        assert!(matches!(Session::open(dir.path()), Err(Error::Io { .. })));
        assert!(matches!(Session::open_or_new(dir.path()), Err(Error::Io { .. })));
    }

    #[test]
    fn out_of_range_value_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        fs::write(&path, r#"{"horizon": {"optionId": "horizon-4", "value": 9}}"#).unwrap();

        assert!(Session::load(&path).answers().is_empty());
        assert!(matches!(
            Session::open(&path),
            Err(Error::InvalidAnswerValue { value: 9, .. })
        ));
        assert!(matches!(
            Session::open_or_new(&path),
            Err(Error::InvalidAnswerValue { value: 9, .. })
        ));
        // the damaged file is left untouched
        assert!(fs::read_to_string(&path).unwrap().contains("\"value\": 9"));
    }

    #[test]
    fn missing_file_only_tolerated_by_cache_loaders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(Session::load(&path).answers().is_empty());
        assert!(Session::open_or_new(&path).unwrap().answers().is_empty());
        assert!(matches!(Session::open(&path), Err(Error::Io { .. })));
    }

    #[test]
    fn clear_resets_answers() {
        let mut session = Session::default();
        answer_all(&mut session, 1);
        session.clear();
        assert!(session.answers().is_empty());
        assert!(session.save().is_ok());
    }
}
