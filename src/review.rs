//! State of one review: the original text, the revision request in flight
//! and the revised text once it arrives.

use crate::backend::ai_backend::AiError;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const SUCCESS_MESSAGE: &str = "Texto revisado pela IA com sucesso!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRequest {
    pub generation: u64,
    pub text: String,
    pub is_transcription: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    #[error("O texto original não pode estar vazio.")]
    EmptyText,

    #[error(
        "API Key não configurada. Insira sua API Key do Google Gemini na seção de configurações."
    )]
    MissingApiKey,

    #[error("Uma revisão já está em andamento.")]
    AlreadyRunning,
}

#[derive(Debug, Default)]
pub struct ReviewSession {
    original: String,
    candidate: String,
    is_transcription: bool,
    is_loading: bool,
    show_comparison: bool,
    error: Option<String>,
    success: Option<String>,
    review_time: Option<Duration>,
    /// Identifies the latest request; replies carrying another value are stale
    generation: u64,
}

impl ReviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    /// Direct access for the text editor. Call [`Self::on_original_edited`]
    /// after any change.
    pub fn original_mut(&mut self) -> &mut String {
        &mut self.original
    }

    pub fn set_original(&mut self, text: impl Into<String>) {
        self.original = text.into();
        self.on_original_edited();
    }

    /// Editing the original invalidates the current revision and any request in flight
    pub fn on_original_edited(&mut self) {
        if self.is_loading {
            debug!("Original edited during revision #{}, dropping it", self.generation);
        }
        self.reset();
    }

    /// Back to idle, keeping the original text
    pub fn reset(&mut self) {
        if self.is_loading {
            self.generation += 1;
            self.is_loading = false;
        }
        self.reset_review();
    }

    fn reset_review(&mut self) {
        self.error = None;
        self.success = None;
        self.show_comparison = false;
        self.candidate.clear();
        self.review_time = None;
    }

    pub fn transcription_mut(&mut self) -> &mut bool {
        &mut self.is_transcription
    }

    pub fn can_review(&self, has_api_key: bool) -> bool {
        !self.is_loading && !self.original.trim().is_empty() && has_api_key
    }

    /// Validate and start a revision request
    pub fn begin_review(&mut self, has_api_key: bool) -> Result<ReviewRequest, ReviewError> {
        if self.is_loading {
            return Err(ReviewError::AlreadyRunning);
        }
        if self.original.trim().is_empty() {
            self.error = Some(ReviewError::EmptyText.to_string());
            return Err(ReviewError::EmptyText);
        }
        if !has_api_key {
            self.error = Some(ReviewError::MissingApiKey.to_string());
            return Err(ReviewError::MissingApiKey);
        }

        self.reset_review();
        self.is_loading = true;
        self.generation += 1;

        Ok(ReviewRequest {
            generation: self.generation,
            text: self.original.clone(),
            is_transcription: self.is_transcription,
        })
    }

    /// Apply the outcome of a revision request. Returns `false` when the
    /// outcome belongs to a superseded request and was ignored.
    pub fn finish_review(
        &mut self,
        generation: u64,
        elapsed: Duration,
        result: Result<String, AiError>,
    ) -> bool {
        if !self.is_loading || generation != self.generation {
            debug!(
                "Ignoring stale revision #{} (current #{})",
                generation, self.generation
            );
            return false;
        }

        self.is_loading = false;
        self.review_time = Some(elapsed);

        match result {
            Ok(text) => {
                self.candidate = text;
                self.success = Some(SUCCESS_MESSAGE.to_string());
                self.show_comparison = true;
            }
            Err(e) => {
                self.error = Some(format!("Falha na revisão pela IA: {}", e));
                self.candidate = self.original.clone();
            }
        }
        true
    }

    pub fn candidate(&self) -> &str {
        &self.candidate
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn show_comparison(&self) -> bool {
        self.show_comparison
    }

    /// Whether the right-hand column shows the comparison instead of the placeholder
    pub fn wants_comparison_panel(&self) -> bool {
        self.is_loading || self.show_comparison
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn review_time_label(&self) -> Option<String> {
        self.review_time
            .map(|elapsed| format!("{:.2}s", elapsed.as_secs_f64()))
    }

    pub fn original_char_count(&self) -> usize {
        self.original.chars().count()
    }

    pub fn candidate_char_count(&self) -> usize {
        self.candidate.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(text: &str) -> ReviewSession {
        let mut session = ReviewSession::new();
        session.set_original(text);
        session
    }

    #[test]
    fn empty_text_is_rejected() {
        let mut session = session_with("   \n ");
        assert_eq!(session.begin_review(true), Err(ReviewError::EmptyText));
        assert_eq!(session.error(), Some("O texto original não pode estar vazio."));
        assert!(!session.is_loading());
    }

    #[test]
    fn missing_key_is_rejected() {
        let mut session = session_with("Texto");
        assert_eq!(session.begin_review(false), Err(ReviewError::MissingApiKey));
        assert!(!session.can_review(false));
    }

    #[test]
    fn successful_review_shows_comparison() {
        let mut session = session_with("Texto orijinal");
        *session.transcription_mut() = true;

        let request = session.begin_review(true).unwrap();
        assert!(request.is_transcription);
        assert_eq!(request.text, "Texto orijinal");
        assert!(session.is_loading());
        assert!(session.wants_comparison_panel());
        assert_eq!(
            session.begin_review(true),
            Err(ReviewError::AlreadyRunning)
        );

        let applied = session.finish_review(
            request.generation,
            Duration::from_millis(1234),
            Ok("Texto original".to_string()),
        );
        assert!(applied);
        assert!(!session.is_loading());
        assert!(session.show_comparison());
        assert_eq!(session.candidate(), "Texto original");
        assert_eq!(session.success(), Some(SUCCESS_MESSAGE));
        assert_eq!(session.review_time_label().as_deref(), Some("1.23s"));
    }

    #[test]
    fn failed_review_falls_back_to_original() {
        let mut session = session_with("Texto");
        let request = session.begin_review(true).unwrap();

        session.finish_review(
            request.generation,
            Duration::from_secs(1),
            Err(AiError::RateLimited),
        );
        assert!(!session.show_comparison());
        assert_eq!(session.candidate(), "Texto");
        assert!(
            session
                .error()
                .is_some_and(|e| e.starts_with("Falha na revisão pela IA:"))
        );
    }

    #[test]
    fn edit_during_review_discards_the_reply() {
        let mut session = session_with("Texto");
        let request = session.begin_review(true).unwrap();

        session.original_mut().push_str(" alterado");
        session.on_original_edited();
        assert!(!session.is_loading());

        let applied = session.finish_review(
            request.generation,
            Duration::from_secs(1),
            Ok("Revisado".to_string()),
        );
        assert!(!applied);
        assert!(session.candidate().is_empty());
        assert!(!session.show_comparison());
    }

    #[test]
    fn only_the_latest_request_is_applied() {
        let mut session = session_with("Texto");
        let first = session.begin_review(true).unwrap();
        session.on_original_edited();
        let second = session.begin_review(true).unwrap();
        assert!(second.generation > first.generation);

        assert!(!session.finish_review(first.generation, Duration::ZERO, Ok("velho".into())));
        assert!(session.finish_review(second.generation, Duration::ZERO, Ok("novo".into())));
        assert_eq!(session.candidate(), "novo");
    }

    #[test]
    fn editing_resets_previous_result() {
        let mut session = session_with("Texto");
        let request = session.begin_review(true).unwrap();
        session.finish_review(request.generation, Duration::ZERO, Ok("Texto.".into()));
        assert!(session.show_comparison());

        session.set_original("Outro texto");
        assert!(!session.show_comparison());
        assert!(session.candidate().is_empty());
        assert!(session.review_time_label().is_none());
        assert_eq!(session.original_char_count(), 11);
    }

    #[test]
    fn reset_keeps_the_original() {
        let mut session = session_with("Texto");
        let request = session.begin_review(true).unwrap();
        session.reset();

        assert!(!session.is_loading());
        assert_eq!(session.original(), "Texto");
        assert!(!session.finish_review(request.generation, Duration::ZERO, Ok("x".into())));
    }

    #[test]
    fn clearing_the_error_keeps_the_review() {
        let mut session = session_with("Texto");
        let request = session.begin_review(true).unwrap();
        session.finish_review(
            request.generation,
            Duration::from_secs(1),
            Err(AiError::InvalidApiKey),
        );
        assert!(session.error().is_some());

        session.clear_error();
        assert!(session.error().is_none());
        assert_eq!(session.candidate(), "Texto");
        assert_eq!(session.original(), "Texto");
    }
}
