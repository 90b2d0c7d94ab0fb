//! Call Pipeline (Use Case)
//!
//! LoadingCall -> LoadingQuestionsAndAudio -> Transcribing -> Parsing -> Persisting -> Done
//!
//! Any failing step ends the run with its error. Nothing is retried and
//! nothing is persisted unless every earlier step succeeded.

use std::sync::Arc;

use chrono::Utc;
use tracing::Instrument;

use super::pipeline_error::{PipelineError, PipelineStage};
use crate::domain::{
    parse_reply, AnswerSet, AudioPayload, CallAnalysis, CallId, CallRecord, PipelineResult,
    PromptMode, QuestionCatalog, TranscriptionPrompt,
};
use crate::ports::{AudioFetcher, CallStore, TranscriptionModel};

/// Processes one call per `process` invocation.
///
/// Holds no per-run state; independent instances may run concurrently.
pub struct CallPipeline<S: CallStore, F: AudioFetcher, M: TranscriptionModel> {
    store: Arc<S>,
    audio: Arc<F>,
    model: Arc<M>,
}

impl<S: CallStore, F: AudioFetcher, M: TranscriptionModel> CallPipeline<S, F, M> {
    pub fn new(store: Arc<S>, audio: Arc<F>, model: Arc<M>) -> Self {
        Self {
            store,
            audio,
            model,
        }
    }

    /// Run the whole pipeline for a call
    pub async fn process(&self, call_id: &CallId) -> Result<PipelineResult, PipelineError> {
        let span = tracing::info_span!("process_call", call_id = %call_id);
        async {
            let result = self.run(call_id).await;
            match &result {
                Ok(r) => tracing::info!(
                    stage = %PipelineStage::Done,
                    answers = r.answers.len(),
                    "Call processed"
                ),
                Err(e) => tracing::warn!(
                    stage = %e.stage(),
                    kind = e.kind(),
                    error = %e,
                    "Call processing failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, call_id: &CallId) -> Result<PipelineResult, PipelineError> {
        enter(PipelineStage::LoadingCall);
        let record = self.load_call(call_id).await?;

        enter(PipelineStage::LoadingQuestionsAndAudio);
        // Dropping the pending half cancels it when the other fails
        let (catalog, audio) = tokio::try_join!(
            self.load_questions(&record.campaign_id),
            self.fetch_audio(&record.recording_url),
        )?;

        enter(PipelineStage::Transcribing);
        let prompt = TranscriptionPrompt::for_questions(&catalog);
        tracing::info!(
            mode = %prompt.mode,
            questions = catalog.len(),
            model = self.model.model_id(),
            "Sending audio to model"
        );
        let reply = self
            .model
            .generate(&prompt, &audio)
            .await
            .map_err(PipelineError::from_model)?;
        drop(audio);

        enter(PipelineStage::Parsing);
        let (transcription, answers) = match prompt.mode {
            PromptMode::TranscribeOnly => (reply.trim().to_string(), AnswerSet::new()),
            PromptMode::TranscribeAndAnswer => {
                let parsed = parse_reply(&reply, &catalog.ids());
                if parsed.is_degraded(catalog.len()) {
                    tracing::warn!(
                        transcription_chars = parsed.transcription.len(),
                        answers = parsed.answers.len(),
                        questions = catalog.len(),
                        "Model reply only partially matched the requested layout"
                    );
                }
                (parsed.transcription, parsed.answers)
            }
        };
        if transcription.is_empty() {
            tracing::warn!("Persisting empty transcription");
        }

        enter(PipelineStage::Persisting);
        let analysis = CallAnalysis::new(transcription, answers, Utc::now());
        self.store
            .replace_analysis(call_id, &analysis)
            .await
            .map_err(|e| PipelineError::from_store(PipelineStage::Persisting, e))?;

        Ok(PipelineResult::from_analysis(
            call_id.clone(),
            record.campaign_id,
            analysis,
        ))
    }

    async fn load_call(&self, call_id: &CallId) -> Result<CallRecord, PipelineError> {
        let stage = PipelineStage::LoadingCall;
        let record = self
            .store
            .find_call(call_id)
            .await
            .map_err(|e| PipelineError::from_store(stage, e))?
            .ok_or_else(|| PipelineError::NotFound {
                stage,
                entity: "Call".to_string(),
                id: call_id.to_string(),
            })?;

        record
            .ensure_processable()
            .map_err(|e| PipelineError::from_store(stage, e))?;

        tracing::debug!(campaign_id = %record.campaign_id, "Call record loaded");
        Ok(record)
    }

    async fn load_questions(&self, campaign_id: &str) -> Result<QuestionCatalog, PipelineError> {
        let questions = self
            .store
            .active_questions_for_campaign(campaign_id)
            .await
            .map_err(|e| PipelineError::from_store(PipelineStage::LoadingQuestionsAndAudio, e))?;

        if questions.is_empty() {
            tracing::info!(campaign_id, "No active questions, transcription only");
        } else {
            tracing::debug!(campaign_id, questions = questions.len(), "Questions loaded");
        }
        Ok(QuestionCatalog::new(questions))
    }

    async fn fetch_audio(&self, url: &str) -> Result<AudioPayload, PipelineError> {
        let audio = self
            .audio
            .fetch(url)
            .await
            .map_err(PipelineError::from_fetch)?;

        // Adapters are expected to reject this already
        if audio.is_empty() {
            return Err(PipelineError::from_fetch(crate::ports::FetchError::EmptyBody));
        }

        tracing::debug!(bytes = audio.len(), mime = %audio.mime_type, "Audio downloaded");
        Ok(audio)
    }
}

fn enter(stage: PipelineStage) {
    tracing::debug!(stage = %stage, "Entering stage");
}
