//! Callscribe Domain Library
//!
//! Core types and the processing pipeline that turns a recorded phone call
//! into a transcription plus answers to campaign-specific questions.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (CallRecord, Question, CallAnalysis)
//!   - `value_objects/`: Immutable value types (AnswerType, AnswerSet, AudioPayload)
//!   - `services/`: Prompt builder and model reply parser
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Call store interfaces
//!   - `services/`: Audio fetcher and transcription model interfaces
//!
//! - **Application** (`application/`): The call-processing pipeline
//!
//! # Usage
//!
//! ```rust,ignore
//! use callscribe::{CallPipeline, CallId};
//!
//! let pipeline = CallPipeline::new(store, audio, model);
//! let result = pipeline.process(&CallId::new("c86d4b0d")).await?;
//! ```

pub mod application;
pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use application::{CallPipeline, PipelineError, PipelineStage};
pub use domain::{
    parse_reply, AnswerSet, AnswerType, AudioPayload, CallAnalysis, CallId, CallRecord,
    DomainError, MissingField, ParsedReply, PipelineResult, PromptMode, Question,
    QuestionCatalog, TranscriptionPrompt,
};
pub use ports::{
    AudioFetcher, CallAnalysisRepository, CallRecordRepository, CallStore, FetchError,
    ModelError, QuestionRepository, TranscriptionModel,
};
