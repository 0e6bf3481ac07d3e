//! Shift extraction pipeline
//!
//! Two-stage, strictly primary/fallback: the model extractor runs first
//! when configured; the deterministic rule extractor covers every other
//! case. The stages are never merged. The model stage reports a tagged
//! [`ModelOutcome`] so that "the model found nothing" and "the model call
//! failed" stay distinguishable, even though both currently route to the
//! fallback.

pub mod model;
pub mod rules;

use crate::dates::normalize_date;
use crate::models::ShiftCandidate;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, warn};

pub use model::GeminiExtractor;
pub use rules::RuleExtractor;

/// Outcome of the model extraction stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelOutcome {
    /// The model answered with a (possibly empty) list of candidates.
    Entries(Vec<ShiftCandidate>),
    /// The call failed in any way: network, timeout, status, bad payload.
    Unavailable,
}

/// The model stage of the pipeline. Implemented by [`GeminiExtractor`]
/// and by test stubs.
#[async_trait]
pub trait ModelExtract: Send + Sync {
    async fn extract(&self, text: &str) -> ModelOutcome;
}

/// Orchestrates model-first extraction with deterministic fallback.
pub struct ExtractionPipeline {
    model: Option<Arc<dyn ModelExtract>>,
    rules: RuleExtractor,
}

impl ExtractionPipeline {
    pub fn new(model: Option<Arc<dyn ModelExtract>>, rules: RuleExtractor) -> ExtractionPipeline {
        ExtractionPipeline { model, rules }
    }

    /// Extract normalized shift candidates from one message.
    ///
    /// `today` supplies the year for year-less date tokens. The result is
    /// possibly empty; an empty result is not an error.
    pub async fn extract(&self, text: &str, today: NaiveDate) -> Vec<ShiftCandidate> {
        let candidates = match self.model_stage(text).await {
            ModelOutcome::Entries(entries) if !entries.is_empty() => {
                debug!(count = entries.len(), "using model extraction result");
                entries
            }
            outcome => {
                if outcome == ModelOutcome::Unavailable {
                    debug!("model stage unavailable, running rule extractor");
                }
                self.rules.extract(text)
            }
        };

        candidates
            .into_iter()
            .map(|mut candidate| {
                let normalized = normalize_date(&candidate.date, today);
                if normalized == candidate.date && crate::dates::parse_canonical(&normalized).is_none()
                {
                    // Stored anyway; such entries never become past-due.
                    warn!(date = %candidate.date, "date token did not normalize");
                }
                candidate.date = normalized;
                candidate
            })
            .collect()
    }

    async fn model_stage(&self, text: &str) -> ModelOutcome {
        match &self.model {
            Some(model) => model.extract(text).await,
            None => ModelOutcome::Unavailable,
        }
    }
}
