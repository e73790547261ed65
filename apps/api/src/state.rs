use std::sync::Arc;

use crate::config::Config;
use crate::extraction::Extractor;
use crate::matching::SimilarityScorer;
use crate::narrative::Narrator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once at startup; read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Compiled rule tables behind every extractor.
    pub extractor: Arc<Extractor>,
    /// Pluggable similarity backend. Default: TfIdfSimilarity.
    pub similarity: Arc<dyn SimilarityScorer>,
    /// HR narrative backend. Default: LlmNarrator over the shared LlmClient.
    pub narrator: Arc<dyn Narrator>,
}
