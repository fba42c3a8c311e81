use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::config::MatchingConfigOverride;
use crate::matching::models::{CandidateDocument, RequirementProfile, ScoreBreakdown};
use crate::matching::ranker::{Ranker, RankingRun};
use crate::matching::summary::{self, SummaryStatistics, TopCandidate};
use crate::state::AppState;

const DEFAULT_SINGLE_IDENTIFIER: &str = "single_resume";

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub job_description: String,
}

#[derive(Deserialize)]
pub struct CandidateInput {
    pub identifier: String,
    pub text: String,
    pub sector: Option<String>,
}

#[derive(Deserialize)]
pub struct RankRequest {
    pub job_description: String,
    pub candidates: Vec<CandidateInput>,
    pub top_n: Option<usize>,
    /// Overrides individual server settings for this run only.
    pub config: Option<MatchingConfigOverride>,
}

#[derive(Serialize)]
pub struct RankResponse {
    pub run: RankingRun,
    pub top_candidates: Vec<TopCandidate>,
    pub summary: Option<SummaryStatistics>,
}

#[derive(Deserialize)]
pub struct SingleRankRequest {
    pub job_description: String,
    pub resume_text: String,
    pub identifier: Option<String>,
}

#[derive(Serialize)]
pub struct SingleRankResponse {
    pub result: ScoreBreakdown,
    pub strengths: Vec<String>,
    pub requirement: RequirementProfile,
}

/// POST /api/v1/requirements/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<RequirementProfile>, AppError> {
    let ranker = Ranker::new(state.taxonomy.clone(), state.config.matching.clone());
    let profile = ranker.analyze(&req.job_description)?;
    Ok(Json(profile))
}

/// POST /api/v1/rankings
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(req): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    let config = req
        .config
        .unwrap_or_default()
        .apply_to(&state.config.matching);
    let top_n = req.top_n.unwrap_or(config.top_n_default);
    let ranker = Ranker::new(state.taxonomy.clone(), config);

    let documents: Vec<CandidateDocument> = req
        .candidates
        .into_iter()
        .map(|c| CandidateDocument::new(c.identifier, c.sector, c.text))
        .collect();
    let job = req.job_description;

    let run = tokio::task::spawn_blocking(move || ranker.rank(&job, documents))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("ranking task failed: {e}")))??;

    Ok(Json(RankResponse {
        top_candidates: summary::top_candidates(&run.results, top_n),
        summary: summary::summarize(&run.results),
        run,
    }))
}

/// POST /api/v1/rankings/single
pub async fn handle_rank_single(
    State(state): State<AppState>,
    Json(req): Json<SingleRankRequest>,
) -> Result<Json<SingleRankResponse>, AppError> {
    let ranker = Ranker::new(state.taxonomy.clone(), state.config.matching.clone());
    let identifier = req
        .identifier
        .unwrap_or_else(|| DEFAULT_SINGLE_IDENTIFIER.to_string());

    let (requirement, result) = tokio::task::spawn_blocking(move || {
        ranker.rank_single(&req.job_description, &identifier, &req.resume_text)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("ranking task failed: {e}")))??;

    Ok(Json(SingleRankResponse {
        strengths: summary::identify_strengths(&result),
        result,
        requirement,
    }))
}
