use std::sync::Arc;

use rmcp::Json;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    AnnotateAble, GetPromptRequestParams, GetPromptResult, ListPromptsResult, ListResourcesResult,
    PaginatedRequestParams, RawResource, ReadResourceRequestParams, ReadResourceResult,
    ResourceContents,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer};
use rmcp::{prompt, prompt_handler, prompt_router, tool, tool_handler, tool_router};
use serde_json::json;

use wellness_engine::{
    BatchResult, Config, EntryStore, HistorySummary, StoredEntry, TrendReport, WellnessAnalysis,
    compute_composite, generate_recommendations, normalize,
};

pub mod error;
pub mod http;
pub mod logging;
pub mod middleware;
mod prompts;
pub mod service;
pub mod types;

pub use error::{McpError, McpResult};
pub use middleware::LoggingStore;
pub use service::JournalService;
use types::*;

pub const HISTORY_SUMMARY_URI: &str = "wellness-journal://history/summary";

#[derive(Clone)]
pub struct WellnessMcpHandler {
    service: JournalService,
    tool_router: rmcp::handler::server::tool::ToolRouter<WellnessMcpHandler>,
    prompt_router: rmcp::handler::server::router::prompt::PromptRouter<WellnessMcpHandler>,
}

#[tool_router]
#[prompt_router]
impl WellnessMcpHandler {
    pub fn new(service: JournalService) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
        }
    }

    /// Wrap `store` in [`LoggingStore`] and apply the configured key and history limit.
    pub fn from_config(store: Arc<dyn EntryStore>, config: &Config) -> Self {
        let store: Arc<dyn EntryStore> = Arc::new(LoggingStore::new(store));
        Self::new(JournalService::new(
            store,
            config.access_key.clone(),
            config.history_limit,
        ))
    }

    pub fn service(&self) -> &JournalService {
        &self.service
    }

    pub fn tool_count(&self) -> usize {
        self.tool_router.list_all().len()
    }

    pub fn prompt_count(&self) -> usize {
        self.prompt_router.list_all().len()
    }

    // === Storage ===

    #[tool(
        name = "store_entry",
        description = "Normalize and store a wellness journal entry. Returns the receipt (id, content hash) and the canonical entry. Pass access_key to encrypt the record."
    )]
    async fn store_entry(
        &self,
        params: Parameters<StoreEntryParams>,
    ) -> Result<Json<StoreEntryResult>, String> {
        let p = params.0;
        self.service
            .store_entry(&p.entry, p.access_key)
            .await
            .map(Json)
            .map_err(|e| e.to_string())
    }

    #[tool(
        name = "store_entries",
        description = "Store several journal entries at once. Each entry succeeds or fails independently."
    )]
    async fn store_entries(
        &self,
        params: Parameters<StoreEntriesParams>,
    ) -> Result<Json<BatchResult>, String> {
        let p = params.0;
        self.service
            .store_entries(&p.entries, p.access_key)
            .await
            .map(Json)
            .map_err(|e| e.to_string())
    }

    #[tool(
        name = "get_entry",
        description = "Retrieve a stored entry by id. Verifies its content hash; sealed entries need the access key."
    )]
    async fn get_entry(&self, params: Parameters<EntryIdParams>) -> Result<Json<StoredEntry>, String> {
        let p = params.0;
        self.service
            .get_entry(&p.id, p.access_key)
            .await
            .map(Json)
            .map_err(|e| e.to_string())
    }

    #[tool(
        name = "verify_entry",
        description = "Check that a stored entry still matches its content hash (or a hash you supply)."
    )]
    async fn verify_entry(
        &self,
        params: Parameters<VerifyEntryParams>,
    ) -> Result<Json<VerifyEntryResult>, String> {
        let p = params.0;
        self.service
            .verify_entry(&p.id, p.access_key, p.expected_hash)
            .await
            .map(Json)
            .map_err(|e| e.to_string())
    }

    #[tool(name = "list_entries", description = "List stored entry receipts, newest first")]
    async fn list_entries(
        &self,
        params: Parameters<ListEntriesParams>,
    ) -> Result<Json<ListEntriesResult>, String> {
        self.service
            .list_entries(params.0.limit)
            .await
            .map(Json)
            .map_err(|e| e.to_string())
    }

    #[tool(name = "delete_entry", description = "Delete a stored entry by id")]
    async fn delete_entry(
        &self,
        params: Parameters<DeleteEntryParams>,
    ) -> Result<Json<DeleteEntryResult>, String> {
        self.service
            .delete_entry(&params.0.id)
            .await
            .map(Json)
            .map_err(|e| e.to_string())
    }

    // === Engine ===

    #[tool(
        name = "score_entry",
        description = "Compute the 0-100 wellness score, status and sub-scores (mood, sleep, exercise, stress, mental health) for an entry"
    )]
    async fn score_entry(&self, params: Parameters<EntryParams>) -> Result<Json<ScoreResult>, String> {
        let entry = normalize(&params.0.entry);
        let composite = compute_composite(&entry);
        Ok(Json(ScoreResult { entry, composite }))
    }

    #[tool(
        name = "detect_risks",
        description = "Detect wellness risk factors in an entry. Set include_patterns to also check stored history for recurring patterns."
    )]
    async fn detect_risks(
        &self,
        params: Parameters<DetectRisksParams>,
    ) -> Result<Json<RisksResult>, String> {
        let p = params.0;
        let (risks, pattern_risks) = self
            .service
            .risks(&p.entry, p.include_patterns.unwrap_or(false), p.access_key)
            .await
            .map_err(|e| e.to_string())?;
        Ok(Json(RisksResult {
            risks,
            pattern_risks,
        }))
    }

    #[tool(
        name = "analyze_entry",
        description = "Full analysis of an entry against history: score, risks, trends, insights, recommendations and a history summary. Uses stored entries when no history is given."
    )]
    async fn analyze_entry(
        &self,
        params: Parameters<AnalyzeEntryParams>,
    ) -> Result<Json<WellnessAnalysis>, String> {
        let p = params.0;
        self.service
            .analyze_entry(&p.entry, p.history.as_deref(), p.access_key)
            .await
            .map(Json)
            .map_err(|e| e.to_string())
    }

    #[tool(
        name = "analyze_stored_entry",
        description = "Full analysis of a stored entry against the most recent stored history"
    )]
    async fn analyze_stored_entry(
        &self,
        params: Parameters<EntryIdParams>,
    ) -> Result<Json<WellnessAnalysis>, String> {
        let p = params.0;
        self.service
            .analyze_stored_entry(&p.id, p.access_key)
            .await
            .map(Json)
            .map_err(|e| e.to_string())
    }

    #[tool(
        name = "get_trends",
        description = "Mood, sleep, stress and exercise trend directions (improving/declining/stable) with chronological series"
    )]
    async fn get_trends(&self, params: Parameters<HistoryParams>) -> Result<Json<TrendReport>, String> {
        let p = params.0;
        self.service
            .trends(p.history.as_deref(), p.limit, p.access_key)
            .await
            .map(Json)
            .map_err(|e| e.to_string())
    }

    #[tool(
        name = "get_recommendations",
        description = "Personalized recommendations (sleep, stress, exercise, nutrition, mental health) for an entry"
    )]
    async fn get_recommendations(
        &self,
        params: Parameters<EntryParams>,
    ) -> Result<Json<RecommendationsResult>, String> {
        let entry = normalize(&params.0.entry);
        Ok(Json(RecommendationsResult {
            recommendations: generate_recommendations(&entry, &[]),
        }))
    }

    #[tool(
        name = "get_history_summary",
        description = "Averages, sleep assessment and exercise statistics over the journal history"
    )]
    async fn get_history_summary(
        &self,
        params: Parameters<HistoryParams>,
    ) -> Result<Json<HistorySummary>, String> {
        let p = params.0;
        self.service
            .history_summary(p.history.as_deref(), p.limit, p.access_key)
            .await
            .map(Json)
            .map_err(|e| e.to_string())
    }

    // === Prompts ===

    #[prompt(
        name = "daily-check-in",
        description = "Guided conversation to record today's journal entry and review the result"
    )]
    async fn daily_check_in(&self, params: Parameters<DailyCheckInParams>) -> GetPromptResult {
        let date = params
            .0
            .date
            .unwrap_or_else(|| chrono::Utc::now().date_naive().to_string());

        prompts::daily_check_in_prompt(&date)
    }

    #[prompt(
        name = "weekly-wellness-review",
        description = "Review averages, trends and risk patterns over recent entries"
    )]
    async fn weekly_wellness_review(&self, params: Parameters<WeeklyReviewParams>) -> GetPromptResult {
        let days_back = params.0.days_back.unwrap_or(7);

        prompts::weekly_review_prompt(days_back)
    }

    #[prompt(
        name = "risk-follow-up",
        description = "Explain a flagged risk and plan the next few days"
    )]
    async fn risk_follow_up(&self, params: Parameters<RiskFollowUpParams>) -> GetPromptResult {
        prompts::risk_follow_up_prompt(params.0.risk.as_deref())
    }
}

#[tool_handler]
#[prompt_handler(router = self.prompt_router)]
impl rmcp::ServerHandler for WellnessMcpHandler {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo::new(
            rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .enable_resources()
                .build(),
        )
        .with_instructions(
            "Wellness journal MCP server - stores daily journal entries (optionally encrypted) \
             and scores them: composite wellness score, risk detection, trends, insights and \
             recommendations.",
        )
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        let resource = RawResource::new(HISTORY_SUMMARY_URI, "History Summary");

        let mut res = resource.no_annotation();
        res.description = Some(
            "Summary and trends over the most recent stored journal entries".to_string(),
        );
        res.mime_type = Some("application/json".to_string());

        Ok(ListResourcesResult {
            resources: vec![res],
            next_cursor: None,
            meta: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        if request.uri != HISTORY_SUMMARY_URI {
            return Err(ErrorData::invalid_params(
                format!("Unknown resource URI: {}", request.uri),
                None,
            ));
        }
        let history = self
            .service
            .resolve_history(None, None, None)
            .await
            .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;
        let body = json!({
            "summary": wellness_engine::summarize_history(&history),
            "trends": wellness_engine::analyze_trends(&history),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        let text = serde_json::to_string_pretty(&body)
            .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;

        Ok(ReadResourceResult::new(vec![
            ResourceContents::TextResourceContents {
                uri: request.uri.clone(),
                mime_type: Some("application/json".to_string()),
                text,
                meta: None,
            },
        ]))
    }
}

#[cfg(test)]
mod test_utils;
