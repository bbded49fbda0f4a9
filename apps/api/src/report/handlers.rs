use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::matching::{find_top_matches, Query};
use crate::errors::AppError;
use crate::report::law::article_for_hazard;
use crate::report::prompts::{format_related_cases, render_report_prompt};
use crate::state::AppState;

/// Max incident cases folded into one report prompt.
const MAX_RELATED_CASES: usize = 5;

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub hazard: String,
    #[serde(default)]
    pub risk: String,
    /// Pre-assembled prompt. When present it is relayed verbatim and
    /// server-side assembly is skipped entirely.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Selects the detailed template variant (longer sections).
    #[serde(default)]
    pub detailed: bool,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub result: String,
}

/// POST /api/report
///
/// Matches the query against the catalog snapshot, assembles the report
/// prompt (related cases + law citation + template), relays it to the
/// completion backend, and returns the trimmed prose.
pub async fn handle_report(
    State(state): State<AppState>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<ReportResponse>, AppError> {
    // A body that does not deserialize is a client error and must render
    // the `{error, details}` envelope, not axum's plain-text rejection.
    let Json(req) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let prompt = match req.prompt {
        Some(prompt) => {
            debug!("client-assembled prompt supplied; skipping assembly");
            prompt
        }
        None => {
            let query = Query::new(req.hazard.clone(), req.risk.clone());
            let matches = find_top_matches(&query, state.catalog.records(), MAX_RELATED_CASES);
            info!(
                "report query matched {} of {} catalog records",
                matches.iter().filter(|m| m.score > 0).count(),
                state.catalog.len()
            );

            let related = format_related_cases(&matches);
            let law = article_for_hazard(&req.hazard);
            render_report_prompt(&req.hazard, &req.risk, &related, law, req.detailed)
        }
    };

    let result = state.llm.submit_prompt(&prompt).await?;
    Ok(Json(ReportResponse { result }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::catalog::Catalog;
    use crate::config::Config;
    use crate::llm_client::{CompletionBackend, LlmError};
    use crate::routes::build_router;

    /// Records every prompt it receives and returns a canned reply
    /// (or a malformed-response error when `reply` is None).
    struct ScriptedBackend {
        prompts: Mutex<Vec<String>>,
        reply: Option<String>,
    }

    impl ScriptedBackend {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                prompts: Mutex::new(Vec::new()),
                reply: Some(text.to_string()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                prompts: Mutex::new(Vec::new()),
                reply: None,
            })
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn submit_prompt(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Some(text) => Ok(text.clone()),
                None => Err(LlmError::MalformedResponse {
                    body: json!({"error": "scripted failure"}),
                }),
            }
        }
    }

    fn test_config() -> Config {
        Config {
            openai_api_key: "test-key".to_string(),
            catalog_path: "unused".to_string(),
            static_dir: "unused".to_string(),
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn app(backend: Arc<ScriptedBackend>) -> axum::Router {
        build_router(AppState {
            catalog: Arc::new(Catalog::stub()),
            llm: backend,
            config: test_config(),
        })
    }

    async fn post_report(router: axum::Router, body: Value) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/report")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_report_returns_completion_text() {
        let backend = ScriptedBackend::replying("① 洗い出し内容：…");
        let (status, body) = post_report(
            app(backend.clone()),
            json!({"hazard": "コンベア", "risk": "巻き込まれ"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], "① 洗い出し内容：…");

        // The assembled prompt carries the query, the matched stub case, and
        // the general-duty citation ("コンベア" is not an exact law key).
        let prompt = backend.last_prompt();
        assert!(prompt.contains("洗い出し内容：「コンベア」"));
        assert!(prompt.contains("【事例1】コンベアで巻き込まれた"));
        assert!(prompt.contains("労働安全衛生法（概略）"));
        assert!(prompt.contains("【150文字程度ずつ】"));
    }

    #[tokio::test]
    async fn test_detailed_flag_selects_long_template() {
        let backend = ScriptedBackend::replying("ok");
        let (status, _) = post_report(
            app(backend.clone()),
            json!({"hazard": "足場", "risk": "転落", "detailed": true}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let prompt = backend.last_prompt();
        assert!(prompt.contains("【300文字程度ずつ】"));
        // Exact law key "足場" resolves to its specific article.
        assert!(prompt.contains("労働安全衛生法第21条"));
    }

    #[tokio::test]
    async fn test_client_prompt_is_relayed_verbatim() {
        let backend = ScriptedBackend::replying("ok");
        let (status, _) = post_report(
            app(backend.clone()),
            json!({"hazard": "ignored", "risk": "ignored", "prompt": "custom prompt text"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(backend.last_prompt(), "custom prompt text");
    }

    #[tokio::test]
    async fn test_no_match_still_produces_report() {
        let backend = ScriptedBackend::replying("ok");
        let (status, _) = post_report(
            app(backend.clone()),
            json!({"hazard": "zzz", "risk": "zzz"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(backend.last_prompt().contains("関連事例情報なし"));
    }

    #[tokio::test]
    async fn test_malformed_body_returns_400_envelope() {
        let backend = ScriptedBackend::replying("ok");
        let (status, body) =
            post_report(app(backend.clone()), json!({"hazard": 5})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid request body");
        assert!(body["details"].is_string());
        // The backend is never reached.
        assert!(backend.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_surfaces_error_envelope() {
        let backend = ScriptedBackend::failing();
        let (status, body) =
            post_report(app(backend), json!({"hazard": "h", "risk": "r"})).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "API response error");
        assert_eq!(body["details"]["error"], "scripted failure");
    }
}
