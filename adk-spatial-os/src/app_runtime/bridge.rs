//! Bridge points for connecting shell app lifecycle to ADK-Rust agent runtimes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppExecutionInput {
    pub app_id: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppExecutionOutput {
    pub app_id: String,
    pub summary: String,
}

/// Placeholder bridge function for Phase 1 scaffold.
/// Full integration will bind to `adk-agent` + `adk-runner` in Phase 2.
pub async fn run_app_agent(input: AppExecutionInput) -> AppExecutionOutput {
    AppExecutionOutput {
        app_id: input.app_id,
        summary: format!("Execution queued for prompt: {}", input.prompt),
    }
}
