//! Optional workflow engine integration.
//!
//! Conversations, plan generation, and check-ins are each describable as a
//! workflow definition (a small step graph with retry policies and
//! determinism metadata). When an external engine is configured, the
//! [`crate::engine::Engine`] offers it these definitions best-effort; when it
//! is absent or fails, the local deterministic generators handle everything.
//!
//! Nothing in this module is required for correctness. There is no global
//! initialization state: availability is an injected [`WorkflowRunner`]
//! capability, so the core stays trivially testable in isolation.

use crate::config::WorkflowConfig;
use crate::error::{Error, Result};
use crate::types::AgentType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

const ACCOUNT_ID: &str = "parent-academy";
const PROJECT_ID: &str = "coaching-platform";
const ENV_ID: &str = "production";
const SPEC_VERSION: &str = "1.0.0";

// ============================================
// Workflow definitions
// ============================================

/// Step types used by Parent Academy workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepType {
    /// Deterministic local transform
    #[serde(rename = "transform.map")]
    TransformMap,
    /// Engine-side generation step
    #[serde(rename = "ai.generate")]
    AiGenerate,
    /// Deterministic local aggregation
    #[serde(rename = "transform.reduce")]
    TransformReduce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffStrategy {
    Fixed,
    Exponential,
}

/// Retry policy for a single step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepPolicy {
    pub timeout_ms: u64,
    pub max_attempts: u32,
    pub backoff_strategy: BackoffStrategy,
    pub backoff_base_ms: u64,
}

impl StepPolicy {
    /// Policy for deterministic local steps: one fast attempt.
    fn local() -> Self {
        Self {
            timeout_ms: 5_000,
            max_attempts: 1,
            backoff_strategy: BackoffStrategy::Fixed,
            backoff_base_ms: 1_000,
        }
    }

    /// Policy for engine-side generation steps: slower, one retry.
    fn generative() -> Self {
        Self {
            timeout_ms: 30_000,
            max_attempts: 2,
            backoff_strategy: BackoffStrategy::Exponential,
            backoff_base_ms: 1_000,
        }
    }
}

/// Determinism metadata the engine uses for caching and replay decisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDeterminism {
    pub pure_function: bool,
    pub uses_time: bool,
    pub uses_external_apis: bool,
}

impl StepDeterminism {
    fn pure() -> Self {
        Self {
            pure_function: true,
            uses_time: false,
            uses_external_apis: false,
        }
    }

    fn external() -> Self {
        Self {
            pure_function: false,
            uses_time: true,
            uses_external_apis: true,
        }
    }
}

/// One step in a workflow graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub inputs: serde_json::Value,
    pub depends_on: Vec<String>,
    pub policy: StepPolicy,
    pub determinism: StepDeterminism,
}

impl WorkflowStep {
    fn local(id: &str, name: &str, inputs: serde_json::Value, depends_on: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            step_type: StepType::TransformMap,
            inputs,
            depends_on: depends_on.iter().map(|s| s.to_string()).collect(),
            policy: StepPolicy::local(),
            determinism: StepDeterminism::pure(),
        }
    }

    fn reduce(id: &str, name: &str, inputs: serde_json::Value, depends_on: &[&str]) -> Self {
        Self {
            step_type: StepType::TransformReduce,
            ..Self::local(id, name, inputs, depends_on)
        }
    }

    fn generative(id: &str, name: &str, inputs: serde_json::Value, depends_on: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            step_type: StepType::AiGenerate,
            inputs,
            depends_on: depends_on.iter().map(|s| s.to_string()).collect(),
            policy: StepPolicy::generative(),
            determinism: StepDeterminism::external(),
        }
    }
}

/// A complete workflow definition offered to the external engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub account_id: String,
    pub project_id: String,
    pub environment_id: String,
    pub version: u32,
    pub spec_version: String,
    pub status: String,
    pub entry_step_id: String,
    pub steps: Vec<WorkflowStep>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkflowDefinition {
    fn new(id: String, name: &str, description: &str, entry: &str, steps: Vec<WorkflowStep>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            account_id: ACCOUNT_ID.to_string(),
            project_id: PROJECT_ID.to_string(),
            environment_id: ENV_ID.to_string(),
            version: 1,
            spec_version: SPEC_VERSION.to_string(),
            status: "active".to_string(),
            entry_step_id: entry.to_string(),
            steps,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Create a conversation workflow for a given agent type.
pub fn conversation_workflow(agent: AgentType) -> WorkflowDefinition {
    WorkflowDefinition::new(
        format!("pa-conversation-{}-{}", agent.as_str(), Uuid::new_v4()),
        &format!("{}-conversation", agent.as_str()),
        &format!("Conversation workflow for {} expert agent", agent.as_str()),
        "safety-check",
        vec![
            WorkflowStep::local(
                "safety-check",
                "Safety Signal Detection",
                json!({ "operation": "safety-check" }),
                &[],
            ),
            WorkflowStep::local(
                "context-assembly",
                "Assemble Agent Context",
                json!({ "operation": "assemble-context", "agentType": agent.as_str() }),
                &["safety-check"],
            ),
            WorkflowStep::generative(
                "agent-response",
                "Generate Expert Response",
                json!({ "operation": "generate-response", "agentType": agent.as_str() }),
                &["context-assembly"],
            ),
            WorkflowStep::local(
                "response-validation",
                "Validate & Format Response",
                json!({ "operation": "validate-response" }),
                &["agent-response"],
            ),
        ],
    )
}

/// Create a 30-day coaching plan generation workflow.
pub fn plan_generation_workflow() -> WorkflowDefinition {
    WorkflowDefinition::new(
        format!("pa-plan-gen-{}", Uuid::new_v4()),
        "coaching-plan-generation",
        "Generates a personalized 30-day coaching plan from baseline assessment",
        "analyze-baseline",
        vec![
            WorkflowStep::local(
                "analyze-baseline",
                "Analyze Baseline Assessment",
                json!({ "operation": "analyze-baseline" }),
                &[],
            ),
            WorkflowStep::generative(
                "generate-weekly-goals",
                "Generate Weekly Goals",
                json!({ "operation": "generate-weekly-goals" }),
                &["analyze-baseline"],
            ),
            WorkflowStep::generative(
                "generate-daily-actions",
                "Generate Daily Actions",
                json!({ "operation": "generate-daily-actions" }),
                &["generate-weekly-goals"],
            ),
            WorkflowStep::generative(
                "generate-scripts",
                "Generate Conversation Scripts",
                json!({ "operation": "generate-scripts" }),
                &["analyze-baseline"],
            ),
            WorkflowStep::reduce(
                "assemble-plan",
                "Assemble Complete Plan",
                json!({ "operation": "assemble-plan" }),
                &["generate-weekly-goals", "generate-daily-actions", "generate-scripts"],
            ),
        ],
    )
}

/// Create a weekly check-in analysis workflow.
pub fn check_in_workflow() -> WorkflowDefinition {
    WorkflowDefinition::new(
        format!("pa-checkin-{}", Uuid::new_v4()),
        "weekly-checkin-analysis",
        "Analyzes weekly tracking data and adjusts the coaching plan",
        "aggregate-tracking",
        vec![
            WorkflowStep::reduce(
                "aggregate-tracking",
                "Aggregate Tracking Data",
                json!({ "operation": "aggregate-tracking" }),
                &[],
            ),
            WorkflowStep::generative(
                "analyze-trends",
                "Analyze Trends",
                json!({ "operation": "analyze-trends" }),
                &["aggregate-tracking"],
            ),
            WorkflowStep::generative(
                "adjust-plan",
                "Generate Plan Adjustments",
                json!({ "operation": "adjust-plan" }),
                &["analyze-trends"],
            ),
        ],
    )
}

// ============================================
// Runner capability
// ============================================

/// External engine interface.
///
/// `Ok(None)` means the engine declined or is unavailable; callers fall back
/// to local generation. Implementations must be safe to share across
/// threads.
pub trait WorkflowRunner: Send + Sync {
    fn execute(
        &self,
        workflow: &WorkflowDefinition,
        inputs: &serde_json::Value,
    ) -> Result<Option<serde_json::Value>>;
}

/// Create the default HTTP-backed runner, or `None` when not configured.
pub fn create_workflow_runner(
    config: &WorkflowConfig,
) -> Result<Option<Box<dyn WorkflowRunner>>> {
    if !config.is_ready() {
        return Ok(None);
    }
    config.validate()?;
    Ok(Some(Box::new(HttpWorkflowRunner::new(config)?)))
}

/// HTTP client for a remote workflow engine.
struct HttpWorkflowRunner {
    endpoint: String,
    runtime: tokio::runtime::Runtime,
    http: reqwest::Client,
}

impl HttpWorkflowRunner {
    fn new(config: &WorkflowConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| Error::Config("workflow.endpoint is required".to_string()))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Workflow(format!("failed to build tokio runtime: {e}")))?;
        let timeout_secs = config.timeout_secs.max(1);
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Workflow(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint,
            runtime,
            http,
        })
    }
}

impl WorkflowRunner for HttpWorkflowRunner {
    fn execute(
        &self,
        workflow: &WorkflowDefinition,
        inputs: &serde_json::Value,
    ) -> Result<Option<serde_json::Value>> {
        self.runtime.block_on(async {
            let url = format!("{}/v1/runs", self.endpoint.trim_end_matches('/'));
            let resp = self
                .http
                .post(url)
                .json(&json!({
                    "workflow": workflow,
                    "inputs": inputs,
                }))
                .send()
                .await
                .map_err(|e| Error::Workflow(format!("engine request failed: {e}")))?;
            let status = resp.status();
            let body = resp
                .text()
                .await
                .map_err(|e| Error::Workflow(format!("engine read body failed: {e}")))?;
            if status.as_u16() == 404 || status.as_u16() == 501 {
                // Engine reachable but does not support this workflow
                return Ok(None);
            }
            if !status.is_success() {
                return Err(Error::Workflow(format!(
                    "engine returned {}: {}",
                    status.as_u16(),
                    body
                )));
            }
            let value: serde_json::Value = serde_json::from_str(&body)?;
            Ok(Some(value))
        })
    }
}
