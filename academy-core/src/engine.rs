//! Agent engine orchestration.
//!
//! Wires the safety gate, the optional workflow runner, and the local
//! deterministic generators together. The safety check always runs locally
//! and first; it is never delegated. Runner failures are logged and
//! swallowed, so callers see local results at worst.

use crate::checkin::analyze_check_in;
use crate::config::Config;
use crate::knowledge::generate_response;
use crate::plan::generate_plan;
use crate::types::{AgentContext, AgentResponse, AgentType, CheckInAnalysis, CheckInInput, CoachingPlan, PlanInput};
use crate::workflow::{
    check_in_workflow, conversation_workflow, create_workflow_runner, plan_generation_workflow,
    WorkflowDefinition, WorkflowRunner,
};

/// Coaching engine with an optional external workflow runner.
///
/// All behavior is available without a runner; [`Engine::new`] is the
/// fully-local configuration used in tests and by default.
#[derive(Default)]
pub struct Engine {
    runner: Option<Box<dyn WorkflowRunner>>,
}

impl Engine {
    /// Create a local-only engine.
    pub fn new() -> Self {
        Self { runner: None }
    }

    /// Create an engine that offers work to the given runner first.
    pub fn with_runner(runner: Box<dyn WorkflowRunner>) -> Self {
        Self {
            runner: Some(runner),
        }
    }

    /// Build an engine from configuration. A missing or invalid workflow
    /// section degrades to the local-only engine.
    pub fn from_config(config: &Config) -> Self {
        match create_workflow_runner(&config.workflow) {
            Ok(runner) => Self { runner },
            Err(e) => {
                tracing::warn!(error = %e, "workflow engine unavailable, using local generation");
                Self::new()
            }
        }
    }

    /// Whether an external runner is attached.
    pub fn has_runner(&self) -> bool {
        self.runner.is_some()
    }

    /// Process a parent message through the appropriate expert agent.
    pub fn respond(
        &self,
        agent: AgentType,
        message: &str,
        context: &AgentContext,
    ) -> AgentResponse {
        // Safety check first; a high-risk verdict never goes near the
        // external engine. generate_response runs the classifier itself, so
        // the local path stays a single call.
        let verdict = crate::safety::check_safety(message);
        if verdict.is_high_risk {
            return generate_response(agent, message, context);
        }

        if let Some(value) = self.try_runner(
            &conversation_workflow(agent),
            serde_json::json!({
                "message": message,
                "agentType": agent.as_str(),
                "context": context,
            }),
        ) {
            match serde_json::from_value::<AgentResponse>(value) {
                Ok(response) => return response,
                Err(e) => {
                    tracing::warn!(error = %e, "discarding malformed workflow response");
                }
            }
        }

        generate_response(agent, message, context)
    }

    /// Generate a 30-day coaching plan from a baseline assessment.
    ///
    /// The workflow run is observational only: the returned plan is always
    /// the local deterministic one.
    pub fn generate_plan(&self, input: &PlanInput) -> CoachingPlan {
        let _ = self.try_runner(
            &plan_generation_workflow(),
            serde_json::to_value(input).unwrap_or_default(),
        );
        generate_plan(input)
    }

    /// Analyze weekly check-in data. As with plans, the local analysis is
    /// authoritative.
    pub fn analyze_check_in(&self, input: &CheckInInput) -> CheckInAnalysis {
        let _ = self.try_runner(
            &check_in_workflow(),
            serde_json::to_value(input).unwrap_or_default(),
        );
        analyze_check_in(input)
    }

    /// Offer a workflow to the runner, returning its payload when it both
    /// exists and succeeds with one.
    fn try_runner(
        &self,
        workflow: &WorkflowDefinition,
        inputs: serde_json::Value,
    ) -> Option<serde_json::Value> {
        let runner = self.runner.as_ref()?;
        match runner.execute(workflow, &inputs) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    workflow = %workflow.name,
                    error = %e,
                    "workflow execution failed, using local generation"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::types::Intensity;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Runner double: counts calls and replays a canned behavior.
    struct MockRunner {
        calls: Arc<AtomicUsize>,
        behavior: MockBehavior,
    }

    enum MockBehavior {
        Decline,
        Fail,
        Respond(serde_json::Value),
    }

    impl WorkflowRunner for MockRunner {
        fn execute(
            &self,
            _workflow: &WorkflowDefinition,
            _inputs: &serde_json::Value,
        ) -> Result<Option<serde_json::Value>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                MockBehavior::Decline => Ok(None),
                MockBehavior::Fail => Err(Error::Workflow("engine down".to_string())),
                MockBehavior::Respond(value) => Ok(Some(value.clone())),
            }
        }
    }

    fn engine_with(behavior: MockBehavior) -> (Engine, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let runner = MockRunner {
            calls: calls.clone(),
            behavior,
        };
        (Engine::with_runner(Box::new(runner)), calls)
    }

    #[test]
    fn test_local_engine_responds() {
        let engine = Engine::new();
        let response = engine.respond(
            AgentType::Behavior,
            "My child keeps hitting his sister",
            &AgentContext::default(),
        );
        assert!(response.content.contains("Hitting is very common"));
        assert!(!engine.has_runner());
    }

    #[test]
    fn test_declining_runner_falls_back_to_local() {
        let (engine, calls) = engine_with(MockBehavior::Decline);
        let response = engine.respond(
            AgentType::Behavior,
            "Daily tantrums at the store",
            &AgentContext::default(),
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(response.content.contains("Tantrums are a normal part"));
    }

    #[test]
    fn test_failing_runner_falls_back_to_local() {
        let (engine, calls) = engine_with(MockBehavior::Fail);
        let response = engine.respond(
            AgentType::Sleep,
            "Bedtime takes two hours",
            &AgentContext::default(),
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(response.content.contains("Bedtime resistance is very common"));
    }

    #[test]
    fn test_well_formed_runner_response_is_used() {
        let canned = serde_json::json!({
            "content": "Engine-generated guidance",
            "safety_flag": false,
        });
        let (engine, _) = engine_with(MockBehavior::Respond(canned));
        let response = engine.respond(
            AgentType::Behavior,
            "Daily tantrums at the store",
            &AgentContext::default(),
        );
        assert_eq!(response.content, "Engine-generated guidance");
    }

    #[test]
    fn test_malformed_runner_response_is_discarded() {
        let (engine, _) = engine_with(MockBehavior::Respond(serde_json::json!({
            "unexpected": true
        })));
        let response = engine.respond(
            AgentType::Behavior,
            "Daily tantrums at the store",
            &AgentContext::default(),
        );
        assert!(response.content.contains("Tantrums are a normal part"));
    }

    #[test]
    fn test_high_risk_never_reaches_runner() {
        let (engine, calls) = engine_with(MockBehavior::Respond(serde_json::json!({
            "content": "should never be used",
            "safety_flag": false,
        })));
        let response = engine.respond(
            AgentType::Behavior,
            "I want to end my life",
            &AgentContext::default(),
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(response.safety_flag);
        assert!(response.escalation.is_some());
    }

    #[test]
    fn test_plan_is_local_even_with_runner() {
        let canned = serde_json::json!({ "title": "Engine plan" });
        let (engine, calls) = engine_with(MockBehavior::Respond(canned));
        let input = PlanInput {
            child_age_months: 30,
            challenges: vec!["tantrums".to_string()],
            goals: vec![],
            intensity: Intensity::Medium,
            triggers: vec![],
        };
        let plan = engine.generate_plan(&input);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(plan, crate::plan::generate_plan(&input));
    }

    #[test]
    fn test_check_in_is_local_even_with_runner() {
        let (engine, calls) = engine_with(MockBehavior::Fail);
        let input = CheckInInput {
            week: 2,
            tracking: Default::default(),
            parent_feedback: None,
        };
        let analysis = engine.analyze_check_in(&input);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(analysis, crate::checkin::analyze_check_in(&input));
    }

    #[test]
    fn test_from_config_without_workflow_is_local() {
        let engine = Engine::from_config(&Config::default());
        assert!(!engine.has_runner());
    }
}
