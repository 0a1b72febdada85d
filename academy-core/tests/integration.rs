//! Integration tests for the Parent Academy coaching core
//!
//! These exercise the public surface the way the web/API layer does: plain
//! message strings and data shapes in, structured verdicts and responses
//! out. Everything here must hold without any external engine configured.

use academy_core::types::{AgentContext, AgentMode, CheckInInput, Intensity, PlanInput, TrackingAverages};
use academy_core::{
    analyze_check_in, check_safety, generate_plan, generate_response, generate_safety_response,
    AgentType, Engine, RecommendedAction, RiskCategory, SafetyVerdict,
};

// ============================================
// Safety pipeline
// ============================================

#[test]
fn test_self_harm_message_escalates_to_crisis() {
    let verdict = check_safety("I want to end my life");
    assert!(verdict.is_high_risk);
    assert_eq!(verdict.recommended_action, RecommendedAction::Crisis);
    let resources = verdict.crisis_resources.as_ref().expect("resources");
    assert!(!resources.is_empty());
    assert!(resources
        .iter()
        .any(|r| r.contains("National Suicide Prevention Lifeline: 988")));
}

#[test]
fn test_benign_message_passes_through() {
    let verdict = check_safety("What's a good bedtime snack?");
    assert!(!verdict.is_high_risk);
    assert_eq!(verdict.recommended_action, RecommendedAction::Continue);
    assert!(verdict.crisis_resources.is_none());
}

#[test]
fn test_safety_response_empty_for_safe_verdict() {
    assert_eq!(generate_safety_response(&SafetyVerdict::safe()), "");
}

#[test]
fn test_check_safety_idempotent() {
    let message = "my partner hit me and the baby is not breathing";
    let first = check_safety(message);
    let second = check_safety(message);
    assert_eq!(first, second);
    assert!(first.signals.contains(&RiskCategory::DomesticViolence));
    assert!(first.signals.contains(&RiskCategory::MedicalEmergency));
}

#[test]
fn test_domestic_violence_scenario_end_to_end() {
    for agent in AgentType::ALL {
        let response = generate_response(
            agent,
            "My partner threatened to kill me",
            &AgentContext::default(),
        );
        assert!(response.safety_flag, "agent {} must flag", agent);
        let escalation = response.escalation.as_ref().expect("escalation");
        assert!(escalation
            .resources
            .iter()
            .any(|r| r.contains("National Domestic Violence Hotline: 1-800-799-7233")));
    }
}

// ============================================
// Conversation generation
// ============================================

#[test]
fn test_hitting_scenario_end_to_end() {
    let context = AgentContext {
        child_age_months: Some(30),
        mode: AgentMode::Chat,
        ..Default::default()
    };
    let response = generate_response(
        AgentType::Behavior,
        "My child keeps hitting his sister",
        &context,
    );
    assert!(!response.safety_flag);
    assert!(response.content.contains("Hitting is very common"));
    assert!(response
        .suggested_actions
        .expect("actions")
        .contains(&"Block the hit and give an alternative action".to_string()));
}

#[test]
fn test_every_agent_answers_every_mode() {
    for agent in AgentType::ALL {
        for mode in [
            AgentMode::Chat,
            AgentMode::RoleplayParent,
            AgentMode::RoleplayChild,
        ] {
            let context = AgentContext {
                mode,
                child_age_months: Some(30),
                ..Default::default()
            };
            let response = generate_response(agent, "We are struggling today", &context);
            assert!(
                !response.content.is_empty(),
                "agent {} mode {} produced empty content",
                agent,
                mode.as_str()
            );
            assert!(!response.safety_flag);
        }
    }
}

// ============================================
// Plan generation
// ============================================

#[test]
fn test_plan_invariants_for_tantrums_baseline() {
    let input = PlanInput {
        child_age_months: 28,
        challenges: vec!["tantrums".to_string()],
        goals: vec!["calmer mornings".to_string()],
        intensity: Intensity::Medium,
        triggers: vec![],
    };
    let plan = generate_plan(&input);
    assert_eq!(plan.daily_actions.len(), 30);
    assert_eq!(plan.daily_actions[0].day, 1);
    assert_eq!(plan.daily_actions[29].day, 30);
    for action in &plan.daily_actions[..5] {
        assert_eq!(action.category, "tantrums");
    }
    assert_eq!(plan.weekly_goals.len(), 4);
}

#[test]
fn test_plan_generation_is_reproducible() {
    let input = PlanInput {
        child_age_months: 50,
        challenges: vec!["bedtime".to_string(), "picky eating".to_string()],
        goals: vec!["easier evenings".to_string()],
        intensity: Intensity::High,
        triggers: vec!["hunger".to_string()],
    };
    assert_eq!(generate_plan(&input), generate_plan(&input));
}

// ============================================
// Check-in analysis
// ============================================

#[test]
fn test_strong_week_analysis() {
    let analysis = analyze_check_in(&CheckInInput {
        week: 1,
        tracking: TrackingAverages {
            avg_tantrums: Some(1.0),
            avg_intensity: Some(1.0),
            avg_confidence: Some(5.0),
            actions_completed_rate: Some(0.9),
        },
        parent_feedback: None,
    });
    assert_eq!(analysis.struggles.len(), 0);
    assert!(analysis.improvements.len() >= 3);
}

#[test]
fn test_high_intensity_week_suggests_simplifying() {
    let analysis = analyze_check_in(&CheckInInput {
        week: 2,
        tracking: TrackingAverages {
            avg_intensity: Some(4.5),
            ..Default::default()
        },
        parent_feedback: None,
    });
    assert_eq!(analysis.struggles.len(), 1);
    assert!(analysis
        .plan_adjustments
        .iter()
        .any(|a| a.contains("one strategy")));
}

// ============================================
// Engine wrapper
// ============================================

#[test]
fn test_engine_matches_free_functions_without_runner() {
    let engine = Engine::new();
    let context = AgentContext::default();
    let message = "Nap time is a daily fight";

    let from_engine = engine.respond(AgentType::Sleep, message, &context);
    let from_free = generate_response(AgentType::Sleep, message, &context);
    assert_eq!(from_engine.content, from_free.content);

    let input = PlanInput {
        child_age_months: 30,
        challenges: vec!["transitions".to_string()],
        goals: vec![],
        intensity: Intensity::Low,
        triggers: vec![],
    };
    assert_eq!(engine.generate_plan(&input), generate_plan(&input));
}

#[test]
fn test_responses_serialize_for_the_caller() {
    let response = generate_response(
        AgentType::Behavior,
        "tantrum after daycare",
        &AgentContext::default(),
    );
    let json = serde_json::to_value(&response).expect("serializes");
    assert!(json["content"].as_str().is_some());
    assert_eq!(json["safety_flag"], false);

    let round_trip: academy_core::AgentResponse =
        serde_json::from_value(json).expect("deserializes");
    assert_eq!(round_trip.content, response.content);
}
