//! Core domain types for Parent Academy
//!
//! These types are the in-memory shapes exchanged with the caller (the web
//! or API layer). The core consumes and produces them; transport,
//! persistence, and JSON wire handling stay with the caller.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Agent** | One of six fixed specialist coaches (behavior, milestones, sleep, nutrition, emotions, safety) |
//! | **Mode** | How a conversation turn is interpreted: normal chat or one of two role-play modes |
//! | **Context** | Per-request snapshot of child age, challenges, goals, plan, and recent tracking |
//! | **Plan** | A generated 30-day coaching plan: weekly goals, daily actions, scripts, if-then rules |
//! | **Check-in** | Weekly analysis of aggregated tracking metrics against fixed thresholds |
//! | **Verdict** | Output of the safety classifier (see [`crate::safety`]) |

use serde::{Deserialize, Serialize};

// ============================================
// Agent types and profiles
// ============================================

/// Available expert agent types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    /// Tantrums, meltdowns, aggression, defiance
    Behavior,
    /// Developmental milestones, growth tracking
    Milestones,
    /// Bedtime routines, sleep regression, naps
    Sleep,
    /// Picky eating, mealtime, feeding challenges
    Nutrition,
    /// Emotional regulation, anxiety, social skills
    Emotions,
    /// Safety-first escalation agent
    Safety,
}

impl AgentType {
    /// All agent types in catalog order.
    pub const ALL: [AgentType; 6] = [
        AgentType::Behavior,
        AgentType::Milestones,
        AgentType::Sleep,
        AgentType::Nutrition,
        AgentType::Emotions,
        AgentType::Safety,
    ];

    /// Returns the identifier used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Behavior => "behavior",
            AgentType::Milestones => "milestones",
            AgentType::Sleep => "sleep",
            AgentType::Nutrition => "nutrition",
            AgentType::Emotions => "emotions",
            AgentType::Safety => "safety",
        }
    }

    /// Returns the static profile for this agent.
    pub fn profile(&self) -> &'static AgentProfile {
        match self {
            AgentType::Behavior => &BEHAVIOR_PROFILE,
            AgentType::Milestones => &MILESTONES_PROFILE,
            AgentType::Sleep => &SLEEP_PROFILE,
            AgentType::Nutrition => &NUTRITION_PROFILE,
            AgentType::Emotions => &EMOTIONS_PROFILE,
            AgentType::Safety => &SAFETY_PROFILE,
        }
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "behavior" => Ok(AgentType::Behavior),
            "milestones" => Ok(AgentType::Milestones),
            "sleep" => Ok(AgentType::Sleep),
            "nutrition" => Ok(AgentType::Nutrition),
            "emotions" => Ok(AgentType::Emotions),
            "safety" => Ok(AgentType::Safety),
            _ => Err(format!("unknown agent type: {}", s)),
        }
    }
}

/// Static metadata for an expert agent.
#[derive(Debug, Clone, Serialize)]
pub struct AgentProfile {
    /// Display name, e.g. "Behavior Expert"
    pub name: &'static str,
    /// Professional title shown under the name
    pub title: &'static str,
    /// One-paragraph description of the specialty
    pub description: &'static str,
    /// Topic tags used for discovery
    pub specialties: &'static [&'static str],
    /// UI icon identifier
    pub icon: &'static str,
}

static BEHAVIOR_PROFILE: AgentProfile = AgentProfile {
    name: "Behavior Expert",
    title: "Child Behavior Specialist",
    description: "Specializes in tantrums, meltdowns, aggression, defiance, and behavioral regulation strategies.",
    specialties: &["tantrums", "meltdowns", "aggression", "defiance", "boundaries", "transitions"],
    icon: "Brain",
};

static MILESTONES_PROFILE: AgentProfile = AgentProfile {
    name: "Development Expert",
    title: "Child Development Specialist",
    description: "Tracks developmental milestones, provides age-appropriate activity guidance, and identifies potential delays.",
    specialties: &["motor skills", "language", "cognitive", "social", "play", "learning"],
    icon: "TrendingUp",
};

static SLEEP_PROFILE: AgentProfile = AgentProfile {
    name: "Sleep Expert",
    title: "Pediatric Sleep Specialist",
    description: "Helps with bedtime routines, sleep regression, night waking, and healthy sleep habits.",
    specialties: &["bedtime", "naps", "sleep regression", "night waking", "routines"],
    icon: "Moon",
};

static NUTRITION_PROFILE: AgentProfile = AgentProfile {
    name: "Nutrition Expert",
    title: "Child Nutrition Specialist",
    description: "Addresses picky eating, mealtime battles, feeding challenges, and healthy eating habits.",
    specialties: &["picky eating", "mealtime", "feeding", "food introduction", "nutrition"],
    icon: "Apple",
};

static EMOTIONS_PROFILE: AgentProfile = AgentProfile {
    name: "Emotions Expert",
    title: "Child Emotional Development Specialist",
    description: "Supports emotional regulation, anxiety management, social skills, and sibling dynamics.",
    specialties: &["emotions", "anxiety", "social skills", "sibling conflict", "empathy", "self-regulation"],
    icon: "Heart",
};

static SAFETY_PROFILE: AgentProfile = AgentProfile {
    name: "Safety Advisor",
    title: "Safety & Escalation Specialist",
    description: "Handles high-risk situations, provides crisis resources, and ensures safety-first guidance.",
    specialties: &["crisis", "abuse", "self-harm", "domestic violence", "medical emergency", "postpartum"],
    icon: "ShieldAlert",
};

// ============================================
// Conversation context
// ============================================

/// Conversation mode for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentMode {
    /// Normal coaching conversation
    #[default]
    Chat,
    /// Parent practices a response; the agent coaches the script
    RoleplayParent,
    /// The agent voices the child's perspective
    RoleplayChild,
}

impl AgentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentMode::Chat => "chat",
            AgentMode::RoleplayParent => "roleplay-parent",
            AgentMode::RoleplayChild => "roleplay-child",
        }
    }
}

impl std::str::FromStr for AgentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(AgentMode::Chat),
            "roleplay-parent" => Ok(AgentMode::RoleplayParent),
            "roleplay-child" => Ok(AgentMode::RoleplayChild),
            _ => Err(format!("unknown agent mode: {}", s)),
        }
    }
}

/// Summary of the active plan, supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSnapshot {
    /// Caller-assigned plan identifier
    pub id: String,
    /// Current plan week (1-4)
    pub week: u32,
    /// Daily action texts for the current week
    pub daily_actions: Vec<String>,
}

/// Recent tracking numbers, supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackingSnapshot {
    pub tantrum_count: Option<u32>,
    pub intensity: Option<f64>,
    pub confidence: Option<f64>,
}

/// One prior turn of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// "parent" or "agent"
    pub role: String,
    pub content: String,
}

/// Context provided with each conversation request.
///
/// Rebuilt fresh by the caller per request; the core never mutates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentContext {
    /// Child age in months, if known
    pub child_age_months: Option<u32>,
    /// Challenge tags from the baseline assessment
    #[serde(default)]
    pub challenges: Vec<String>,
    /// Goal tags from the baseline assessment
    #[serde(default)]
    pub goals: Vec<String>,
    /// Active plan summary, if one exists
    pub current_plan: Option<PlanSnapshot>,
    /// Recent tracking snapshot, if available
    pub recent_tracking: Option<TrackingSnapshot>,
    /// Last N conversation turns, oldest first
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
    /// Conversation mode
    #[serde(default)]
    pub mode: AgentMode,
}

// ============================================
// Agent responses
// ============================================

/// How an escalation should be routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationKind {
    /// Immediate danger; emergency services
    Crisis,
    /// Professional help recommended
    Professional,
    /// Medical attention needed
    Medical,
}

impl EscalationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EscalationKind::Crisis => "crisis",
            EscalationKind::Professional => "professional",
            EscalationKind::Medical => "medical",
        }
    }
}

/// Escalation block attached to a high-risk response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Escalation {
    pub kind: EscalationKind,
    pub resources: Vec<String>,
    pub message: String,
}

/// Result of processing a parent message.
///
/// `content` uses a lightweight markup convention: `**bold**` spans are
/// rendered as emphasis by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    pub content: String,
    pub safety_flag: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_actions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation: Option<Escalation>,
}

// ============================================
// Coaching plans
// ============================================

/// Plan intensity from the baseline assessment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    #[default]
    Medium,
    High,
}

impl Intensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Low => "low",
            Intensity::Medium => "medium",
            Intensity::High => "high",
        }
    }
}

impl std::str::FromStr for Intensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Intensity::Low),
            "medium" => Ok(Intensity::Medium),
            "high" => Ok(Intensity::High),
            _ => Err(format!("unknown intensity: {}", s)),
        }
    }
}

/// Baseline assessment input for plan generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanInput {
    pub child_age_months: u32,
    pub challenges: Vec<String>,
    pub goals: Vec<String>,
    pub intensity: Intensity,
    /// Known trigger situations; recorded by callers, not used by generation
    #[serde(default)]
    pub triggers: Vec<String>,
}

/// One of the four templated weekly goals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyGoal {
    /// Week number, 1-4
    pub week: u32,
    pub goal: String,
    /// Metric labels the parent tracks this week
    pub metrics: Vec<String>,
}

/// One day's micro-action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAction {
    /// Day number, 1-30
    pub day: u32,
    pub action: String,
    /// Challenge tag this action came from ("self-care" for padding days)
    pub category: String,
    #[serde(default)]
    pub completed: bool,
}

/// A what-to-say script for a concrete situation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub situation: String,
    pub what_to_say: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub what_not_to_say: Option<String>,
}

/// An if-then rule: trigger, response, optional fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IfThenRule {
    pub trigger: String,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

/// A generated 30-day coaching plan.
///
/// Invariant: `daily_actions` always has exactly 30 entries with days
/// strictly increasing 1..=30 and no gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachingPlan {
    pub title: String,
    pub description: String,
    pub weekly_goals: Vec<WeeklyGoal>,
    pub daily_actions: Vec<DailyAction>,
    pub scripts: Vec<Script>,
    pub if_then_guidance: Vec<IfThenRule>,
}

// ============================================
// Weekly check-ins
// ============================================

/// Aggregated weekly metric averages. Absent metrics contribute nothing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TrackingAverages {
    pub avg_tantrums: Option<f64>,
    pub avg_intensity: Option<f64>,
    pub avg_confidence: Option<f64>,
    pub actions_completed_rate: Option<f64>,
}

/// Weekly check-in input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInInput {
    pub week: u32,
    pub tracking: TrackingAverages,
    /// Free-text feedback; recorded by callers, not used by analysis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_feedback: Option<String>,
}

/// Result of analyzing a weekly check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInAnalysis {
    pub summary: String,
    pub improvements: Vec<String>,
    pub struggles: Vec<String>,
    pub plan_adjustments: Vec<String>,
    pub next_week_focus: String,
}
