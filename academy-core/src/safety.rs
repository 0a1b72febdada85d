//! Safety signal detection and escalation.
//!
//! Every inbound parent message passes through [`check_safety`] before any
//! other generation runs. Detection follows the humility protocol: when in
//! doubt, escalate rather than continue coaching.
//!
//! The pattern library is a static table of risk categories, each with a
//! small set of case-insensitive detection rules and a resource list. Rules
//! match word stems where the vocabulary inflects ("suicid" covers suicide
//! and suicidal, "threat" covers threatened and threatening).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ============================================
// Risk categories
// ============================================

/// A named class of high-risk situation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskCategory {
    SelfHarm,
    ChildAbuse,
    DomesticViolence,
    PostpartumDistress,
    MedicalEmergency,
}

impl RiskCategory {
    /// All categories in classification order. The order is part of the
    /// contract: signals and merged resources come out in this order.
    pub const ALL: [RiskCategory; 5] = [
        RiskCategory::SelfHarm,
        RiskCategory::ChildAbuse,
        RiskCategory::DomesticViolence,
        RiskCategory::PostpartumDistress,
        RiskCategory::MedicalEmergency,
    ];

    /// Returns the identifier used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::SelfHarm => "self-harm",
            RiskCategory::ChildAbuse => "child-abuse",
            RiskCategory::DomesticViolence => "domestic-violence",
            RiskCategory::PostpartumDistress => "postpartum-distress",
            RiskCategory::MedicalEmergency => "medical-emergency",
        }
    }

    /// The action a match in this category demands on its own.
    /// Postpartum distress escalates to professional support; every other
    /// category is an immediate crisis.
    pub fn severity(&self) -> RecommendedAction {
        match self {
            RiskCategory::PostpartumDistress => RecommendedAction::Escalate,
            _ => RecommendedAction::Crisis,
        }
    }

    /// Resource lists merged into the verdict when this category matches,
    /// in merge order.
    fn resource_lists(&self) -> &'static [&'static [&'static str]] {
        match self {
            RiskCategory::SelfHarm => &[GENERAL_RESOURCES],
            RiskCategory::ChildAbuse => &[CHILD_ABUSE_RESOURCES, GENERAL_RESOURCES],
            RiskCategory::DomesticViolence => &[DOMESTIC_VIOLENCE_RESOURCES, GENERAL_RESOURCES],
            RiskCategory::PostpartumDistress => &[POSTPARTUM_RESOURCES, GENERAL_RESOURCES],
            RiskCategory::MedicalEmergency => &[MEDICAL_RESOURCES],
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the classifier recommends the caller do next.
///
/// Ordered by severity so escalation across multiple matched categories is a
/// plain `max`: a later lower-severity match never downgrades the verdict.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RecommendedAction {
    Continue,
    Escalate,
    Crisis,
}

impl RecommendedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendedAction::Continue => "continue",
            RecommendedAction::Escalate => "escalate",
            RecommendedAction::Crisis => "crisis",
        }
    }
}

/// Safety signal detection result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyVerdict {
    pub is_high_risk: bool,
    /// One entry per matched category, in classification order
    pub signals: Vec<RiskCategory>,
    pub recommended_action: RecommendedAction,
    /// Deduplicated resource strings in first-seen order; None when empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crisis_resources: Option<Vec<String>>,
}

impl SafetyVerdict {
    /// A verdict that lets coaching continue.
    pub fn safe() -> Self {
        Self {
            is_high_risk: false,
            signals: Vec::new(),
            recommended_action: RecommendedAction::Continue,
            crisis_resources: None,
        }
    }
}

// ============================================
// Pattern library
// ============================================

const GENERAL_RESOURCES: &[&str] = &[
    "Emergency Services: Call your local emergency number (911 in the US)",
    "Crisis Text Line: Text HOME to 741741",
    "National Suicide Prevention Lifeline: 988 (call or text)",
];

const CHILD_ABUSE_RESOURCES: &[&str] = &[
    "Childhelp National Child Abuse Hotline: 1-800-422-4453",
    "Contact your local child protective services",
];

const DOMESTIC_VIOLENCE_RESOURCES: &[&str] = &[
    "National Domestic Violence Hotline: 1-800-799-7233",
    "Text START to 88788",
];

const POSTPARTUM_RESOURCES: &[&str] = &[
    "Postpartum Support International Helpline: 1-800-944-4773",
    "Text 'HELP' to 988",
    "Crisis Text Line: Text HOME to 741741",
];

const MEDICAL_RESOURCES: &[&str] = &[
    "Call your local emergency number immediately (911 in the US)",
    "Poison Control Center: 1-800-222-1222",
];

/// Detection rules per category, in classification order.
///
/// Within a category the first matching rule records the category and the
/// remaining rules are skipped; the outer category scan always continues, so
/// one message can raise several signals at once.
static HIGH_RISK_PATTERNS: Lazy<Vec<(RiskCategory, Vec<Regex>)>> = Lazy::new(|| {
    fn rules(patterns: &[&str]) -> Vec<Regex> {
        patterns
            .iter()
            .map(|p| Regex::new(p).expect("invalid safety pattern"))
            .collect()
    }

    vec![
        (
            RiskCategory::SelfHarm,
            rules(&[
                r"(?i)\b(?:suicid|kill\s*(?:myself|themselves|him|her)\b|want\s*to\s*die\b|end\s*(?:it|my\s*life)\b|hurt\s*myself\b)",
                r"(?i)\b(?:self[- ]?harm|cutting|overdose)\b",
            ]),
        ),
        (
            RiskCategory::ChildAbuse,
            rules(&[
                r"(?i)\b(?:hit(?:ting)?\s*(?:the\s*)?child|beat(?:ing)?\s*(?:the\s*)?child|shak(?:e|ing)\s*(?:the\s*)?baby)\b",
                r"(?i)\b(?:abuse|neglect|starv(?:e|ing)|lock(?:ed)?\s*(?:in|up)|burn(?:ed|ing)?)\b",
                r"(?i)\bsomeone\s*(?:is\s*)?(?:hurting|touching|abusing)",
            ]),
        ),
        (
            RiskCategory::DomesticViolence,
            rules(&[
                r"(?i)\bpartner\s*(?:hit|hurt|beat|chok|threat)",
                r"(?i)\b(?:domestic\s*violence|afraid\s*of\s*(?:my\s*)?(?:husband|wife|partner|spouse))\b",
                r"(?i)\bhe(?:'s|s)?\s*(?:going\s*to|gonna)\s*(?:kill|hurt)\b",
            ]),
        ),
        (
            RiskCategory::PostpartumDistress,
            rules(&[
                r"(?i)\b(?:can'?t\s*bond|don'?t\s*(?:love|want)\s*(?:my\s*)?baby|regret\s*(?:having|the\s*baby))\b",
                r"(?i)\b(?:postpartum\s*(?:depression|psychosis)|intrusive\s*thoughts?\s*(?:about|of)\s*(?:harm|hurt))",
                r"(?i)\bthoughts?\s*(?:of|about)\s*harming\s*(?:my\s*)?(?:baby|child|infant)\b",
            ]),
        ),
        (
            RiskCategory::MedicalEmergency,
            rules(&[
                r"(?i)\b(?:not\s*breathing|unconscious|seizure|convuls|choking|blue\s*(?:lips|face)|unresponsive)",
                r"(?i)\b(?:poisoned|swallowed|ingested|overdose|allergic\s*reaction|anaphyla)",
                r"(?i)\b(?:head\s*injury|fall|fell|blood|bleeding\s*(?:heavily|a\s*lot))\b",
            ]),
        ),
    ]
});

// ============================================
// Classifier
// ============================================

/// Check a message for high-risk safety signals.
///
/// Pure and total: no side effects, never panics, any `&str` input is
/// acceptable including empty strings and control characters. Calling it
/// twice on the same input yields identical verdicts.
pub fn check_safety(message: &str) -> SafetyVerdict {
    let mut signals: Vec<RiskCategory> = Vec::new();
    let mut recommended_action = RecommendedAction::Continue;
    let mut resources: Vec<String> = Vec::new();

    for (category, rules) in HIGH_RISK_PATTERNS.iter() {
        if rules.iter().any(|rule| rule.is_match(message)) {
            signals.push(*category);
            recommended_action = recommended_action.max(category.severity());

            for list in category.resource_lists() {
                for resource in *list {
                    let resource = resource.to_string();
                    if !resources.contains(&resource) {
                        resources.push(resource);
                    }
                }
            }
        }
    }

    SafetyVerdict {
        is_high_risk: !signals.is_empty(),
        signals,
        recommended_action,
        crisis_resources: if resources.is_empty() {
            None
        } else {
            Some(resources)
        },
    }
}

// ============================================
// Escalation responder
// ============================================

/// Generate the safety-first response for a high-risk verdict.
///
/// Returns the empty string when the verdict is not high-risk. Output is
/// deterministic for a given verdict: no randomness, no timestamps.
pub fn generate_safety_response(verdict: &SafetyVerdict) -> String {
    if !verdict.is_high_risk {
        return String::new();
    }

    let mut parts: Vec<String> = Vec::new();

    parts.push(
        "I want to make sure you and your family are safe. What you've shared sounds like it \
         may need immediate attention from a professional who can help right now."
            .to_string(),
    );
    parts.push(String::new());
    parts.push(
        "**Parent Academy is not a substitute for emergency services or professional help.** \
         Please reach out to one of these resources:"
            .to_string(),
    );
    parts.push(String::new());

    if let Some(resources) = &verdict.crisis_resources {
        for resource in resources {
            parts.push(format!("- {}", resource));
        }
    }

    parts.push(String::new());

    if verdict.recommended_action == RecommendedAction::Crisis {
        parts.push(
            "**If you or someone else is in immediate danger, please contact emergency services \
             right away.**"
                .to_string(),
        );
    } else {
        parts.push(
            "Please consider reaching out to a qualified professional. You deserve support, and \
             these situations benefit from expert guidance beyond what a coaching platform can \
             provide."
                .to_string(),
        );
    }

    parts.push(String::new());
    parts.push(
        "I'm here for parenting coaching when you're ready, but right now your safety comes \
         first."
            .to_string(),
    );

    parts.join("\n")
}
