//! 30-day coaching plan generation.
//!
//! Plan generation is a pure table lookup plus concatenation: per-challenge
//! action, script, and if-then banks, concatenated in input order and padded
//! or truncated to the plan's fixed shape. The same input always produces a
//! byte-identical plan.

use crate::format::{age_group_label, capitalize};
use crate::types::{
    CoachingPlan, DailyAction, IfThenRule, Intensity, PlanInput, Script, WeeklyGoal,
};

/// Number of daily actions in every plan.
const PLAN_DAYS: usize = 30;

/// Generate a 30-day coaching plan from a baseline assessment.
///
/// Invariants: `daily_actions` has exactly 30 entries, days strictly 1..=30.
/// Unrecognized challenge strings fall back to the tantrums banks, since
/// challenges are user-supplied free text.
pub fn generate_plan(input: &PlanInput) -> CoachingPlan {
    let age = age_group_label(input.child_age_months);
    let primary_challenge = input
        .challenges
        .first()
        .map(String::as_str)
        .unwrap_or("general behavior");
    let primary_goal = input
        .goals
        .first()
        .map(String::as_str)
        .unwrap_or("calmer days");

    CoachingPlan {
        title: format!(
            "30-Day {} Plan for {}",
            capitalize(primary_challenge),
            age
        ),
        description: format!(
            "A personalized coaching plan focused on {} through daily micro-actions, scripts, and tracking.",
            primary_goal
        ),
        weekly_goals: weekly_goals(),
        daily_actions: daily_actions(&input.challenges, input.intensity),
        scripts: scripts(&input.challenges),
        if_then_guidance: if_then_guidance(&input.challenges),
    }
}

/// The four templated weekly goals. The weekly cadence is fixed regardless
/// of the baseline: awareness, strategies, refinement, consolidation.
fn weekly_goals() -> Vec<WeeklyGoal> {
    vec![
        WeeklyGoal {
            week: 1,
            goal: "Establish awareness and baseline routines".to_string(),
            metrics: vec![
                "Track daily occurrences".to_string(),
                "Note triggers and patterns".to_string(),
            ],
        },
        WeeklyGoal {
            week: 2,
            goal: "Introduce 1-2 new strategies consistently".to_string(),
            metrics: vec![
                "Use scripts at least 3x/day".to_string(),
                "Rate your confidence daily".to_string(),
            ],
        },
        WeeklyGoal {
            week: 3,
            goal: "Refine approach based on what's working".to_string(),
            metrics: vec![
                "Compare to week 1 baseline".to_string(),
                "Adjust strategies as needed".to_string(),
            ],
        },
        WeeklyGoal {
            week: 4,
            goal: "Consolidate gains and plan next phase".to_string(),
            metrics: vec![
                "Measure overall improvement".to_string(),
                "Identify remaining challenges".to_string(),
            ],
        },
    ]
}

/// Five canonical daily actions per recognized challenge key.
fn challenge_actions(key: &str) -> &'static [&'static str] {
    match key {
        "tantrums" => &[
            "Practice 3 deep breaths with your child during a calm moment",
            "Give a 5-minute warning before every transition today",
            "Name one emotion you see your child experiencing",
            "Offer 2 choices instead of a direct instruction",
            "Spend 10 minutes of floor play following their lead",
        ],
        "bedtime" => &[
            "Start your bedtime routine 15 minutes earlier today",
            "Do the same 3 steps in the same order tonight",
            "Dim lights 30 minutes before bed",
            "Read one book together as part of the routine",
            "Practice a calming activity before bed (gentle stretching, soft music)",
        ],
        "transitions" => &[
            "Give a 5-minute and 2-minute warning before transitions",
            "Use a visual timer for transitions",
            "Offer a choice during one transition today",
            "Create a transition song or phrase",
            "Let them bring a comfort item between activities",
        ],
        "hitting" => &[
            "Practice 'gentle hands' during a calm moment",
            "When hitting happens, block and redirect: 'You can hit this pillow instead'",
            "Give extra attention to positive physical contact (high fives, hugs)",
            "Identify and address the trigger before it escalates",
            "Role-play an alternative response to frustration",
        ],
        "picky eating" => &[
            "Include one safe food at every meal",
            "Let your child help with a simple food preparation step",
            "Try one new food alongside favorites — no pressure to eat it",
            "Eat together at the table without distractions",
            "Describe food with fun words (crunchy, squishy) instead of 'healthy'",
        ],
        "sibling conflict" => &[
            "Give each child 10 minutes of one-on-one time",
            "Coach them through one conflict instead of solving it for them",
            "Notice and praise cooperative moments out loud",
            "Set up one parallel activity they can do side by side",
            "Teach one feeling word to help them express needs",
        ],
        "school refusal" => &[
            "Validate the feeling: 'I know mornings are hard'",
            "Create a visual morning routine chart together",
            "Provide one small thing to look forward to after school",
            "Practice a goodbye ritual that gives them something to hold onto",
            "Connect with the teacher about what happens after drop-off",
        ],
        _ => challenge_actions("tantrums"),
    }
}

fn daily_actions(challenges: &[String], intensity: Intensity) -> Vec<DailyAction> {
    let mut actions: Vec<DailyAction> = Vec::new();
    let mut day: u32 = 1;

    for challenge in challenges {
        let key = challenge.to_lowercase();
        for action in challenge_actions(&key) {
            actions.push(DailyAction {
                day,
                action: action.to_string(),
                category: challenge.clone(),
                completed: false,
            });
            day += 1;
        }
    }

    // Fill remaining days with general maintenance actions
    while actions.len() < PLAN_DAYS {
        let action = if intensity == Intensity::High {
            "Take 5 minutes for yourself today — you matter too"
        } else {
            "Reflect on one thing that went well today"
        };
        actions.push(DailyAction {
            day,
            action: action.to_string(),
            category: "self-care".to_string(),
            completed: false,
        });
        day += 1;
    }

    actions.truncate(PLAN_DAYS);
    actions
}

/// Script bank per recognized challenge key (situation, say, avoid).
fn challenge_scripts(key: &str) -> Vec<Script> {
    let bank: &[(&str, &str, &str)] = match key {
        "tantrums" => &[
            (
                "Child starts screaming when told 'no'",
                "I hear you. You're really upset because you wanted [thing]. It's okay to be mad. I'm right here.",
                "Stop crying! You're fine!",
            ),
            (
                "Child throws things",
                "I won't let you throw that. You're frustrated. You can stomp your feet or squeeze this instead.",
                "If you throw one more thing...",
            ),
            (
                "After the tantrum passes",
                "That was a big feeling. You felt so angry when [trigger]. I love you even when things are hard.",
                "Are you done? Now say sorry.",
            ),
        ],
        "bedtime" => &[
            (
                "Child says 'I'm not tired'",
                "Your body needs rest even when your brain feels awake. Let's do our cozy routine and see how your body feels.",
                "You ARE tired, stop arguing!",
            ),
            (
                "Child keeps getting out of bed",
                "It's sleep time. I'll walk you back to bed. I love you. See you in the morning.",
                "If you get out of bed one more time...",
            ),
        ],
        "hitting" => &[
            (
                "Child hits another child",
                "I'm going to stop you. Hitting hurts. Let's check if [friend] is okay. What were you trying to tell them?",
                "How would you like it if someone hit you?",
            ),
            (
                "Child hits the parent",
                "Ouch, that hurt me. I won't let you hit. You can tell me you're angry with your words.",
                "That's it, go to your room!",
            ),
        ],
        _ => return challenge_scripts("tantrums"),
    };

    bank.iter()
        .map(|(situation, say, avoid)| Script {
            situation: situation.to_string(),
            what_to_say: say.to_string(),
            what_not_to_say: Some(avoid.to_string()),
        })
        .collect()
}

fn scripts(challenges: &[String]) -> Vec<Script> {
    let mut all = Vec::new();
    for challenge in challenges {
        all.extend(challenge_scripts(&challenge.to_lowercase()));
    }
    all
}

/// If-then rule bank per recognized challenge key.
fn challenge_rules(key: &str) -> Vec<IfThenRule> {
    let bank: &[(&str, &str, &str)] = match key {
        "tantrums" => &[
            (
                "Child starts whining or escalating",
                "Get down to their level, make eye contact, validate: 'I can see this is hard.'",
                "If you can't get calm, step back 3 feet and take 3 breaths first.",
            ),
            (
                "Tantrum happens in public",
                "Move to a quieter spot. 'We're going to take a break over here until you feel calmer.'",
                "If you need to leave, leave. Your child's regulation matters more than the errand.",
            ),
        ],
        "bedtime" => &[(
            "Child resists starting the routine",
            "Offer a choice: 'Would you like to start with bath or pajamas?'",
            "Start with a calm activity they enjoy (reading, puzzles) to transition into bedtime mode.",
        )],
        "hitting" => &[(
            "You see the arm pull back",
            "Catch the hand gently: 'I'm going to help your hands stay gentle. Tell me with words.'",
            "If you miss it, address it calmly after: 'That was a hit. Hitting hurts. Let's practice what to do instead.'",
        )],
        _ => return challenge_rules("tantrums"),
    };

    bank.iter()
        .map(|(trigger, response, fallback)| IfThenRule {
            trigger: trigger.to_string(),
            response: response.to_string(),
            fallback: Some(fallback.to_string()),
        })
        .collect()
}

fn if_then_guidance(challenges: &[String]) -> Vec<IfThenRule> {
    let mut all = Vec::new();
    for challenge in challenges {
        all.extend(challenge_rules(&challenge.to_lowercase()));
    }
    all
}
