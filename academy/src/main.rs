//! academy - Parent Academy coaching CLI
//!
//! Thin command-line consumer of the coaching core: chat with an expert
//! agent, generate a 30-day plan, or analyze a weekly check-in. Useful for
//! trying templates and for golden-output inspection; the production
//! surface is the web/API layer.

use academy_core::types::{
    AgentContext, AgentMode, AgentType, CheckInInput, Intensity, PlanInput, TrackingAverages,
};
use academy_core::{Config, Engine};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "academy")]
#[command(about = "Parent Academy coaching tools")]
#[command(version)]
struct Args {
    /// Output format: text (default) or json
    #[arg(short, long, default_value = "text", global = true)]
    format: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send a message to an expert agent
    Chat {
        /// Agent type: behavior, milestones, sleep, nutrition, emotions, safety
        #[arg(short, long, default_value = "behavior")]
        agent: String,

        /// Conversation mode: chat, roleplay-parent, roleplay-child
        #[arg(short, long, default_value = "chat")]
        mode: String,

        /// Child age in months
        #[arg(long)]
        age_months: Option<u32>,

        /// The parent message
        message: String,
    },

    /// Generate a 30-day coaching plan from a baseline assessment
    Plan {
        /// Child age in months
        #[arg(long)]
        age_months: u32,

        /// Challenge tags, in priority order (repeatable)
        #[arg(short, long = "challenge")]
        challenges: Vec<String>,

        /// Goal tags (repeatable)
        #[arg(short, long = "goal")]
        goals: Vec<String>,

        /// Plan intensity: low, medium, high
        #[arg(short, long, default_value = "medium")]
        intensity: String,
    },

    /// Analyze a weekly check-in from aggregated metrics
    CheckIn {
        /// Plan week being analyzed (1-4)
        #[arg(short, long)]
        week: u32,

        /// Average tantrums per day
        #[arg(long)]
        avg_tantrums: Option<f64>,

        /// Average meltdown intensity (1-5)
        #[arg(long)]
        avg_intensity: Option<f64>,

        /// Average parent confidence (1-5)
        #[arg(long)]
        avg_confidence: Option<f64>,

        /// Fraction of daily actions completed (0.0-1.0)
        #[arg(long)]
        completed_rate: Option<f64>,
    },

    /// List the available expert agents
    Agents,
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        academy_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let engine = Engine::from_config(&config);
    tracing::debug!(external_engine = engine.has_runner(), "engine ready");
    let json = args.format == "json";

    match args.command {
        Command::Chat {
            agent,
            mode,
            age_months,
            message,
        } => {
            let agent = AgentType::from_str(&agent).map_err(anyhow::Error::msg)?;
            let mode = AgentMode::from_str(&mode).map_err(anyhow::Error::msg)?;
            let context = AgentContext {
                child_age_months: age_months,
                mode,
                ..Default::default()
            };

            let response = engine.respond(agent, &message, &context);
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_chat_response(agent, &response);
            }
        }

        Command::Plan {
            age_months,
            challenges,
            goals,
            intensity,
        } => {
            let intensity = Intensity::from_str(&intensity).map_err(anyhow::Error::msg)?;
            let input = PlanInput {
                child_age_months: age_months,
                challenges,
                goals,
                intensity,
                triggers: Vec::new(),
            };

            let plan = engine.generate_plan(&input);
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print_plan(&plan);
            }
        }

        Command::CheckIn {
            week,
            avg_tantrums,
            avg_intensity,
            avg_confidence,
            completed_rate,
        } => {
            let input = CheckInInput {
                week,
                tracking: TrackingAverages {
                    avg_tantrums,
                    avg_intensity,
                    avg_confidence,
                    actions_completed_rate: completed_rate,
                },
                parent_feedback: None,
            };

            let analysis = engine.analyze_check_in(&input);
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_check_in(&analysis);
            }
        }

        Command::Agents => {
            if json {
                let profiles: Vec<_> = AgentType::ALL
                    .iter()
                    .map(|agent| {
                        serde_json::json!({
                            "type": agent.as_str(),
                            "profile": agent.profile(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&profiles)?);
            } else {
                for agent in AgentType::ALL {
                    let profile = agent.profile();
                    println!("{} - {}", agent.as_str(), profile.name);
                    println!("    {}", profile.title);
                    println!("    Specialties: {}", profile.specialties.join(", "));
                }
            }
        }
    }

    Ok(())
}

fn print_chat_response(agent: AgentType, response: &academy_core::AgentResponse) {
    if response.safety_flag {
        println!("[!] Safety escalation from the {} agent\n", agent.as_str());
    } else {
        println!("[{}]\n", agent.profile().name);
    }
    println!("{}", response.content);

    if let Some(actions) = &response.suggested_actions {
        println!("\nSuggested next steps:");
        for action in actions {
            println!("  - {}", action);
        }
    }
    if let Some(question) = &response.follow_up_question {
        println!("\n{}", question);
    }
}

fn print_plan(plan: &academy_core::CoachingPlan) {
    println!("{}", plan.title);
    println!("{}\n", plan.description);

    println!("Weekly goals:");
    for goal in &plan.weekly_goals {
        println!("  Week {}: {}", goal.week, goal.goal);
    }

    println!("\nDaily actions:");
    for action in &plan.daily_actions {
        println!("  Day {:>2} [{}] {}", action.day, action.category, action.action);
    }

    if !plan.scripts.is_empty() {
        println!("\nScripts:");
        for script in &plan.scripts {
            println!("  When: {}", script.situation);
            println!("    Say: {}", script.what_to_say);
            if let Some(avoid) = &script.what_not_to_say {
                println!("    Avoid: {}", avoid);
            }
        }
    }

    if !plan.if_then_guidance.is_empty() {
        println!("\nIf-then guidance:");
        for rule in &plan.if_then_guidance {
            println!("  If: {}", rule.trigger);
            println!("    Then: {}", rule.response);
            if let Some(fallback) = &rule.fallback {
                println!("    Fallback: {}", fallback);
            }
        }
    }
}

fn print_check_in(analysis: &academy_core::CheckInAnalysis) {
    println!("{}\n", analysis.summary);

    println!("Improvements:");
    for item in &analysis.improvements {
        println!("  + {}", item);
    }

    if !analysis.struggles.is_empty() {
        println!("\nStruggles:");
        for item in &analysis.struggles {
            println!("  ! {}", item);
        }
    }

    if !analysis.plan_adjustments.is_empty() {
        println!("\nPlan adjustments:");
        for item in &analysis.plan_adjustments {
            println!("  > {}", item);
        }
    }

    println!("\n{}", analysis.next_week_focus);
}
