//! Weekly check-in analysis.
//!
//! Classifies each supplied weekly metric average against fixed thresholds
//! and emits improvements, struggles, and plan adjustments. Absent metrics
//! contribute nothing. Purely a function of the supplied averages; storage
//! and aggregation are the caller's job.

use crate::types::{CheckInAnalysis, CheckInInput};

/// Analyze weekly check-in data and generate recommendations.
pub fn analyze_check_in(input: &CheckInInput) -> CheckInAnalysis {
    let tracking = &input.tracking;
    let mut improvements: Vec<String> = Vec::new();
    let mut struggles: Vec<String> = Vec::new();
    let mut adjustments: Vec<String> = Vec::new();

    if let Some(avg_tantrums) = tracking.avg_tantrums {
        if avg_tantrums < 3.0 {
            improvements.push("Tantrum frequency is low — great consistency!".to_string());
        } else {
            struggles.push("Tantrums still frequent — let's look at triggers".to_string());
            adjustments.push(
                "Add an extra 5-minute warning before the most challenging transition"
                    .to_string(),
            );
        }
    }

    if let Some(avg_intensity) = tracking.avg_intensity {
        if avg_intensity <= 2.0 {
            improvements.push("Meltdown intensity is decreasing".to_string());
        } else if avg_intensity >= 4.0 {
            struggles.push("Intensity remains high — consider simplifying the plan".to_string());
            adjustments
                .push("Focus on just one strategy this week instead of multiple".to_string());
        }
    }

    if let Some(avg_confidence) = tracking.avg_confidence {
        if avg_confidence >= 4.0 {
            improvements
                .push("Your confidence is growing — that makes a difference".to_string());
        } else if avg_confidence <= 2.0 {
            struggles.push("Confidence is low — let's make the plan easier to follow".to_string());
            adjustments.push("Reduce daily actions to just 1 focus area".to_string());
        }
    }

    if let Some(rate) = tracking.actions_completed_rate {
        if rate >= 0.7 {
            improvements.push(format!(
                "Completed {}% of daily actions",
                (rate * 100.0).round() as i64
            ));
        } else {
            struggles
                .push("Completion rate is low — the plan may be too ambitious".to_string());
            adjustments
                .push("Pick the 1-2 most impactful actions and set aside the rest".to_string());
        }
    }

    if improvements.is_empty() {
        improvements.push("You showed up this week — that counts".to_string());
    }

    let summary = format!(
        "**Week {} Summary**\n\n{} areas of progress, {} areas to adjust. {}",
        input.week,
        improvements.len(),
        struggles.len(),
        if adjustments.is_empty() {
            "Keep going with the current plan."
        } else {
            "I've suggested some changes to make next week more manageable."
        }
    );

    let next_week_focus = match struggles.first() {
        Some(struggle) => format!("Focus on: {}", leading_clause(struggle)),
        None => "Continue building on this week's momentum".to_string(),
    };

    CheckInAnalysis {
        summary,
        improvements,
        struggles,
        plan_adjustments: adjustments,
        next_week_focus,
    }
}

/// The struggle text before its em dash, trimmed. Struggle strings all
/// lead with the observation and follow with a coaching note.
fn leading_clause(text: &str) -> &str {
    text.split('—').next().unwrap_or(text).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrackingAverages;

    fn check_in(week: u32, tracking: TrackingAverages) -> CheckInInput {
        CheckInInput {
            week,
            tracking,
            parent_feedback: None,
        }
    }

    #[test]
    fn test_good_week_has_no_struggles() {
        let analysis = analyze_check_in(&check_in(
            2,
            TrackingAverages {
                avg_tantrums: Some(1.0),
                avg_intensity: Some(1.0),
                avg_confidence: Some(5.0),
                actions_completed_rate: Some(0.9),
            },
        ));
        assert!(analysis.struggles.is_empty());
        assert!(analysis.improvements.len() >= 3);
        assert!(analysis.plan_adjustments.is_empty());
        assert_eq!(
            analysis.next_week_focus,
            "Continue building on this week's momentum"
        );
        assert!(analysis.summary.contains("**Week 2 Summary**"));
        assert!(analysis.summary.contains("Keep going with the current plan."));
    }

    #[test]
    fn test_high_intensity_struggle_and_adjustment() {
        let analysis = analyze_check_in(&check_in(
            3,
            TrackingAverages {
                avg_intensity: Some(4.5),
                ..Default::default()
            },
        ));
        assert_eq!(analysis.struggles.len(), 1);
        assert!(analysis.struggles[0].contains("simplifying the plan"));
        assert_eq!(
            analysis.plan_adjustments,
            vec!["Focus on just one strategy this week instead of multiple".to_string()]
        );
    }

    #[test]
    fn test_intensity_middle_band_produces_neither() {
        let analysis = analyze_check_in(&check_in(
            1,
            TrackingAverages {
                avg_intensity: Some(3.0),
                ..Default::default()
            },
        ));
        // No rule fired, so the fallback improvement is the only entry
        assert_eq!(
            analysis.improvements,
            vec!["You showed up this week — that counts".to_string()]
        );
        assert!(analysis.struggles.is_empty());
    }

    #[test]
    fn test_confidence_middle_band_produces_neither() {
        let analysis = analyze_check_in(&check_in(
            1,
            TrackingAverages {
                avg_confidence: Some(3.0),
                ..Default::default()
            },
        ));
        assert_eq!(
            analysis.improvements,
            vec!["You showed up this week — that counts".to_string()]
        );
        assert!(analysis.struggles.is_empty());
    }

    #[test]
    fn test_completion_rate_includes_rounded_percentage() {
        let analysis = analyze_check_in(&check_in(
            2,
            TrackingAverages {
                actions_completed_rate: Some(0.856),
                ..Default::default()
            },
        ));
        assert!(analysis
            .improvements
            .contains(&"Completed 86% of daily actions".to_string()));
    }

    #[test]
    fn test_low_completion_rate_adjustment() {
        let analysis = analyze_check_in(&check_in(
            2,
            TrackingAverages {
                actions_completed_rate: Some(0.4),
                ..Default::default()
            },
        ));
        assert!(analysis.struggles[0].contains("too ambitious"));
        assert!(analysis.plan_adjustments[0].contains("1-2 most impactful actions"));
    }

    #[test]
    fn test_frequent_tantrums_drive_next_week_focus() {
        let analysis = analyze_check_in(&check_in(
            2,
            TrackingAverages {
                avg_tantrums: Some(5.0),
                avg_confidence: Some(1.0),
                ..Default::default()
            },
        ));
        // First struggle wins the focus line
        assert_eq!(analysis.next_week_focus, "Focus on: Tantrums still frequent");
        assert_eq!(analysis.struggles.len(), 2);
    }

    #[test]
    fn test_absent_metrics_contribute_nothing() {
        let analysis = analyze_check_in(&check_in(1, TrackingAverages::default()));
        assert_eq!(
            analysis.improvements,
            vec!["You showed up this week — that counts".to_string()]
        );
        assert!(analysis.struggles.is_empty());
        assert!(analysis.plan_adjustments.is_empty());
    }

    #[test]
    fn test_summary_counts_match_lists() {
        let analysis = analyze_check_in(&check_in(
            4,
            TrackingAverages {
                avg_tantrums: Some(1.0),
                avg_intensity: Some(4.2),
                ..Default::default()
            },
        ));
        assert!(analysis.summary.contains("1 areas of progress, 1 areas to adjust."));
        assert!(analysis
            .summary
            .contains("I've suggested some changes to make next week more manageable."));
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let input = check_in(
            2,
            TrackingAverages {
                avg_tantrums: Some(3.5),
                avg_intensity: Some(2.5),
                avg_confidence: Some(2.0),
                actions_completed_rate: Some(0.7),
            },
        );
        assert_eq!(analyze_check_in(&input), analyze_check_in(&input));
    }
}
