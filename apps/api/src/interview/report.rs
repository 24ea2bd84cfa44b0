//! Final report aggregation. Pure; no model call.

use crate::interview::models::{Evaluation, FinalReport, PerformanceLevel};

pub fn final_report(evaluations: &[Evaluation]) -> FinalReport {
    if evaluations.is_empty() {
        return FinalReport {
            overall_score: 0.0,
            performance_level: PerformanceLevel::NoAnswers,
            total_questions: None,
        };
    }

    let sum: f64 = evaluations.iter().map(|e| e.total_score).sum();
    let average = sum / evaluations.len() as f64;

    FinalReport {
        overall_score: round_to_cents(average),
        performance_level: PerformanceLevel::from_score(average),
        total_questions: Some(evaluations.len()),
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(total_score: f64) -> Evaluation {
        Evaluation {
            total_score,
            ..Evaluation::fallback()
        }
    }

    #[test]
    fn test_empty_report_is_sentinel() {
        let report = final_report(&[]);
        assert_eq!(report.overall_score, 0.0);
        assert_eq!(report.performance_level, PerformanceLevel::NoAnswers);
        assert_eq!(report.total_questions, None);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["overall_score"], serde_json::json!(0));
        assert_eq!(json["performance_level"], "No answers");
        assert!(json.get("total_questions").is_none());
    }

    #[test]
    fn test_average_is_rounded_to_two_places() {
        let report = final_report(&[scored(70.0), scored(71.0), scored(71.0)]);
        assert_eq!(report.overall_score, 70.67);
        assert_eq!(report.performance_level, PerformanceLevel::Good);
        assert_eq!(report.total_questions, Some(3));
    }

    #[test]
    fn test_threshold_boundaries() {
        let level = |total| final_report(&[scored(total)]).performance_level;
        assert_eq!(level(80.0), PerformanceLevel::Excellent);
        assert_eq!(level(79.0), PerformanceLevel::Good);
        assert_eq!(level(60.0), PerformanceLevel::Good);
        assert_eq!(level(59.0), PerformanceLevel::Average);
    }

    #[test]
    fn test_fractional_totals_are_averaged_as_given() {
        let report = final_report(&[scored(72.5), scored(80.0)]);
        assert_eq!(report.overall_score, 76.25);
        assert_eq!(report.performance_level, PerformanceLevel::Good);
    }

    #[test]
    fn test_fractional_total_below_cut_is_not_promoted() {
        let report = final_report(&[scored(79.6)]);
        assert_eq!(report.overall_score, 79.6);
        assert_eq!(report.performance_level, PerformanceLevel::Good);

        let report = final_report(&[scored(59.99)]);
        assert_eq!(report.performance_level, PerformanceLevel::Average);
    }

    #[test]
    fn test_tier_uses_unrounded_average() {
        // 79.9995 rounds to 80.0 for display but stays below the Excellent cut.
        let evaluations: Vec<_> = std::iter::repeat(scored(80.0))
            .take(1999)
            .chain(std::iter::once(scored(79.0)))
            .collect();
        let report = final_report(&evaluations);
        assert_eq!(report.overall_score, 80.0);
        assert_eq!(report.performance_level, PerformanceLevel::Good);
    }

    #[test]
    fn test_sub_scores_are_ignored() {
        let eval = Evaluation {
            technical_accuracy: 25,
            completeness: 25,
            practical_knowledge: 25,
            communication: 25,
            total_score: 50.0,
            feedback: String::new(),
        };
        assert_eq!(final_report(&[eval]).overall_score, 50.0);
    }
}
