//! Request/response payloads for the interview flow.
//!
//! Everything here is ephemeral: created per request, returned, discarded.
//! The same types are filled from model output, so field deserializers accept
//! nulls, numbers as strings, and similar near-misses.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

// ────────────────────────────────────────────────────────────────────────────
// Resume
// ────────────────────────────────────────────────────────────────────────────

/// Structured resume fields. Keys beyond the known ones are carried through
/// untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub experience: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub projects: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ────────────────────────────────────────────────────────────────────────────
// Questions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// 1-based position in the returned list; model-supplied ids are ignored.
    pub id: u32,
    pub question: String,
    pub focus: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Evaluation
// ────────────────────────────────────────────────────────────────────────────

/// Scores for one answer. Sub-scores are whole numbers; `total_score` is
/// whatever the model (or client) reported, fractions included, and is not
/// checked against the sub-scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(default, deserialize_with = "lenient_score")]
    pub technical_accuracy: i64,
    #[serde(default, deserialize_with = "lenient_score")]
    pub completeness: i64,
    #[serde(default, deserialize_with = "lenient_score")]
    pub practical_knowledge: i64,
    #[serde(default, deserialize_with = "lenient_score")]
    pub communication: i64,
    #[serde(
        default,
        deserialize_with = "lenient_total",
        serialize_with = "whole_number_as_integer"
    )]
    pub total_score: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub feedback: String,
}

impl Evaluation {
    /// Substituted when the model's evaluation cannot be parsed.
    pub fn fallback() -> Self {
        Self {
            technical_accuracy: 10,
            completeness: 10,
            practical_knowledge: 10,
            communication: 10,
            total_score: 40.0,
            feedback: "Answer evaluated.".to_string(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Final report
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceLevel {
    Average,
    Good,
    Excellent,
    #[serde(rename = "No answers")]
    NoAnswers,
}

impl PerformanceLevel {
    pub const EXCELLENT_THRESHOLD: f64 = 80.0;
    pub const GOOD_THRESHOLD: f64 = 60.0;

    /// Closed-open tiers: [80, ∞) Excellent, [60, 80) Good, below 60 Average.
    pub fn from_score(score: f64) -> Self {
        if score >= Self::EXCELLENT_THRESHOLD {
            PerformanceLevel::Excellent
        } else if score >= Self::GOOD_THRESHOLD {
            PerformanceLevel::Good
        } else {
            PerformanceLevel::Average
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalReport {
    #[serde(serialize_with = "whole_number_as_integer")]
    pub overall_score: f64,
    pub performance_level: PerformanceLevel,
    /// Absent for the empty-input report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_questions: Option<usize>,
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field deserializers
// ────────────────────────────────────────────────────────────────────────────

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_string_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        // "Rust, SQL, Docker"
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    })
}

fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .unwrap_or_default(),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.round() as i64))
                .unwrap_or_default()
        }
        _ => 0,
    })
}

/// Like `lenient_score` but keeps fractions.
fn lenient_total<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let total = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or_default(),
        _ => 0.0,
    };
    Ok(if total.is_finite() { total } else { 0.0 })
}

/// `80.0` goes out as `80`, `76.25` as `76.25`.
fn whole_number_as_integer<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resume_from_model_shaped_json() {
        let value = json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "phone": null,
            "skills": ["Rust", 42, null],
            "experience": [{"company": "Acme", "role": "SRE"}],
            "projects": "Compiler in Rust",
            "summary": "Systems engineer"
        });

        let resume: Resume = serde_json::from_value(value).unwrap();

        assert_eq!(resume.name, "Jane Doe");
        assert_eq!(resume.phone, "");
        assert_eq!(resume.skills, vec!["Rust", "42"]);
        assert_eq!(resume.experience.len(), 1);
        assert_eq!(resume.projects, vec![json!("Compiler in Rust")]);
        assert_eq!(resume.extra.get("summary"), Some(&json!("Systems engineer")));
    }

    #[test]
    fn test_resume_comma_separated_skills() {
        let resume: Resume =
            serde_json::from_value(json!({"name": "A", "skills": "Rust, SQL,  ,Docker"}))
                .unwrap();
        assert_eq!(resume.skills, vec!["Rust", "SQL", "Docker"]);
    }

    #[test]
    fn test_resume_missing_fields_default() {
        let resume: Resume = serde_json::from_value(json!({})).unwrap();
        assert_eq!(resume, Resume::default());
    }

    #[test]
    fn test_resume_serializes_extra_keys_flat() {
        let resume: Resume =
            serde_json::from_value(json!({"name": "A", "linkedin": "in/a"})).unwrap();
        let out = serde_json::to_value(&resume).unwrap();
        assert_eq!(out["linkedin"], "in/a");
        assert_eq!(out["skills"], json!([]));
    }

    #[test]
    fn test_evaluation_lenient_scores() {
        let eval: Evaluation = serde_json::from_value(json!({
            "technical_accuracy": 18.6,
            "completeness": "15",
            "practical_knowledge": "twelve",
            "total_score": 70,
            "feedback": "Solid answer."
        }))
        .unwrap();

        assert_eq!(eval.technical_accuracy, 19);
        assert_eq!(eval.completeness, 15);
        assert_eq!(eval.practical_knowledge, 0);
        assert_eq!(eval.communication, 0);
        assert_eq!(eval.total_score, 70.0);
        assert_eq!(eval.feedback, "Solid answer.");
    }

    #[test]
    fn test_evaluation_total_keeps_fractions() {
        let eval: Evaluation = serde_json::from_value(json!({"total_score": 72.5})).unwrap();
        assert_eq!(eval.total_score, 72.5);

        let eval: Evaluation = serde_json::from_value(json!({"total_score": " 79.6 "})).unwrap();
        assert_eq!(eval.total_score, 79.6);

        let eval: Evaluation = serde_json::from_value(json!({"total_score": "NaN"})).unwrap();
        assert_eq!(eval.total_score, 0.0);
    }

    #[test]
    fn test_whole_totals_serialize_as_integers() {
        let out = serde_json::to_value(Evaluation::fallback()).unwrap();
        assert_eq!(out["total_score"], json!(40));

        let eval = Evaluation {
            total_score: 72.5,
            ..Evaluation::fallback()
        };
        assert_eq!(serde_json::to_value(eval).unwrap()["total_score"], json!(72.5));
    }

    #[test]
    fn test_evaluation_total_not_validated() {
        let eval: Evaluation = serde_json::from_value(json!({
            "technical_accuracy": 5,
            "completeness": 5,
            "practical_knowledge": 5,
            "communication": 5,
            "total_score": 95
        }))
        .unwrap();
        assert_eq!(eval.total_score, 95.0);
    }

    #[test]
    fn test_fallback_evaluation() {
        let eval = Evaluation::fallback();
        assert_eq!(eval.total_score, 40.0);
        assert_eq!(eval.communication, 10);
        assert_eq!(eval.feedback, "Answer evaluated.");
    }

    #[test]
    fn test_performance_level_boundaries() {
        assert_eq!(PerformanceLevel::from_score(80.0), PerformanceLevel::Excellent);
        assert_eq!(PerformanceLevel::from_score(79.0), PerformanceLevel::Good);
        assert_eq!(PerformanceLevel::from_score(79.99), PerformanceLevel::Good);
        assert_eq!(PerformanceLevel::from_score(60.0), PerformanceLevel::Good);
        assert_eq!(PerformanceLevel::from_score(59.0), PerformanceLevel::Average);
        assert_eq!(PerformanceLevel::from_score(0.0), PerformanceLevel::Average);
    }

    #[test]
    fn test_performance_level_serialized_names() {
        assert_eq!(
            serde_json::to_value(PerformanceLevel::NoAnswers).unwrap(),
            json!("No answers")
        );
        assert_eq!(
            serde_json::to_value(PerformanceLevel::Excellent).unwrap(),
            json!("Excellent")
        );
    }
}
