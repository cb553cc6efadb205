use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Response payload of the analysis endpoint. Every field is optional and
/// replaced wholesale on each successful submit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvement_suggestions: Option<Vec<Suggestion>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_sections: Option<KeySections>,
}

/// Section-presence flags, present or absent as a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySections {
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub education_present: bool,
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub experience_present: bool,
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub skills_present: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default, deserialize_with = "deserialize_lossy_string")]
    pub suggestion: String,
}

/// Reads a flag by truthiness: `null`, `false`, `0` and `""` are false,
/// everything else is true.
fn deserialize_truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn deserialize_lossy_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_payload_parses() {
        let body = r#"{
            "extracted_text": "Hello",
            "analysis": {"key_sections": {
                "education_present": true,
                "experience_present": false,
                "skills_present": true
            }},
            "improvement_suggestions": [{"suggestion": "Add metrics"}]
        }"#;
        let result: AnalysisResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.extracted_text.as_deref(), Some("Hello"));
        let sections = result.analysis.unwrap().key_sections.unwrap();
        assert!(sections.education_present);
        assert!(!sections.experience_present);
        assert!(sections.skills_present);
        assert_eq!(
            result.improvement_suggestions.unwrap(),
            vec![Suggestion {
                suggestion: "Add metrics".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_object_has_no_fields() {
        let result: AnalysisResult = serde_json::from_str("{}").unwrap();
        assert_eq!(result, AnalysisResult::default());
    }

    #[test]
    fn test_null_fields_read_as_absent() {
        let body = r#"{"extracted_text": null, "analysis": null, "improvement_suggestions": null}"#;
        let result: AnalysisResult = serde_json::from_str(body).unwrap();
        assert_eq!(result, AnalysisResult::default());
    }

    #[test]
    fn test_flags_follow_truthiness() {
        let body = r#"{"education_present": 1, "experience_present": "", "skills_present": null}"#;
        let sections: KeySections = serde_json::from_str(body).unwrap();
        assert!(sections.education_present);
        assert!(!sections.experience_present);
        assert!(!sections.skills_present);
    }

    #[test]
    fn test_missing_flag_reads_as_false() {
        let sections: KeySections = serde_json::from_str(r#"{"skills_present": true}"#).unwrap();
        assert!(!sections.education_present);
        assert!(sections.skills_present);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let body = r#"{"sections_present": "Education, Skills", "extracted_text": "x"}"#;
        let result: AnalysisResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.extracted_text.as_deref(), Some("x"));
    }
}
