//! Result Renderer — pure projection of an `AnalysisResult` onto display blocks.
//!
//! No I/O and no UI framework: `render_blocks` decides which of the three
//! blocks appear, `html` turns them (plus the form state) into a page.

pub mod html;

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::Serialize;

use crate::models::analysis::{AnalysisResult, KeySections};

/// When an `extracted_text` value counts as present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractedTextPolicy {
    /// Present and non-empty. An empty string is treated as absent.
    #[default]
    NonEmpty,
    /// Any present string, including the empty string.
    Defined,
}

impl ExtractedTextPolicy {
    fn admits(self, text: &str) -> bool {
        match self {
            ExtractedTextPolicy::NonEmpty => !text.is_empty(),
            ExtractedTextPolicy::Defined => true,
        }
    }
}

impl FromStr for ExtractedTextPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "non-empty" | "nonempty" => Ok(ExtractedTextPolicy::NonEmpty),
            "defined" => Ok(ExtractedTextPolicy::Defined),
            other => bail!("EXTRACTED_TEXT_POLICY must be 'non-empty' or 'defined', got '{other}'"),
        }
    }
}

/// One rendered section of the result view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "block", rename_all = "snake_case")]
pub enum DisplayBlock {
    ExtractedText { text: String },
    KeySections { rows: Vec<SectionRow> },
    Suggestions { items: Vec<SuggestionItem> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionRow {
    pub label: &'static str,
    pub present: bool,
}

impl SectionRow {
    pub fn answer(&self) -> &'static str {
        if self.present {
            "Yes"
        } else {
            "No"
        }
    }
}

impl fmt::Display for SectionRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.answer())
    }
}

/// A suggestion keyed by its position in the backend's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionItem {
    pub key: usize,
    pub text: String,
}

impl DisplayBlock {
    pub fn heading(&self) -> &'static str {
        match self {
            DisplayBlock::ExtractedText { .. } => "Extracted Text",
            DisplayBlock::KeySections { .. } => "Key Sections",
            DisplayBlock::Suggestions { .. } => "Improvement Suggestions",
        }
    }

    /// Plain-text rendering, one display line per entry.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.heading().to_string()];
        match self {
            DisplayBlock::ExtractedText { text } => lines.push(text.clone()),
            DisplayBlock::KeySections { rows } => {
                lines.extend(rows.iter().map(|row| row.to_string()))
            }
            DisplayBlock::Suggestions { items } => {
                lines.extend(items.iter().map(|item| format!("- {}", item.text)))
            }
        }
        lines
    }
}

/// Projects a result onto its display blocks, in page order:
/// extracted text, key sections, suggestions. Each block is independent.
pub fn render_blocks(result: &AnalysisResult, policy: ExtractedTextPolicy) -> Vec<DisplayBlock> {
    let mut blocks = Vec::with_capacity(3);

    if let Some(text) = result
        .extracted_text
        .as_deref()
        .filter(|text| policy.admits(text))
    {
        blocks.push(DisplayBlock::ExtractedText {
            text: text.to_string(),
        });
    }

    if let Some(sections) = result.analysis.as_ref().and_then(|a| a.key_sections) {
        blocks.push(DisplayBlock::KeySections {
            rows: section_rows(&sections),
        });
    }

    if let Some(suggestions) = result
        .improvement_suggestions
        .as_ref()
        .filter(|s| !s.is_empty())
    {
        blocks.push(DisplayBlock::Suggestions {
            items: suggestions
                .iter()
                .enumerate()
                .map(|(key, s)| SuggestionItem {
                    key,
                    text: s.suggestion.clone(),
                })
                .collect(),
        });
    }

    blocks
}

fn section_rows(sections: &KeySections) -> Vec<SectionRow> {
    vec![
        SectionRow {
            label: "Education Present",
            present: sections.education_present,
        },
        SectionRow {
            label: "Experience Present",
            present: sections.experience_present,
        },
        SectionRow {
            label: "Skills Present",
            present: sections.skills_present,
        },
    ]
}

/// Flattens blocks into display lines.
pub fn render_text(blocks: &[DisplayBlock]) -> Vec<String> {
    blocks.iter().flat_map(DisplayBlock::lines).collect()
}
