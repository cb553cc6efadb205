//! Server-rendered upload page (`templates/upload.html`). askama escapes all
//! backend-provided text.

use askama::Template;

use crate::form::UiState;
use crate::models::upload::SelectedFileSummary;
use crate::render::{DisplayBlock, SectionRow, SuggestionItem};

#[derive(Template)]
#[template(path = "upload.html")]
pub struct UploadPage<'a> {
    pub ui: &'a UiState,
    pub submit_enabled: bool,
    pub selected: Option<&'a SelectedFileSummary>,
    pub has_result: bool,
    pub extracted_text: Option<&'a str>,
    pub key_sections: Option<&'a [SectionRow]>,
    pub suggestions: Option<&'a [SuggestionItem]>,
}

impl<'a> UploadPage<'a> {
    pub fn new(
        ui: &'a UiState,
        submit_enabled: bool,
        selected: Option<&'a SelectedFileSummary>,
        blocks: &'a [DisplayBlock],
    ) -> Self {
        let mut page = Self {
            ui,
            submit_enabled,
            selected,
            has_result: !blocks.is_empty(),
            extracted_text: None,
            key_sections: None,
            suggestions: None,
        };
        for block in blocks {
            match block {
                DisplayBlock::ExtractedText { text } => page.extracted_text = Some(text.as_str()),
                DisplayBlock::KeySections { rows } => page.key_sections = Some(rows.as_slice()),
                DisplayBlock::Suggestions { items } => page.suggestions = Some(items.as_slice()),
            }
        }
        page
    }
}
