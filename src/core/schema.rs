//! Structural assumptions about the APOD page template.
//!
//! The archive pages are not semantically marked up, so extraction relies on
//! tag positions. They are kept here, by name, so a template change can be
//! handled from the config file instead of in code.

use scraper::Selector;
use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct ExtractionSchema {
    /// First match is the title
    pub(crate) title_selector: String,
    pub(crate) link_selector: String,
    /// 1-based position of the link to the full-resolution image
    pub(crate) full_res_link_ordinal: usize,
    /// First match is the compressed image; none means the day is a video
    pub(crate) image_selector: String,
    /// Tag name of paragraph blocks
    pub(crate) paragraph_tag: String,
    /// 1-based position of the paragraph block holding the explanation
    pub(crate) explanation_ordinal: usize,
    /// Label removed from the front of the explanation, if present
    pub(crate) explanation_label: Option<String>,
}

impl Default for ExtractionSchema {
    fn default() -> Self {
        Self {
            title_selector: "b".to_string(),
            link_selector: "a".to_string(),
            full_res_link_ordinal: 2,
            image_selector: "img".to_string(),
            paragraph_tag: "p".to_string(),
            explanation_ordinal: 3,
            explanation_label: Some("Explanation:".to_string()),
        }
    }
}

impl ExtractionSchema {
    pub(crate) fn compile(&self) -> Result<CompiledSchema, AppError> {
        if self.full_res_link_ordinal == 0 || self.explanation_ordinal == 0 {
            return Err(AppError::InvalidSelector {
                selector: self.paragraph_tag.clone(),
                message: "ordinals are 1-based".to_string(),
            });
        }
        if self.paragraph_tag.is_empty()
            || !self.paragraph_tag.bytes().all(|b| b.is_ascii_alphanumeric())
        {
            return Err(AppError::InvalidSelector {
                selector: self.paragraph_tag.clone(),
                message: "paragraph_tag must be a bare tag name".to_string(),
            });
        }

        Ok(CompiledSchema {
            title: parse_selector(&self.title_selector)?,
            link: parse_selector(&self.link_selector)?,
            image: parse_selector(&self.image_selector)?,
            paragraph: parse_selector(&self.paragraph_tag)?,
            link_index: self.full_res_link_ordinal - 1,
            paragraph_index: self.explanation_ordinal - 1,
            explanation_label: self.explanation_label.clone(),
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector, AppError> {
    Selector::parse(selector).map_err(|e| AppError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Schema with selectors parsed and ordinals turned into indices
#[derive(Debug, Clone)]
pub(crate) struct CompiledSchema {
    pub(crate) title: Selector,
    pub(crate) link: Selector,
    pub(crate) image: Selector,
    pub(crate) paragraph: Selector,
    pub(crate) link_index: usize,
    pub(crate) paragraph_index: usize,
    pub(crate) explanation_label: Option<String>,
}
