//! Positional scraping of an APOD page.
//!
//! The page has no semantic markup for its fields; they are found by tag
//! order as described by [`CompiledSchema`]. Parsing is pure: the same HTML
//! always yields the same outcome.

use scraper::{ElementRef, Html};

use super::date::ApodDate;
use super::schema::CompiledSchema;
use super::types::{ApodRecord, NoImageSignal, PageOutcome};
use crate::error::AppError;

fn malformed(reason: impl Into<String>) -> AppError {
    AppError::MalformedPage {
        reason: reason.into(),
    }
}

/// Extract the record for `date` from its page `html`.
///
/// Relative image paths are resolved against `image_base`. A page without
/// any image element is a video day and yields [`PageOutcome::NoImage`]
/// rather than an error.
pub(crate) fn extract(
    html: &str,
    date: ApodDate,
    page_url: &str,
    image_base: &str,
    schema: &CompiledSchema,
) -> Result<PageOutcome, AppError> {
    let document = Html::parse_document(html);

    let Some(image) = document.select(&schema.image).next() else {
        return Ok(PageOutcome::NoImage(NoImageSignal {
            page_url: page_url.to_string(),
            title: extract_title(&document, schema).ok(),
        }));
    };

    let title = extract_title(&document, schema)?;

    let link = document
        .select(&schema.link)
        .nth(schema.link_index)
        .ok_or_else(|| {
            malformed(format!(
                "expected at least {} links, the full-resolution image link is missing",
                schema.link_index + 1
            ))
        })?;
    let full_res_path = attr(link, "href")
        .ok_or_else(|| malformed("full-resolution image link has no href"))?;
    let compressed_path =
        attr(image, "src").ok_or_else(|| malformed("image element has no src"))?;

    let explanation = extract_explanation(&document, schema)?;

    Ok(PageOutcome::Image(ApodRecord {
        date,
        title,
        explanation,
        compressed_image_url: join_url(image_base, compressed_path),
        full_res_image_url: join_url(image_base, full_res_path),
        page_url: page_url.to_string(),
    }))
}

fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn extract_title(document: &Html, schema: &CompiledSchema) -> Result<String, AppError> {
    let element = document
        .select(&schema.title)
        .next()
        .ok_or_else(|| malformed("no title element"))?;
    let text = collapse_whitespace(&element.text().collect::<String>());
    Ok(strip_marker(&text).trim_end().to_string())
}

fn extract_explanation(document: &Html, schema: &CompiledSchema) -> Result<String, AppError> {
    let blocks: Vec<ElementRef<'_>> = document.select(&schema.paragraph).collect();
    let Some(block) = blocks.get(schema.paragraph_index) else {
        return Err(malformed(format!(
            "expected at least {} paragraph blocks, found {}",
            schema.paragraph_index + 1,
            blocks.len()
        )));
    };
    let next_block = blocks.get(schema.paragraph_index + 1).map(|b| b.id());

    // html5ever closes an open paragraph at the next block-level tag, so the
    // block's own subtree can end early. Text is gathered in document order
    // from the block's start up to the next paragraph element instead.
    let mut raw = String::new();
    let mut inside = false;
    for node in document.root_element().descendants() {
        if Some(node.id()) == next_block {
            break;
        }
        if node.id() == block.id() {
            inside = true;
        }
        if !inside {
            continue;
        }
        let in_raw_text = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .is_some_and(|e| matches!(e.name(), "script" | "style"));
        if let Some(text) = node.value().as_text()
            && !in_raw_text
        {
            raw.push_str(text);
        }
    }

    let text = collapse_whitespace(&raw);
    let mut explanation = strip_marker(&text);
    if let Some(label) = schema.explanation_label.as_deref() {
        explanation = explanation.trim_start().strip_prefix(label).unwrap_or(explanation);
    }
    Ok(explanation.trim().to_string())
}

/// Replace every whitespace run (spaces, newlines, tabs) with one space.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Drop one leading marker character, but only if it is whitespace or
/// punctuation. Text that starts with a letter is left intact.
fn strip_marker(text: &str) -> &str {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() || c.is_ascii_punctuation() => chars.as_str(),
        _ => text,
    }
}

/// Resolve an extracted path against the archive root.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    if let Some(rest) = path.strip_prefix("//") {
        return format!("https://{rest}");
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches("./").trim_start_matches('/')
    )
}
