//! Structural span location over the SES project markup.
//!
//! The `.emProject` descriptor is a markup document of nested
//! `<folder Name="...">` containers holding self-closing `<file ... />`
//! declarations. Greedy dot-all matching of an open tag through a close tag
//! can swallow unrelated siblings when a document carries nested or
//! duplicate same-named folders, so folder extents are located here by
//! scanning tags and tracking nesting depth instead. The document is never
//! parsed into a tree; all edits remain byte-range splices on the raw text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{PatchError, PatchResult};

// Every folder tag in the document, open, close or self-closing.
static FOLDER_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</folder\s*>|<folder\b[^>]*>").expect("Invalid folder tag regex")
});

/// Byte extent of a named folder within the descriptor text.
///
/// `start..end` covers the open tag through the matching close tag
/// inclusive. `open_end` is the first byte after the open tag and
/// `close_start` the first byte of the close tag, the two splice points
/// used by the insertion passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderSpan {
    pub start: usize,
    pub open_end: usize,
    pub close_start: usize,
    pub end: usize,
}

fn open_tag_regex(name: &str) -> PatchResult<Regex> {
    Regex::new(&format!(r#"<folder\s+Name="{}"[^>]*>"#, regex::escape(name)))
        .map_err(|e| PatchError::RegexInvalid(e.to_string()))
}

/// Walk forward from an open tag, tracking folder nesting depth, until the
/// balanced close tag is found. Self-closing `<folder ... />` tags do not
/// change the depth.
fn balanced_span(text: &str, open_start: usize, open_end: usize, name: &str) -> PatchResult<FolderSpan> {
    let open_tag = &text[open_start..open_end];
    if open_tag.trim_end_matches('>').trim_end().ends_with('/') {
        // Self-closing folder: the open tag is the whole extent.
        return Ok(FolderSpan {
            start: open_start,
            open_end,
            close_start: open_end,
            end: open_end,
        });
    }

    let mut depth = 1usize;
    for tag in FOLDER_TAG_REGEX.find_iter(&text[open_end..]) {
        if tag.as_str().starts_with("</") {
            depth -= 1;
            if depth == 0 {
                return Ok(FolderSpan {
                    start: open_start,
                    open_end,
                    close_start: open_end + tag.start(),
                    end: open_end + tag.end(),
                });
            }
        } else if !tag.as_str().trim_end_matches('>').trim_end().ends_with('/') {
            depth += 1;
        }
    }

    Err(PatchError::MalformedMarkup(format!(
        "no closing tag for folder \"{}\"",
        name
    )))
}

/// Locate the first balanced extent of the named folder, if present.
pub fn find_folder_span(text: &str, name: &str) -> PatchResult<Option<FolderSpan>> {
    let open = open_tag_regex(name)?;
    match open.find(text) {
        Some(m) => Ok(Some(balanced_span(text, m.start(), m.end(), name)?)),
        None => Ok(None),
    }
}

/// Locate every balanced extent of the named folder, in document order.
pub fn folder_spans(text: &str, name: &str) -> PatchResult<Vec<FolderSpan>> {
    let open = open_tag_regex(name)?;
    let mut spans = Vec::new();
    let mut from = 0usize;

    while let Some(m) = open.find_at(text, from) {
        let span = balanced_span(text, m.start(), m.end(), name)?;
        from = span.end;
        spans.push(span);
    }

    Ok(spans)
}

/// Locate the first `attr="value"` occurrence, returning the extent of the
/// whole occurrence and of the value between the quotes.
pub fn find_attribute(text: &str, attr: &str) -> PatchResult<Option<(usize, usize, usize, usize)>> {
    let re = Regex::new(&format!(r#"{}="([^"]*)""#, regex::escape(attr)))
        .map_err(|e| PatchError::RegexInvalid(e.to_string()))?;

    Ok(re.captures(text).map(|caps| {
        let whole = caps.get(0).expect("capture group 0 always present");
        let value = caps.get(1).expect("attribute value group");
        (whole.start(), whole.end(), value.start(), value.end())
    }))
}
