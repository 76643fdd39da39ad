//! Patch operations over the descriptor text.
//!
//! Each operation takes the full document text and returns the rewritten
//! text plus a count of what it touched. A missing target is a logged
//! no-op, never an error; the passes report the counts so a run that
//! matched nothing is visible in the log instead of silently succeeding.
//! All edits are byte-range splices, content outside the touched extents
//! is preserved byte for byte.

use regex::Regex;

use crate::error::{PatchError, PatchResult};
use crate::markup;

/// Remove every balanced extent of the named folder, nested content
/// included. Returns the rewritten text and the number of extents removed.
pub fn remove_folder(text: &str, name: &str) -> PatchResult<(String, usize)> {
    let spans = markup::folder_spans(text, name)?;

    if spans.is_empty() {
        log::warn!("folder \"{}\" not present, nothing removed", name);
        return Ok((text.to_string(), 0));
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for span in &spans {
        out.push_str(&text[cursor..span.start]);
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);

    log::info!("removed folder \"{}\" ({} extent(s))", name, spans.len());
    Ok((out, spans.len()))
}

/// Remove every self-closing `<file file_name="..." />` element whose path
/// attribute contains `fragment`, together with its leading indentation and
/// newline so no blank lines are left behind.
pub fn remove_file_refs(text: &str, fragment: &str) -> PatchResult<(String, usize)> {
    let re = Regex::new(&format!(
        r#"(?:\r\n|\n)?[ \t]*<file file_name="[^"]*{}[^"]*"\s*/>"#,
        regex::escape(fragment)
    ))
    .map_err(|e| PatchError::RegexInvalid(e.to_string()))?;

    let count = re.find_iter(text).count();
    if count == 0 {
        log::debug!("no file references matching \"{}\"", fragment);
        return Ok((text.to_string(), 0));
    }

    log::info!("removed {} file reference(s) matching \"{}\"", count, fragment);
    Ok((re.replace_all(text, "").into_owned(), count))
}

/// Rebuild the `c_user_include_directories` list, dropping entries that
/// contain any `excluded` substring unless they also contain an `allowed`
/// substring. Entry order is preserved; separators are re-joined cleanly.
/// Returns the rewritten text and the number of entries dropped.
///
/// A descriptor without the attribute passes through untouched.
pub fn filter_include_dirs(
    text: &str,
    excluded: &[&str],
    allowed: &[&str],
) -> PatchResult<(String, usize)> {
    let Some((attr_start, attr_end, value_start, value_end)) =
        markup::find_attribute(text, "c_user_include_directories")?
    else {
        log::warn!("c_user_include_directories attribute not present, include filtering skipped");
        return Ok((text.to_string(), 0));
    };

    let value = &text[value_start..value_end];
    let mut kept: Vec<&str> = Vec::new();
    let mut dropped = 0usize;

    for dir in value.split(';') {
        let is_excluded = excluded.iter().any(|needle| dir.contains(needle));
        let is_allowed = allowed.iter().any(|needle| dir.contains(needle));
        if !is_excluded || is_allowed {
            kept.push(dir);
        } else {
            log::debug!("dropping include dir {}", dir);
            dropped += 1;
        }
    }

    if dropped == 0 {
        return Ok((text.to_string(), 0));
    }

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..attr_start]);
    out.push_str("c_user_include_directories=\"");
    out.push_str(&kept.join(";"));
    out.push('"');
    out.push_str(&text[attr_end..]);

    log::info!("dropped {} include dir(s), kept {}", dropped, kept.len());
    Ok((out, dropped))
}

/// Splice element lines immediately after the open tag of the first
/// occurrence of the named folder. Each element lands on its own line with
/// the document's nested-file indentation.
pub fn insert_after_open_tag(
    text: &str,
    folder: &str,
    elements: &[&str],
) -> PatchResult<(String, usize)> {
    let Some(span) = markup::find_folder_span(text, folder)? else {
        log::warn!("folder \"{}\" not present, nothing inserted", folder);
        return Ok((text.to_string(), 0));
    };

    let mut block = String::new();
    for element in elements {
        block.push_str("\n      ");
        block.push_str(element);
    }

    let mut out = String::with_capacity(text.len() + block.len());
    out.push_str(&text[..span.open_end]);
    out.push_str(&block);
    out.push_str(&text[span.open_end..]);

    log::info!(
        "inserted {} element(s) at top of folder \"{}\"",
        elements.len(),
        folder
    );
    Ok((out, elements.len()))
}

/// Splice element lines immediately before the close tag of the first
/// occurrence of the named folder, appending after its existing content.
pub fn insert_before_close_tag(
    text: &str,
    folder: &str,
    elements: &[&str],
) -> PatchResult<(String, usize)> {
    let Some(span) = markup::find_folder_span(text, folder)? else {
        log::warn!("folder \"{}\" not present, nothing inserted", folder);
        return Ok((text.to_string(), 0));
    };

    if span.close_start == span.end {
        return Err(PatchError::MalformedMarkup(format!(
            "folder \"{}\" is self-closing, cannot append content",
            folder
        )));
    }

    let mut block = String::new();
    for element in elements {
        block.push_str("      ");
        block.push_str(element);
        block.push('\n');
    }
    block.push_str("    ");

    let mut out = String::with_capacity(text.len() + block.len());
    out.push_str(&text[..span.close_start]);
    out.push_str(&block);
    out.push_str(&text[span.close_start..]);

    log::info!(
        "inserted {} element(s) at end of folder \"{}\"",
        elements.len(),
        folder
    );
    Ok((out, elements.len()))
}

/// Splice a pre-formatted block immediately after the full extent of the
/// first occurrence of the named folder.
pub fn insert_after_folder(text: &str, folder: &str, block: &str) -> PatchResult<(String, usize)> {
    let Some(span) = markup::find_folder_span(text, folder)? else {
        log::warn!("folder \"{}\" not present, nothing inserted", folder);
        return Ok((text.to_string(), 0));
    };

    let mut out = String::with_capacity(text.len() + block.len());
    out.push_str(&text[..span.end]);
    out.push_str(block);
    out.push_str(&text[span.end..]);

    log::info!("inserted block after folder \"{}\"", folder);
    Ok((out, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = concat!(
        "<folder Name=\"nRF_Log\">\n",
        "  <file file_name=\"nrf_log_frontend.c\" />\n",
        "  <file file_name=\"nrf_log_str_formatter.c\" />\n",
        "</folder>\n",
        "<folder Name=\"Application\">\n",
        "  <file file_name=\"main.c\" />\n",
        "</folder>\n",
    );

    #[test]
    fn test_remove_folder_leaves_no_trace_and_shrinks_document() {
        let (out, removed) = remove_folder(DOC, "nRF_Log").unwrap();
        assert_eq!(removed, 1);
        assert!(!out.contains("nRF_Log"));
        assert!(out.len() < DOC.len());
        assert!(out.contains("<folder Name=\"Application\">"));
    }

    #[test]
    fn test_remove_folder_absent_is_noop() {
        let (out, removed) = remove_folder(DOC, "nRF_Drivers").unwrap();
        assert_eq!(removed, 0);
        assert_eq!(out, DOC);
    }

    #[test]
    fn test_remove_folder_removes_duplicate_extents_without_merging() {
        let doc = "<folder Name=\"A\"><file file_name=\"a.c\" /></folder><folder Name=\"Keep\"></folder><folder Name=\"A\"></folder>";
        let (out, removed) = remove_folder(doc, "A").unwrap();
        assert_eq!(removed, 2);
        assert_eq!(out, "<folder Name=\"Keep\"></folder>");
    }

    #[test]
    fn test_remove_file_refs_takes_the_whole_line() {
        let (out, removed) = remove_file_refs(DOC, "nrf_log_frontend.c").unwrap();
        assert_eq!(removed, 1);
        assert!(!out.contains("nrf_log_frontend.c"));
        assert!(!out.contains("\n\n  <file"));
        assert!(out.contains("nrf_log_str_formatter.c"));
    }

    #[test]
    fn test_remove_file_refs_matches_fragment_anywhere_in_path() {
        let doc = "<file file_name=\"../../components/libraries/util/app_util.c\" />\n<file file_name=\"main.c\" />";
        let (out, removed) = remove_file_refs(doc, "components/libraries").unwrap();
        assert_eq!(removed, 1);
        assert!(out.contains("main.c"));
        assert!(!out.contains("app_util.c"));
    }

    #[test]
    fn test_filter_include_dirs_drops_and_preserves_order() {
        let doc = "c_user_include_directories=\"../inc;../../components/libraries/util;../../components/ble/common;../src\"";
        let (out, dropped) =
            filter_include_dirs(doc, &["components/libraries", "components/ble"], &[]).unwrap();
        assert_eq!(dropped, 2);
        assert_eq!(out, "c_user_include_directories=\"../inc;../src\"");
    }

    #[test]
    fn test_filter_include_dirs_allow_override_wins() {
        let doc = "c_user_include_directories=\"../inc;../../external/utf_converter;../../external/segger_rtt\"";
        let (out, dropped) =
            filter_include_dirs(doc, &["external/"], &["external/utf_converter"]).unwrap();
        assert_eq!(dropped, 1);
        assert!(out.contains("external/utf_converter"));
        assert!(!out.contains("segger_rtt"));
    }

    #[test]
    fn test_filter_include_dirs_is_idempotent() {
        let doc = "c_user_include_directories=\"../inc;../../modules/nrfx;../src\"";
        let excluded = &["modules/"];
        let (once, _) = filter_include_dirs(doc, excluded, &[]).unwrap();
        let (twice, dropped) = filter_include_dirs(&once, excluded, &[]).unwrap();
        assert_eq!(dropped, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_include_dirs_without_attribute_is_noop() {
        let doc = "<folder Name=\"Application\"></folder>";
        let (out, dropped) = filter_include_dirs(doc, &["components/"], &[]).unwrap();
        assert_eq!(dropped, 0);
        assert_eq!(out, doc);
    }

    #[test]
    fn test_insert_after_open_tag_is_positionally_stable() {
        let (out, inserted) =
            insert_after_open_tag(DOC, "Application", &["<file file_name=\"../simple_log.c\" />"])
                .unwrap();
        assert_eq!(inserted, 1);

        let anchor = "<folder Name=\"Application\">";
        let pos = DOC.find(anchor).unwrap() + anchor.len();
        // Prefix unchanged, suffix unchanged modulo the inserted bytes.
        assert_eq!(&out[..pos], &DOC[..pos]);
        assert!(out[pos..].starts_with("\n      <file file_name=\"../simple_log.c\" />"));
        assert!(out.ends_with(&DOC[pos..]));
    }

    #[test]
    fn test_end_to_end_removal_then_insertion() {
        let doc = "<folder Name=\"nRF_Log\"><file file_name=\"a.c\" /></folder><folder Name=\"Application\"></folder>";
        let (doc, _) = remove_folder(doc, "nRF_Log").unwrap();
        let (doc, _) =
            insert_after_open_tag(&doc, "Application", &["<file file_name=\"../simple_log.c\" />"])
                .unwrap();
        assert_eq!(
            doc,
            "<folder Name=\"Application\">\n      <file file_name=\"../simple_log.c\" /></folder>"
        );
    }

    #[test]
    fn test_insert_before_close_tag_appends_after_content() {
        let doc = "<folder Name=\"Application\">\n      <file file_name=\"main.c\" />\n    </folder>";
        let (out, inserted) =
            insert_before_close_tag(doc, "Application", &["<file file_name=\"../minimal_nordic.c\" />"])
                .unwrap();
        assert_eq!(inserted, 1);
        let main_pos = out.find("main.c").unwrap();
        let added_pos = out.find("minimal_nordic.c").unwrap();
        assert!(added_pos > main_pos);
        assert!(out.ends_with("</folder>"));
    }

    #[test]
    fn test_insert_after_folder_places_block_between_siblings() {
        let doc = "<folder Name=\"Segger Startup Files\">\n  <file file_name=\"thumb_crt0.s\" />\n</folder>\n<folder Name=\"Application\"></folder>";
        let block = "\n    <folder Name=\"Essential_Startup\">\n      <file file_name=\"../startup_stubs.c\" />\n    </folder>";
        let (out, _) = insert_after_folder(doc, "Segger Startup Files", block).unwrap();

        let startup_end = out.find("thumb_crt0.s").unwrap();
        let essential = out.find("Essential_Startup").unwrap();
        let application = out.find("Application").unwrap();
        assert!(startup_end < essential && essential < application);
    }

    #[test]
    fn test_insert_into_absent_folder_is_noop() {
        let (out, inserted) =
            insert_after_open_tag(DOC, "Missing", &["<file file_name=\"x.c\" />"]).unwrap();
        assert_eq!(inserted, 0);
        assert_eq!(out, DOC);
    }
}
