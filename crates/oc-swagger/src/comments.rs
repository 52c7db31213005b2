use oc_core::models::ExtractedMetadata;
use oc_core::parsers::{CommentRange, CommentStyle, SourceText};
use oc_core::SynthesisError;
use std::collections::HashMap;
use swc_common::BytePos;

const EXAMPLE_TAG: &str = "@example";

/// Reads the description and `@example` values of the comment attached to a
/// declaration.
///
/// Attachment follows TypeScript trivia rules: the trivia between the
/// previous token and the declaration is split at the first line break.
/// Comments before it trail the previous token, comments after it lead the
/// declaration. Leading comments are preferred; trailing ones are only read
/// when the leading ones yield nothing.
pub struct CommentExtractor<'a> {
    source: &'a SourceText,
    /// Comment end offset -> index into `source.comments()`
    by_end: HashMap<usize, usize>,
}

impl<'a> CommentExtractor<'a> {
    pub fn new(source: &'a SourceText) -> Self {
        let by_end = source
            .comments()
            .iter()
            .enumerate()
            .map(|(idx, comment)| (comment.hi, idx))
            .collect();
        Self { source, by_end }
    }

    /// Extracts metadata for the declaration starting at `start`.
    ///
    /// Missing comments are not an error and produce empty metadata.
    pub fn extract(
        &self,
        start: BytePos,
        want_examples: bool,
    ) -> Result<ExtractedMetadata, SynthesisError> {
        let offset = self
            .source
            .offset_of(start)
            .ok_or(SynthesisError::PositionOutOfBounds {
                offset: start.0 as usize,
                len: self.source.text().len(),
            })?;

        let (leading, trailing) = self.attached_comments(offset);
        let metadata = self.read_comments(&leading, want_examples);
        if metadata.is_empty() && !trailing.is_empty() {
            return Ok(self.read_comments(&trailing, want_examples));
        }
        Ok(metadata)
    }

    /// Returns the (leading, trailing) comments in the trivia before `offset`
    fn attached_comments(&self, offset: usize) -> (Vec<&'a CommentRange>, Vec<&'a CommentRange>) {
        let source: &'a SourceText = self.source;
        let text = source.text();
        let comments = source.comments();

        let mut found = Vec::new();
        let mut cursor = offset;
        loop {
            let end = text.get(..cursor).unwrap_or("").trim_end().len();
            match self.by_end.get(&end) {
                Some(&idx) if comments[idx].lo < end => {
                    found.push(&comments[idx]);
                    cursor = comments[idx].lo;
                }
                _ => {
                    cursor = end;
                    break;
                }
            }
        }
        found.reverse();

        let full_start = cursor;
        let mut leading = Vec::new();
        let mut trailing = Vec::new();
        // At the start of the file there is no previous token to trail
        let mut same_line = full_start != 0;
        let mut previous_end = full_start;
        for comment in found {
            if same_line && text[previous_end..comment.lo].contains('\n') {
                same_line = false;
            }
            if same_line {
                trailing.push(comment);
            } else {
                leading.push(comment);
            }
            previous_end = comment.hi;
        }
        (leading, trailing)
    }

    fn read_comments(&self, comments: &[&CommentRange], want_examples: bool) -> ExtractedMetadata {
        let mut descriptions = Vec::new();
        let mut examples = Vec::new();
        for comment in comments {
            let raw = self.source.comment_text(comment);
            // `//` comments carry examples but never a description
            if comment.style == CommentStyle::Block {
                let description = normalize_comment(raw);
                if !description.is_empty() {
                    descriptions.push(description);
                }
            }
            if want_examples {
                examples.extend(raw.lines().filter_map(example_value));
            }
        }
        ExtractedMetadata::new(descriptions.join("\n"), examples)
    }
}

/// Strips delimiters, `*` markers and tag lines; keeps one trimmed line per
/// line of text.
fn normalize_comment(raw: &str) -> String {
    raw.lines()
        .map(strip_markers)
        .filter(|line| !line.is_empty() && !line.starts_with('@'))
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_markers(line: &str) -> &str {
    let mut line = line.trim();
    if let Some(rest) = line.strip_suffix("*/") {
        line = rest.trim_end_matches('*');
    }
    line.trim_start_matches('/').trim_start_matches('*').trim()
}

/// Value of an `@example` line: rest of the line, one pair of quotes removed
fn example_value(line: &str) -> Option<String> {
    let line = strip_markers(line);
    let tag = line.get(..EXAMPLE_TAG.len())?;
    if !tag.eq_ignore_ascii_case(EXAMPLE_TAG) {
        return None;
    }
    let rest = &line[EXAMPLE_TAG.len()..];
    if !(rest.is_empty() || rest.starts_with(char::is_whitespace)) {
        return None;
    }
    let value = unquote(rest.trim());
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
