//! Case-insensitive substring matching and highlight ranges

use std::ops::Range;

/// Per-char lowercase. Filtering and highlighting both fold this way so a
/// row that matches always has something to highlight.
fn fold(text: &str) -> Vec<char> {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// True when `needle` occurs in `haystack`, ignoring case. An empty needle
/// matches everything.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let needle = fold(needle);
    if needle.is_empty() {
        return true;
    }
    let hay: Vec<(usize, char)> = haystack.char_indices().collect();
    (0..hay.len()).any(|i| match_at(&hay, i, &needle).is_some())
}

/// Byte ranges of `text` matching `term`, case-insensitively, left to right
/// and non-overlapping.
pub fn match_ranges(text: &str, term: &str) -> Vec<Range<usize>> {
    let needle = fold(term);
    if needle.is_empty() {
        return Vec::new();
    }

    let hay: Vec<(usize, char)> = text.char_indices().collect();
    let mut ranges = Vec::new();
    let mut i = 0;
    while i < hay.len() {
        match match_at(&hay, i, &needle) {
            Some(end) => {
                let end_byte = hay.get(end).map_or(text.len(), |(b, _)| *b);
                ranges.push(hay[i].0..end_byte);
                i = end;
            }
            None => i += 1,
        }
    }
    ranges
}

fn match_at(hay: &[(usize, char)], start: usize, needle: &[char]) -> Option<usize> {
    let mut k = 0;
    let mut pos = start;
    while k < needle.len() {
        let (_, c) = hay.get(pos)?;
        for lower in c.to_lowercase() {
            if needle.get(k) != Some(&lower) {
                return None;
            }
            k += 1;
        }
        pos += 1;
    }
    Some(pos)
}

/// Split `text` into `(segment, is_match)` pieces for rendering.
pub fn split_highlights<'a>(text: &'a str, ranges: &[Range<usize>]) -> Vec<(&'a str, bool)> {
    let mut parts = Vec::new();
    let mut last = 0;
    for range in ranges {
        if range.start > last {
            parts.push((&text[last..range.start], false));
        }
        parts.push((&text[range.clone()], true));
        last = range.end;
    }
    if last < text.len() {
        parts.push((&text[last..], false));
    }
    parts
}
