//! Parsers for the loosely-structured scene script a text model returns.
//!
//! The recognized grammar is deliberately small:
//!
//! - character declarations: one per line, `name = "description"` — an
//!   identifier (`[A-Za-z0-9_]+`), `=`, then a double-quoted string. The
//!   value runs to the last `"` on the line; no escape processing.
//! - scene labels: `Scene`, whitespace, digits, `:` (case-sensitive).
//! - placeholders: `{name}` inside scene text.
//!
//! Malformed input never fails — unrecognized lines are skipped and a
//! script with no labels yields zero scenes.

use crate::types::{CharacterMap, Scene};

/// Scan raw script text for `name = "description"` declarations.
///
/// Lines that don't match the declaration grammar are ignored. Duplicate
/// names overwrite, so the last declaration wins.
pub fn parse_characters(raw: &str) -> CharacterMap {
    let mut characters = CharacterMap::new();
    for line in raw.lines() {
        if let Some((name, description)) = parse_declaration(line) {
            characters.insert(name.to_string(), description.to_string());
        }
    }
    characters
}

fn parse_declaration(line: &str) -> Option<(&str, &str)> {
    let eq = line.find('=')?;
    let name = line[..eq].trim();
    if !is_identifier(name) {
        return None;
    }
    let rest = line[eq + 1..].trim_start();
    if !rest.starts_with('"') {
        return None;
    }
    // Greedy: value runs to the last quote on the line; anything after it
    // is ignored.
    let close = rest.rfind('"')?;
    if close == 0 {
        return None;
    }
    Some((name, &rest[1..close]))
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Partition raw script text into relabeled scene strings.
///
/// Splits on `Scene <n>:` labels (the label itself and any text before the
/// first label are discarded), trims each segment, drops empty ones, and
/// relabels survivors `Scene 1:`, `Scene 2:`, … in original order — the
/// model's own numbering is not trusted.
pub fn split_scenes(raw: &str) -> Vec<String> {
    let mut labels = Vec::new();
    let mut search = 0;
    while let Some(pos) = raw[search..].find("Scene") {
        let start = search + pos;
        match scene_label_end(raw, start) {
            Some(end) => {
                labels.push((start, end));
                search = end;
            }
            None => search = start + "Scene".len(),
        }
    }

    let mut scenes = Vec::new();
    for (i, &(_, body_start)) in labels.iter().enumerate() {
        let body_end = labels.get(i + 1).map(|&(s, _)| s).unwrap_or(raw.len());
        let segment = raw[body_start..body_end].trim();
        if segment.is_empty() {
            continue;
        }
        scenes.push(format!("Scene {}: {}", scenes.len() + 1, segment));
    }
    scenes
}

/// If `raw[start..]` begins a `Scene\s+\d+:` label, return the byte offset
/// just past the `:`.
fn scene_label_end(raw: &str, start: usize) -> Option<usize> {
    let after = &raw[start + "Scene".len()..];
    let mut chars = after.char_indices().peekable();

    let mut seen_whitespace = false;
    while let Some(&(_, c)) = chars.peek() {
        if c.is_whitespace() {
            seen_whitespace = true;
            chars.next();
        } else {
            break;
        }
    }
    if !seen_whitespace {
        return None;
    }

    let mut seen_digit = false;
    while let Some(&(_, c)) = chars.peek() {
        if c.is_ascii_digit() {
            seen_digit = true;
            chars.next();
        } else {
            break;
        }
    }
    if !seen_digit {
        return None;
    }

    match chars.peek() {
        Some(&(i, ':')) => Some(start + "Scene".len() + i + 1),
        _ => None,
    }
}

/// Replace `{name}` placeholders with character descriptions.
///
/// A single left-to-right scan: each brace-delimited identifier found in the
/// map is replaced by its description, unknown or malformed tokens pass
/// through unchanged. Because the scene text is scanned once, descriptions
/// are never expanded into each other.
pub fn substitute_characters(scene: &str, characters: &CharacterMap) -> String {
    let mut out = String::with_capacity(scene.len());
    let mut rest = scene;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open..];
        let replaced = after.find('}').and_then(|close| {
            let token = &after[1..close];
            characters
                .get(token)
                .filter(|_| is_identifier(token))
                .map(|description| (description, close))
        });
        match replaced {
            Some((description, close)) => {
                out.push_str(description);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = &after[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Run the full script front-end: parse characters, split scenes, and
/// finalize each scene's prompt by substitution.
pub fn compile_scenes(raw: &str) -> (CharacterMap, Vec<Scene>) {
    let characters = parse_characters(raw);
    let scenes = split_scenes(raw)
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let prompt = substitute_characters(&text, &characters);
            Scene {
                index: i + 1,
                text,
                prompt,
            }
        })
        .collect();
    (characters, scenes)
}
