//! Match highlighting.
//!
//! Matched spans are located case-insensitively in the raw field text and
//! wrapped in `<mark>`/`</mark>`, surrounded by a window of context on
//! each side. The surrounding text is emitted verbatim.

use scout_entity::IndexedEntity;

use crate::matching::TokenExpansion;
use crate::result::Highlight;

/// Cap on highlighted occurrences per field per search pattern.
const MAX_OCCURRENCES: usize = 3;

/// Walks `at` down to the nearest char boundary.
fn floor_boundary(text: &str, mut at: usize) -> usize {
    while at > 0 && !text.is_char_boundary(at) {
        at -= 1;
    }
    at
}

/// Walks `at` up to the nearest char boundary.
fn ceil_boundary(text: &str, mut at: usize) -> usize {
    while at < text.len() && !text.is_char_boundary(at) {
        at += 1;
    }
    at
}

/// Byte offsets of up to [`MAX_OCCURRENCES`] case-insensitive hits of
/// `pattern` in `text`.
///
/// Lowercasing is ASCII-only so byte offsets into the original text stay
/// valid.
fn occurrences(text: &str, pattern: &str) -> Vec<(usize, usize)> {
    if pattern.is_empty() {
        return Vec::new();
    }
    let haystack = text.to_ascii_lowercase();
    let needle = pattern.to_ascii_lowercase();

    let mut hits = Vec::new();
    let mut from = 0;
    while let Some(offset) = haystack[from..].find(&needle)
        && hits.len() < MAX_OCCURRENCES
    {
        let start = from + offset;
        hits.push((start, start + needle.len()));
        from = start + needle.len();
    }
    hits
}

/// Renders one context fragment around a matched span.
fn fragment(text: &str, start: usize, end: usize, radius: usize) -> String {
    let from = floor_boundary(text, start.saturating_sub(radius));
    let to = ceil_boundary(text, (end + radius).min(text.len()));
    let start = floor_boundary(text, start);
    let end = ceil_boundary(text, end);

    let mut out = String::with_capacity(to - from + 16);
    if from > 0 {
        out.push('…');
    }
    out.push_str(&text[from..start]);
    out.push_str("<mark>");
    out.push_str(&text[start..end]);
    out.push_str("</mark>");
    out.push_str(&text[end..to]);
    if to < text.len() {
        out.push('…');
    }
    out
}

/// Fragments for a single field, covering every search pattern.
fn field_fragments(text: &str, patterns: &[String], radius: usize) -> Vec<String> {
    let mut spans: Vec<(usize, usize)> = patterns
        .iter()
        .flat_map(|pattern| occurrences(text, pattern))
        .collect();
    spans.sort_unstable();
    spans.dedup();

    spans
        .into_iter()
        .map(|(start, end)| fragment(text, start, end, radius))
        .collect()
}

/// Builds the per-field highlights for a matched entity.
///
/// Patterns cover the literal query tokens and every index term they
/// resolved to, so stemmed and fuzzy matches still light up when their
/// surface form appears in the text.
pub fn build_highlights(
    entity: &IndexedEntity,
    expansions: &[TokenExpansion],
    radius: usize,
) -> Vec<Highlight> {
    let mut patterns: Vec<String> = Vec::new();
    for expansion in expansions {
        patterns.push(expansion.token.clone());
        for (term, _) in &expansion.terms {
            patterns.push(term.clone());
        }
    }
    patterns.sort_unstable_by_key(|p| std::cmp::Reverse(p.len()));
    patterns.dedup();
    // Drop patterns contained in a longer one so "plan" does not produce
    // a second, narrower span inside a "planning" hit.
    let mut kept: Vec<String> = Vec::new();
    for pattern in patterns {
        if !kept.iter().any(|longer| longer.contains(&pattern)) {
            kept.push(pattern);
        }
    }

    let mut highlights = Vec::new();
    for (field, text) in [
        ("title", &entity.title),
        ("description", &entity.description),
        ("content", &entity.content),
    ] {
        let fragments = field_fragments(text, &kept, radius);
        if !fragments.is_empty() {
            highlights.push(Highlight {
                field: field.to_string(),
                fragments,
            });
        }
    }
    highlights
}

#[cfg(test)]
mod test {
    use scout_entity::EntityKind;

    use super::*;

    fn expansion(token: &str, term: &str) -> TokenExpansion {
        TokenExpansion {
            token: token.to_string(),
            terms: vec![(term.to_string(), 1.0)],
        }
    }

    #[test]
    fn wraps_match_in_mark_tags() {
        let mut entity = IndexedEntity::new("e1", EntityKind::File, "Login flow");
        entity.content = "the login page".to_string();

        let highlights = build_highlights(&entity, &[expansion("login", "login")], 30);
        assert_eq!(highlights.len(), 2);
        assert_eq!(highlights[0].field, "title");
        assert_eq!(highlights[0].fragments, vec!["<mark>Login</mark> flow"]);
        assert_eq!(highlights[1].field, "content");
        assert_eq!(highlights[1].fragments, vec!["the <mark>login</mark> page"]);
    }

    #[test]
    fn long_content_is_trimmed_to_the_radius() {
        let mut entity = IndexedEntity::new("e1", EntityKind::File, "x");
        entity.content = format!("{} deploy {}", "a".repeat(100), "b".repeat(100));

        let highlights = build_highlights(&entity, &[expansion("deploy", "deploy")], 10);
        let fragment = &highlights[0].fragments[0];
        assert!(fragment.starts_with('…'));
        assert!(fragment.ends_with('…'));
        assert!(fragment.contains("<mark>deploy</mark>"));
        assert!(fragment.len() < entity.content.len());
    }

    #[test]
    fn occurrences_are_capped_per_pattern() {
        let mut entity = IndexedEntity::new("e1", EntityKind::File, "x");
        entity.content = "hit hit hit hit hit".to_string();

        let highlights = build_highlights(&entity, &[expansion("hit", "hit")], 5);
        assert_eq!(highlights[0].fragments.len(), MAX_OCCURRENCES);
    }

    #[test]
    fn stemmed_term_still_highlights_surface_form() {
        let mut entity = IndexedEntity::new("e1", EntityKind::File, "x");
        entity.content = "sprint planning doc".to_string();

        // "planing" resolves to the index term "plann" via fuzzy matching.
        let highlights = build_highlights(&entity, &[expansion("planing", "plann")], 30);
        assert_eq!(
            highlights[0].fragments,
            vec!["sprint <mark>plann</mark>ing doc"]
        );
    }

    #[test]
    fn fragment_bounds_respect_multibyte_characters() {
        let mut entity = IndexedEntity::new("e1", EntityKind::File, "x");
        entity.content = "ééééé deploy ééééé".to_string();

        let highlights = build_highlights(&entity, &[expansion("deploy", "deploy")], 3);
        // Must not panic on a non-boundary slice, and the match survives.
        assert!(highlights[0].fragments[0].contains("<mark>deploy</mark>"));
    }

    #[test]
    fn no_match_produces_no_highlight_entry() {
        let entity = IndexedEntity::new("e1", EntityKind::File, "quiet");
        let highlights = build_highlights(&entity, &[expansion("absent", "absent")], 30);
        assert!(highlights.is_empty());
    }
}
