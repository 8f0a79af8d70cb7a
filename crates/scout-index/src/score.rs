//! Relevance scoring.
//!
//! Scoring is additive over field hits, scaled by each query token's match
//! weight (1.0 exact, 0.5 fuzzy), plus flat bonuses for raw-substring
//! hits, recency, and entity kind. Field weights dominate the bonuses so
//! a clear text-relevance difference is never overridden.

use chrono::{DateTime, Utc};
use scout_entity::{EntityKind, IndexedEntity};
use scout_text::ContentProcessor;

use crate::matching::TokenExpansion;

/// Score for a query token appearing among title tokens.
const TITLE_WEIGHT: f32 = 10.0;

/// Score for a query token appearing among description tokens.
const DESCRIPTION_WEIGHT: f32 = 5.0;

/// Score per occurrence of a query token in content tokens.
const CONTENT_WEIGHT: f32 = 2.0;

/// Score for a query token matching within any tag.
const TAG_WEIGHT: f32 = 8.0;

/// Flat bonus when the raw query appears verbatim in the raw content.
const SUBSTRING_BONUS: f32 = 15.0;

/// A scored candidate with the fields that produced the score.
#[derive(Debug, Clone)]
pub struct Scored {
    /// Relevance score.
    pub score: f32,
    /// Fields that contributed, in display order.
    pub matched_fields: Vec<String>,
}

/// Small additive bonus distinguishing record types.
///
/// Kept an order of magnitude below a single title hit so type never
/// outweighs text relevance.
fn kind_bonus(kind: EntityKind) -> f32 {
    match kind {
        EntityKind::Session => 2.0,
        EntityKind::Workspace => 1.0,
        EntityKind::Template => 0.5,
        _ => 0.0,
    }
}

/// Recency bonus derived from `updated_at`: 5.0 at zero age, fading to
/// zero over fifty days.
fn recency_bonus(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> f32 {
    let age_days = (now - updated_at).num_days().max(0) as f32;
    (5.0 - age_days / 10.0).max(0.0)
}

/// Scores one candidate against the resolved query tokens.
pub fn score_entity(
    entity: &IndexedEntity,
    expansions: &[TokenExpansion],
    raw_query: &str,
    processor: &ContentProcessor,
    now: DateTime<Utc>,
) -> Scored {
    let title_tokens = processor.process(&entity.title);
    let description_tokens = processor.process(&entity.description);
    let content_tokens = processor.process(&entity.content);
    let tag_tokens: Vec<String> = entity
        .tags
        .iter()
        .flat_map(|tag| processor.process(tag))
        .collect();

    let mut score = 0.0;
    let mut in_title = false;
    let mut in_description = false;
    let mut in_content = false;
    let mut in_tags = false;

    for expansion in expansions {
        // Per field, the best-weighted matched term wins for this token;
        // content counts every occurrence instead.
        let mut title_hit: f32 = 0.0;
        let mut description_hit: f32 = 0.0;
        let mut tag_hit: f32 = 0.0;

        for (term, weight) in &expansion.terms {
            if title_tokens.iter().any(|t| t == term) {
                title_hit = title_hit.max(*weight);
            }
            if description_tokens.iter().any(|t| t == term) {
                description_hit = description_hit.max(*weight);
            }
            if tag_tokens.iter().any(|t| t == term) {
                tag_hit = tag_hit.max(*weight);
            }
            let occurrences = content_tokens.iter().filter(|t| *t == term).count();
            if occurrences > 0 {
                score += CONTENT_WEIGHT * occurrences as f32 * weight;
                in_content = true;
            }
        }

        if title_hit > 0.0 {
            score += TITLE_WEIGHT * title_hit;
            in_title = true;
        }
        if description_hit > 0.0 {
            score += DESCRIPTION_WEIGHT * description_hit;
            in_description = true;
        }
        if tag_hit > 0.0 {
            score += TAG_WEIGHT * tag_hit;
            in_tags = true;
        }
    }

    let trimmed = raw_query.trim();
    if !trimmed.is_empty()
        && entity
            .content
            .to_lowercase()
            .contains(&trimmed.to_lowercase())
    {
        score += SUBSTRING_BONUS;
        in_content = true;
    }

    score += recency_bonus(entity.updated_at, now);
    score += kind_bonus(entity.kind);

    let mut matched_fields = Vec::new();
    if in_title {
        matched_fields.push("title".to_string());
    }
    if in_description {
        matched_fields.push("description".to_string());
    }
    if in_content {
        matched_fields.push("content".to_string());
    }
    if in_tags {
        matched_fields.push("tags".to_string());
    }

    Scored {
        score,
        matched_fields,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn processor() -> ContentProcessor {
        ContentProcessor::default()
    }

    fn exact(token: &str) -> TokenExpansion {
        TokenExpansion {
            token: token.to_string(),
            terms: vec![(token.to_string(), 1.0)],
        }
    }

    fn fuzzy(token: &str, term: &str) -> TokenExpansion {
        TokenExpansion {
            token: token.to_string(),
            terms: vec![(term.to_string(), 0.5)],
        }
    }

    fn entity(title: &str, content: &str) -> IndexedEntity {
        let mut entity = IndexedEntity::new("e1", EntityKind::File, title);
        entity.content = content.to_string();
        entity
    }

    #[test]
    fn title_hit_outweighs_content_hit() {
        let now = Utc::now();
        let in_title = entity("quarterly report", "");
        let in_content = entity("notes", "figures for the quarter");

        let processed = processor();
        let expansions = [exact("quarter")];
        let title_score = score_entity(&in_title, &expansions, "quarterly", &processed, now);
        let content_score = score_entity(&in_content, &expansions, "quarterly", &processed, now);

        assert!(title_score.score > content_score.score);
        assert_eq!(title_score.matched_fields, vec!["title"]);
    }

    #[test]
    fn repeated_content_occurrences_accumulate() {
        let now = Utc::now();
        let once = entity("x", "deploy finished");
        let thrice = entity("x", "deploy deploy deploy");

        let processed = processor();
        let expansions = [exact("deploy")];
        let once_score = score_entity(&once, &expansions, "q", &processed, now);
        let thrice_score = score_entity(&thrice, &expansions, "q", &processed, now);

        assert!(thrice_score.score > once_score.score);
        assert!((thrice_score.score - once_score.score - 2.0 * CONTENT_WEIGHT).abs() < 1e-4);
    }

    #[test]
    fn raw_substring_bonus_applies_case_insensitively() {
        let now = Utc::now();
        let subject = entity("x", "the Login Flow is broken");
        let processed = processor();

        let with_phrase = score_entity(&subject, &[], "login flow", &processed, now);
        let without = score_entity(&subject, &[], "logout", &processed, now);

        assert!((with_phrase.score - without.score - SUBSTRING_BONUS).abs() < 1e-4);
        assert_eq!(with_phrase.matched_fields, vec!["content"]);
    }

    #[test]
    fn fuzzy_match_scores_below_exact_match() {
        let now = Utc::now();
        let exact_entity = entity("planing the sprint", "");
        let fuzzy_entity = entity("planning the sprint", "");

        let processed = processor();
        // Query token "planing": exact hit on one entity, fuzzy on the other.
        let exact_score =
            score_entity(&exact_entity, &[exact("plan")], "planing", &processed, now);
        let fuzzy_score =
            score_entity(&fuzzy_entity, &[fuzzy("plan", "plann")], "planing", &processed, now);

        assert!(fuzzy_score.score > 0.0);
        assert!(exact_score.score > fuzzy_score.score);
    }

    #[test]
    fn tag_matches_score() {
        let now = Utc::now();
        let mut subject = entity("x", "");
        subject.tags.insert("bugfix".to_string());

        let processed = processor();
        let scored = score_entity(&subject, &[exact("bugfix")], "bugfix", &processed, now);
        assert!(scored.matched_fields.contains(&"tags".to_string()));
        assert!(scored.score >= TAG_WEIGHT);
    }

    #[test]
    fn recent_entities_outrank_stale_ones() {
        let now = Utc::now();
        let fresh = entity("x", "same");
        let mut stale = entity("x", "same");
        stale.updated_at = now - chrono::Duration::days(90);

        let processed = processor();
        let fresh_score = score_entity(&fresh, &[exact("same")], "same", &processed, now);
        let stale_score = score_entity(&stale, &[exact("same")], "same", &processed, now);
        assert!(fresh_score.score > stale_score.score);
    }

    #[test]
    fn kind_bonus_stays_small() {
        assert!(kind_bonus(EntityKind::Session) < TITLE_WEIGHT / 2.0);
        assert_eq!(kind_bonus(EntityKind::Log), 0.0);
    }
}
