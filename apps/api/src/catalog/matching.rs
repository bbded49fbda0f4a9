//! Incident Matcher — scores catalog records by naive keyword overlap.
//!
//! Pure and synchronous: a function of the query and the catalog snapshot
//! only, so it is safe to call from any number of concurrent handlers
//! without locking.

use super::IncidentRecord;

/// The two hazard descriptors collected per request. Transient; never stored.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub hazard: String,
    pub risk: String,
}

impl Query {
    pub fn new(hazard: impl Into<String>, risk: impl Into<String>) -> Self {
        Self {
            hazard: hazard.into(),
            risk: risk.into(),
        }
    }

    /// Whitespace tokens of the combined query text.
    ///
    /// `split_whitespace` never yields empty tokens, so blank input produces
    /// an empty token set and every record scores zero — rather than an
    /// empty-string token that would substring-match every record.
    fn tokens(&self) -> impl Iterator<Item = &str> {
        self.hazard
            .split_whitespace()
            .chain(self.risk.split_whitespace())
    }
}

/// A catalog record paired with its keyword-overlap score for one query.
#[derive(Debug, Clone)]
pub struct ScoredMatch<'a> {
    pub record: &'a IncidentRecord,
    pub score: u32,
}

/// Scores every catalog record against the query and returns the top
/// `limit` by descending score.
///
/// Each query token adds 1 to a record's score when it occurs anywhere in
/// the record's searchable text as a case-sensitive substring. A token
/// repeated in the query counts once per repetition; multiple occurrences
/// in the text still count once per token. Ties keep catalog order, and
/// zero-score records are NOT filtered out: with no keyword overlap the
/// first `limit` records come back in catalog order.
pub fn find_top_matches<'a>(
    query: &Query,
    catalog: &'a [IncidentRecord],
    limit: usize,
) -> Vec<ScoredMatch<'a>> {
    let tokens: Vec<&str> = query.tokens().collect();

    let mut scored: Vec<ScoredMatch<'a>> = catalog
        .iter()
        .map(|record| {
            let text = record.searchable_text();
            let score = tokens.iter().filter(|token| text.contains(**token)).count() as u32;
            ScoredMatch { record, score }
        })
        .collect();

    // Vec::sort_by is stable, so equal scores preserve catalog order.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}
