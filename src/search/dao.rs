//! Parametrized full-text query, with grouping, ranking and snippets.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use oxigraph::model::{Literal, NamedNode, NamedNodeRef};
use regex::Regex;

use crate::error::StoreResult;
use crate::ontology::{dcterms, lx, rdfs, skos};
use crate::repository::vocabulary::preferred_label;
use crate::search::FullTextSearchResult;
use crate::store::{GraphStore, SparqlQuery, iri_list, solution_iri, solution_literal};

const FTS_QUERY: &str = include_str!("fulltextsearch.rq");

/// Characters of context kept on each side of the first match in long snippets.
const SNIPPET_CONTEXT: usize = 60;

/// Field weights: labels count most, comments least.
fn field_weight(field: NamedNodeRef<'_>) -> f64 {
    if field == skos::PREF_LABEL || field == dcterms::TITLE {
        2.0
    } else if field == skos::ALT_LABEL {
        1.5
    } else if field == skos::DEFINITION {
        1.0
    } else {
        0.5
    }
}

fn local_name(iri: &str) -> &str {
    iri.rfind(|c: char| c == '/' || c == '#')
        .map_or(iri, |i| &iri[i + 1..])
}

#[derive(Default)]
struct Hit {
    types: BTreeSet<NamedNode>,
    vocabulary: Option<NamedNode>,
    labels: Vec<Literal>,
    matches: Vec<(NamedNode, Literal)>,
}

/// Runs the full-text query against the store.
#[derive(Debug, Clone)]
pub struct SearchDao {
    store: Arc<GraphStore>,
    language: String,
}

impl SearchDao {
    pub fn new(store: Arc<GraphStore>, language: impl Into<String>) -> Self {
        Self {
            store,
            language: language.into(),
        }
    }

    /// Terms and vocabularies whose label, title, alternative label, definition
    /// or comment contains `search` (case-insensitive).
    ///
    /// Empty `contexts` searches every graph; otherwise only the given ones.
    /// Results are ordered by score (descending), then IRI.
    pub fn full_text_search(
        &self,
        search: &str,
        contexts: &BTreeSet<NamedNode>,
    ) -> StoreResult<Vec<FullTextSearchResult>> {
        let search = search.trim();
        if search.is_empty() {
            return Ok(Vec::new());
        }
        tracing::trace!(search, contexts = contexts.len(), "running full text search");

        let scope = if contexts.is_empty() {
            "?g".to_string()
        } else {
            iri_list(contexts)
        };
        let query = SparqlQuery::new(FTS_QUERY)
            .bind_iri("termType", skos::CONCEPT)
            .bind_iri("vocabularyType", lx::VOCABULARY)
            .bind_iri("prefLabel", skos::PREF_LABEL)
            .bind_iri("title", dcterms::TITLE)
            .bind_iri("altLabel", skos::ALT_LABEL)
            .bind_iri("definition", skos::DEFINITION)
            .bind_iri("comment", rdfs::COMMENT)
            .bind_iri("inVocabulary", lx::IS_TERM_OF_VOCABULARY)
            .bind_iri("inScheme", skos::IN_SCHEME)
            .bind_iri("hasGlossary", lx::HAS_GLOSSARY)
            .bind_literal("searchString", search)
            .bind_untyped("contexts", scope);

        let mut hits: BTreeMap<(NamedNode, NamedNode), Hit> = BTreeMap::new();
        for row in self.store.select(&query.render())? {
            let (Some(entity), Some(context), Some(field), Some(text)) = (
                solution_iri(&row, "entity"),
                solution_iri(&row, "g"),
                solution_iri(&row, "field"),
                solution_literal(&row, "text"),
            ) else {
                continue;
            };
            let hit = hits.entry((entity, context)).or_default();
            if let Some(t) = solution_iri(&row, "type") {
                hit.types.insert(t);
            }
            if hit.vocabulary.is_none() {
                hit.vocabulary = solution_iri(&row, "vocabulary");
            }
            if let Some(label) = solution_literal(&row, "label") {
                if !hit.labels.contains(&label) {
                    hit.labels.push(label);
                }
            }
            let matched = (field, text);
            if !hit.matches.contains(&matched) {
                hit.matches.push(matched);
            }
        }

        let highlighter = Highlighter::new(search);
        let mut results: Vec<FullTextSearchResult> = hits
            .into_iter()
            .filter_map(|((uri, context), hit)| {
                let (field, text, score) = hit
                    .matches
                    .iter()
                    .map(|(field, text)| {
                        let score = highlighter.score(field.as_ref(), text.value());
                        (field, text, score)
                    })
                    .max_by(|a, b| a.2.total_cmp(&b.2))?;
                Some(FullTextSearchResult {
                    label: preferred_label(&hit.labels, &self.language)
                        .unwrap_or_else(|| local_name(uri.as_str()).to_string()),
                    snippet_field: local_name(field.as_str()).to_string(),
                    snippet_text: highlighter.snippet(text.value()),
                    score,
                    vocabulary: hit.vocabulary,
                    types: hit.types,
                    uri,
                    context,
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.uri.as_str().cmp(b.uri.as_str()))
                .then_with(|| a.context.as_str().cmp(b.context.as_str()))
        });
        tracing::debug!(search, results = results.len(), "full text search finished");
        Ok(results)
    }
}

/// Case-insensitive matcher for one search string.
struct Highlighter {
    pattern: Option<Regex>,
    search_chars: usize,
}

impl Highlighter {
    fn new(search: &str) -> Self {
        Self {
            pattern: Regex::new(&format!("(?i){}", regex::escape(search))).ok(),
            search_chars: search.chars().count(),
        }
    }

    /// Field weight scaled by how much of the text the search string covers.
    fn score(&self, field: NamedNodeRef<'_>, text: &str) -> f64 {
        let len = text.chars().count().max(1);
        let coverage = (self.search_chars as f64 / len as f64).min(1.0);
        field_weight(field) * (1.0 + coverage)
    }

    /// Text around the first match, with every match wrapped in `<em>`.
    fn snippet(&self, text: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return text.to_string();
        };
        let Some(first) = pattern.find(text) else {
            return text.to_string();
        };

        let start = text[..first.start()]
            .char_indices()
            .rev()
            .nth(SNIPPET_CONTEXT)
            .map_or(0, |(i, _)| i);
        let end = text[first.end()..]
            .char_indices()
            .nth(SNIPPET_CONTEXT)
            .map_or(text.len(), |(i, _)| first.end() + i);

        let mut out = String::new();
        if start > 0 {
            out.push('…');
        }
        out.push_str(&pattern.replace_all(&text[start..end], "<em>$0</em>"));
        if end < text.len() {
            out.push('…');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use oxigraph::model::Triple;

    use super::*;
    use crate::ontology::rdf;
    use crate::store::StoreTransaction;

    fn iri(s: &str) -> NamedNode {
        NamedNode::new(s).unwrap()
    }

    fn add_term(tx: &mut StoreTransaction<'_>, graph: &str, uri: &str, label: &str) {
        tx.insert(&iri(graph), &Triple::new(iri(uri), rdf::TYPE, skos::CONCEPT.into_owned()));
        tx.insert(
            &iri(graph),
            &Triple::new(iri(uri), skos::PREF_LABEL, Literal::new_language_tagged_literal_unchecked(label, "en")),
        );
        tx.insert(&iri(graph), &Triple::new(iri(uri), lx::IS_TERM_OF_VOCABULARY, iri(graph)));
    }

    fn seeded() -> SearchDao {
        let store = GraphStore::in_memory().unwrap();
        let mut tx = store.begin();
        add_term(&mut tx, "http://x/voc1", "http://x/voc1/term/building", "Building");
        add_term(&mut tx, "http://x/voc1", "http://x/voc1/term/build-permit", "Building permit");
        add_term(&mut tx, "http://x/voc2", "http://x/voc2/term/building", "Building");
        tx.insert(
            &iri("http://x/voc2"),
            &Triple::new(
                iri("http://x/voc2/term/road"),
                rdf::TYPE,
                skos::CONCEPT.into_owned(),
            ),
        );
        tx.insert(
            &iri("http://x/voc2"),
            &Triple::new(
                iri("http://x/voc2/term/road"),
                skos::DEFINITION,
                Literal::new_simple_literal("A way leading to a building."),
            ),
        );
        tx.commit().unwrap();
        SearchDao::new(Arc::new(store), "en")
    }

    #[test]
    fn blank_search_returns_nothing() {
        let dao = seeded();
        assert!(dao.full_text_search("   ", &BTreeSet::new()).unwrap().is_empty());
    }

    #[test]
    fn empty_contexts_search_everything() {
        let dao = seeded();
        let results = dao.full_text_search("building", &BTreeSet::new()).unwrap();
        assert_eq!(results.len(), 4);
        // Exact label matches rank first, the definition match last.
        assert_eq!(results[0].label, "Building");
        assert_eq!(results[3].uri, iri("http://x/voc2/term/road"));
        assert_eq!(results[3].snippet_field, "definition");
        assert_eq!(results[3].label, "road");
    }

    #[test]
    fn contexts_restrict_results() {
        let dao = seeded();
        let results = dao
            .full_text_search("building", &BTreeSet::from([iri("http://x/voc1")]))
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.context == iri("http://x/voc1")));
        assert_eq!(results[0].vocabulary, Some(iri("http://x/voc1")));
        assert!(results[0].has_type(skos::CONCEPT));
    }

    #[test]
    fn snippet_highlights_case_insensitively() {
        let dao = seeded();
        let results = dao
            .full_text_search("BUILD", &BTreeSet::from([iri("http://x/voc1")]))
            .unwrap();
        let permit = results
            .iter()
            .find(|r| r.uri == iri("http://x/voc1/term/build-permit"))
            .unwrap();
        assert_eq!(permit.snippet_text, "<em>Build</em>ing permit");
        assert_eq!(permit.snippet_field, "prefLabel");
    }

    #[test]
    fn long_snippets_are_trimmed_around_the_match() {
        let h = Highlighter::new("needle");
        let text = format!("{}needle{}", "a".repeat(200), "b".repeat(200));
        let snippet = h.snippet(&text);
        assert!(snippet.starts_with('…'));
        assert!(snippet.ends_with('…'));
        assert!(snippet.contains("<em>needle</em>"));
        assert!(snippet.chars().count() < 150);
    }

    #[test]
    fn scores_prefer_labels_and_coverage() {
        let h = Highlighter::new("road");
        assert!(h.score(skos::PREF_LABEL, "Road") > h.score(skos::PREF_LABEL, "Road network"));
        assert!(h.score(skos::ALT_LABEL, "Road") > h.score(skos::DEFINITION, "Road"));
        assert!(h.score(skos::DEFINITION, "Road") > h.score(rdfs::COMMENT, "Road"));
    }
}
