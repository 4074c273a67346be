//! Terms (SKOS concepts) of a vocabulary.

use std::collections::BTreeMap;

use oxigraph::model::{Literal, NamedNode};

use crate::error::StoreResult;
use crate::model::{Term, Vocabulary};
use crate::ontology::{lx, rdf, skos};
use crate::store::{GraphStore, StoreTransaction, iri_list, solution_iri, solution_literal};

use super::vocabulary::preferred_label;

/// Reads terms and stages their removal.
#[derive(Debug, Clone, Copy)]
pub struct TermDao<'a> {
    store: &'a GraphStore,
    language: &'a str,
}

impl<'a> TermDao<'a> {
    pub fn new(store: &'a GraphStore, language: &'a str) -> Self {
        Self { store, language }
    }

    /// Graphs a vocabulary's terms may live in: its working context and the
    /// graph named by its IRI (where imports land).
    pub fn term_contexts(vocabulary: &Vocabulary) -> Vec<NamedNode> {
        let mut contexts = vec![vocabulary.context.clone()];
        if vocabulary.uri != vocabulary.context {
            contexts.push(vocabulary.uri.clone());
        }
        contexts
    }

    /// Every term of `vocabulary`, ordered by IRI.
    ///
    /// A term belongs to the vocabulary when it is a `skos:Concept` that is in
    /// the vocabulary's glossary (as member or top concept) or is linked to the
    /// vocabulary directly. Every concept in the graph named by the vocabulary
    /// IRI is a term too, linked or not.
    pub fn find_all(&self, vocabulary: &Vocabulary) -> StoreResult<Vec<Term>> {
        let mut membership = vec![format!(
            "{{ ?term {} {} }}",
            lx::IS_TERM_OF_VOCABULARY,
            vocabulary.uri
        )];
        if let Some(glossary) = &vocabulary.glossary {
            membership.push(format!("{{ ?term {} {glossary} }}", skos::IN_SCHEME));
            membership.push(format!("{{ ?term {} {glossary} }}", skos::TOP_CONCEPT_OF));
            membership.push(format!("{{ {glossary} {} ?term }}", skos::HAS_TOP_CONCEPT));
        }
        let query = format!(
            "SELECT DISTINCT ?term ?label WHERE {{\n  {{\n    GRAPH ?g {{ ?term {rdf_type} {concept} . {} }}\n    FILTER (?g IN ({}))\n  }} UNION {{\n    GRAPH {graph} {{ ?term {rdf_type} {concept} }}\n    BIND ({graph} AS ?g)\n  }}\n  OPTIONAL {{ GRAPH ?g {{ ?term {} ?label }} }}\n}}",
            membership.join(" UNION "),
            iri_list(&Self::term_contexts(vocabulary)),
            skos::PREF_LABEL,
            rdf_type = rdf::TYPE,
            concept = skos::CONCEPT,
            graph = vocabulary.uri,
        );

        let mut labels: BTreeMap<NamedNode, Vec<Literal>> = BTreeMap::new();
        for row in self.store.select(&query)? {
            let Some(term) = solution_iri(&row, "term") else {
                continue;
            };
            let entry = labels.entry(term).or_default();
            if let Some(label) = solution_literal(&row, "label") {
                entry.push(label);
            }
        }

        Ok(labels
            .into_iter()
            .map(|(uri, literals)| {
                let mut term = Term::new(uri).with_vocabulary(vocabulary.uri.clone());
                term.glossary = vocabulary.glossary.clone();
                term.label = preferred_label(&literals, self.language);
                term
            })
            .collect())
    }

    /// Stage removal of every statement mentioning `term` in each of `contexts`.
    pub fn remove(&self, tx: &mut StoreTransaction<'_>, term: &Term, contexts: &[NamedNode]) {
        for context in contexts {
            tx.delete_resource(context, &term.uri);
        }
    }
}

#[cfg(test)]
mod tests {
    use oxigraph::model::Triple;

    use super::*;

    fn iri(s: &str) -> NamedNode {
        NamedNode::new(s).unwrap()
    }

    fn concept(store: &GraphStore, graph: &str, term: &str, link: Triple) {
        let mut tx = store.begin();
        tx.insert(&iri(graph), &Triple::new(iri(term), rdf::TYPE, skos::CONCEPT.into_owned()));
        tx.insert(&iri(graph), &link);
        tx.commit().unwrap();
    }

    fn vocabulary() -> Vocabulary {
        Vocabulary::new(iri("http://x/voc1"), iri("http://x/ws/ctx1")).with_glossary(iri("http://x/voc1/g"))
    }

    #[test]
    fn finds_terms_through_every_membership_link() {
        let store = GraphStore::in_memory().unwrap();
        let g = iri("http://x/voc1/g");
        concept(&store, "http://x/voc1", "http://x/voc1/a", Triple::new(iri("http://x/voc1/a"), skos::IN_SCHEME, g.clone()));
        concept(&store, "http://x/voc1", "http://x/voc1/b", Triple::new(iri("http://x/voc1/b"), skos::TOP_CONCEPT_OF, g.clone()));
        concept(&store, "http://x/ws/ctx1", "http://x/voc1/c", Triple::new(g.clone(), skos::HAS_TOP_CONCEPT, iri("http://x/voc1/c")));
        concept(
            &store,
            "http://x/ws/ctx1",
            "http://x/voc1/d",
            Triple::new(iri("http://x/voc1/d"), lx::IS_TERM_OF_VOCABULARY, iri("http://x/voc1")),
        );
        // Other graph, not one of the vocabulary's.
        concept(&store, "http://x/elsewhere", "http://x/voc1/e", Triple::new(iri("http://x/voc1/e"), skos::IN_SCHEME, g.clone()));

        let dao = TermDao::new(&store, "en");
        let terms: Vec<String> = dao
            .find_all(&vocabulary())
            .unwrap()
            .into_iter()
            .map(|t| t.uri.as_str().to_string())
            .collect();
        assert_eq!(terms, vec!["http://x/voc1/a", "http://x/voc1/b", "http://x/voc1/c", "http://x/voc1/d"]);
    }

    #[test]
    fn every_concept_in_the_vocabulary_graph_is_a_term() {
        let store = GraphStore::in_memory().unwrap();
        // Only a broader link, no scheme membership.
        concept(&store, "http://x/voc1", "http://x/voc1/a", Triple::new(iri("http://x/voc1/a"), skos::BROADER, iri("http://x/voc1/b")));
        concept(&store, "http://x/ws/ctx1", "http://x/voc1/z", Triple::new(iri("http://x/voc1/z"), skos::BROADER, iri("http://x/voc1/b")));

        let dao = TermDao::new(&store, "en");
        let terms = dao.find_all(&vocabulary()).unwrap();
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].uri.as_str(), "http://x/voc1/a");
    }

    #[test]
    fn remove_clears_term_from_contexts() {
        let store = GraphStore::in_memory().unwrap();
        let g = iri("http://x/voc1/g");
        concept(&store, "http://x/voc1", "http://x/voc1/a", Triple::new(iri("http://x/voc1/a"), skos::IN_SCHEME, g.clone()));
        concept(&store, "http://x/voc1", "http://x/voc1/b", Triple::new(iri("http://x/voc1/b"), skos::BROADER, iri("http://x/voc1/a")));
        concept(&store, "http://x/ws/ctx1", "http://x/ws/ctx1/c", Triple::new(iri("http://x/ws/ctx1/c"), skos::BROADER, iri("http://x/voc1/a")));

        let dao = TermDao::new(&store, "en");
        let vocabulary = vocabulary();
        let terms = dao.find_all(&vocabulary).unwrap();
        assert_eq!(terms.len(), 2);

        let mut tx = store.begin();
        for term in &terms {
            dao.remove(&mut tx, term, &TermDao::term_contexts(&vocabulary));
        }
        tx.commit().unwrap();

        assert!(dao.find_all(&vocabulary).unwrap().is_empty());
        assert_eq!(store.graph_len(&iri("http://x/voc1")).unwrap(), 0);
        // c is not a term; its type statement survives, its broader link to a does not.
        assert_eq!(store.graph_len(&iri("http://x/ws/ctx1")).unwrap(), 1);
    }
}
