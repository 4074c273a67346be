//! Transient statement set built up during one import.

use std::collections::HashSet;

use oxigraph::model::{Literal, NamedNode, NamedNodeRef, Term, TermRef, Triple};

use crate::ontology::{rdf, skos};

/// Insertion-ordered, de-duplicated triples parsed from the import inputs.
#[derive(Debug, Default, Clone)]
pub struct ImportModel {
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
}

fn subject_term(triple: &Triple) -> TermRef<'_> {
    triple.subject.as_ref().into()
}

fn is_instance_of(triple: &Triple, class: NamedNodeRef<'_>) -> bool {
    triple.predicate.as_ref() == rdf::TYPE && triple.object.as_ref() == TermRef::from(class)
}

impl ImportModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a statement. Returns `false` if it was already present.
    pub fn add(&mut self, triple: Triple) -> bool {
        if self.seen.contains(&triple) {
            return false;
        }
        self.seen.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn clear(&mut self) {
        self.triples.clear();
        self.seen.clear();
    }

    /// Distinct subjects typed `class`, in first-seen order.
    pub fn instances_of(&self, class: NamedNodeRef<'_>) -> Vec<Term> {
        let mut seen = HashSet::new();
        self.triples
            .iter()
            .filter(|t| is_instance_of(t, class))
            .map(|t| subject_term(t).into_owned())
            .filter(|term| seen.insert(term.clone()))
            .collect()
    }

    /// Literal objects of `subject predicate ?o`.
    pub fn literal_values(&self, subject: &NamedNode, predicate: NamedNodeRef<'_>) -> Vec<Literal> {
        let subject = TermRef::from(subject.as_ref());
        self.triples
            .iter()
            .filter(|t| subject_term(t) == subject && t.predicate.as_ref() == predicate)
            .filter_map(|t| match &t.object {
                Term::Literal(literal) => Some(literal.clone()),
                _ => None,
            })
            .collect()
    }

    /// Mark every root concept as a top concept of `glossary`.
    ///
    /// A concept is a root when it has no `skos:broader` pointing at a parsed
    /// concept and no parsed concept lists it as `skos:narrower`. Roots get both
    /// `glossary skos:hasTopConcept c` and `c skos:topConceptOf glossary`.
    /// Returns the roots in first-seen order.
    pub fn derive_top_concepts(&mut self, glossary: &NamedNode) -> Vec<Term> {
        let concepts: HashSet<Term> = self.instances_of(skos::CONCEPT).into_iter().collect();

        let mut has_broader = HashSet::new();
        let mut is_narrower = HashSet::new();
        for t in &self.triples {
            let predicate = t.predicate.as_ref();
            if predicate == skos::BROADER && concepts.contains(&t.object) {
                has_broader.insert(subject_term(t).into_owned());
            } else if predicate == skos::NARROWER
                && concepts.contains(&subject_term(t).into_owned())
            {
                is_narrower.insert(t.object.clone());
            }
        }

        let mut roots = Vec::new();
        let mut root_terms = Vec::new();
        let mut visited = HashSet::new();
        for t in &self.triples {
            if !is_instance_of(t, skos::CONCEPT) {
                continue;
            }
            let term = subject_term(t).into_owned();
            if has_broader.contains(&term) || is_narrower.contains(&term) || !visited.insert(term.clone()) {
                continue;
            }
            roots.push(t.subject.clone());
            root_terms.push(term);
        }

        for subject in roots {
            self.add(Triple::new(glossary.clone(), skos::HAS_TOP_CONCEPT, subject.clone()));
            self.add(Triple::new(subject, skos::TOP_CONCEPT_OF, glossary.clone()));
        }
        root_terms
    }

    /// Add `c skos:inScheme glossary` for every IRI concept. Returns how many
    /// links were new.
    pub fn link_concepts_to(&mut self, glossary: &NamedNode) -> usize {
        let mut linked = 0;
        for concept in self.instances_of(skos::CONCEPT) {
            let Term::NamedNode(concept) = concept else {
                continue;
            };
            if self.add(Triple::new(concept, skos::IN_SCHEME, glossary.clone())) {
                linked += 1;
            }
        }
        linked
    }

    /// Drop every statement with `resource` as subject or object. Returns how many were dropped.
    pub fn remove_mentions(&mut self, resource: &Term) -> usize {
        let resource = resource.as_ref();
        let before = self.triples.len();
        self.triples
            .retain(|t| subject_term(t) != resource && t.object.as_ref() != resource);
        let removed = before - self.triples.len();
        if removed > 0 {
            self.seen = self.triples.iter().cloned().collect();
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use oxigraph::model::BlankNode;

    use super::*;

    fn iri(s: &str) -> NamedNode {
        NamedNode::new(s).unwrap()
    }

    fn concept(model: &mut ImportModel, uri: &str) {
        model.add(Triple::new(iri(uri), rdf::TYPE, skos::CONCEPT.into_owned()));
    }

    #[test]
    fn duplicates_are_ignored() {
        let mut model = ImportModel::new();
        assert!(model.add(Triple::new(iri("http://x/a"), rdf::TYPE, skos::CONCEPT.into_owned())));
        assert!(!model.add(Triple::new(iri("http://x/a"), rdf::TYPE, skos::CONCEPT.into_owned())));
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn only_root_becomes_top_concept() {
        let mut model = ImportModel::new();
        let g = iri("http://x/g");
        for c in ["http://x/a", "http://x/b", "http://x/c"] {
            concept(&mut model, c);
        }
        model.add(Triple::new(iri("http://x/b"), skos::BROADER, iri("http://x/a")));
        model.add(Triple::new(iri("http://x/a"), skos::NARROWER, iri("http://x/c")));

        let roots = model.derive_top_concepts(&g);
        assert_eq!(roots, vec![Term::from(iri("http://x/a"))]);
        assert!(model.iter().any(|t| t.predicate.as_ref() == skos::HAS_TOP_CONCEPT
            && t.object == Term::from(iri("http://x/a"))));
        assert!(model.iter().any(|t| t.predicate.as_ref() == skos::TOP_CONCEPT_OF
            && t.object == Term::from(g.clone())));
        assert_eq!(model.len(), 7);
    }

    #[test]
    fn broader_outside_model_does_not_count() {
        let mut model = ImportModel::new();
        concept(&mut model, "http://x/a");
        model.add(Triple::new(iri("http://x/a"), skos::BROADER, iri("http://elsewhere/z")));
        let roots = model.derive_top_concepts(&iri("http://x/g"));
        assert_eq!(roots, vec![Term::from(iri("http://x/a"))]);
    }

    #[test]
    fn blank_node_concepts_can_be_roots() {
        let mut model = ImportModel::new();
        let b = BlankNode::default();
        model.add(Triple::new(b.clone(), rdf::TYPE, skos::CONCEPT.into_owned()));
        let roots = model.derive_top_concepts(&iri("http://x/g"));
        assert_eq!(roots, vec![Term::from(b)]);
    }

    #[test]
    fn remove_mentions_drops_subject_and_object_statements() {
        let mut model = ImportModel::new();
        concept(&mut model, "http://x/a");
        concept(&mut model, "http://x/b");
        model.add(Triple::new(iri("http://x/b"), skos::BROADER, iri("http://x/a")));

        let removed = model.remove_mentions(&Term::from(iri("http://x/a")));
        assert_eq!(removed, 2);
        assert_eq!(model.len(), 1);
        // Removed statements can be added again.
        assert!(model.add(Triple::new(iri("http://x/a"), rdf::TYPE, skos::CONCEPT.into_owned())));
    }

    #[test]
    fn concepts_without_scheme_are_linked_to_glossary() {
        let mut model = ImportModel::new();
        let g = iri("http://x/g");
        concept(&mut model, "http://x/a");
        concept(&mut model, "http://x/b");
        model.add(Triple::new(iri("http://x/b"), skos::BROADER, iri("http://x/a")));
        model.add(Triple::new(iri("http://x/a"), skos::IN_SCHEME, g.clone()));

        assert_eq!(model.link_concepts_to(&g), 1);
        assert!(model.iter().any(|t| subject_term(t) == TermRef::from(iri("http://x/b").as_ref())
            && t.predicate.as_ref() == skos::IN_SCHEME
            && t.object == Term::from(g.clone())));
        assert_eq!(model.link_concepts_to(&g), 0);
    }

    #[test]
    fn literal_lookup() {
        let mut model = ImportModel::new();
        let g = iri("http://x/g");
        model.add(Triple::new(g.clone(), skos::PREF_LABEL, Literal::new_simple_literal("G")));
        model.add(Triple::new(g.clone(), rdf::TYPE, skos::CONCEPT_SCHEME.into_owned()));
        let values = model.literal_values(&g, skos::PREF_LABEL);
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].value(), "G");
    }
}
