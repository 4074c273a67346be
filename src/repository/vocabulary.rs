//! Vocabulary entities in their working contexts.

use oxigraph::model::{Literal, NamedNode, Triple};

use crate::error::StoreResult;
use crate::model::Vocabulary;
use crate::ontology::{dcterms, lx, rdf, skos};
use crate::store::{GraphStore, SparqlQuery, StoreTransaction, solution_iri, solution_literal};

const FIND_QUERY: &str = r#"
SELECT ?glossary ?title WHERE {
    GRAPH ?context {
        ?vocabulary a ?vocabularyType .
        OPTIONAL { ?vocabulary ?hasGlossary ?glossary . }
        OPTIONAL { ?vocabulary ?titlePredicate ?title . }
    }
}
"#;

/// Reads vocabularies and stages their updates.
#[derive(Debug, Clone, Copy)]
pub struct VocabularyDao<'a> {
    store: &'a GraphStore,
    language: &'a str,
}

impl<'a> VocabularyDao<'a> {
    /// `language` selects which `dcterms:title` becomes the label when several exist.
    pub fn new(store: &'a GraphStore, language: &'a str) -> Self {
        Self { store, language }
    }

    /// The vocabulary `uri` as stored in `context`, if it is there.
    pub fn find(&self, uri: &NamedNode, context: &NamedNode) -> StoreResult<Option<Vocabulary>> {
        let query = SparqlQuery::new(FIND_QUERY)
            .bind_iri("context", context)
            .bind_iri("vocabulary", uri)
            .bind_iri("vocabularyType", lx::VOCABULARY)
            .bind_iri("hasGlossary", lx::HAS_GLOSSARY)
            .bind_iri("titlePredicate", dcterms::TITLE);
        let rows = self.store.select(&query.render())?;
        if rows.is_empty() {
            return Ok(None);
        }

        let mut vocabulary = Vocabulary::new(uri.clone(), context.clone());
        vocabulary.glossary = rows.iter().find_map(|row| solution_iri(row, "glossary"));
        let titles: Vec<Literal> = rows
            .iter()
            .filter_map(|row| solution_literal(row, "title"))
            .collect();
        vocabulary.label = preferred_label(&titles, self.language);
        Ok(Some(vocabulary))
    }

    /// Stage the vocabulary's type and glossary link, replacing any previous link.
    /// The glossary is (re)declared as an `lx:Glossary` concept scheme.
    pub fn update(&self, tx: &mut StoreTransaction<'_>, vocabulary: &Vocabulary) {
        let context = &vocabulary.context;
        tx.delete_values(context, &vocabulary.uri, lx::HAS_GLOSSARY);

        let mut triples = vec![Triple::new(
            vocabulary.uri.clone(),
            rdf::TYPE,
            lx::VOCABULARY.into_owned(),
        )];
        if let Some(glossary) = &vocabulary.glossary {
            triples.push(Triple::new(vocabulary.uri.clone(), lx::HAS_GLOSSARY, glossary.clone()));
            triples.push(Triple::new(glossary.clone(), rdf::TYPE, lx::GLOSSARY.into_owned()));
            triples.push(Triple::new(glossary.clone(), rdf::TYPE, skos::CONCEPT_SCHEME.into_owned()));
        }
        tx.insert_all(context, &triples);
    }

    /// Stage replacing the vocabulary's titles with `label` in the configured language.
    pub fn update_title(&self, tx: &mut StoreTransaction<'_>, vocabulary: &Vocabulary, label: &str) {
        let context = &vocabulary.context;
        tx.delete_values(context, &vocabulary.uri, dcterms::TITLE);
        let title = if self.language.is_empty() {
            Literal::new_simple_literal(label)
        } else {
            Literal::new_language_tagged_literal_unchecked(label, self.language.to_ascii_lowercase())
        };
        tx.insert(context, &Triple::new(vocabulary.uri.clone(), dcterms::TITLE, title));
    }
}

/// Pick the literal in `language`, falling back to an untagged one.
pub(crate) fn preferred_label(literals: &[Literal], language: &str) -> Option<String> {
    literals
        .iter()
        .find(|l| l.language().is_some_and(|tag| tag.eq_ignore_ascii_case(language)))
        .or_else(|| literals.iter().find(|l| l.language().is_none()))
        .or_else(|| literals.first())
        .map(|l| l.value().to_string())
}
