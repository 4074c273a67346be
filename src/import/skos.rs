//! SKOS thesaurus importer.
//!
//! An importer session runs one import through
//! `Idle → Parsed → TopConceptsComputed → VocabularyResolved → Committed`.
//! Every failure moves it to `Failed` and discards the parsed model; nothing is
//! written to the store until the final commit, which applies as one update.

use std::collections::HashSet;
use std::io::Read;

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::{NamedNode, Term, Triple};

use crate::config::LexConfig;
use crate::context::ContextResolver;
use crate::import::error::{ImportError, ImportResult};
use crate::import::identifier::{build_namespace, extract_identifier_namespace};
use crate::import::model::ImportModel;
use crate::model::Vocabulary;
use crate::ontology::{dcterms, skos};
use crate::repository::{TermDao, VocabularyDao};
use crate::store::GraphStore;

/// Where an importer session is in its single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportPhase {
    Idle,
    Parsed,
    TopConceptsComputed,
    VocabularyResolved,
    Committed,
    Failed,
}

impl std::fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ImportPhase::Idle => "idle",
            ImportPhase::Parsed => "parsed",
            ImportPhase::TopConceptsComputed => "top-concepts-computed",
            ImportPhase::VocabularyResolved => "vocabulary-resolved",
            ImportPhase::Committed => "committed",
            ImportPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of a committed import.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// The vocabulary after the import (glossary and label updated).
    pub vocabulary: Vocabulary,
    /// Concepts dropped because they lie outside the vocabulary's term namespace.
    pub skipped: Vec<NamedNode>,
    /// Blank-node concepts dropped because they have no IRI to import under.
    pub blank_concepts: usize,
    /// Number of terms the vocabulary had before and that were removed.
    pub removed_terms: usize,
    /// Number of imported concepts marked as top concepts of the glossary.
    pub top_concepts: usize,
    /// Number of statements written into the vocabulary graph.
    pub inserted: usize,
}

/// One-shot import session.
#[derive(Debug)]
pub struct SkosImporter<'a> {
    store: &'a GraphStore,
    resolver: &'a ContextResolver,
    config: &'a LexConfig,
    model: ImportModel,
    phase: ImportPhase,
    glossary: Option<NamedNode>,
}

impl<'a> SkosImporter<'a> {
    pub fn new(store: &'a GraphStore, resolver: &'a ContextResolver, config: &'a LexConfig) -> Self {
        Self {
            store,
            resolver,
            config,
            model: ImportModel::new(),
            phase: ImportPhase::Idle,
            glossary: None,
        }
    }

    pub fn phase(&self) -> ImportPhase {
        self.phase
    }

    /// Glossary IRI found in the imported data, once parsing got that far.
    /// Kept after the session ends, successful or not.
    pub fn glossary(&self) -> Option<&NamedNode> {
        self.glossary.as_ref()
    }

    /// Replace the terms of `vocabulary` with the concepts parsed from `inputs`.
    ///
    /// All inputs share `media_type`. The vocabulary must already exist in its
    /// working context in the current workspace.
    pub fn import_vocabulary<R, I>(
        &mut self,
        vocabulary: &NamedNode,
        media_type: &str,
        inputs: I,
    ) -> ImportResult<ImportOutcome>
    where
        R: Read,
        I: IntoIterator<Item = R>,
    {
        if self.phase != ImportPhase::Idle {
            return Err(ImportError::InvalidInput {
                message: format!("importer session already used (phase: {})", self.phase),
            });
        }

        tracing::info!(%vocabulary, media_type, "vocabulary import started");
        match self.run(vocabulary, media_type, inputs) {
            Ok(outcome) => {
                self.phase = ImportPhase::Committed;
                self.model.clear();
                tracing::info!(
                    %vocabulary,
                    inserted = outcome.inserted,
                    removed_terms = outcome.removed_terms,
                    skipped = outcome.skipped.len(),
                    blank_concepts = outcome.blank_concepts,
                    "vocabulary import finished"
                );
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(%vocabulary, phase = %self.phase, error = %e, "vocabulary import failed");
                self.phase = ImportPhase::Failed;
                self.model.clear();
                Err(e)
            }
        }
    }

    fn run<R, I>(
        &mut self,
        vocabulary_iri: &NamedNode,
        media_type: &str,
        inputs: I,
    ) -> ImportResult<ImportOutcome>
    where
        R: Read,
        I: IntoIterator<Item = R>,
    {
        let (store, config) = (self.store, self.config);
        let format = parse_media_type(media_type)?;
        self.parse(format, inputs)?;
        self.phase = ImportPhase::Parsed;

        let glossary = self.resolve_glossary()?;
        self.glossary = Some(glossary.clone());
        tracing::debug!(%glossary, "resolved glossary");

        let roots = self.model.derive_top_concepts(&glossary);
        tracing::debug!(top_concepts = roots.len(), "derived top concepts");
        self.phase = ImportPhase::TopConceptsComputed;

        let context = self.resolver.resolve_vocabulary_context(vocabulary_iri)?;
        let vocabulary_dao = VocabularyDao::new(store, &config.language);
        let term_dao = TermDao::new(store, &config.language);
        let mut vocabulary = vocabulary_dao.find(vocabulary_iri, &context)?.ok_or_else(|| {
            ImportError::VocabularyNotFound {
                vocabulary: vocabulary_iri.as_str().into(),
                context: context.as_str().into(),
            }
        })?;

        let mut tx = store.begin();

        // Current terms belong to the current glossary; collect them before rebinding.
        let term_contexts = TermDao::term_contexts(&vocabulary);
        let existing_terms = term_dao.find_all(&vocabulary)?;
        for term in &existing_terms {
            term_dao.remove(&mut tx, term, &term_contexts);
        }

        // Old glossary statements are replaced by the imported ones.
        if let Some(previous) = vocabulary.glossary.take() {
            if previous != glossary {
                tracing::info!(%previous, %glossary, "rebinding vocabulary glossary");
            }
            for context in &term_contexts {
                tx.delete_resource(context, &previous);
            }
        }
        vocabulary.glossary = Some(glossary.clone());
        vocabulary_dao.update(&mut tx, &vocabulary);

        if let Some(label) = self.glossary_title(&glossary) {
            vocabulary_dao.update_title(&mut tx, &vocabulary, &label);
            vocabulary.label = Some(label);
        }
        self.phase = ImportPhase::VocabularyResolved;

        let (skipped, blank_concepts) = self.strip_foreign_concepts(vocabulary_iri);
        let kept: HashSet<Term> = self.model.instances_of(skos::CONCEPT).into_iter().collect();
        let top_concepts = roots.iter().filter(|root| kept.contains(*root)).count();
        let linked = self.model.link_concepts_to(&glossary);
        tracing::debug!(%glossary, linked, "linked concepts to glossary");

        let inserted = tx.insert_all(vocabulary_iri, self.model.iter());
        tracing::debug!(graph = %vocabulary_iri, inserted, "importing vocabulary into context");
        tx.commit().map_err(|source| ImportError::Commit { source })?;

        Ok(ImportOutcome {
            vocabulary,
            skipped,
            blank_concepts,
            removed_terms: existing_terms.len(),
            top_concepts,
            inserted,
        })
    }

    fn parse<R, I>(&mut self, format: RdfFormat, inputs: I) -> ImportResult<()>
    where
        R: Read,
        I: IntoIterator<Item = R>,
    {
        let mut streams = 0;
        for input in inputs {
            streams += 1;
            let parser = RdfParser::from_format(format).rename_blank_nodes();
            for quad in parser.for_reader(input) {
                let quad = quad.map_err(|e| ImportError::Parse {
                    message: format!("input #{streams}: {e}"),
                })?;
                self.model
                    .add(Triple::new(quad.subject, quad.predicate, quad.object));
            }
        }
        if streams == 0 {
            return Err(ImportError::InvalidInput {
                message: "no input provided for importing vocabulary".into(),
            });
        }
        tracing::debug!(streams, statements = self.model.len(), "parsed import data");
        Ok(())
    }

    fn resolve_glossary(&self) -> ImportResult<NamedNode> {
        let mut schemes = self.model.instances_of(skos::CONCEPT_SCHEME);
        if schemes.len() != 1 {
            return Err(ImportError::InvalidInput {
                message: format!(
                    "expected exactly one skos:ConceptScheme in the provided data, found {}",
                    schemes.len()
                ),
            });
        }
        match schemes.remove(0) {
            Term::NamedNode(glossary) => Ok(glossary),
            _ => Err(ImportError::InvalidInput {
                message: "blank node skos:ConceptScheme is not supported".into(),
            }),
        }
    }

    /// Glossary title in the configured language; untagged titles also match.
    fn glossary_title(&self, glossary: &NamedNode) -> Option<String> {
        let language = &self.config.language;
        self.model
            .literal_values(glossary, dcterms::TITLE)
            .into_iter()
            .find(|title| {
                title
                    .language()
                    .is_none_or(|tag| tag.eq_ignore_ascii_case(language))
            })
            .map(|title| title.value().to_string())
    }

    /// Remove concepts outside the vocabulary's term namespace and blank-node
    /// concepts, with every statement mentioning them. Returns the foreign IRIs
    /// and the number of blank-node concepts.
    fn strip_foreign_concepts(&mut self, vocabulary: &NamedNode) -> (Vec<NamedNode>, usize) {
        let namespace = build_namespace(
            vocabulary.as_str(),
            &[self.config.term_namespace_separator.as_str()],
        );
        let mut skipped = Vec::new();
        let mut blank = 0;
        for concept in self.model.instances_of(skos::CONCEPT) {
            match &concept {
                Term::NamedNode(iri) => {
                    if extract_identifier_namespace(iri.as_str()) == Some(namespace.as_str()) {
                        continue;
                    }
                    let removed = self.model.remove_mentions(&concept);
                    tracing::warn!(concept = %iri, %namespace, removed, "cannot import concept outside vocabulary namespace");
                    skipped.push(iri.clone());
                }
                _ => {
                    let removed = self.model.remove_mentions(&concept);
                    tracing::warn!(%concept, removed, "cannot import blank node concept");
                    blank += 1;
                }
            }
        }
        (skipped, blank)
    }
}

/// RDF format for a media type such as `text/turtle; charset=utf-8`.
pub fn parse_media_type(media_type: &str) -> ImportResult<RdfFormat> {
    let essence = media_type.split(';').next().unwrap_or_default().trim();
    RdfFormat::from_media_type(essence).ok_or_else(|| ImportError::UnsupportedMediaType {
        media_type: media_type.into(),
    })
}
