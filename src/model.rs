//! Domain entities: vocabularies, terms and the assets that carry change history.

use oxigraph::model::NamedNode;

/// A vocabulary as stored in its working context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    pub uri: NamedNode,
    /// Graph the vocabulary entity is stored in.
    pub context: NamedNode,
    pub label: Option<String>,
    /// The `skos:ConceptScheme` holding the vocabulary's terms.
    pub glossary: Option<NamedNode>,
}

impl Vocabulary {
    pub fn new(uri: NamedNode, context: NamedNode) -> Self {
        Self {
            uri,
            context,
            label: None,
            glossary: None,
        }
    }

    pub fn with_glossary(mut self, glossary: NamedNode) -> Self {
        self.glossary = Some(glossary);
        self
    }
}

/// A thesaurus concept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub uri: NamedNode,
    pub label: Option<String>,
    /// Glossary the term is a member of, when known.
    pub glossary: Option<NamedNode>,
    /// Vocabulary the term belongs to, when known.
    pub vocabulary: Option<NamedNode>,
}

impl Term {
    pub fn new(uri: NamedNode) -> Self {
        Self {
            uri,
            label: None,
            glossary: None,
            vocabulary: None,
        }
    }

    pub fn with_glossary(mut self, glossary: NamedNode) -> Self {
        self.glossary = Some(glossary);
        self
    }

    pub fn with_vocabulary(mut self, vocabulary: NamedNode) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }
}

/// Anything whose changes are recorded in a change-tracking context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asset {
    Vocabulary(Vocabulary),
    Term(Term),
    /// Any other identified resource.
    Resource(NamedNode),
}

impl Asset {
    pub fn uri(&self) -> &NamedNode {
        match self {
            Asset::Vocabulary(v) => &v.uri,
            Asset::Term(t) => &t.uri,
            Asset::Resource(uri) => uri,
        }
    }
}

impl From<Vocabulary> for Asset {
    fn from(v: Vocabulary) -> Self {
        Asset::Vocabulary(v)
    }
}

impl From<Term> for Asset {
    fn from(t: Term) -> Self {
        Asset::Term(t)
    }
}

impl From<NamedNode> for Asset {
    fn from(uri: NamedNode) -> Self {
        Asset::Resource(uri)
    }
}
