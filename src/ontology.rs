//! IRIs of the vocabularies the repository reads and writes.
//!
//! SKOS and DCTERMS terms come from their W3C/DCMI namespaces; the `lx:` terms
//! describe how vocabularies, workspaces and contexts relate to each other.

use oxigraph::model::NamedNodeRef;

pub use oxigraph::model::vocab::{rdf, rdfs};

/// Namespace of the repository model (`lx:`).
pub const LX_NS: &str = "https://lexigraph.dev/model/";

pub mod skos {
    use super::NamedNodeRef;

    pub const NS: &str = "http://www.w3.org/2004/02/skos/core#";

    pub const CONCEPT: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#Concept");
    pub const CONCEPT_SCHEME: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#ConceptScheme");
    pub const BROADER: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#broader");
    pub const NARROWER: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#narrower");
    pub const HAS_TOP_CONCEPT: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#hasTopConcept");
    pub const TOP_CONCEPT_OF: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#topConceptOf");
    pub const IN_SCHEME: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#inScheme");
    pub const PREF_LABEL: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#prefLabel");
    pub const ALT_LABEL: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#altLabel");
    pub const DEFINITION: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#definition");
}

pub mod dcterms {
    use super::NamedNodeRef;

    pub const TITLE: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/title");
}

pub mod lx {
    use super::NamedNodeRef;

    /// Class of vocabulary entities.
    pub const VOCABULARY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("https://lexigraph.dev/model/Vocabulary");
    /// Class of glossaries (also typed `skos:ConceptScheme`).
    pub const GLOSSARY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("https://lexigraph.dev/model/Glossary");
    /// `vocabulary lx:hasGlossary glossary`.
    pub const HAS_GLOSSARY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("https://lexigraph.dev/model/hasGlossary");
    /// `term lx:isTermOfVocabulary vocabulary`.
    pub const IS_TERM_OF_VOCABULARY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("https://lexigraph.dev/model/isTermOfVocabulary");
    /// `workingContext lx:hasChangeTrackingContext changeContext`, stated inside the working context.
    pub const HAS_CHANGE_TRACKING_CONTEXT: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("https://lexigraph.dev/model/hasChangeTrackingContext");
    /// `container lx:referencesContext context`; used by workspaces and the canonical cache.
    pub const REFERENCES_CONTEXT: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("https://lexigraph.dev/model/referencesContext");
    /// `workingContext lx:isWorkingVersionOf canonicalContext`.
    pub const IS_WORKING_VERSION_OF: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("https://lexigraph.dev/model/isWorkingVersionOf");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_terms_live_in_model_namespace() {
        for iri in [
            lx::VOCABULARY,
            lx::GLOSSARY,
            lx::HAS_GLOSSARY,
            lx::IS_TERM_OF_VOCABULARY,
            lx::HAS_CHANGE_TRACKING_CONTEXT,
            lx::REFERENCES_CONTEXT,
            lx::IS_WORKING_VERSION_OF,
        ] {
            assert!(iri.as_str().starts_with(LX_NS), "{iri}");
        }
    }

    #[test]
    fn skos_terms_live_in_skos_namespace() {
        for iri in [skos::CONCEPT, skos::BROADER, skos::NARROWER, skos::HAS_TOP_CONCEPT] {
            assert!(iri.as_str().starts_with(skos::NS), "{iri}");
        }
    }
}
