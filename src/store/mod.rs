//! Named-graph RDF store backed by oxigraph.
//!
//! [`GraphStore`] is the only component that talks to oxigraph directly. Reads go
//! through [`GraphStore::select`] / [`GraphStore::ask`] with queries rendered from
//! a [`SparqlQuery`] template; writes are staged in a [`StoreTransaction`] and
//! applied atomically on commit.

pub mod query;
pub mod transaction;

use std::io::Read;
use std::path::Path;

use oxigraph::io::RdfFormat;
use oxigraph::model::{GraphNameRef, Literal, NamedNode, NamedNodeRef, QuadRef, Term, TermRef};
use oxigraph::sparql::{QueryResults, QuerySolution};
use oxigraph::store::Store;

use crate::error::{StoreError, StoreResult};

pub use query::{SparqlQuery, iri_list};
pub use transaction::StoreTransaction;

/// SPARQL-capable quad store partitioned into named graphs (contexts).
pub struct GraphStore {
    store: Store,
}

impl GraphStore {
    /// Create a new in-memory store (no persistence).
    pub fn in_memory() -> StoreResult<Self> {
        let store = Store::new().map_err(|e| StoreError::Open {
            path: "<memory>".into(),
            message: e.to_string(),
        })?;
        Ok(Self { store })
    }

    /// Open or create a persistent store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(path).map_err(|e| StoreError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let store = Store::open(path).map_err(|e| StoreError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::info!(path = %path.display(), "opened graph store");
        Ok(Self { store })
    }

    /// Execute a SPARQL SELECT query and collect its solutions.
    pub fn select(&self, sparql: &str) -> StoreResult<Vec<QuerySolution>> {
        tracing::trace!(query = sparql, "executing SELECT");
        let results = self.store.query(sparql).map_err(|e| StoreError::Query {
            message: e.to_string(),
        })?;

        match results {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();
                for solution in solutions {
                    rows.push(solution.map_err(|e| StoreError::Query {
                        message: format!("solution error: {e}"),
                    })?);
                }
                Ok(rows)
            }
            QueryResults::Boolean(_) => Err(StoreError::ResultShape {
                message: "ASK query passed to select".into(),
            }),
            QueryResults::Graph(_) => Err(StoreError::ResultShape {
                message: "CONSTRUCT/DESCRIBE queries are not supported".into(),
            }),
        }
    }

    /// Execute a SPARQL ASK query.
    pub fn ask(&self, sparql: &str) -> StoreResult<bool> {
        tracing::trace!(query = sparql, "executing ASK");
        let results = self.store.query(sparql).map_err(|e| StoreError::Query {
            message: e.to_string(),
        })?;
        match results {
            QueryResults::Boolean(b) => Ok(b),
            _ => Err(StoreError::ResultShape {
                message: "expected boolean result from ASK query".into(),
            }),
        }
    }

    /// Start a write transaction. Nothing is applied until [`StoreTransaction::commit`].
    pub fn begin(&self) -> StoreTransaction<'_> {
        StoreTransaction::new(self)
    }

    /// Run a SPARQL update request. Oxigraph applies one request atomically.
    pub(crate) fn apply_update(&self, update: &str) -> StoreResult<()> {
        self.store.update(update).map_err(|e| StoreError::Update {
            message: e.to_string(),
        })
    }

    /// Bulk-load an RDF document. Quads keep their graph names; triples land in
    /// the default graph, which no repository query reads.
    pub fn load_dataset(&self, format: RdfFormat, reader: impl Read) -> StoreResult<usize> {
        let before = self.len()?;
        self.store
            .load_from_reader(format, reader)
            .map_err(|e| StoreError::Load {
                message: e.to_string(),
            })?;
        let loaded = self.len()?.saturating_sub(before);
        tracing::info!(format = format.name(), loaded, "loaded dataset");
        Ok(loaded)
    }

    /// Total number of quads across all graphs.
    pub fn len(&self) -> StoreResult<usize> {
        self.store.len().map_err(|e| StoreError::Query {
            message: format!("failed to count quads: {e}"),
        })
    }

    /// Whether the store holds no quads at all.
    pub fn is_empty(&self) -> StoreResult<bool> {
        self.len().map(|n| n == 0)
    }

    /// Number of quads in one named graph.
    pub fn graph_len(&self, graph: &NamedNode) -> StoreResult<usize> {
        let mut count = 0;
        for quad in
            self.store
                .quads_for_pattern(None, None, None, Some(GraphNameRef::NamedNode(graph.as_ref())))
        {
            quad.map_err(|e| StoreError::Query {
                message: format!("failed to scan graph {graph}: {e}"),
            })?;
            count += 1;
        }
        Ok(count)
    }

    /// Whether `graph` contains the statement `subject predicate object`.
    pub fn contains<'a>(
        &self,
        graph: &NamedNode,
        subject: &NamedNode,
        predicate: NamedNodeRef<'_>,
        object: impl Into<TermRef<'a>>,
    ) -> StoreResult<bool> {
        let quad = QuadRef::new(
            subject.as_ref(),
            predicate,
            object.into(),
            GraphNameRef::NamedNode(graph.as_ref()),
        );
        self.store.contains(quad).map_err(|e| StoreError::Query {
            message: format!("contains check failed: {e}"),
        })
    }
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore").finish()
    }
}

/// Parse an IRI, reporting failures as [`StoreError::InvalidIri`].
pub fn parse_iri(iri: impl Into<String>) -> StoreResult<NamedNode> {
    let iri = iri.into();
    NamedNode::new(iri.clone()).map_err(|e| StoreError::InvalidIri {
        iri,
        message: e.to_string(),
    })
}

/// IRI bound to `var` in a solution, if it is one.
pub fn solution_iri(solution: &QuerySolution, var: &str) -> Option<NamedNode> {
    match solution.get(var)? {
        Term::NamedNode(node) => Some(node.clone()),
        _ => None,
    }
}

/// Literal bound to `var` in a solution, if it is one.
pub fn solution_literal(solution: &QuerySolution, var: &str) -> Option<Literal> {
    match solution.get(var)? {
        Term::Literal(literal) => Some(literal.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use oxigraph::model::Triple;

    use super::*;
    use crate::ontology::{rdf, skos};

    fn iri(s: &str) -> NamedNode {
        NamedNode::new(s).unwrap()
    }

    #[test]
    fn committed_transaction_is_visible() {
        let store = GraphStore::in_memory().unwrap();
        let graph = iri("http://x/g1");
        let concept = iri("http://x/voc1/a");

        let mut tx = store.begin();
        tx.insert(&graph, &Triple::new(concept.clone(), rdf::TYPE, skos::CONCEPT.into_owned()));
        tx.commit().unwrap();

        assert_eq!(store.graph_len(&graph).unwrap(), 1);
        assert!(store.contains(&graph, &concept, rdf::TYPE, skos::CONCEPT).unwrap());
    }

    #[test]
    fn dropped_transaction_applies_nothing() {
        let store = GraphStore::in_memory().unwrap();
        let graph = iri("http://x/g1");
        {
            let mut tx = store.begin();
            tx.insert(&graph, &Triple::new(iri("http://x/a"), rdf::TYPE, skos::CONCEPT.into_owned()));
        }
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn select_reads_named_graphs() {
        let store = GraphStore::in_memory().unwrap();
        let graph = iri("http://x/g1");
        let mut tx = store.begin();
        tx.insert(
            &graph,
            &Triple::new(
                iri("http://x/a"),
                skos::PREF_LABEL,
                Literal::new_language_tagged_literal_unchecked("Alpha", "en"),
            ),
        );
        tx.commit().unwrap();

        let query = SparqlQuery::new("SELECT ?s ?label WHERE { GRAPH ?g { ?s ?prefLabel ?label } }")
            .bind_iri("g", &graph)
            .bind_iri("prefLabel", skos::PREF_LABEL);
        let rows = store.select(&query.render()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(solution_iri(&rows[0], "s"), Some(iri("http://x/a")));
        assert_eq!(solution_literal(&rows[0], "label").unwrap().value(), "Alpha");
    }

    #[test]
    fn ask_query() {
        let store = GraphStore::in_memory().unwrap();
        let graph = iri("http://x/g1");
        let mut tx = store.begin();
        tx.insert(&graph, &Triple::new(iri("http://x/a"), rdf::TYPE, skos::CONCEPT.into_owned()));
        tx.commit().unwrap();

        assert!(store.ask("ASK { GRAPH <http://x/g1> { <http://x/a> ?p ?o } }").unwrap());
        assert!(!store.ask("ASK { GRAPH <http://x/g2> { <http://x/a> ?p ?o } }").unwrap());
    }

    #[test]
    fn select_rejects_ask_queries() {
        let store = GraphStore::in_memory().unwrap();
        let err = store.select("ASK { ?s ?p ?o }").unwrap_err();
        assert!(matches!(err, StoreError::ResultShape { .. }));
    }

    #[test]
    fn invalid_iri_is_reported() {
        let err = parse_iri("not an iri").unwrap_err();
        assert!(matches!(err, StoreError::InvalidIri { .. }));
    }

    #[test]
    fn load_dataset_keeps_graph_names() {
        let store = GraphStore::in_memory().unwrap();
        let trig = "<http://x/g1> { <http://x/a> a <http://www.w3.org/2004/02/skos/core#Concept> . }";
        let loaded = store.load_dataset(RdfFormat::TriG, trig.as_bytes()).unwrap();
        assert_eq!(loaded, 1);
        assert!(store.contains(&iri("http://x/g1"), &iri("http://x/a"), rdf::TYPE, skos::CONCEPT).unwrap());
    }

    #[test]
    fn malformed_dataset_is_rejected() {
        let store = GraphStore::in_memory().unwrap();
        let err = store.load_dataset(RdfFormat::TriG, "<http://x/g1> { broken".as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::Load { .. }));
    }

    #[test]
    fn persistent_store_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let graph = iri("http://x/g1");
        {
            let store = GraphStore::open(dir.path()).unwrap();
            let mut tx = store.begin();
            tx.insert(&graph, &Triple::new(iri("http://x/a"), rdf::TYPE, skos::CONCEPT.into_owned()));
            tx.commit().unwrap();
        }
        let store = GraphStore::open(dir.path()).unwrap();
        assert_eq!(store.graph_len(&graph).unwrap(), 1);
    }
}
