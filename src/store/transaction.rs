//! Write transactions over [`GraphStore`].
//!
//! A transaction is a local, ordered write set. `commit` renders it into a single
//! SPARQL update request, which oxigraph applies atomically: either every staged
//! operation becomes visible or none does. Dropping an uncommitted transaction
//! discards it.

use oxigraph::model::{NamedNode, NamedNodeRef, Triple};

use crate::error::StoreResult;

use super::GraphStore;

/// An uncommitted set of graph mutations.
#[must_use = "a transaction does nothing until it is committed"]
pub struct StoreTransaction<'a> {
    store: &'a GraphStore,
    operations: Vec<String>,
    inserted: usize,
}

impl<'a> StoreTransaction<'a> {
    pub(super) fn new(store: &'a GraphStore) -> Self {
        Self {
            store,
            operations: Vec::new(),
            inserted: 0,
        }
    }

    /// Stage one statement for insertion into `graph`.
    pub fn insert(&mut self, graph: &NamedNode, triple: &Triple) {
        self.insert_all(graph, std::iter::once(triple));
    }

    /// Stage statements for insertion into `graph`. Returns how many were staged.
    pub fn insert_all<'t>(
        &mut self,
        graph: &NamedNode,
        triples: impl IntoIterator<Item = &'t Triple>,
    ) -> usize {
        let mut body = String::new();
        let mut count = 0;
        for triple in triples {
            body.push_str(&format!("    {triple} .\n"));
            count += 1;
        }
        if count > 0 {
            self.operations
                .push(format!("INSERT DATA {{\n  GRAPH {graph} {{\n{body}  }}\n}}"));
            self.inserted += count;
        }
        count
    }

    /// Stage removal of every `subject predicate ?value` statement in `graph`.
    pub fn delete_values(&mut self, graph: &NamedNode, subject: &NamedNode, predicate: NamedNodeRef<'_>) {
        self.operations.push(format!(
            "DELETE WHERE {{ GRAPH {graph} {{ {subject} {predicate} ?value }} }}"
        ));
    }

    /// Stage removal of every statement in `graph` that mentions `resource` as subject or object.
    pub fn delete_resource(&mut self, graph: &NamedNode, resource: &NamedNode) {
        self.operations.push(format!(
            "DELETE WHERE {{ GRAPH {graph} {{ {resource} ?p ?o }} }}"
        ));
        self.operations.push(format!(
            "DELETE WHERE {{ GRAPH {graph} {{ ?s ?p {resource} }} }}"
        ));
    }

    /// Number of statements staged for insertion.
    pub fn inserted(&self) -> usize {
        self.inserted
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Apply every staged operation as one atomic update.
    pub fn commit(self) -> StoreResult<()> {
        if self.operations.is_empty() {
            return Ok(());
        }
        tracing::debug!(
            operations = self.operations.len(),
            inserted = self.inserted,
            "committing transaction"
        );
        self.store.apply_update(&self.operations.join(" ;\n"))
    }
}

impl std::fmt::Debug for StoreTransaction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreTransaction")
            .field("operations", &self.operations.len())
            .field("inserted", &self.inserted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use oxigraph::model::Literal;

    use super::*;
    use crate::ontology::{rdf, skos};

    fn iri(s: &str) -> NamedNode {
        NamedNode::new(s).unwrap()
    }

    #[test]
    fn delete_values_only_touches_given_predicate() {
        let store = GraphStore::in_memory().unwrap();
        let graph = iri("http://x/g");
        let a = iri("http://x/a");

        let mut tx = store.begin();
        tx.insert(&graph, &Triple::new(a.clone(), rdf::TYPE, skos::CONCEPT.into_owned()));
        tx.insert(&graph, &Triple::new(a.clone(), skos::PREF_LABEL, Literal::new_simple_literal("A")));
        tx.commit().unwrap();

        let mut tx = store.begin();
        tx.delete_values(&graph, &a, skos::PREF_LABEL);
        tx.commit().unwrap();

        assert_eq!(store.graph_len(&graph).unwrap(), 1);
        assert!(store.contains(&graph, &a, rdf::TYPE, skos::CONCEPT).unwrap());
    }

    #[test]
    fn delete_resource_removes_incoming_and_outgoing() {
        let store = GraphStore::in_memory().unwrap();
        let graph = iri("http://x/g");
        let other = iri("http://x/other");
        let a = iri("http://x/a");
        let b = iri("http://x/b");

        let mut tx = store.begin();
        tx.insert(&graph, &Triple::new(a.clone(), skos::BROADER, b.clone()));
        tx.insert(&graph, &Triple::new(b.clone(), skos::NARROWER, a.clone()));
        tx.insert(&graph, &Triple::new(b.clone(), rdf::TYPE, skos::CONCEPT.into_owned()));
        tx.insert(&other, &Triple::new(a.clone(), rdf::TYPE, skos::CONCEPT.into_owned()));
        tx.commit().unwrap();

        let mut tx = store.begin();
        tx.delete_resource(&graph, &a);
        tx.commit().unwrap();

        assert_eq!(store.graph_len(&graph).unwrap(), 1);
        assert_eq!(store.graph_len(&other).unwrap(), 1);
    }

    #[test]
    fn deletes_and_inserts_apply_in_staged_order() {
        let store = GraphStore::in_memory().unwrap();
        let graph = iri("http://x/g");
        let a = iri("http://x/a");

        let mut tx = store.begin();
        tx.insert(&graph, &Triple::new(a.clone(), skos::PREF_LABEL, Literal::new_simple_literal("old")));
        tx.commit().unwrap();

        let mut tx = store.begin();
        tx.delete_resource(&graph, &a);
        tx.insert(&graph, &Triple::new(a.clone(), skos::PREF_LABEL, Literal::new_simple_literal("new")));
        assert_eq!(tx.inserted(), 1);
        tx.commit().unwrap();

        let rows = store
            .select("SELECT ?l WHERE { GRAPH <http://x/g> { <http://x/a> ?p ?l } }")
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(super::super::solution_literal(&rows[0], "l").unwrap().value(), "new");
    }

    #[test]
    fn empty_commit_is_a_no_op() {
        let store = GraphStore::in_memory().unwrap();
        let tx = store.begin();
        assert!(tx.is_empty());
        tx.commit().unwrap();
        assert!(store.is_empty().unwrap());
    }
}
