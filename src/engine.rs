//! Engine facade: top-level API for a lexigraph repository.
//!
//! The `Engine` owns the store and wires the workspace provider, the context
//! resolvers and search together from one [`LexConfig`].

use std::io::Read;
use std::sync::Arc;

use oxigraph::io::RdfFormat;
use oxigraph::model::NamedNode;

use crate::config::LexConfig;
use crate::context::{CanonicalCacheFilter, ChangeTrackingContextResolver, ContextResolver};
use crate::error::LexResult;
use crate::import::identifier::generate_term_identifier;
use crate::import::{ImportOutcome, SkosImporter};
use crate::search::{SearchDao, SearchService};
use crate::store::{GraphStore, parse_iri};
use crate::workspace::{InMemoryWorkspaceProvider, WorkspaceMetadata, WorkspaceMetadataProvider};

/// A thesaurus repository over one graph store.
pub struct Engine {
    config: LexConfig,
    store: Arc<GraphStore>,
    workspaces: Arc<InMemoryWorkspaceProvider>,
    resolver: ContextResolver,
    change_tracking: ChangeTrackingContextResolver,
    search: SearchService,
}

impl Engine {
    /// Open the store named by `config.data_dir`, or an in-memory one.
    pub fn new(config: LexConfig) -> LexResult<Self> {
        let container = parse_iri(config.canonical_cache_container.clone())?;
        let store = match &config.data_dir {
            Some(dir) => GraphStore::open(&dir.join("oxigraph"))?,
            None => GraphStore::in_memory()?,
        };
        tracing::info!(
            persistent = config.data_dir.is_some(),
            language = %config.language,
            canonical_container = %container,
            "initializing lexigraph engine"
        );

        let store = Arc::new(store);
        let workspaces = Arc::new(InMemoryWorkspaceProvider::new());
        let provider: Arc<dyn WorkspaceMetadataProvider> = workspaces.clone();
        let resolver = ContextResolver::new(
            Arc::clone(&provider),
            CanonicalCacheFilter::new(Arc::clone(&store), container),
        );
        let change_tracking = ChangeTrackingContextResolver::new(
            Arc::clone(&store),
            provider,
            config.change_tracking_context_extension.clone(),
        );
        let search = SearchService::new(
            SearchDao::new(Arc::clone(&store), config.language.clone()),
            resolver.clone(),
        );

        Ok(Self {
            config,
            store,
            workspaces,
            resolver,
            change_tracking,
            search,
        })
    }

    /// Load a workspace's metadata from the store and make it current.
    pub fn open_workspace(&self, workspace: &NamedNode) -> LexResult<Arc<WorkspaceMetadata>> {
        let metadata = self.workspaces.load_from_store(&self.store, workspace)?;
        self.workspaces.select(workspace)?;
        Ok(metadata)
    }

    /// Import a SKOS glossary into `vocabulary` with a fresh importer session.
    pub fn import_vocabulary<R: Read>(
        &self,
        vocabulary: &NamedNode,
        media_type: &str,
        inputs: impl IntoIterator<Item = R>,
    ) -> LexResult<ImportOutcome> {
        let mut importer = self.importer();
        Ok(importer.import_vocabulary(vocabulary, media_type, inputs)?)
    }

    /// Bulk-load an RDF dataset, keeping its graph names.
    pub fn load_dataset(&self, format: RdfFormat, reader: impl Read) -> LexResult<usize> {
        Ok(self.store.load_dataset(format, reader)?)
    }

    /// Fresh term IRI for `label` in the term namespace of `vocabulary`.
    pub fn mint_term_identifier(&self, vocabulary: &NamedNode, label: &str) -> LexResult<NamedNode> {
        let iri = generate_term_identifier(
            vocabulary.as_str(),
            &self.config.term_namespace_separator,
            label,
        );
        Ok(parse_iri(iri)?)
    }

    /// A new single-use importer session.
    pub fn importer(&self) -> SkosImporter<'_> {
        SkosImporter::new(&self.store, &self.resolver, &self.config)
    }

    pub fn config(&self) -> &LexConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<GraphStore> {
        &self.store
    }

    pub fn workspaces(&self) -> &Arc<InMemoryWorkspaceProvider> {
        &self.workspaces
    }

    pub fn resolver(&self) -> &ContextResolver {
        &self.resolver
    }

    pub fn change_tracking(&self) -> &ChangeTrackingContextResolver {
        &self.change_tracking
    }

    pub fn search(&self) -> &SearchService {
        &self.search
    }

    /// Summary of the repository state.
    pub fn info(&self) -> LexResult<EngineInfo> {
        let current_workspace = self.workspaces.current_workspace().ok();
        let canonical_contexts = self.resolver.canonical().canonical_contexts()?.len();
        Ok(EngineInfo {
            quad_count: self.store.len()?,
            canonical_contexts,
            current_workspace: current_workspace.map(|w| w.uri.as_str().to_string()),
            persistent: self.config.data_dir.is_some(),
        })
    }
}

/// Summary information about the repository.
#[derive(Debug, Clone)]
pub struct EngineInfo {
    pub quad_count: usize,
    pub canonical_contexts: usize,
    pub current_workspace: Option<String>,
    pub persistent: bool,
}

impl std::fmt::Display for EngineInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "lexigraph repository info")?;
        writeln!(f, "  quads:              {}", self.quad_count)?;
        writeln!(f, "  canonical contexts: {}", self.canonical_contexts)?;
        writeln!(
            f,
            "  current workspace:  {}",
            self.current_workspace.as_deref().unwrap_or("(none)")
        )?;
        writeln!(f, "  persistent:         {}", self.persistent)?;
        Ok(())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("workspaces", &self.workspaces)
            .field("resolver", &self.resolver)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextError;
    use crate::error::LexError;

    #[test]
    fn in_memory_engine_starts_empty() {
        let engine = Engine::new(LexConfig::default()).unwrap();
        let info = engine.info().unwrap();
        assert_eq!(info.quad_count, 0);
        assert!(info.current_workspace.is_none());
        assert!(!info.persistent);
    }

    #[test]
    fn invalid_container_iri_is_rejected() {
        let config = LexConfig {
            canonical_cache_container: "not an iri".into(),
            ..LexConfig::default()
        };
        assert!(Engine::new(config).is_err());
    }

    #[test]
    fn minted_terms_use_the_configured_separator() {
        let engine = Engine::new(LexConfig {
            term_namespace_separator: "/pojem".into(),
            ..LexConfig::default()
        })
        .unwrap();
        let term = engine
            .mint_term_identifier(&NamedNode::new("http://x/voc1").unwrap(), "Stavební objekt")
            .unwrap();
        assert_eq!(term.as_str(), "http://x/voc1/pojem/stavebni-objekt");
    }

    #[test]
    fn opening_unknown_workspace_fails() {
        let engine = Engine::new(LexConfig::default()).unwrap();
        let err = engine
            .open_workspace(&NamedNode::new("http://x/ws").unwrap())
            .unwrap_err();
        assert!(matches!(err, LexError::Context(ContextError::WorkspaceNotFound { .. })));
    }
}
