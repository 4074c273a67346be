//! Persistence tests for the lexigraph engine.
//!
//! These tests verify that imported vocabularies, change-tracking links and
//! configuration survive a restart (close + reopen cycle).

use oxigraph::io::RdfFormat;
use oxigraph::model::NamedNode;

use lexigraph::config::LexConfig;
use lexigraph::engine::Engine;
use lexigraph::model::{Asset, Vocabulary};

const SEED: &str = r#"
@prefix lx: <https://lexigraph.dev/model/> .
<http://example.org/ws> {
    <http://example.org/ws> lx:referencesContext <http://example.org/voc/plants> .
}
<http://example.org/voc/plants> {
    <http://example.org/voc/plants> a lx:Vocabulary .
}
"#;

const GLOSSARY: &str = r#"
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
<http://example.org/voc/plants/glossary> a skos:ConceptScheme .
<http://example.org/voc/plants/term/fern> a skos:Concept ;
    skos:prefLabel "Fern"@en ;
    skos:inScheme <http://example.org/voc/plants/glossary> .
"#;

fn iri(s: &str) -> NamedNode {
    NamedNode::new(s).unwrap()
}

fn persistent_engine(dir: &std::path::Path) -> Engine {
    Engine::new(LexConfig {
        data_dir: Some(dir.to_path_buf()),
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn imported_terms_survive_restart() {
    let dir = tempfile::TempDir::new().unwrap();
    let plants = iri("http://example.org/voc/plants");

    // First session: seed, import and register a change-tracking context.
    {
        let engine = persistent_engine(dir.path());
        engine.load_dataset(RdfFormat::TriG, SEED.as_bytes()).unwrap();
        engine.open_workspace(&iri("http://example.org/ws")).unwrap();
        engine
            .import_vocabulary(&plants, "text/turtle", [GLOSSARY.as_bytes()])
            .unwrap();
        engine
            .change_tracking()
            .register(&plants, &iri("http://example.org/audit/plants"))
            .unwrap();
    }

    // Second session: reopen and verify.
    {
        let engine = persistent_engine(dir.path());
        assert!(engine.info().unwrap().persistent);
        let metadata = engine.open_workspace(&iri("http://example.org/ws")).unwrap();
        assert_eq!(
            metadata.vocabulary_info(&plants).unwrap().change_tracking_context,
            Some(iri("http://example.org/audit/plants"))
        );

        let results = engine.search().full_text_search("fern").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].uri, iri("http://example.org/voc/plants/term/fern"));

        let asset = Asset::from(Vocabulary::new(plants.clone(), plants.clone()));
        assert_eq!(
            engine
                .change_tracking()
                .resolve_change_tracking_context(&asset)
                .unwrap(),
            iri("http://example.org/audit/plants")
        );
    }
}

#[test]
fn config_round_trip() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nested").join("lexigraph.toml");

    let config = LexConfig {
        language: "de".into(),
        term_namespace_separator: "/begriff".into(),
        data_dir: Some(dir.path().join("data")),
        ..Default::default()
    };
    config.save(&path).unwrap();

    let loaded = LexConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn partial_config_uses_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("lexigraph.toml");
    std::fs::write(&path, "language = \"cs\"\n").unwrap();

    let loaded = LexConfig::load(&path).unwrap();
    assert_eq!(loaded.language, "cs");
    assert_eq!(loaded.change_tracking_context_extension, "/changes");
    assert!(loaded.data_dir.is_none());
}
