/// Integration tests for the symbol source registry
use scriptpad_completion::{
    python_providers, CachedSymbolProvider, CompletionError, CompletionResult, ConfigFormat,
    ConfigLoader, EngineConfig, HostApiProvider, HostMember, SourceCategory, StaticHost, Symbol,
    SymbolCache, SymbolKind, SymbolProvider, SymbolRegistry,
};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

struct FailingProvider;

impl SymbolProvider for FailingProvider {
    fn name(&self) -> &str {
        "broken_host"
    }

    fn category(&self) -> SourceCategory {
        SourceCategory::HostApi
    }

    fn collect(&self) -> CompletionResult<Vec<Symbol>> {
        Err(CompletionError::ProviderError("reflection failed".to_string()))
    }
}

/// Provider that blocks while serving the name "stale" until released
struct GatedProvider {
    current: Mutex<String>,
    started: Mutex<Sender<()>>,
    gate: Mutex<Receiver<()>>,
}

impl SymbolProvider for GatedProvider {
    fn name(&self) -> &str {
        "gated"
    }

    fn category(&self) -> SourceCategory {
        SourceCategory::HostApi
    }

    fn collect(&self) -> CompletionResult<Vec<Symbol>> {
        let name = self.current.lock().unwrap().clone();
        if name == "stale" {
            self.started.lock().unwrap().send(()).unwrap();
            self.gate.lock().unwrap().recv().unwrap();
        }
        Ok(vec![Symbol::new(name, SymbolKind::HostObject)])
    }
}

fn gated_provider() -> (Arc<GatedProvider>, Receiver<()>, Sender<()>) {
    let (started_tx, started_rx) = channel();
    let (gate_tx, gate_rx) = channel();
    let provider = Arc::new(GatedProvider {
        current: Mutex::new("stale".to_string()),
        started: Mutex::new(started_tx),
        gate: Mutex::new(gate_rx),
    });
    (provider, started_rx, gate_tx)
}

fn gated_registry(provider: &Arc<GatedProvider>) -> Arc<SymbolRegistry> {
    Arc::new(SymbolRegistry::with_providers(
        vec![provider.clone() as Arc<dyn SymbolProvider>],
        &EngineConfig::default(),
    ))
}

fn python_registry(config: &EngineConfig) -> SymbolRegistry {
    SymbolRegistry::with_providers(python_providers(), config)
}

#[test]
fn test_collect_is_idempotent() {
    let registry = python_registry(&EngineConfig::default());
    let first = registry.collect_symbols();
    let second = registry.collect_symbols();
    let refreshed = registry.refresh();

    assert_eq!(first, second);
    assert_eq!(first, refreshed);
    assert!(first.contains("print"));
    assert!(first.contains("ValueError"));
    assert!(first.contains("__init__"));
    assert!(first.contains("staticmethod"));
}

#[test]
fn test_provider_failure_is_isolated() {
    let mut registry = python_registry(&EngineConfig::default());
    registry.register(Arc::new(FailingProvider));

    let snapshot = registry.collect_symbols();
    assert!(snapshot.contains("len"));
    assert!(snapshot.contains("lambda"));
}

#[test]
fn test_host_wins_name_collisions() {
    let host = StaticHost::new(vec![HostMember::callable("open", &["path"])]);
    let mut registry = python_registry(&EngineConfig::default());
    registry.register(Arc::new(HostApiProvider::new(Arc::new(host))));

    let snapshot = registry.collect_symbols();
    let open = snapshot.get("open").unwrap();
    assert_eq!(open.kind, SymbolKind::HostFunction);
    assert_eq!(open.signature_hint.as_deref(), Some("(path)"));
    assert_eq!(snapshot.position("open"), Some(0));
}

#[test]
fn test_configured_order_changes_winner() {
    let config = ConfigLoader::load_from_string(
        "provider_order: [keywords, builtins, host_api]\n",
        ConfigFormat::Yaml,
    )
    .unwrap();
    let host = StaticHost::new(vec![HostMember::value("print", None)]);
    let mut registry = python_registry(&config);
    registry.register(Arc::new(HostApiProvider::new(Arc::new(host))));

    let snapshot = registry.collect_symbols();
    assert_eq!(snapshot.get("print").unwrap().kind, SymbolKind::BuiltinFunction);
    assert_eq!(snapshot.symbols()[0].kind, SymbolKind::Keyword);
}

#[test]
fn test_side_cache_serves_host_symbols() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("host_symbols.json");
    SymbolCache::save(
        &path,
        &[
            Symbol::new("createNode", SymbolKind::HostFunction).with_signature("(node)"),
            Symbol::new("root", SymbolKind::HostObject),
        ],
    )
    .unwrap();

    let mut registry = python_registry(&EngineConfig::default());
    registry.register(Arc::new(CachedSymbolProvider::new(&path)));

    let snapshot = registry.collect_symbols();
    assert_eq!(snapshot.get("createNode").unwrap().kind, SymbolKind::HostFunction);
    assert!(snapshot.contains("root"));
}

#[test]
fn test_corrupt_side_cache_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("host_symbols.json");
    std::fs::write(&path, "[{\"name\": 1").unwrap();

    let mut registry = python_registry(&EngineConfig::default());
    registry.register(Arc::new(CachedSymbolProvider::new(&path)));
    assert!(registry.collect_symbols().contains("print"));
}

#[tokio::test]
async fn test_background_refresh_publishes() {
    let registry = Arc::new(python_registry(&EngineConfig::default()));
    assert!(!registry.is_ready());
    assert!(registry.snapshot().is_empty());

    assert!(registry.spawn_refresh().await.unwrap());
    assert!(registry.is_ready());
    assert!(registry.snapshot().contains("print"));
}

#[tokio::test]
async fn test_superseded_refresh_is_discarded() {
    let (provider, started_rx, gate_tx) = gated_provider();
    let registry = gated_registry(&provider);

    let stale = registry.spawn_refresh();
    started_rx.recv().unwrap();

    *provider.current.lock().unwrap() = "fresh".to_string();
    registry.refresh();

    gate_tx.send(()).unwrap();
    assert!(!stale.await.unwrap());

    let snapshot = registry.snapshot();
    assert!(snapshot.contains("fresh"));
    assert!(!snapshot.contains("stale"));
}

#[tokio::test]
async fn test_superseded_refresh_returns_published_snapshot() {
    let (provider, started_rx, gate_tx) = gated_provider();
    let registry = gated_registry(&provider);

    let blocked = {
        let registry = Arc::clone(&registry);
        std::thread::spawn(move || registry.refresh())
    };
    started_rx.recv().unwrap();

    *provider.current.lock().unwrap() = "fresh".to_string();
    assert!(registry.spawn_refresh().await.unwrap());

    gate_tx.send(()).unwrap();
    let returned = blocked.join().unwrap();
    assert!(returned.contains("fresh"));
    assert!(!returned.contains("stale"));
    assert_eq!(returned, registry.snapshot());
}
