use crate::config::AppConfig;
use crate::store::MemoryStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        Ok(Self::from_parts(Arc::new(MemoryStore::new()), Arc::new(config)))
    }

    pub fn from_parts(store: Arc<MemoryStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// Empty store with templates and static files resolved from the crate root.
    #[cfg(test)]
    pub fn fake() -> Self {
        let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            template_dir: root.join("resources/templates"),
            static_dir: root.join("resources/static"),
            seed_demo: false,
        });
        Self::from_parts(Arc::new(MemoryStore::new()), config)
    }
}
