//! Application state wiring all services together.
//!
//! AppState holds the concrete adapters used by every CLI command. The chat
//! store and preference service are generic over their ports; AppState pins
//! them to the SQLite cache, the HTTP backend, and the command-line speech
//! backends.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use parlor_core::chat::store::ChatStore;
use parlor_core::chat::view::ChatView;
use parlor_core::preferences::PreferenceService;
use parlor_core::speech::player::SpeechPlayer;
use parlor_infra::config::load_client_config;
use parlor_infra::filesystem::{ensure_data_dir, resolve_data_dir};
use parlor_infra::http::client::HttpChatBackend;
use parlor_infra::speech::command::CommandSynthesizer;
use parlor_infra::speech::recognizer::CommandRecognizer;
use parlor_infra::sqlite::cache::SqliteCache;
use parlor_infra::sqlite::pool::{DatabasePool, database_url};
use parlor_types::config::ClientConfig;
use parlor_types::preferences::ModelSelector;
use tracing::debug;

/// Chat store pinned to the infra adapters, generic over the view.
pub type ConcreteChatStore<V> = ChatStore<HttpChatBackend, SqliteCache, V, CommandSynthesizer>;

/// Shared application state holding all services.
pub struct AppState {
    pub data_dir: PathBuf,
    pub config: ClientConfig,
    pub cache: SqliteCache,
    pub backend: HttpChatBackend,
    pub synthesizer: Arc<CommandSynthesizer>,
    pub recognizer: CommandRecognizer,
    pub preferences: PreferenceService<SqliteCache>,
}

impl AppState {
    /// Initialize the application state: load config, open the cache
    /// database, and build the adapters.
    ///
    /// `server_override` (from `--server`) wins over the config file and
    /// the environment.
    pub async fn init(server_override: Option<String>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        ensure_data_dir(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let mut config = load_client_config(&data_dir).await;
        if let Some(server) = server_override {
            config.server_url = server;
        }

        let db_url = format!("{}?mode=rwc", database_url(&data_dir));
        let db_pool = DatabasePool::new(&db_url)
            .await
            .context("failed to open the cache database")?;
        let cache = SqliteCache::new(db_pool);

        let backend = HttpChatBackend::new(config.server_url.clone())
            .with_context(|| format!("invalid server URL '{}'", config.server_url))?;

        let synthesizer = Arc::new(CommandSynthesizer::from_config(&config.speech));
        let recognizer = CommandRecognizer::new(config.recognition.clone());
        let preferences = PreferenceService::new(cache.clone());

        debug!(
            data_dir = %data_dir.display(),
            server = %config.server_url,
            "application state initialized"
        );

        Ok(Self {
            data_dir,
            config,
            cache,
            backend,
            synthesizer,
            recognizer,
            preferences,
        })
    }

    /// Build a chat store rendering into `view`.
    ///
    /// `speak` and `model` override the configured defaults when given.
    pub fn chat_store<V: ChatView>(
        &self,
        view: V,
        speak: bool,
        model: Option<ModelSelector>,
    ) -> ConcreteChatStore<V> {
        let player = SpeechPlayer::with_max_chunk_len(
            Arc::clone(&self.synthesizer),
            self.config.speech.max_chunk_len,
        );
        player.set_enabled(speak || self.config.speech.enabled);

        let mut store = ChatStore::new(self.backend.clone(), self.cache.clone(), view, player);
        store.set_model(model.unwrap_or(self.config.default_model));
        store
    }

    /// Enumerate synthesizer voices in the background.
    pub fn spawn_voice_discovery(&self) {
        let synthesizer = Arc::clone(&self.synthesizer);
        tokio::spawn(async move {
            match synthesizer.load_voices().await {
                Ok(count) => debug!(count, "speech voices loaded"),
                Err(e) => debug!(error = %e, "speech voices unavailable"),
            }
        });
    }
}
