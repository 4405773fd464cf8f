//! Per-run wiring: configuration, session store, credentials and gateway

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{Context, Result};
use it_auth::{Credentials, FileSessionStore, SessionStore};
use it_client::{HttpGateway, IssueListing, TrackerGateway};
use it_core::config::ClientConfig;
use it_core::ItError;
use it_queries::{FilterState, SortState};
use it_views::TextRenderer;

use crate::GlobalArgs;

pub struct AppContext {
    pub config: ClientConfig,
    pub store: FileSessionStore,
    pub credentials: Option<Credentials>,
    pub gateway: HttpGateway,
}

impl AppContext {
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let mut config =
            ClientConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
        apply_overrides(&mut config, args)?;

        let store = FileSessionStore::new(config.session.path.clone());
        let credentials = resolve_credentials(&config, &store)?;
        let gateway = HttpGateway::new(&config, credentials.clone())
            .context("Failed to build HTTP client")?;

        tracing::debug!(
            base_url = %gateway.base_url(),
            credentials = credentials.as_ref().map(|c| c.source.as_str()).unwrap_or("anonymous"),
            "Client ready"
        );

        Ok(Self {
            config,
            store,
            credentials,
            gateway,
        })
    }

    /// A listing over this run's gateway
    pub fn listing(&self, filters: FilterState, sort: SortState) -> IssueListing {
        let gateway: Arc<dyn TrackerGateway> = Arc::new(self.gateway.clone());
        IssueListing::with_state(gateway, filters, sort)
    }

    /// Colors only when configured and stdout is a terminal
    pub fn renderer(&self) -> TextRenderer {
        TextRenderer::new(self.config.display.color && std::io::stdout().is_terminal())
    }

    pub fn timestamp_format(&self) -> &str {
        &self.config.display.timestamp_format
    }
}

/// Credentials for this run
///
/// An unreadable session file is skipped with a warning so `login` and
/// `logout` can still replace or remove it.
fn resolve_credentials(
    config: &ClientConfig,
    store: &dyn SessionStore,
) -> Result<Option<Credentials>> {
    match it_auth::resolve(config.api.token.as_deref(), store) {
        Ok(credentials) => Ok(credentials),
        Err(ItError::Session(message)) => {
            tracing::warn!(error = %message, "Ignoring stored session, continuing anonymously");
            Ok(None)
        }
        Err(e) => Err(anyhow::Error::new(e).context("Failed to resolve credentials")),
    }
}

fn apply_overrides(config: &mut ClientConfig, args: &GlobalArgs) -> Result<()> {
    if let Some(url) = &args.api_url {
        config.api.base_url = url.clone();
        config.check().context("Invalid --api-url")?;
    }
    if args.no_color {
        config.display.color = false;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(api_url: Option<&str>, no_color: bool) -> GlobalArgs {
        GlobalArgs {
            config: None,
            api_url: api_url.map(str::to_string),
            log_level: "warn".to_string(),
            log_json: false,
            no_color,
        }
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = ClientConfig::default();
        apply_overrides(&mut config, &args(Some("https://tracker.example.com/api"), true)).unwrap();
        assert_eq!(config.api.base_url, "https://tracker.example.com/api");
        assert!(!config.display.color);
    }

    #[test]
    fn test_invalid_api_url_rejected() {
        let mut config = ClientConfig::default();
        assert!(apply_overrides(&mut config, &args(Some("not a url"), false)).is_err());
    }

    fn corrupt_session_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();
        path
    }

    #[test]
    fn test_corrupt_session_falls_back_to_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(corrupt_session_file(&dir));

        let credentials = resolve_credentials(&ClientConfig::default(), &store).unwrap();
        assert!(credentials.is_none());
        assert!(it_client::logout(&store).unwrap());
    }

    #[test]
    fn test_configured_token_skips_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(corrupt_session_file(&dir));
        let mut config = ClientConfig::default();
        config.api.token = Some("tok_configured".to_string());

        let credentials = resolve_credentials(&config, &store).unwrap().unwrap();
        assert_eq!(credentials.source, it_auth::CredentialSource::Configured);
    }

    #[test]
    fn test_invalid_configured_token_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        let mut config = ClientConfig::default();
        config.api.token = Some("tok with spaces".to_string());

        assert!(resolve_credentials(&config, &store).is_err());
    }

    #[test]
    fn test_load_survives_corrupt_session() {
        let dir = tempfile::tempdir().unwrap();
        let session = corrupt_session_file(&dir);
        let config_path = dir.path().join("issuetrack.toml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "[session]\npath = {:?}", session.display().to_string()).unwrap();

        let mut global = args(None, true);
        global.config = Some(config_path);
        let ctx = AppContext::load(&global).unwrap();
        assert!(ctx.credentials.is_none());
        assert_eq!(ctx.store.path(), session.as_path());
    }
}
