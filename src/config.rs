/// Store selection from command-line flags and the environment.
use std::path::PathBuf;

pub const URL_VAR: &str = "SUPABASE_URL";
pub const KEY_VAR: &str = "SUPABASE_KEY";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    Remote { url: String, key: String },
    Local(PathBuf),
    Offline,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub backend: Backend,
    /// Spreadsheet used for candidate lists when the store has none.
    pub import: Option<PathBuf>,
}

impl Config {
    /// `offline` wins over `db`, which wins over the environment. Without any
    /// of them the app runs offline.
    pub fn resolve(
        offline: bool,
        db: Option<PathBuf>,
        import: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let backend = if offline {
            Backend::Offline
        } else if let Some(path) = db {
            Backend::Local(path)
        } else {
            let non_empty = |name: &str| env(name).filter(|value| !value.trim().is_empty());
            match (non_empty(URL_VAR), non_empty(KEY_VAR)) {
                (Some(url), Some(key)) => Backend::Remote { url, key },
                _ => Backend::Offline,
            }
        };
        Self { backend, import }
    }

    pub fn from_env(offline: bool, db: Option<PathBuf>, import: Option<PathBuf>) -> Self {
        Self::resolve(offline, db, import, |name| std::env::var(name).ok())
    }
}

/// Returns the default database path inside the user's data directory.
/// Falls back to `./shiftplan.db` when no data dir is found.
pub fn default_db_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join("shiftplan");
        std::fs::create_dir_all(&app_dir).ok();
        app_dir.join("shiftplan.db")
    } else {
        PathBuf::from("shiftplan.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with_secrets(name: &str) -> Option<String> {
        match name {
            URL_VAR => Some("https://example.supabase.co".to_string()),
            KEY_VAR => Some("secret".to_string()),
            _ => None,
        }
    }

    #[test]
    fn environment_selects_remote_store() {
        let config = Config::resolve(false, None, None, env_with_secrets);
        assert_eq!(
            config.backend,
            Backend::Remote {
                url: "https://example.supabase.co".into(),
                key: "secret".into()
            }
        );
    }

    #[test]
    fn flags_take_precedence_over_environment() {
        let db = PathBuf::from("/tmp/plan.db");
        let local = Config::resolve(false, Some(db.clone()), None, env_with_secrets);
        assert_eq!(local.backend, Backend::Local(db.clone()));
        let offline = Config::resolve(true, Some(db), None, env_with_secrets);
        assert_eq!(offline.backend, Backend::Offline);
    }

    #[test]
    fn missing_or_blank_secrets_mean_offline() {
        assert_eq!(Config::resolve(false, None, None, |_| None).backend, Backend::Offline);
        let blank_key = |name: &str| match name {
            URL_VAR => Some("https://example.supabase.co".to_string()),
            _ => Some("  ".to_string()),
        };
        assert_eq!(Config::resolve(false, None, None, blank_key).backend, Backend::Offline);
    }
}
