//! Persistence of the user's Gemini API key in the local configuration file.

use crate::config::Config;
use std::fmt;
use tracing::{error, info};

/// Status line shown under the API key field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyNotice {
    Loaded,
    Missing,
    Saved,
    EmptyInput,
    Removed,
    Required,
    Invalid,
    RateLimited,
    PermissionDenied,
    StorageFailed(String),
}

impl KeyNotice {
    pub fn is_success(&self) -> bool {
        matches!(self, KeyNotice::Saved)
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            KeyNotice::Removed
                | KeyNotice::Required
                | KeyNotice::Invalid
                | KeyNotice::RateLimited
                | KeyNotice::PermissionDenied
                | KeyNotice::StorageFailed(_)
        )
    }
}

impl fmt::Display for KeyNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyNotice::Loaded => write!(f, "Chave API carregada da configuração local."),
            KeyNotice::Missing => {
                write!(f, "Insira sua API Key do Google Gemini para começar.")
            }
            KeyNotice::Saved => write!(f, "Chave API salva com sucesso!"),
            KeyNotice::EmptyInput => {
                write!(f, "O campo da API Key não pode estar vazio para salvar.")
            }
            KeyNotice::Removed => write!(
                f,
                "Chave API removida. Insira uma nova chave para usar o revisor."
            ),
            KeyNotice::Required => {
                write!(f, "API Key necessária para a revisão. Configure-a acima.")
            }
            KeyNotice::Invalid => write!(f, "A API Key parece ser inválida. Verifique-a."),
            KeyNotice::RateLimited => write!(f, "Limite de requisições da API Key excedido."),
            KeyNotice::PermissionDenied => write!(
                f,
                "Permissão negada pela API. Verifique sua chave e sua conta Google AI."
            ),
            KeyNotice::StorageFailed(reason) => {
                write!(f, "Não foi possível gravar a configuração: {}", reason)
            }
        }
    }
}

pub fn has_api_key(config: &Config) -> bool {
    !config.settings.reviewer.api_key.trim().is_empty()
}

/// Notice to show when the application starts
pub fn initial_notice(config: &Config) -> KeyNotice {
    if has_api_key(config) {
        KeyNotice::Loaded
    } else {
        KeyNotice::Missing
    }
}

/// Store a new key. Surrounding whitespace is dropped; blank input is rejected.
pub fn save_api_key(config: &mut Config, input: &str) -> KeyNotice {
    let key = input.trim();
    if key.is_empty() {
        return KeyNotice::EmptyInput;
    }

    config.settings.reviewer.api_key = key.to_string();
    match config.save() {
        Ok(()) => {
            info!("API key saved");
            KeyNotice::Saved
        }
        Err(e) => {
            error!("Failed to save API key: {}", e);
            KeyNotice::StorageFailed(e.to_string())
        }
    }
}

pub fn remove_api_key(config: &mut Config) -> KeyNotice {
    config.settings.reviewer.api_key.clear();
    match config.save() {
        Ok(()) => {
            info!("API key removed");
            KeyNotice::Removed
        }
        Err(e) => {
            error!("Failed to remove API key: {}", e);
            KeyNotice::StorageFailed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn setup_test_config() -> (Config, PathBuf) {
        let test_dir = std::env::temp_dir().join(format!("test_key_store_{}", Uuid::new_v4()));
        fs::create_dir_all(&test_dir).unwrap();
        let config = Config::load_from(test_dir.join("revitlegis.toml")).unwrap();
        (config, test_dir)
    }

    fn cleanup_test_dir(test_dir: &std::path::Path) {
        let _ = fs::remove_dir_all(test_dir);
    }

    #[test]
    fn test_save_trims_and_persists() {
        let (mut config, test_dir) = setup_test_config();
        assert_eq!(initial_notice(&config), KeyNotice::Missing);

        let notice = save_api_key(&mut config, "  AIza-teste  ");
        assert_eq!(notice, KeyNotice::Saved);
        assert!(notice.is_success());
        assert_eq!(config.settings.reviewer.api_key, "AIza-teste");

        let reloaded = Config::load_from(test_dir.join("revitlegis.toml")).unwrap();
        assert_eq!(reloaded.settings.reviewer.api_key, "AIza-teste");
        assert_eq!(initial_notice(&reloaded), KeyNotice::Loaded);

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_blank_input_is_rejected() {
        let (mut config, test_dir) = setup_test_config();
        save_api_key(&mut config, "existente");

        let notice = save_api_key(&mut config, "   \n");
        assert_eq!(notice, KeyNotice::EmptyInput);
        assert!(!notice.is_error());
        assert_eq!(config.settings.reviewer.api_key, "existente");

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_remove_clears_key() {
        let (mut config, test_dir) = setup_test_config();
        save_api_key(&mut config, "AIza-teste");

        let notice = remove_api_key(&mut config);
        assert_eq!(notice, KeyNotice::Removed);
        assert!(!has_api_key(&config));

        let reloaded = Config::load_from(test_dir.join("revitlegis.toml")).unwrap();
        assert!(!has_api_key(&reloaded));

        cleanup_test_dir(&test_dir);
    }
}
