//! Runtime configuration resolved from the command line

use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_ARTWORK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

/// Where to fetch from and where to log.
#[derive(Clone, Debug, PartialEq)]
pub struct BrowseConfig {
    pub api_base: String,
    pub artwork_base: String,
    /// Pre-filled value for the key gate. Never sent with any request.
    pub api_key: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            artwork_base: DEFAULT_ARTWORK_BASE.to_string(),
            api_key: None,
            log_file: None,
        }
    }
}

impl BrowseConfig {
    pub fn new(
        api_base: &str,
        artwork_base: &str,
        api_key: Option<String>,
        log_file: Option<PathBuf>,
    ) -> Self {
        Self {
            api_base: trim_base(api_base),
            artwork_base: trim_base(artwork_base),
            api_key: api_key.filter(|key| !key.is_empty()),
            log_file,
        }
    }
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed() {
        let config = BrowseConfig::new(
            "http://localhost:8000/api/v2/",
            "http://img//",
            None,
            None,
        );
        assert_eq!(config.api_base, "http://localhost:8000/api/v2");
        assert_eq!(config.artwork_base, "http://img");
    }

    #[test]
    fn empty_api_key_is_dropped() {
        let config = BrowseConfig::new(
            DEFAULT_API_BASE,
            DEFAULT_ARTWORK_BASE,
            Some(String::new()),
            None,
        );
        assert_eq!(config.api_key, None);
    }
}
