//! Source registry loading.
//!
//! The registry is a YAML file read once at start-up:
//!
//! ```yaml
//! sources:
//!   - name: Cisco Talos
//!     url: https://blog.talosintelligence.com/
//!   - name: Microsoft Security
//!     url: https://www.microsoft.com/en-us/security/blog/
//!     date_strategy: microsoft
//! ```
//!
//! URLs without a scheme get `https://`. An empty list, duplicate names or an
//! unparseable URL are errors.

use crate::error::RegistryError;
use crate::models::Source;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument};
use url::Url;

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    sources: Vec<Source>,
}

/// Read and validate the registry at `path`.
///
/// # Arguments
///
/// * `path` - YAML file with a top-level `sources` list
///
/// # Returns
///
/// The sources in file order, with names trimmed and URLs normalized.
///
/// # Errors
///
/// Returns a [`RegistryError`] if the file cannot be read or parsed, lists no
/// sources, repeats a name, or holds a URL that does not parse.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn load_registry(path: &Path) -> Result<Vec<Source>, RegistryError> {
    let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let sources = parse_registry(&content)?;
    info!(count = sources.len(), "Loaded source registry");
    Ok(sources)
}

/// Parse and validate registry YAML.
pub fn parse_registry(content: &str) -> Result<Vec<Source>, RegistryError> {
    let file: RegistryFile = serde_yaml::from_str(content)?;
    if file.sources.is_empty() {
        return Err(RegistryError::Empty);
    }

    let mut names = HashSet::new();
    file.sources
        .into_iter()
        .map(|mut source| {
            source.name = source.name.trim().to_string();
            if !names.insert(source.name.clone()) {
                return Err(RegistryError::DuplicateName(source.name));
            }
            source.url = clean_url(&source.url);
            Url::parse(&source.url).map_err(|e| RegistryError::InvalidUrl {
                name: source.name.clone(),
                url: source.url.clone(),
                source: e,
            })?;
            Ok(source)
        })
        .collect()
}

/// Prefix `https://` when `url` has no http(s) scheme.
pub fn clean_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_registry_with_strategy() {
        let sources = parse_registry(
            r#"
sources:
  - name: Cisco Talos
    url: https://blog.talosintelligence.com/
  - name: Microsoft Security
    url: https://www.microsoft.com/en-us/security/blog/
    date_strategy: microsoft
"#,
        )
        .unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].date_strategy, None);
        assert_eq!(sources[1].date_strategy.as_deref(), Some("microsoft"));
    }

    #[test]
    fn test_missing_scheme_is_normalized() {
        let sources = parse_registry("sources:\n  - name: ESET\n    url: www.welivesecurity.com/\n").unwrap();
        assert_eq!(sources[0].url, "https://www.welivesecurity.com/");
    }

    #[test]
    fn test_empty_registry_is_rejected() {
        assert!(matches!(parse_registry("sources: []\n"), Err(RegistryError::Empty)));
        assert!(matches!(parse_registry("{}\n"), Err(RegistryError::Empty)));
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let err = parse_registry(
            "sources:\n  - name: Sophos\n    url: https://news.sophos.com/\n  - name: Sophos\n    url: https://a.example.com/\n",
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName(name) if name == "Sophos"));
    }

    #[test]
    fn test_malformed_yaml_is_a_parse_error() {
        assert!(matches!(
            parse_registry("sources: [unclosed"),
            Err(RegistryError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let err = parse_registry("sources:\n  - name: Broken\n    url: \"https://exa mple.com\"\n").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidUrl { .. }));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let err = load_registry(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, RegistryError::Read { .. }));
    }

    #[test]
    fn test_shipped_registry_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("sources.yaml");
        let sources = load_registry(&path).unwrap();
        assert_eq!(sources.len(), 35);
        assert!(
            sources
                .iter()
                .any(|s| s.name == "Microsoft Security" && s.date_strategy.as_deref() == Some("microsoft"))
        );
    }
}
