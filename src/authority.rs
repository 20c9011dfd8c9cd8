//! Domain-authority tables.
//!
//! The tables live in a versioned TOML file (`data/domain_authority.toml`)
//! that is embedded at compile time and can be replaced at runtime by
//! pointing `scoring.authority_table` at another file.
//!
//! Lookup order for a host:
//! 1. `domains`: exact host or any subdomain of it; longest entry wins.
//! 2. `suffixes`: host ends with the suffix; longest entry wins.
//! 3. `host_keywords`: keyword appears inside any host label; first wins.

use crate::error::{CredenceError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Embedded default table.
const DEFAULT_TABLE: &str = include_str!("../data/domain_authority.toml");

/// Authority class of a domain. Each class maps to a base score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainClass {
    /// Universities, government, military.
    Institutional,
    /// Leading academic publishers and scholarly indexes.
    PublisherPrimary,
    /// Other academic publishers and archives.
    PublisherSecondary,
    /// Reputable organisations and news agencies.
    Organisation,
    /// Blog platforms, social media, Q&A sites.
    LowQuality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainRule {
    pub domain: String,
    pub class: DomainClass,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuffixRule {
    pub suffix: String,
    pub class: DomainClass,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub class: DomainClass,
    pub description: String,
}

/// A matched table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    pub class: DomainClass,
    pub description: &'a str,
}

/// Parsed domain-authority table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorityTable {
    /// Revision of the table contents.
    pub version: String,
    #[serde(default)]
    pub domains: Vec<DomainRule>,
    #[serde(default)]
    pub suffixes: Vec<SuffixRule>,
    #[serde(default)]
    pub host_keywords: Vec<KeywordRule>,
}

impl AuthorityTable {
    /// The table compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns [`CredenceError::Authority`] if the embedded file is malformed.
    pub fn embedded() -> Result<Self> {
        Self::from_toml(DEFAULT_TABLE)
    }

    /// Parse a table from TOML text.
    ///
    /// Entries are lowercased so lookups can compare hosts directly.
    ///
    /// # Errors
    ///
    /// Returns [`CredenceError::Authority`] for invalid TOML or empty entries.
    pub fn from_toml(text: &str) -> Result<Self> {
        let mut table: Self =
            toml::from_str(text).map_err(|e| CredenceError::Authority(e.to_string()))?;
        table.normalise()?;
        Ok(table)
    }

    /// Load a table from a file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or
    /// [`CredenceError::Authority`] if it does not parse.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let table = Self::from_toml(&text)?;
        tracing::debug!(
            path = %path.display(),
            version = %table.version,
            "loaded domain authority table"
        );
        Ok(table)
    }

    fn normalise(&mut self) -> Result<()> {
        for rule in &mut self.domains {
            rule.domain = rule.domain.trim().trim_start_matches('.').to_ascii_lowercase();
            if rule.domain.is_empty() {
                return Err(CredenceError::Authority("empty domain entry".into()));
            }
        }
        for rule in &mut self.suffixes {
            let suffix = rule.suffix.trim().trim_start_matches('.').to_ascii_lowercase();
            if suffix.is_empty() {
                return Err(CredenceError::Authority("empty suffix entry".into()));
            }
            rule.suffix = format!(".{suffix}");
        }
        for rule in &mut self.host_keywords {
            rule.keyword = rule.keyword.trim().to_ascii_lowercase();
            if rule.keyword.is_empty() {
                return Err(CredenceError::Authority("empty host keyword entry".into()));
            }
        }
        Ok(())
    }

    /// Classify a lowercase host name (without a `www.` prefix).
    pub fn classify(&self, host: &str) -> Option<Classification<'_>> {
        let domain = self
            .domains
            .iter()
            .filter(|rule| host_matches_domain(host, &rule.domain))
            .max_by_key(|rule| rule.domain.len());
        if let Some(rule) = domain {
            return Some(Classification {
                class: rule.class,
                description: &rule.description,
            });
        }

        let suffix = self
            .suffixes
            .iter()
            .filter(|rule| host.ends_with(rule.suffix.as_str()))
            .max_by_key(|rule| rule.suffix.len());
        if let Some(rule) = suffix {
            return Some(Classification {
                class: rule.class,
                description: &rule.description,
            });
        }

        self.host_keywords
            .iter()
            .find(|rule| host.split('.').any(|label| label.contains(rule.keyword.as_str())))
            .map(|rule| Classification {
                class: rule.class,
                description: &rule.description,
            })
    }
}

fn host_matches_domain(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
