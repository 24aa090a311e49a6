//! Configuration for trees created through a [`TreeRegistry`].
//!
//! [`TreeRegistry`]: crate::TreeRegistry

use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    hash::{Blake2bHasher, Blake3Hasher, HashProvider, Sha256Hasher},
};

/// Names a concrete [`HashProvider`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Blake3,
    Sha256,
    Blake2b,
}

impl HashAlgorithm {
    /// Every supported algorithm.
    pub const ALL: [HashAlgorithm; 3] = [
        HashAlgorithm::Blake3,
        HashAlgorithm::Sha256,
        HashAlgorithm::Blake2b,
    ];

    /// Instantiate the provider for this algorithm.
    pub fn provider(&self) -> Arc<dyn HashProvider> {
        match self {
            HashAlgorithm::Blake3 => Arc::new(Blake3Hasher),
            HashAlgorithm::Sha256 => Arc::new(Sha256Hasher),
            HashAlgorithm::Blake2b => Arc::new(Blake2bHasher),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Blake3 => "blake3",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Blake2b => "blake2b",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HashAlgorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownHashAlgorithm(s.to_string()))
    }
}

/// Settings for a [`TreeRegistry`](crate::TreeRegistry).
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Algorithm used for every tree the registry builds.
    pub hash_algorithm: HashAlgorithm,
    /// Upper bound on the number of named trees; `None` means unbounded.
    pub max_trees: Option<usize>,
}

impl RegistryConfig {
    pub fn with_hash_algorithm(hash_algorithm: HashAlgorithm) -> Self {
        RegistryConfig {
            hash_algorithm,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_parse_algorithm_names() {
        assert_eq!("blake3".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Blake3));
        assert_eq!(" SHA256 ".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha256));
        assert_eq!("Blake2b".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Blake2b));
        assert_matches!(
            "md5".parse::<HashAlgorithm>(),
            Err(Error::UnknownHashAlgorithm(name)) if name == "md5"
        );
        for algorithm in HashAlgorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<HashAlgorithm>(), Ok(algorithm));
        }
    }

    #[test]
    fn test_provider_digest_lengths() {
        for algorithm in HashAlgorithm::ALL {
            assert_eq!(algorithm.provider().digest_length(), 32, "{}", algorithm);
        }
    }

    #[test]
    fn test_config_from_json() {
        let config: RegistryConfig =
            serde_json::from_str(r#"{"hash_algorithm": "sha256", "max_trees": 4}"#)
                .expect("valid config");
        assert_eq!(config.hash_algorithm, HashAlgorithm::Sha256);
        assert_eq!(config.max_trees, Some(4));

        let defaults: RegistryConfig = serde_json::from_str("{}").expect("empty config");
        assert_eq!(defaults, RegistryConfig::default());
        assert_eq!(defaults.hash_algorithm, HashAlgorithm::Blake3);

        let json = serde_json::to_string(&RegistryConfig::with_hash_algorithm(
            HashAlgorithm::Blake2b,
        ))
        .expect("serialize");
        assert!(json.contains("\"blake2b\""));
    }

    #[test]
    fn test_config_rejects_unknown_algorithm() {
        assert!(serde_json::from_str::<RegistryConfig>(r#"{"hash_algorithm": "md5"}"#).is_err());
    }
}
