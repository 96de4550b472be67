//! Proxy backend selection

use crate::codec;

pub const SCRAMJET_PREFIX: &str = "/v1/data/";
pub const ULTRAVIOLET_PREFIX: &str = "/v1/tmp/";

/// One rewriting-proxy backend: a routing prefix plus the codec that turns a
/// target URL into the path remainder under that prefix.
///
/// `decode` is pure and synchronous; it returns `None` when the remainder is
/// empty or not valid wire form.
pub trait ProxyBackend: Send + Sync {
    fn prefix(&self) -> &'static str;
    fn encode(&self, url: &str) -> String;
    fn decode(&self, encoded: &str) -> Option<String>;
}

pub struct ScramjetBackend;

impl ProxyBackend for ScramjetBackend {
    fn prefix(&self) -> &'static str {
        SCRAMJET_PREFIX
    }

    fn encode(&self, url: &str) -> String {
        codec::encode_url(url)
    }

    fn decode(&self, encoded: &str) -> Option<String> {
        codec::decode_url(encoded)
    }
}

pub struct UltravioletBackend;

impl ProxyBackend for UltravioletBackend {
    fn prefix(&self) -> &'static str {
        ULTRAVIOLET_PREFIX
    }

    fn encode(&self, url: &str) -> String {
        codec::encode_url(url)
    }

    fn decode(&self, encoded: &str) -> Option<String> {
        codec::decode_url(encoded)
    }
}

/// Backend id as persisted in the settings store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Scramjet,
    Ultraviolet,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Scramjet, Backend::Ultraviolet];

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Scramjet => "sc",
            Backend::Ultraviolet => "u",
        }
    }

    pub fn backend(&self) -> &'static dyn ProxyBackend {
        match self {
            Backend::Scramjet => &ScramjetBackend,
            Backend::Ultraviolet => &UltravioletBackend,
        }
    }

    pub fn prefix(&self) -> &'static str {
        self.backend().prefix()
    }

    /// Which backend a proxied path is routed through, by prefix.
    pub fn for_path(path: &str) -> Option<Backend> {
        Backend::ALL
            .into_iter()
            .find(|b| path.starts_with(b.prefix()))
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sc" => Ok(Backend::Scramjet),
            "u" => Ok(Backend::Ultraviolet),
            _ => Err(format!("Unknown proxy backend: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_ids() {
        assert_eq!("sc".parse::<Backend>().unwrap(), Backend::Scramjet);
        assert_eq!("u".parse::<Backend>().unwrap(), Backend::Ultraviolet);
        assert!("uv".parse::<Backend>().is_err());
    }

    #[test]
    fn test_for_path() {
        assert_eq!(
            Backend::for_path("/v1/data/abc"),
            Some(Backend::Scramjet)
        );
        assert_eq!(Backend::for_path("/v1/tmp/abc"), Some(Backend::Ultraviolet));
        assert_eq!(Backend::for_path("/st"), None);
    }
}
