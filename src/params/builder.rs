use std::collections::HashSet;

use tracing::debug;
use url::form_urlencoded;

use super::fingerprint::FingerprintCatalog;
use super::nonce::NonceGenerator;

pub const MS_TOKEN: &str = "msToken";
pub const WEBID: &str = "webid";

/// Ordered string parameters. Re-inserting a key replaces the value in place,
/// so the encoded order stays stable for the lifetime of one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: Vec<(String, String)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> Option<String> {
        let key = key.into();
        let value = value.to_string();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => Some(std::mem::replace(&mut slot.1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `application/x-www-form-urlencoded` rendering, in insertion order.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}

/// Merges fingerprint, caller parameters and fresh nonces.
#[derive(Debug)]
pub struct ParameterBuilder {
    catalog: FingerprintCatalog,
    nonces: NonceGenerator,
}

impl ParameterBuilder {
    pub fn new(catalog: FingerprintCatalog, nonces: NonceGenerator) -> Self {
        Self { catalog, nonces }
    }

    pub fn catalog(&self) -> &FingerprintCatalog {
        &self.catalog
    }

    /// Catalog first, caller values override catalog values, nonces last.
    /// Caller-supplied nonce fields are dropped.
    pub fn build(&self, caller: &ParameterSet) -> ParameterSet {
        let mut params: ParameterSet = self.catalog.fields().collect();

        let overridden: HashSet<&str> = caller
            .iter()
            .filter(|(k, _)| self.catalog.get(k).is_some())
            .map(|(k, _)| k)
            .collect();
        if !overridden.is_empty() {
            debug!(fields = ?overridden, "Caller overrides fingerprint fields");
        }

        for (key, value) in caller.iter() {
            if key == MS_TOKEN || key == WEBID {
                debug!(field = key, "Ignoring caller-supplied nonce field");
                continue;
            }
            params.insert(key, value);
        }

        let nonces = self.nonces.generate();
        params.insert(MS_TOKEN, nonces.ms_token);
        params.insert(WEBID, nonces.webid);
        params
    }
}

#[cfg(test)]
mod tests {
    use super::super::fingerprint::DEFAULT_FINGERPRINT;
    use super::*;

    fn builder() -> ParameterBuilder {
        ParameterBuilder::new(FingerprintCatalog::default(), NonceGenerator::from_entropy())
    }

    #[test]
    fn test_parameter_set_replaces_in_place() {
        let mut params = ParameterSet::new().with("a", 1).with("b", "two");
        assert_eq!(params.insert("a", 3), Some("1".to_string()));
        assert_eq!(params.to_query_string(), "a=3&b=two");
    }

    #[test]
    fn test_query_string_encoding() {
        let params = ParameterSet::new()
            .with("keyword", "cat videos")
            .with("cursor", 0)
            .with("sec_user_id", "MS4wLjABAAAA/x+y");
        assert_eq!(
            params.to_query_string(),
            "keyword=cat+videos&cursor=0&sec_user_id=MS4wLjABAAAA%2Fx%2By"
        );
    }

    #[test]
    fn test_build_contains_catalog_caller_and_nonces() {
        let caller = ParameterSet::new().with("aweme_id", "7300000000000000000");
        let params = builder().build(&caller);

        for (key, value) in DEFAULT_FINGERPRINT {
            assert_eq!(params.get(key), Some(value));
        }
        assert_eq!(params.get("aweme_id"), Some("7300000000000000000"));
        assert_eq!(params.get(MS_TOKEN).map(str::len), Some(128));
        assert_eq!(params.get(WEBID).map(str::len), Some(19));
        assert_eq!(params.len(), DEFAULT_FINGERPRINT.len() + 3);
    }

    #[test]
    fn test_caller_wins_over_catalog() {
        let caller = ParameterSet::new().with("aid", "1128");
        let params = builder().build(&caller);
        assert_eq!(params.get("aid"), Some("1128"));
    }

    #[test]
    fn test_caller_cannot_pin_nonces() {
        let caller = ParameterSet::new().with(MS_TOKEN, "fixed").with(WEBID, "1");
        let params = builder().build(&caller);
        assert_ne!(params.get(MS_TOKEN), Some("fixed"));
        assert_ne!(params.get(WEBID), Some("1"));
    }

    #[test]
    fn test_nonces_fresh_on_every_build() {
        let builder = builder();
        let caller = ParameterSet::new();
        let mut seen = HashSet::new();

        for _ in 0..1_000 {
            let params = builder.build(&caller);
            let pair = (
                params.get(MS_TOKEN).unwrap().to_string(),
                params.get(WEBID).unwrap().to_string(),
            );
            assert!(seen.insert(pair));
        }
    }
}
