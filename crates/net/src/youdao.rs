use crate::tls::native_tls_config;
use core_types::{CoreError, Word};
use serde_json::Value;
use std::time::Duration;
use store::DefinitionLookup;

const DEFAULT_ENDPOINT: &str = "https://dict.youdao.com/jsonapi";
/// `{"count":99,"dicts":[["ec","ce"]]}`
const DICTS_PARAM: &str = r#"{"count":99,"dicts":[["ec","ce"]]}"#;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YoudaoConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// Trust the platform root store instead of the bundled one.
    pub native_roots: bool,
}

impl Default for YoudaoConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(10),
            user_agent: "Osmosis/0.1 (+https://github.com/osmosis)".to_string(),
            native_roots: true,
        }
    }
}

/// English to Chinese definitions from the Youdao dictionary JSON API.
pub struct YoudaoClient {
    agent: ureq::Agent,
    config: YoudaoConfig,
}

impl YoudaoClient {
    pub fn new(config: YoudaoConfig) -> Self {
        let mut builder = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent);
        if config.native_roots {
            if let Some(tls) = native_tls_config() {
                builder = builder.tls_config(tls);
            }
        }
        Self {
            agent: builder.build(),
            config,
        }
    }

    pub fn config(&self) -> &YoudaoConfig {
        &self.config
    }

    fn fetch(&self, word: &Word) -> Result<Value, CoreError> {
        let response = self
            .agent
            .get(&self.config.endpoint)
            .query("jsonversion", "2")
            .query("dicts", DICTS_PARAM)
            .query("q", word.as_str())
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(code, resp) => {
                    CoreError::Transport(format!("HTTP {code} {}", resp.status_text()))
                }
                ureq::Error::Transport(t) => CoreError::transport(t),
            })?;
        response.into_json::<Value>().map_err(CoreError::transport)
    }
}

impl Default for YoudaoClient {
    fn default() -> Self {
        Self::new(YoudaoConfig::default())
    }
}

impl DefinitionLookup for YoudaoClient {
    fn lookup(&self, word: &Word) -> Result<Vec<String>, CoreError> {
        log::debug!(target: "net.youdao", "querying {word}");
        let body = self.fetch(word)?;
        let definitions = parse_definitions(word, &body);
        if let Err(err) = &definitions {
            log::debug!(target: "net.youdao", "{word}: {err}");
        }
        definitions
    }
}

/// Extract `ec.word[0].trs[*].tr[0].l.i[0]`.
///
/// Every `trs` entry must carry a definition; a missing entry, an empty
/// list or any malformed item is `NotFound`.
pub fn parse_definitions(word: &Word, body: &Value) -> Result<Vec<String>, CoreError> {
    let not_found = || CoreError::NotFound(word.to_string());
    let entry = body
        .pointer("/ec/word/0")
        .filter(|v| !v.is_null())
        .ok_or_else(not_found)?;
    let trs = entry
        .get("trs")
        .and_then(Value::as_array)
        .filter(|trs| !trs.is_empty())
        .ok_or_else(not_found)?;
    trs.iter()
        .map(|tr| {
            tr.pointer("/tr/0/l/i/0")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .ok_or_else(not_found)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apple() -> Word {
        Word::parse("apple").unwrap()
    }

    fn tr(text: &str) -> Value {
        json!({"tr": [{"l": {"i": [text]}}]})
    }

    #[test]
    fn collects_every_translation_in_order() {
        let body = json!({
            "ec": {"word": [{"trs": [tr("n. 苹果"), tr("n. 苹果树")], "usphone": "ˈæpl"}]}
        });
        assert_eq!(
            parse_definitions(&apple(), &body).unwrap(),
            vec!["n. 苹果", "n. 苹果树"]
        );
    }

    #[test]
    fn missing_word_entry_is_not_found() {
        for body in [json!({}), json!({"ec": {}}), json!({"ec": {"word": []}}), json!(null)] {
            assert_eq!(
                parse_definitions(&apple(), &body),
                Err(CoreError::NotFound("apple".into())),
                "{body}"
            );
        }
    }

    #[test]
    fn empty_trs_is_not_found() {
        let body = json!({"ec": {"word": [{"trs": []}]}});
        assert!(matches!(
            parse_definitions(&apple(), &body),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn one_malformed_entry_fails_the_whole_lookup() {
        let body = json!({"ec": {"word": [{"trs": [tr("n. 苹果"), {"tr": [{"l": {}}]}]}]}});
        assert!(matches!(
            parse_definitions(&apple(), &body),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn default_config() {
        let config = YoudaoConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.endpoint.starts_with("https://dict.youdao.com/"));
    }

    #[test]
    fn unreachable_endpoint_is_transport_error() {
        let client = YoudaoClient::new(YoudaoConfig {
            endpoint: "http://127.0.0.1:9/jsonapi".to_string(),
            timeout: Duration::from_millis(500),
            native_roots: false,
            ..YoudaoConfig::default()
        });
        assert!(matches!(client.lookup(&apple()), Err(CoreError::Transport(_))));
    }
}
