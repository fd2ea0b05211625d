/// 클라이언트 설정 (환경 변수)
// region:    --- Imports
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

// endregion: --- Imports

pub const SERVICE_URL_VAR: &str = "AUCTION_SERVICE_URL";
pub const REQUEST_TIMEOUT_VAR: &str = "AUCTION_REQUEST_TIMEOUT_MS";
pub const STATE_FILE_VAR: &str = "AUCTION_STATE_FILE";
pub const USERNAME_VAR: &str = "AUCTION_USERNAME";
pub const PASSWORD_VAR: &str = "AUCTION_PASSWORD";

const DEFAULT_SERVICE_URL: &str = "http://localhost:8080/";
const DEFAULT_STATE_FILE: &str = "auction-client-state.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a number of milliseconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
    #[error("{0} must be set")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub service_url: String,
    // None이면 응답이 올 때까지 기다린다
    pub request_timeout: Option<Duration>,
    pub state_file: PathBuf,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            request_timeout: None,
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            username: None,
            password: None,
        }
    }
}

impl ClientConfig {
    /// 환경 변수에서 설정 읽기
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 이름으로 값을 찾는 함수에서 설정 읽기 (빈 값은 없는 것으로 본다)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let request_timeout = match get(REQUEST_TIMEOUT_VAR) {
            Some(raw) => {
                let millis = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidTimeout {
                        var: REQUEST_TIMEOUT_VAR,
                        value: raw.clone(),
                    })?;
                Some(Duration::from_millis(millis))
            }
            None => None,
        };

        Ok(Self {
            service_url: get(SERVICE_URL_VAR).unwrap_or(defaults.service_url),
            request_timeout,
            state_file: get(STATE_FILE_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.state_file),
            username: get(USERNAME_VAR),
            password: get(PASSWORD_VAR),
        })
    }

    /// 로그인 정보 (둘 다 있어야 한다)
    pub fn credentials(&self) -> Result<(String, String), ConfigError> {
        let username = self
            .username
            .clone()
            .ok_or(ConfigError::Missing(USERNAME_VAR))?;
        let password = self
            .password
            .clone()
            .ok_or(ConfigError::Missing(PASSWORD_VAR))?;
        Ok((username, password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.service_url, DEFAULT_SERVICE_URL);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.state_file, PathBuf::from(DEFAULT_STATE_FILE));
        assert!(config.credentials().is_err());
    }

    #[test]
    fn reads_timeout_and_credentials() {
        let config = ClientConfig::from_lookup(lookup(&[
            (REQUEST_TIMEOUT_VAR, "1500"),
            (USERNAME_VAR, "alice"),
            (PASSWORD_VAR, "secret"),
        ]))
        .unwrap();
        assert_eq!(config.request_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(
            config.credentials().unwrap(),
            ("alice".to_string(), "secret".to_string())
        );
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let result = ClientConfig::from_lookup(lookup(&[(REQUEST_TIMEOUT_VAR, "soon")]));
        assert!(matches!(result, Err(ConfigError::InvalidTimeout { .. })));
    }
}
