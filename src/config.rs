use std::{env, net::SocketAddr, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/store.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
}

impl Config {
    /// `PORT` and `APP_DATA_PATH`; unset or unparseable values use defaults.
    pub fn from_env() -> Self {
        Self::from_vars(env::var("PORT").ok(), env::var("APP_DATA_PATH").ok())
    }

    fn from_vars(port: Option<String>, data_path: Option<String>) -> Self {
        Self {
            port: port
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT),
            data_path: data_path
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_vars(None, None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_path, PathBuf::from("data/store.json"));
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_vars(Some("9000".into()), Some("/tmp/cal.json".into()));
        assert_eq!(config.port, 9000);
        assert_eq!(config.data_path, PathBuf::from("/tmp/cal.json"));
        assert_eq!(config.addr().port(), 9000);
    }

    #[test]
    fn bad_port_falls_back() {
        assert_eq!(Config::from_vars(Some("http".into()), None).port, 8080);
    }
}
