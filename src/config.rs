use std::{net::SocketAddr, path::PathBuf};

pub const DEFAULT_DB_PATH: &str = "./todos.db";

/// Listen address and database location. Both are fixed for the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_fixed_port_and_path() {
        let config = Config::default();
        assert_eq!(config.addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.db_path, PathBuf::from("./todos.db"));
    }
}
