use acrud_core::{Error, Result};

/// Supported database engines.
///
/// Closed set: connecting to anything else fails with `UnsupportedDriver`
/// before any query is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    MySql,
    Sqlite,
}

impl Engine {
    /// Detect the engine from a connection URL scheme.
    pub fn from_url(url: &str) -> Result<Engine> {
        let scheme = url.split(':').next().unwrap_or(url);
        match scheme {
            "mysql" => Ok(Engine::MySql),
            "sqlite" => Ok(Engine::Sqlite),
            other => Err(Error::UnsupportedDriver(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::MySql => "mysql",
            Engine::Sqlite => "sqlite",
        }
    }

    /// Quote an identifier with the engine's quote character.
    pub fn quote(&self, ident: &str) -> String {
        match self {
            Engine::MySql => format!("`{ident}`"),
            Engine::Sqlite => format!("\"{ident}\""),
        }
    }
}
