use clap::Parser;
use sea_orm::ConnectOptions;
use std::net::SocketAddr;

/// Runtime settings, read from flags with environment fallbacks
#[derive(Debug, Clone, Parser)]
#[command(name = "bookshelf", version, about = "Author and book CRUD API")]
pub struct Config {
    /// Database connection string
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://bookshelf.sqlite?mode=rwc")]
    pub database_url: String,

    /// Address the HTTP server listens on
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
    pub bind_addr: SocketAddr,

    /// Upper bound of the connection pool; the driver default when unset
    #[arg(long, env = "DB_MAX_CONNECTIONS")]
    pub max_connections: Option<u32>,

    /// Log every SQL statement
    #[arg(long, env = "DB_SQL_LOGGING")]
    pub sql_logging: bool,
}

impl Config {
    #[must_use]
    pub fn connect_options(&self) -> ConnectOptions {
        let mut options = ConnectOptions::new(self.database_url.clone());
        if let Some(max_connections) = self.max_connections {
            options.max_connections(max_connections);
        }
        options.sqlx_logging(self.sql_logging);
        options
    }
}
