//! Opening a connection.

use crate::config::ConnectConfig;
use crate::error::{TableError, TableResult};
use tokio_postgres::config::Host;
use tokio_postgres::{Client, Config, NoTls};

fn host_name(host: &Host) -> String {
    match host {
        Host::Tcp(name) => name.clone(),
        #[cfg(unix)]
        Host::Unix(path) => path.display().to_string(),
    }
}

/// `host[,host...]:port/dbname` as the parsed config will dial it.
fn describe_target(pg: &Config) -> String {
    let hosts: Vec<String> = pg.get_hosts().iter().map(host_name).collect();
    let port = pg.get_ports().first().copied().unwrap_or(5432);
    format!(
        "{}:{}/{}",
        hosts.join(","),
        port,
        pg.get_dbname().unwrap_or_default()
    )
}

/// Connect without TLS and spawn the connection driver on the current runtime.
///
/// The returned client is usable anywhere a
/// [`GenericClient`](crate::GenericClient) is expected. Driver errors after
/// the handshake are logged; they surface to callers as failed statements.
pub async fn connect(config: &ConnectConfig) -> TableResult<Client> {
    let pg = config.to_pg_config()?;
    let (client, connection) = pg
        .connect(NoTls)
        .await
        .map_err(|e| TableError::Connection(e.to_string()))?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!(target: "pgtable.sql", error = %e, "connection driver stopped");
        }
    });

    tracing::debug!(
        target: "pgtable.sql",
        target_db = %describe_target(&pg),
        "connected"
    );
    Ok(client)
}
