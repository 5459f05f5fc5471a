//! Typed client for the cgminer RPC API.

use crate::commands::{self, add_pool_parameter};
use crate::config::{ClientConfig, Endpoint};
use crate::connection::{TcpTransport, Transport};
use crate::error::ApiResult;
use crate::messages::CommandRequest;
use crate::tracing::prelude::*;
use crate::types::{Device, MinerStats, PoolInfo, SummaryStats};

/// Client for one daemon.
///
/// Holds no connection: every operation opens a connection, runs one
/// command, and closes it. A `Client` can be shared freely between tasks;
/// concurrent commands against the same daemon are ordered by the daemon.
///
/// # Example
///
/// ```rust,ignore
/// let client = Client::new("10.0.0.7", 4028);
/// for pool in client.pools().await? {
///     if !pool.is_alive() {
///         client.remove_pool(&pool).await?;
///     }
/// }
/// ```
pub struct Client<T = TcpTransport> {
    transport: T,
}

impl Client<TcpTransport> {
    /// Create a client for `host:port`. Does not connect.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::with_config(ClientConfig {
            endpoint: Endpoint::new(host, port),
            ..ClientConfig::default()
        })
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_transport(TcpTransport::new(config))
    }

    pub fn endpoint(&self) -> &Endpoint {
        self.transport.endpoint()
    }
}

impl<T: Transport> Client<T> {
    /// Create a client over a custom transport.
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Status of every device, in daemon order.
    pub async fn devs(&self) -> ApiResult<Vec<Device>> {
        let text = self.send(CommandRequest::new(commands::DEVS)).await?;
        commands::decode_devs(&text)
    }

    /// Every configured pool, in daemon order.
    pub async fn pools(&self) -> ApiResult<Vec<PoolInfo>> {
        let text = self.send(CommandRequest::new(commands::POOLS)).await?;
        commands::decode_pools(&text)
    }

    /// Whole-miner totals.
    pub async fn summary(&self) -> ApiResult<SummaryStats> {
        let text = self.send(CommandRequest::new(commands::SUMMARY)).await?;
        commands::decode_summary(&text)
    }

    /// Hardware statistics, when the daemon reports a single record.
    ///
    /// Fails with `UnexpectedCardinality` (carrying the observed count)
    /// otherwise; see [`Client::stats_entries`].
    pub async fn stats(&self) -> ApiResult<MinerStats> {
        let text = self.send(CommandRequest::new(commands::STATS)).await?;
        commands::decode_stats(&text)
    }

    /// Every record of the `stats` response, in daemon order.
    pub async fn stats_entries(&self) -> ApiResult<Vec<MinerStats>> {
        let text = self.send(CommandRequest::new(commands::STATS)).await?;
        commands::decode_stats_entries(&text)
    }

    /// Add a pool. Fails with `Remote` if the daemon refuses it.
    pub async fn add_pool(&self, url: &str, user: &str, password: &str) -> ApiResult<()> {
        let parameter = add_pool_parameter(url, user, password);
        let text = self
            .send(CommandRequest::with_parameter(commands::ADD_POOL, parameter))
            .await?;
        commands::decode_add_pool(&text)
    }

    pub async fn enable_pool(&self, pool: &PoolInfo) -> ApiResult<()> {
        self.pool_command(commands::ENABLE_POOL, pool).await
    }

    pub async fn disable_pool(&self, pool: &PoolInfo) -> ApiResult<()> {
        self.pool_command(commands::DISABLE_POOL, pool).await
    }

    pub async fn remove_pool(&self, pool: &PoolInfo) -> ApiResult<()> {
        self.pool_command(commands::REMOVE_POOL, pool).await
    }

    /// Make `pool` the active pool.
    pub async fn switch_pool(&self, pool: &PoolInfo) -> ApiResult<()> {
        self.pool_command(commands::SWITCH_POOL, pool).await
    }

    /// Ask the daemon to restart itself.
    pub async fn restart(&self) -> ApiResult<()> {
        self.send(CommandRequest::new(commands::RESTART)).await?;
        Ok(())
    }

    /// Ask the daemon to exit.
    pub async fn quit(&self) -> ApiResult<()> {
        self.send(CommandRequest::new(commands::QUIT)).await?;
        Ok(())
    }

    /// Run any command and return the repaired response text undecoded.
    pub async fn raw(&self, command: &str, parameter: &str) -> ApiResult<String> {
        self.send(CommandRequest::with_parameter(command, parameter))
            .await
    }

    /// Pool mutations address the pool by the index it had when fetched.
    ///
    /// If the pool list changed since, the index may name another pool; only
    /// the daemon can reject it.
    async fn pool_command(&self, command: &'static str, pool: &PoolInfo) -> ApiResult<()> {
        debug!(command, pool = %pool.pool, url = %pool.url, "Pool command");
        self.send(CommandRequest::with_parameter(command, pool.pool.to_string()))
            .await?;
        Ok(())
    }

    async fn send(&self, request: CommandRequest) -> ApiResult<String> {
        self.transport.send(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::MockTransport;
    use crate::error::ApiError;
    use crate::types::PoolId;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn pool(index: i64) -> PoolInfo {
        PoolInfo {
            pool: PoolId(index),
            url: format!("stratum+tcp://pool{index}:3333"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_pools_end_to_end() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let daemon = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 256];
            let n = socket.read(&mut buf).await.unwrap();
            assert_eq!(&buf[..n], br#"{"command":"pools"}"#);

            socket
                .write_all(
                    b"{\"STATUS\":[{\"STATUS\":\"S\"}],\"POOLS\":[{\"URL\":\"stratum+tcp://x\",\"Pool\":0,\"Status\":\"Alive\"}]}\0",
                )
                .await
                .unwrap();
        });

        let client = Client::new("127.0.0.1", port);
        let pools = client.pools().await.unwrap();
        daemon.await.unwrap();

        assert_eq!(pools.len(), 1);
        assert_eq!(pools[0].url, "stratum+tcp://x");
        assert_eq!(pools[0].pool, PoolId(0));
        assert!(pools[0].is_alive());
    }

    #[tokio::test]
    async fn test_one_connection_per_command() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let daemon = tokio::spawn(async move {
            let mut commands = Vec::new();
            for _ in 0..2 {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = vec![0u8; 256];
                let n = socket.read(&mut buf).await.unwrap();
                commands.push(String::from_utf8(buf[..n].to_vec()).unwrap());
                socket
                    .write_all(b"{\"STATUS\":[{\"STATUS\":\"S\"}],\"DEVS\":[]}\0")
                    .await
                    .unwrap();
            }
            commands
        });

        let client = Client::new("127.0.0.1", port);
        assert!(client.devs().await.unwrap().is_empty());
        assert!(client.devs().await.unwrap().is_empty());

        let commands = daemon.await.unwrap();
        assert_eq!(commands, vec![r#"{"command":"devs"}"#; 2]);
    }

    #[tokio::test]
    async fn test_new_does_not_connect() {
        // Nothing listens here; construction must still succeed
        let client = Client::with_config(ClientConfig {
            endpoint: Endpoint::new("127.0.0.1", 9),
            connect_timeout: Duration::from_millis(100),
        });
        assert_eq!(client.endpoint().to_string(), "127.0.0.1:9");

        let err = client.summary().await.unwrap_err();
        assert!(err.is_connection());
    }

    #[tokio::test]
    async fn test_stats_defective_wire_format() {
        // Two STATS records concatenated without a comma, split over lines
        let transport = MockTransport::new([
            "{\"STATUS\":[{\"STATUS\":\"S\"}],\"STATS\":[{\"Type\":\"Antminer S9\"}\n{\"Elapsed\":3600,\"GHS av\":13500.0}],\"id\":1}\0",
            "{\"STATUS\":[{\"STATUS\":\"S\"}],\"STATS\":[{\"Type\":\"Antminer S9\"}\n{\"Elapsed\":3600,\"GHS av\":13500.0}],\"id\":1}\0",
        ]);
        let client = Client::with_transport(transport);

        let entries = client.stats_entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].elapsed, 3600);

        let err = client.stats().await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::UnexpectedCardinality { actual: 2, .. }
        ));
    }

    #[tokio::test]
    async fn test_add_pool_request() {
        let transport = MockTransport::new([
            "{\"STATUS\":[{\"STATUS\":\"S\",\"Code\":55,\"Description\":\"cgminer 4.11.1\"}]}\0",
        ]);
        let client = Client::with_transport(transport);

        client
            .add_pool("stratum+tcp://pool:3333", "wallet.worker", "x")
            .await
            .unwrap();

        let requests = client.transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].command(), "addpool");
        assert_eq!(
            requests[0].parameter(),
            Some("stratum+tcp://pool:3333,wallet.worker,x")
        );
    }

    #[tokio::test]
    async fn test_add_pool_rejected() {
        let transport = MockTransport::new([
            "{\"STATUS\":[{\"STATUS\":\"E\",\"Code\":14,\"Description\":\"duplicate\"}]}\0",
        ]);
        let client = Client::with_transport(transport);

        let err = client
            .add_pool("stratum+tcp://pool:3333", "wallet.worker", "x")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Remote { code: 14, ref description } if description == "duplicate"));
    }

    #[tokio::test]
    async fn test_pool_mutations_use_record_index() {
        let ok = "{\"STATUS\":[{\"STATUS\":\"S\"}]}\0";
        let client = Client::with_transport(MockTransport::new([ok, ok, ok, ok]));

        client.enable_pool(&pool(2)).await.unwrap();
        client.disable_pool(&pool(0)).await.unwrap();
        client.remove_pool(&pool(5)).await.unwrap();
        client.switch_pool(&pool(1)).await.unwrap();

        let sent: Vec<String> = client
            .transport
            .requests()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            sent,
            ["enablepool|2", "disablepool|0", "removepool|5", "switchpool|1"]
        );
    }

    #[tokio::test]
    async fn test_pool_mutation_ignores_status_block() {
        // Only the exchange matters; the daemon's verdict is not decoded
        let client = Client::with_transport(MockTransport::new([
            "{\"STATUS\":[{\"STATUS\":\"E\",\"Code\":13,\"Description\":\"Invalid pool id 9\"}]}\0",
        ]));
        assert!(client.enable_pool(&pool(9)).await.is_ok());
    }

    #[tokio::test]
    async fn test_restart_and_quit() {
        let client = Client::with_transport(MockTransport::new([
            "{\"STATUS\":[{\"STATUS\":\"S\"}]}\0",
            "{\"STATUS\":\"BYE\"}\0",
        ]));

        client.restart().await.unwrap();
        client.quit().await.unwrap();

        let sent: Vec<String> = client
            .transport
            .requests()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(sent, ["restart", "quit"]);
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        // Mock has no replies queued: the transport fails the call
        let client = Client::with_transport(MockTransport::new(Vec::<String>::new()));
        let err = client.devs().await.unwrap_err();
        assert!(matches!(err, ApiError::Framing { .. }));
    }

    #[tokio::test]
    async fn test_raw_passthrough() {
        let client = Client::with_transport(MockTransport::new([
            "{\"STATUS\":[{\"STATUS\":\"S\"}],\"VERSION\":[{\"CGMiner\":\"4.11.1\",\"API\":\"3.7\"}]}\0",
        ]));

        let text = client.raw("version", "").await.unwrap();
        assert!(text.starts_with("{\"STATUS\""));
        assert!(!text.ends_with('\0'));
        assert_eq!(client.transport.requests()[0].parameter(), None);
    }

    /// Integration test against a real daemon.
    ///
    /// Ignored by default (requires a running miner). Run with:
    ///
    /// ```bash
    /// CGMINER_API_HOST=10.0.0.7 cargo test --lib test_integration_daemon -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_integration_daemon() {
        let host =
            std::env::var("CGMINER_API_HOST").expect("CGMINER_API_HOST environment variable not set");
        let client = Client::new(host, crate::config::DEFAULT_PORT);

        let summary = client.summary().await.unwrap();
        println!("Summary: {} over {} s", summary.hashrate(), summary.elapsed);

        for pool in client.pools().await.unwrap() {
            println!("Pool {}: {} ({})", pool.pool, pool.url, pool.status);
        }

        for dev in client.devs().await.unwrap() {
            println!("Device: {} {}", dev.status, dev.hashrate());
        }
    }
}
