//! Command-line interface for the cgminer RPC API.
//!
//! Runs one API command against a daemon and prints the result.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use cgminer_api::{Client, ClientConfig, Endpoint, PoolId, PoolInfo, tracing};

/// Query and control a cgminer-compatible daemon
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Daemon host name or address
    #[arg(long, env = "CGMINER_API_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Daemon API port
    #[arg(short, long, env = "CGMINER_API_PORT", default_value_t = cgminer_api::config::DEFAULT_PORT)]
    port: u16,

    /// Connect timeout in seconds
    #[arg(short, long, default_value_t = 5)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show per-device status
    Devs,
    /// List configured pools
    Pools,
    /// Show whole-miner totals
    Summary,
    /// Show hardware statistics (all records)
    Stats,
    /// Add a pool
    Addpool {
        url: String,
        user: String,
        password: String,
    },
    /// Enable the pool with the given index
    Enablepool { index: i64 },
    /// Disable the pool with the given index
    Disablepool { index: i64 },
    /// Remove the pool with the given index
    Removepool { index: i64 },
    /// Make the pool with the given index active
    Switchpool { index: i64 },
    /// Restart the daemon
    Restart,
    /// Stop the daemon
    Quit,
    /// Send any command and pretty-print the JSON response
    Raw {
        command: String,
        #[arg(default_value = "")]
        parameter: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing::init_stderr();

    let args = Args::parse();
    let client = Client::with_config(ClientConfig {
        endpoint: Endpoint::new(args.host, args.port),
        connect_timeout: Duration::from_secs(args.timeout),
    });

    match args.command {
        Command::Devs => cmd_devs(&client).await,
        Command::Pools => cmd_pools(&client).await,
        Command::Summary => cmd_summary(&client).await,
        Command::Stats => cmd_stats(&client).await,
        Command::Addpool {
            url,
            user,
            password,
        } => {
            client
                .add_pool(&url, &user, &password)
                .await
                .with_context(|| format!("failed to add pool {}", url))?;
            println!("Added pool {}", url);
            Ok(())
        }
        Command::Enablepool { index } => {
            let pool = find_pool(&client, index).await?;
            client.enable_pool(&pool).await?;
            println!("Enabled pool {}: {}", pool.pool, pool.url);
            Ok(())
        }
        Command::Disablepool { index } => {
            let pool = find_pool(&client, index).await?;
            client.disable_pool(&pool).await?;
            println!("Disabled pool {}: {}", pool.pool, pool.url);
            Ok(())
        }
        Command::Removepool { index } => {
            let pool = find_pool(&client, index).await?;
            client.remove_pool(&pool).await?;
            println!("Removed pool {}: {}", pool.pool, pool.url);
            Ok(())
        }
        Command::Switchpool { index } => {
            let pool = find_pool(&client, index).await?;
            client.switch_pool(&pool).await?;
            println!("Switched to pool {}: {}", pool.pool, pool.url);
            Ok(())
        }
        Command::Restart => {
            client.restart().await.context("restart failed")?;
            println!("Restart requested");
            Ok(())
        }
        Command::Quit => {
            client.quit().await.context("quit failed")?;
            println!("Quit requested");
            Ok(())
        }
        Command::Raw { command, parameter } => cmd_raw(&client, &command, &parameter).await,
    }
}

/// Look up a pool by index in the daemon's current list.
async fn find_pool(client: &Client, index: i64) -> Result<PoolInfo> {
    let pools = client
        .pools()
        .await
        .with_context(|| format!("failed to list pools on {}", client.endpoint()))?;

    match pools.into_iter().find(|p| p.pool == PoolId(index)) {
        Some(pool) => Ok(pool),
        None => bail!("no pool with index {}", index),
    }
}

async fn cmd_devs(client: &Client) -> Result<()> {
    let devs = client
        .devs()
        .await
        .with_context(|| format!("failed to query devices on {}", client.endpoint()))?;

    if devs.is_empty() {
        println!("Devices: (none)");
        return Ok(());
    }

    for (i, dev) in devs.iter().enumerate() {
        println!(
            "{:>3}  {:<5} {:<8} {:>14}  {:>5.1} C  A:{} R:{} HW:{}",
            i,
            dev.enabled,
            dev.status,
            dev.hashrate().to_human_readable(),
            dev.temperature,
            dev.accepted,
            dev.rejected,
            dev.hardware_errors,
        );
    }

    Ok(())
}

async fn cmd_pools(client: &Client) -> Result<()> {
    let pools = client
        .pools()
        .await
        .with_context(|| format!("failed to list pools on {}", client.endpoint()))?;

    if pools.is_empty() {
        println!("Pools: (none)");
        return Ok(());
    }

    for pool in &pools {
        println!(
            "{:>3}  {:<6} prio {:<2} {}  ({})  A:{} R:{}",
            pool.pool.0,
            pool.status,
            pool.priority,
            pool.url,
            pool.user,
            pool.accepted,
            pool.rejected,
        );
    }

    Ok(())
}

async fn cmd_summary(client: &Client) -> Result<()> {
    let summary = client
        .summary()
        .await
        .with_context(|| format!("failed to query summary on {}", client.endpoint()))?;

    println!("Elapsed:   {} s", summary.elapsed);
    println!("Hashrate:  {}", summary.hashrate());
    println!("Accepted:  {}", summary.accepted);
    println!("Rejected:  {}", summary.rejected);
    println!("HW errors: {}", summary.hardware_errors);
    println!("Best:      {}", summary.best_share);

    Ok(())
}

async fn cmd_stats(client: &Client) -> Result<()> {
    let entries = client
        .stats_entries()
        .await
        .with_context(|| format!("failed to query stats on {}", client.endpoint()))?;

    for (i, stats) in entries.iter().enumerate() {
        println!("Record {}:", i);
        if stats.elapsed > 0 {
            println!("  Elapsed:  {} s", stats.elapsed);
            println!("  Hashrate: {}", stats.hashrate());
        }
        let temps = stats.board_temperatures();
        if !temps.is_empty() {
            println!("  Board temperatures: {:?}", temps);
        }
        for (key, value) in &stats.extra {
            println!("  {}: {}", key, value);
        }
    }

    Ok(())
}

/// Send a raw command and pretty-print the JSON response.
async fn cmd_raw(client: &Client, command: &str, parameter: &str) -> Result<()> {
    let body = client.raw(command, parameter).await?;

    // Try to pretty-print as JSON; fall back to raw text
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", body),
    }

    Ok(())
}
