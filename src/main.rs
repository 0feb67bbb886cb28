use anyhow::{Context, Result};
use expiring_kv::{
    access::table::post_permissions,
    api::{framed, ConsoleService},
    storage::{inmemory, redis::Store as RedisStore},
    AccessControl, ExpiringStore, Store,
};
use std::sync::Arc;
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(StructOpt)]
struct Opts {
    /// Redis server to store entries in; entries stay in memory when omitted.
    #[structopt(long, env = "REDIS_URL")]
    redis_url: Option<String>,

    #[structopt(long, env = "STORE_CHANNEL_CAPACITY", default_value = "32")]
    channel_capacity: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();

    let opts = Opts::from_args();

    run_with(opts).await
}

async fn run_with(opts: Opts) -> Result<()> {
    let policy = Arc::new(post_permissions().context("unable to declare permissions")?);

    match opts.redis_url {
        Some(url) => {
            info!("Using redis at {}", url);
            let store = RedisStore::connect(&url)
                .await
                .context("unable to connect to redis")?;
            serve(store, policy).await
        }
        None => {
            info!("Using in-memory store");
            serve(inmemory::start_with_capacity(opts.channel_capacity), policy).await
        }
    }
}

async fn serve<S>(store: S, policy: Arc<AccessControl>) -> Result<()>
where
    S: Store,
    anyhow::Error: From<S::Err>,
{
    let (requests, responses) = framed(tokio::io::stdin(), tokio::io::stdout());

    ConsoleService::new(requests, responses, ExpiringStore::new(store), policy)
        .handle()
        .await
}

fn init_logger() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init()
}
