use anyhow::Context;
use autoims::domain::config::ApiConfig;
use autoims::kernel::config::load_config;
use autoims_logger::{LogOptions, Logger};
use autoims_server::Server;

#[cfg(feature = "profiling")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

#[autoims_runtime::main(high_performance)]
async fn main() -> anyhow::Result<()> {
    #[cfg(feature = "profiling")]
    let _profiler = dhat::Profiler::new_heap();

    let cfg: ApiConfig = load_config(None::<&str>).context("Critical: Configuration is malformed")?;

    let logging = &cfg.logging;
    let _log = Logger::from_options(env!("CARGO_PKG_NAME"), LogOptions {
        level: &logging.level,
        directory: logging.directory.as_deref(),
        json: logging.json,
        filter: logging.filter.as_deref(),
    })?;

    Server::builder().config(cfg).build().await?.run().await
}
