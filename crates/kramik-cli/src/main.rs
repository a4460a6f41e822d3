mod cli;

use clap::Parser as _;
use kramik_server::Server;
use snafu::ResultExt as _;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Cmd};

type WhateverResult<T> = std::result::Result<T, snafu::Whatever>;

#[snafu::report]
#[tokio::main]
async fn main() -> WhateverResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Serve(opts) => {
            let server = Server::init(opts.into_server_opts()?)
                .await
                .whatever_context("Failed to initialize server")?;
            server.run().await.whatever_context("Server failed")?;
        }
    }

    Ok(())
}
