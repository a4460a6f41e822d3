use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use directories::ProjectDirs;
use snafu::OptionExt as _;

pub const PROJECT_NAME: &str = "kramik";

type WhateverResult<T> = std::result::Result<T, snafu::Whatever>;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Debug, Subcommand)]
pub enum Cmd {
    /// Run the HTTP service.
    Serve(ServeOpts),
}

#[derive(Debug, Args)]
pub struct ServeOpts {
    /// Address to bind.
    #[arg(long, env = "KRAMIK_LISTEN", default_value = "127.0.0.1:3999")]
    pub listen: String,

    /// Directory holding the table files. Defaults to the platform
    /// data dir.
    #[arg(long, env = "KRAMIK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Allowed CORS origin. Defaults to the listen address.
    #[arg(long, env = "KRAMIK_CORS_ORIGIN")]
    pub cors_origin: Option<String>,

    #[arg(long)]
    pub reuseport: bool,
}

impl ServeOpts {
    pub fn into_server_opts(self) -> WhateverResult<kramik_server::Opts> {
        let data_dir = match self.data_dir {
            Some(dir) => dir,
            None => ProjectDirs::from("", "", PROJECT_NAME)
                .whatever_context("Can't determine a data directory")?
                .data_dir()
                .to_path_buf(),
        };

        Ok(kramik_server::Opts {
            listen: self.listen,
            cors_origin: self.cors_origin,
            reuseport: self.reuseport,
            data_dir,
        })
    }
}
