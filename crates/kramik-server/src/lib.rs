mod auth;
mod error;
mod routes;

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr as _;
use std::sync::Arc;
use std::time::Duration;
use std::{io, result};

use axum::http::header::{ACCEPT, CONTENT_TYPE, InvalidHeaderValue};
use axum::http::{HeaderValue, Method};
use kramik_store::{SessionStore, Storage, StorageError};
use snafu::{ResultExt as _, Snafu};
use tokio::net::{TcpListener, TcpSocket};
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::info;

pub(crate) const LOG_TARGET: &str = "kramik::server";

#[derive(Clone, Debug)]
pub struct Opts {
    pub listen: String,
    pub cors_origin: Option<String>,
    pub reuseport: bool,
    pub data_dir: PathBuf,
}

/// State shared by every handler: the flat-file storage and the
/// injected session map, both living as long as the process.
pub struct AppState {
    pub storage: Storage,
    pub sessions: SessionStore,
}

pub type SharedState = Arc<AppState>;

#[derive(Debug, Snafu)]
pub enum ServerError {
    #[snafu(transparent)]
    Io {
        source: io::Error,
    },
    #[snafu(transparent)]
    Storage {
        source: StorageError,
    },
    ListenAddr {
        source: AddrParseError,
    },
    Cors {
        source: InvalidHeaderValue,
    },
}

pub type ServerResult<T> = result::Result<T, ServerError>;

pub struct Server {
    listener: TcpListener,

    state: SharedState,
    opts: Opts,
}

impl Server {
    pub async fn init(opts: Opts) -> ServerResult<Server> {
        let listener = Self::get_listener(&opts).await?;

        let storage = Storage::open(opts.data_dir.clone())?;
        let state = Arc::new(AppState {
            storage,
            sessions: SessionStore::new(),
        });

        info!(target: LOG_TARGET, "Listening on {}", listener.local_addr()?);
        Ok(Self {
            listener,
            state,
            opts,
        })
    }

    pub async fn get_listener(opts: &Opts) -> ServerResult<TcpListener> {
        let socket = {
            let addr = SocketAddr::from_str(&opts.listen).context(ListenAddrSnafu)?;

            let socket = if addr.is_ipv4() {
                TcpSocket::new_v4()?
            } else {
                TcpSocket::new_v6()?
            };
            if opts.reuseport {
                #[cfg(unix)]
                socket.set_reuseport(true)?;
            }
            socket.set_nodelay(true)?;

            socket.bind(addr)?;

            socket
        };

        Ok(socket.listen(1024)?)
    }

    pub async fn run(self) -> ServerResult<()> {
        let listen = self.addr()?;
        let router = routes::route_handler(self.state.clone()).layer(cors_layer(&self.opts, listen)?);

        info!(target: LOG_TARGET, "Starting server");
        axum::serve(self.listener, router.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }

    pub fn addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}

fn cors_layer(opts: &Opts, listen: SocketAddr) -> ServerResult<CorsLayer> {
    let origin = opts
        .cors_origin
        .clone()
        .unwrap_or_else(|| format!("http://{listen}"));

    Ok(CorsLayer::new()
        .allow_credentials(true)
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400))
        .allow_origin(origin.parse::<HeaderValue>().context(CorsSnafu)?)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
