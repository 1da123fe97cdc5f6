//! HTTP listener lifecycle.
use std::{future::Future, io, net::SocketAddr, sync::Arc};

use axum::{extract::Request, response::Response, serve::Listener, Router};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::{oneshot, Mutex},
};
use tracing::{debug, info, warn};

use super::router::{RequestRouter, RouteTable};
use crate::{config::RpcConfig, error::ServerError};

/// RPC server of the node.
///
/// Routes can be registered at any time; the running server picks them up
/// without a restart.
pub struct RpcServer<R = RouteTable> {
    cfg: RpcConfig,
    router: Arc<R>,
    running: Mutex<Option<Running>>,
}

struct Running {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    listener_closed: oneshot::Receiver<()>,
}

impl RpcServer<RouteTable> {
    /// A stopped server with an empty route table.
    pub fn new(cfg: RpcConfig) -> Self {
        Self::with_router(cfg, RouteTable::new())
    }
}

impl<R: RequestRouter> RpcServer<R> {
    /// A stopped server dispatching through `router`.
    pub fn with_router(cfg: RpcConfig, router: R) -> Self {
        Self {
            cfg,
            router: Arc::new(router),
            running: Mutex::new(None),
        }
    }

    /// Binds `address:port` and serves on a background task.
    ///
    /// Returns once the socket is bound. On bind failure the server stays
    /// stopped.
    pub async fn start(&self) -> Result<(), ServerError> {
        let mut running = self.running.lock().await;
        if let Some(r) = running.as_ref() {
            return Err(ServerError::AlreadyRunning(r.addr));
        }

        let listen_addr = self.cfg.listen_addr();
        let listener = TcpListener::bind(&listen_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: listen_addr,
                source,
            })?;
        let addr = listener.local_addr()?;

        let (closed_tx, closed_rx) = oneshot::channel();
        let listener = ClosingListener {
            inner: listener,
            _closed: closed_tx,
        };
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = self.app();

        tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(err) = served {
                warn!(%err, "RPC server exited with error");
            }
        });

        info!(listening_on = %addr, "RPC server started");
        *running = Some(Running {
            addr,
            shutdown: shutdown_tx,
            listener_closed: closed_rx,
        });
        Ok(())
    }

    /// Closes the listening socket. A no-op if the server is not running.
    ///
    /// Returns once the socket is released. In-flight requests are left to
    /// finish on their own.
    pub async fn stop(&self) -> Result<(), ServerError> {
        let Some(running) = self.running.lock().await.take() else {
            return Ok(());
        };
        let _ = running.shutdown.send(());
        // resolves when the serve loop drops the listener
        let _ = running.listener_closed.await;
        info!(addr = %running.addr, "RPC server stopped");
        Ok(())
    }

    /// Address actually bound, while running.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.running.lock().await.as_ref().map(|r| r.addr)
    }

    /// Whether the server is listening.
    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }

    /// Registers `handler` for requests matching `pattern` and `method`.
    pub fn register_handler<F, Fut>(
        &self,
        pattern: &str,
        method: &str,
        handler: F,
    ) -> Result<(), ServerError>
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.register_route(
            pattern,
            method,
            Arc::new(move |req: Request| -> super::HandlerFuture { Box::pin(handler(req)) }),
        )
    }

    fn app(&self) -> Router {
        let router = self.router.clone();
        Router::new().fallback(move |req: Request| {
            let router = router.clone();
            async move {
                debug!(method = %req.method(), path = %req.uri().path(), "RPC request");
                router.dispatch(req).await
            }
        })
    }
}

/// Signals through its dropped sender once the serve loop releases the socket.
struct ClosingListener {
    inner: TcpListener,
    _closed: oneshot::Sender<()>,
}

impl Listener for ClosingListener {
    type Io = TcpStream;
    type Addr = SocketAddr;

    fn accept(&mut self) -> impl Future<Output = (Self::Io, Self::Addr)> + Send {
        <TcpListener as Listener>::accept(&mut self.inner)
    }

    fn local_addr(&self) -> io::Result<Self::Addr> {
        <TcpListener as Listener>::local_addr(&self.inner)
    }
}
