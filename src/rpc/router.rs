//! Route registration and dispatch, behind a trait so the router library can be swapped.
use std::{
    collections::BTreeMap,
    future::Future,
    panic::{self, AssertUnwindSafe},
    pin::Pin,
    sync::Arc,
};

use axum::{
    extract::Request,
    http::Method,
    response::Response,
    routing::{MethodFilter, MethodRouter},
    Router,
};
use parking_lot::RwLock;
use tower::ServiceExt;

use crate::error::ServerError;

/// Future returned by a [`RequestHandler`].
pub type HandlerFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Consumes a request and produces a response.
pub type RequestHandler = Arc<dyn Fn(Request) -> HandlerFuture + Send + Sync + 'static>;

/// Mutable routing table consulted for every inbound request.
pub trait RequestRouter: Send + Sync + 'static {
    /// Routes requests matching `pattern` and `method` to `handler`.
    ///
    /// Registering the same `(pattern, method)` again replaces the handler.
    fn register_route(
        &self,
        pattern: &str,
        method: &str,
        handler: RequestHandler,
    ) -> Result<(), ServerError>;

    /// Routes `req` to its handler. Unknown paths get `404 Not Found`, known
    /// paths with an unregistered method get `405 Method Not Allowed`.
    fn dispatch(&self, req: Request) -> HandlerFuture;
}

/// [`RequestRouter`] backed by an axum [`Router`] that is rebuilt on every
/// registration. Patterns use axum syntax (`/blocks/{height}`).
#[derive(Clone, Default)]
pub struct RouteTable {
    inner: Arc<RwLock<Routes>>,
}

#[derive(Default)]
struct Routes {
    // pattern -> method -> (filter, handler)
    handlers: BTreeMap<String, BTreeMap<String, (MethodFilter, RequestHandler)>>,
    router: Router,
}

impl RouteTable {
    /// An empty table; every request is answered with `404`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered `(pattern, method)` pairs.
    pub fn len(&self) -> usize {
        self.inner.read().handlers.values().map(BTreeMap::len).sum()
    }

    /// Whether no route is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RequestRouter for RouteTable {
    /// Patterns axum rejects (`/old/:x`, or a capture named differently from
    /// one already registered at the same position) yield
    /// [`ServerError::InvalidRoute`] and leave the table unchanged.
    fn register_route(
        &self,
        pattern: &str,
        method: &str,
        handler: RequestHandler,
    ) -> Result<(), ServerError> {
        if !pattern.starts_with('/') {
            return Err(ServerError::InvalidRoute(pattern.to_owned()));
        }
        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|_| ServerError::UnsupportedMethod(method.to_owned()))?;
        let filter = MethodFilter::try_from(method.clone())
            .map_err(|_| ServerError::UnsupportedMethod(method.to_string()))?;

        let mut routes = self.inner.write();
        let mut candidate = routes.handlers.clone();
        candidate
            .entry(pattern.to_owned())
            .or_default()
            .insert(method.to_string(), (filter, handler));
        // axum reports unroutable patterns by panicking
        let router = panic::catch_unwind(AssertUnwindSafe(|| build_router(&candidate)))
            .map_err(|_| ServerError::InvalidRoute(pattern.to_owned()))?;

        routes.handlers = candidate;
        routes.router = router;
        Ok(())
    }

    fn dispatch(&self, req: Request) -> HandlerFuture {
        let router = self.inner.read().router.clone();
        Box::pin(async move {
            match router.oneshot(req).await {
                Ok(res) => res,
                Err(never) => match never {},
            }
        })
    }
}

fn build_router(
    handlers: &BTreeMap<String, BTreeMap<String, (MethodFilter, RequestHandler)>>,
) -> Router {
    handlers.iter().fold(Router::new(), |router, (pattern, methods)| {
        let method_router = methods
            .values()
            .fold(MethodRouter::new(), |mr, (filter, handler)| {
                let handler = handler.clone();
                mr.on(*filter, move |req: Request| handler(req))
            });
        router.route(pattern, method_router)
    })
}
