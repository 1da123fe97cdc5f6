//! Request-serving front end: a TCP listener plus a mutable route table.
pub mod router;
pub mod server;

pub use router::{HandlerFuture, RequestHandler, RequestRouter, RouteTable};
pub use server::RpcServer;
