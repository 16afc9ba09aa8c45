//! Extension traits for the request type.

use hyper::Request;
use std::net::SocketAddr;

#[derive(Debug, Clone, Copy)]
pub(crate) struct RemoteAddr(pub(crate) SocketAddr);

/// Accessors for the data [`RequestService`](crate::RequestService) attaches to incoming requests.
pub trait RequestExt {
    /// The peer address of the connection the request came from, when served through
    /// [`RouterService`](crate::RouterService).
    fn remote_addr(&self) -> Option<SocketAddr>;
}

impl<T> RequestExt for Request<T> {
    fn remote_addr(&self) -> Option<SocketAddr> {
        self.extensions().get::<RemoteAddr>().map(|addr| addr.0)
    }
}
