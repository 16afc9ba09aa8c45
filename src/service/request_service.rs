use crate::dispatcher::ServeMux;
use crate::ext::RemoteAddr;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{service::Service, Request, Response};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

/// The per-connection [`Service`] built by [`RouterService`](crate::RouterService).
///
/// It tags every request with the peer address and hands it to the shared [`ServeMux`].
pub struct RequestService<T> {
    pub(crate) mux: Arc<ServeMux<T>>,
    pub(crate) remote_addr: SocketAddr,
}

impl<T> RequestService<T> {
    pub fn new(mux: Arc<ServeMux<T>>, remote_addr: SocketAddr) -> RequestService<T> {
        RequestService { mux, remote_addr }
    }
}

impl<T: Send + 'static> Service<Request<T>> for RequestService<T> {
    type Response = Response<Full<Bytes>>;
    type Error = crate::Error;
    #[allow(clippy::type_complexity)]
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, mut req: Request<T>) -> Self::Future {
        let mux = Arc::clone(&self.mux);
        req.extensions_mut().insert(RemoteAddr(self.remote_addr));

        Box::pin(async move { mux.serve(req).await })
    }
}

impl<T> Clone for RequestService<T> {
    fn clone(&self) -> Self {
        RequestService {
            mux: Arc::clone(&self.mux),
            remote_addr: self.remote_addr,
        }
    }
}

impl<T> std::fmt::Debug for RequestService<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RequestService {{ remote_addr: {} }}", self.remote_addr)
    }
}
