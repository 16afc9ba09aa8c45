use crate::ConsumerError;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The future returned by a [`Handler`].
pub type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send + 'static>>;

/// What a route handler produces: a response, or an error to render.
pub type HandlerResult = Result<Response<Full<Bytes>>, ConsumerError>;

/// A type-erased request handler.
///
/// Handlers are cheap to clone, the function itself is shared. This is the unit that middlewares wrap and that the
/// router stores for every `(pattern, method)` pair.
///
/// # Examples
///
/// ```
/// use consumer_router::Handler;
/// use http_body_util::Full;
/// use hyper::{body::Bytes, Request, Response};
///
/// let handler: Handler<Full<Bytes>> = Handler::new(|_req: Request<Full<Bytes>>| async move {
///     Ok(Response::new(Full::new(Bytes::from("ok"))))
/// });
/// # let _ = handler;
/// ```
pub struct Handler<T> {
    inner: Arc<dyn Fn(Request<T>) -> HandlerFuture + Send + Sync + 'static>,
}

impl<T: Send + 'static> Handler<T> {
    pub fn new<H, R>(handler: H) -> Handler<T>
    where
        H: Fn(Request<T>) -> R + Send + Sync + 'static,
        R: Future<Output = HandlerResult> + Send + 'static,
    {
        Handler {
            inner: Arc::new(move |req: Request<T>| -> HandlerFuture { Box::pin(handler(req)) }),
        }
    }

    /// Invokes the handler.
    pub fn call(&self, req: Request<T>) -> HandlerFuture {
        (self.inner)(req)
    }
}

impl<T> Clone for Handler<T> {
    fn clone(&self) -> Self {
        Handler {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Debug for Handler<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Handler {{ .. }}")
    }
}
