use crate::handler::Handler;
use crate::ConsumerError;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

pub use self::chain::{compose, Chain};
pub use self::logger::logger;

mod chain;
mod logger;
mod post;
mod pre;

type Wrap<T> = Arc<dyn Fn(Handler<T>) -> Handler<T> + Send + Sync + 'static>;

/// A handler transformer. Please refer to the [Middleware](./index.html#middleware) section for more info.
///
/// A middleware receives the next handler of the chain and returns a new handler which usually does something
/// before and/or after delegating to it. The router nests its middlewares in declaration order: the first one
/// is the outermost and sees the request first and the response last.
///
/// The `T` type parameter is the request body type.
pub struct Middleware<T> {
    wrap: Wrap<T>,
}

impl<T: Send + 'static> Middleware<T> {
    /// Creates a middleware from a function wrapping the next handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use consumer_router::{Handler, Middleware, Router};
    /// use http_body_util::Full;
    /// use hyper::{body::Bytes, Request};
    ///
    /// let add_header = Middleware::new(|next: Handler<Full<Bytes>>| {
    ///     Handler::new(move |req: Request<Full<Bytes>>| {
    ///         let next = next.clone();
    ///         async move {
    ///             next.call(req).await.map(|mut res| {
    ///                 res.headers_mut().insert("x-powered-by", "consumer-router".parse().unwrap());
    ///                 res
    ///             })
    ///         }
    ///     })
    /// });
    ///
    /// let router = Router::builder().middleware(add_header).build().unwrap();
    /// # let _ = router;
    /// ```
    pub fn new<W>(wrap: W) -> Middleware<T>
    where
        W: Fn(Handler<T>) -> Handler<T> + Send + Sync + 'static,
    {
        Middleware { wrap: Arc::new(wrap) }
    }

    /// Creates a middleware which transforms the request before the next handler runs. Returning an error
    /// skips the rest of the chain and renders the error instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use consumer_router::{ConsumerError, Middleware, Router};
    /// use http::StatusCode;
    /// use http_body_util::Full;
    /// use hyper::{body::Bytes, Request};
    ///
    /// let auth = Middleware::pre(|req: Request<Full<Bytes>>| async move {
    ///     if req.headers().contains_key("authorization") {
    ///         Ok(req)
    ///     } else {
    ///         Err(ConsumerError::new(StatusCode::UNAUTHORIZED, "missing credentials"))
    ///     }
    /// });
    ///
    /// let router = Router::builder().middleware(auth).build().unwrap();
    /// # let _ = router;
    /// ```
    pub fn pre<H, R>(handler: H) -> Middleware<T>
    where
        H: Fn(Request<T>) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Request<T>, ConsumerError>> + Send + 'static,
    {
        pre::wrap(handler)
    }

    /// Creates a middleware which transforms the response of the next handler. It only runs when the next
    /// handler succeeded.
    ///
    /// # Examples
    ///
    /// ```
    /// use consumer_router::{Middleware, Router};
    /// use http_body_util::Full;
    /// use hyper::{body::Bytes, Response};
    ///
    /// let router = Router::<Full<Bytes>>::builder()
    ///     .middleware(Middleware::post(|mut res: Response<Full<Bytes>>| async move {
    ///         res.headers_mut().insert("cache-control", "no-store".parse().unwrap());
    ///         Ok(res)
    ///     }))
    ///     .build()
    ///     .unwrap();
    /// # let _ = router;
    /// ```
    pub fn post<H, R>(handler: H) -> Middleware<T>
    where
        H: Fn(Response<Full<Bytes>>) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, ConsumerError>> + Send + 'static,
    {
        post::wrap(handler)
    }
}

impl<T> Middleware<T> {
    /// Wraps `next` with this middleware.
    pub fn wrap(&self, next: Handler<T>) -> Handler<T> {
        (self.wrap)(next)
    }
}

impl<T> Clone for Middleware<T> {
    fn clone(&self) -> Self {
        Middleware {
            wrap: Arc::clone(&self.wrap),
        }
    }
}

impl<T> Debug for Middleware<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Middleware {{ .. }}")
    }
}
