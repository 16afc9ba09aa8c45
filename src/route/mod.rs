use crate::handler::{Handler, HandlerResult};
use hyper::{Method, Request};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;

/// Represents a single route.
///
/// A route binds a handler to a `(pattern, method)` pair, which is also its identity inside the router: adding a
/// second route with the same pattern and method replaces the first one. The `name` is purely descriptive.
///
/// The `T` type parameter is the request body type handed to the handler.
///
/// # Examples
///
/// ```
/// use consumer_router::{Route, Router};
/// use http_body_util::Full;
/// use hyper::{body::Bytes, Method, Request, Response};
///
/// let route = Route::new("health check", Method::GET, "/health", |_: Request<Full<Bytes>>| async move {
///     Ok(Response::new(Full::new(Bytes::from("ok"))))
/// });
///
/// let router = Router::builder().add_routes([route]).build().unwrap();
/// # let _ = router;
/// ```
pub struct Route<T> {
    pub(crate) name: String,
    pub(crate) method: Method,
    pub(crate) pattern: String,
    pub(crate) handler: Handler<T>,
}

impl<T: Send + 'static> Route<T> {
    pub fn new<N, P, H, R>(name: N, method: Method, pattern: P, handler: H) -> Route<T>
    where
        N: Into<String>,
        P: Into<String>,
        H: Fn(Request<T>) -> R + Send + Sync + 'static,
        R: Future<Output = HandlerResult> + Send + 'static,
    {
        Route::with_handler(name, method, pattern, Handler::new(handler))
    }

    /// Creates a route from an already type-erased handler.
    pub fn with_handler<N, P>(name: N, method: Method, pattern: P, handler: Handler<T>) -> Route<T>
    where
        N: Into<String>,
        P: Into<String>,
    {
        Route {
            name: name.into(),
            method,
            pattern: pattern.into(),
            handler,
        }
    }
}

impl<T> Route<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn handler(&self) -> &Handler<T> {
        &self.handler
    }
}

impl<T> Clone for Route<T> {
    fn clone(&self) -> Self {
        Route {
            name: self.name.clone(),
            method: self.method.clone(),
            pattern: self.pattern.clone(),
            handler: self.handler.clone(),
        }
    }
}

impl<T> Debug for Route<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ name: {:?}, method: {:?}, pattern: {:?} }}",
            self.name, self.method, self.pattern
        )
    }
}
