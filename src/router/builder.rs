use super::{print_method, MethodFallback, PrintMethod, Router};
use crate::handler::HandlerResult;
use crate::middleware::{Chain, Middleware};
use crate::registry::Registry;
use crate::route::Route;
use crate::Error;
use hyper::{Method, Request};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

/// Builder for the [Router](./struct.Router.html) type.
///
/// This `RouterBuilder<T>` type accepts a single type parameter: `T`, the request body type handed to the route
/// handlers and the middlewares.
///
/// Every builder starts with the default access [logger](./middleware/fn.logger.html) at the head of its middleware
/// chain, see [`without_logger`](#method.without_logger).
///
/// # Examples
///
/// ```
/// use consumer_router::{Middleware, Router, RouterBuilder};
/// use http_body_util::Full;
/// use hyper::{body::Bytes, Method, Request, Response};
///
/// async fn home_handler(_: Request<Full<Bytes>>) -> Result<Response<Full<Bytes>>, consumer_router::ConsumerError> {
///     Ok(Response::new(Full::new(Bytes::from("home"))))
/// }
///
/// # fn run() -> consumer_router::Result<Router<Full<Bytes>>> {
/// let router = Router::builder()
///     .get("/", home_handler)
///     .post("/", home_handler)
///     .delete_by_method(Method::POST)
///     .middleware(Middleware::pre(|req| async move { Ok(req) }))
///     .build()?;
/// # Ok(router)
/// # }
/// # run().unwrap();
/// ```
pub struct RouterBuilder<T> {
    registry: Registry<T>,
    chain: Chain<T>,
    print_method: PrintMethod,
    method_fallback: MethodFallback,
}

impl<T: Send + 'static> RouterBuilder<T> {
    /// Creates a builder holding `routes`, with the default logger followed by `middlewares` as its chain.
    pub fn new<R, M>(routes: R, middlewares: M) -> RouterBuilder<T>
    where
        R: IntoIterator<Item = Route<T>>,
        M: IntoIterator<Item = Middleware<T>>,
    {
        RouterBuilder::default().add_routes(routes).add_middlewares(middlewares)
    }

    /// Validates the configuration and creates the [`Router`].
    ///
    /// Fails with [`Error::InvalidPattern`] when a pattern is empty, does not start with `/`, or contains a `%`.
    /// Request paths are percent-decoded before lookup, so patterns are written decoded (`/a b`, not `/a%20b`).
    pub fn build(self) -> crate::Result<Router<T>> {
        let invalid = |pattern: &&str| !pattern.starts_with('/') || pattern.contains('%');
        if let Some(pattern) = self.registry.patterns().find(invalid) {
            return Err(Error::InvalidPattern(pattern.to_owned()));
        }

        Ok(Router {
            registry: self.registry,
            chain: self.chain,
            print_method: self.print_method,
            method_fallback: self.method_fallback,
            consumed: false,
        })
    }

    /// Adds the routes, replacing any existing route with the same pattern and method.
    pub fn add_routes<I>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = Route<T>>,
    {
        self.registry.add_routes(routes);
        self
    }

    /// Adds a single route whose name is its pattern.
    pub fn route<P, H, R>(self, method: Method, pattern: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(Request<T>) -> R + Send + Sync + 'static,
        R: Future<Output = HandlerResult> + Send + 'static,
    {
        let pattern = pattern.into();
        let route = Route::new(pattern.clone(), method, pattern, handler);
        self.add_routes([route])
    }

    /// Adds a new route with `GET` method and the handler at the specified pattern.
    pub fn get<P, H, R>(self, pattern: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(Request<T>) -> R + Send + Sync + 'static,
        R: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(Method::GET, pattern, handler)
    }

    /// Adds a new route with `POST` method and the handler at the specified pattern.
    pub fn post<P, H, R>(self, pattern: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(Request<T>) -> R + Send + Sync + 'static,
        R: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(Method::POST, pattern, handler)
    }

    /// Adds a new route with `PUT` method and the handler at the specified pattern.
    pub fn put<P, H, R>(self, pattern: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(Request<T>) -> R + Send + Sync + 'static,
        R: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(Method::PUT, pattern, handler)
    }

    /// Adds a new route with `PATCH` method and the handler at the specified pattern.
    pub fn patch<P, H, R>(self, pattern: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(Request<T>) -> R + Send + Sync + 'static,
        R: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(Method::PATCH, pattern, handler)
    }

    /// Adds a new route with `DELETE` method and the handler at the specified pattern.
    pub fn delete<P, H, R>(self, pattern: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(Request<T>) -> R + Send + Sync + 'static,
        R: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(Method::DELETE, pattern, handler)
    }

    /// Adds a new route with `OPTIONS` method and the handler at the specified pattern.
    pub fn options<P, H, R>(self, pattern: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(Request<T>) -> R + Send + Sync + 'static,
        R: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(Method::OPTIONS, pattern, handler)
    }

    /// Removes `method` from every pattern. A pattern left without methods is removed too.
    pub fn delete_by_method(mut self, method: Method) -> Self {
        self.registry.delete_by_method(&method);
        self
    }

    /// Removes every route registered under `pattern`.
    pub fn delete_by_pattern<P: AsRef<str>>(mut self, pattern: P) -> Self {
        self.registry.delete_by_pattern(pattern.as_ref());
        self
    }

    /// Appends the middlewares to the tail of the chain.
    pub fn add_middlewares<I>(mut self, middlewares: I) -> Self
    where
        I: IntoIterator<Item = Middleware<T>>,
    {
        self.chain.append(middlewares);
        self
    }

    /// Appends one middleware to the tail of the chain.
    pub fn middleware(self, middleware: Middleware<T>) -> Self {
        self.add_middlewares([middleware])
    }

    /// Replaces the function reporting the bound paths on consume. The default is
    /// [`print_method`](./fn.print_method.html).
    pub fn set_print_method<F>(mut self, print_method: F) -> Self
    where
        F: Fn(&str, &[&str]) + Send + Sync + 'static,
    {
        self.print_method = Arc::new(print_method);
        self
    }

    /// Removes the head of the middleware chain, the default logger.
    ///
    /// Call it before adding middlewares: on a chain whose logger is already gone it removes the first middleware
    /// that was added, and on an empty chain it does nothing.
    pub fn without_logger(mut self) -> Self {
        if !self.chain.remove_default_logger() {
            tracing::debug!("without_logger called on an empty middleware chain");
        }
        self
    }

    /// Sets what endpoints do with a method that has no route under a bound pattern.
    pub fn method_fallback(mut self, method_fallback: MethodFallback) -> Self {
        self.method_fallback = method_fallback;
        self
    }
}

impl<T: Send + 'static> Default for RouterBuilder<T> {
    fn default() -> Self {
        RouterBuilder {
            registry: Registry::new(),
            chain: Chain::with_default_logger(),
            print_method: Arc::new(print_method),
            method_fallback: MethodFallback::default(),
        }
    }
}

impl<T> Debug for RouterBuilder<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ routes: {:?}, chain: {:?}, method_fallback: {:?} }}",
            self.registry, self.chain, self.method_fallback
        )
    }
}
