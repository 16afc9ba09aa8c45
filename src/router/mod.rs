use crate::constants;
use crate::dispatcher::{Dispatcher, Endpoint};
use crate::handler::Handler;
use crate::middleware::Chain;
use crate::registry::Registry;
use crate::route::Route;
use crate::{ConsumerError, Error};
use http::header::{self, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

pub use self::builder::RouterBuilder;

mod builder;

/// The function called with each bound path and its method names once a router is consumed.
pub type PrintMethod = Arc<dyn Fn(&str, &[&str]) + Send + Sync + 'static>;

/// The default [`PrintMethod`]: one `[METHOD] path` line per method on standard output.
pub fn print_method(pattern: &str, methods: &[&str]) {
    for method in methods {
        println!("[{:<6}] {}", method, pattern);
    }
}

/// What an endpoint does with a request whose method has no route under the matched pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodFallback {
    /// Leave the request unhandled, the endpoint resolves to `None`.
    #[default]
    Silent,
    /// Answer `405 Method Not Allowed` with an `Allow` header listing the pattern's methods.
    MethodNotAllowed,
}

/// A finalized set of routes and middlewares, ready to be bound into a [`Dispatcher`].
///
/// A `Router` can't be modified, it's built with a [`RouterBuilder`] and consumed exactly once.
///
/// # Examples
///
/// ```
/// use consumer_router::{Router, ServeMux};
/// use http_body_util::Full;
/// use hyper::{body::Bytes, Request, Response};
///
/// async fn home(_: Request<Full<Bytes>>) -> Result<Response<Full<Bytes>>, consumer_router::ConsumerError> {
///     Ok(Response::new(Full::new(Bytes::from("home"))))
/// }
///
/// # fn run() -> consumer_router::Result<()> {
/// let mut router = Router::builder().get("/", home).build()?;
/// let mut mux = ServeMux::new();
///
/// router.consume("", &mut mux)?;
/// assert!(router.consume("", &mut mux).is_err());
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
pub struct Router<T> {
    registry: Registry<T>,
    chain: Chain<T>,
    print_method: PrintMethod,
    method_fallback: MethodFallback,
    consumed: bool,
}

impl<T: Send + 'static> Router<T> {
    /// Returns a new builder with the default logger as its only middleware.
    pub fn builder() -> RouterBuilder<T> {
        RouterBuilder::default()
    }

    /// Binds one endpoint per pattern into `dispatcher`, at `prefix + pattern`.
    ///
    /// The middleware chain is composed around every route handler here, once. All the endpoints are handed to
    /// [`Dispatcher::bind_all`] as a single batch, and each bound path is reported through the print method only
    /// once the whole batch is bound.
    ///
    /// If binding fails, nothing is reported and the router stays unconsumed. Once a call succeeded, any further
    /// call fails with [`Error::AlreadyConsumed`] without touching the dispatcher.
    pub fn consume<D>(&mut self, prefix: &str, dispatcher: &mut D) -> crate::Result<()>
    where
        D: Dispatcher<T> + ?Sized,
    {
        if self.consumed {
            return Err(Error::AlreadyConsumed);
        }

        let mut endpoints = Vec::with_capacity(self.registry.len());
        let mut report = Vec::with_capacity(self.registry.len());
        for (pattern, routes) in self.registry.iter() {
            let path = format!("{}{}", prefix, pattern);

            let mut methods: Vec<&str> = routes.keys().map(Method::as_str).collect();
            methods.sort_unstable();

            endpoints.push((path.clone(), self.endpoint(routes)));
            report.push((path, methods));
        }

        dispatcher.bind_all(endpoints)?;
        self.consumed = true;

        for (path, methods) in &report {
            tracing::debug!(%path, methods = methods.len(), "endpoint bound");
            (self.print_method)(path, methods);
        }

        Ok(())
    }

    fn endpoint(&self, routes: &HashMap<Method, Route<T>>) -> Endpoint<T> {
        let handlers: HashMap<Method, Handler<T>> = routes
            .iter()
            .map(|(method, route)| (method.clone(), self.chain.compose(route.handler.clone())))
            .collect();
        let handlers = Arc::new(handlers);

        let mut allowed: Vec<&str> = routes.keys().map(Method::as_str).collect();
        allowed.sort_unstable();
        let allow = HeaderValue::from_str(&allowed.join(", ")).ok();

        let method_fallback = self.method_fallback;

        Endpoint::new(move |req: Request<T>| {
            let handler = handlers.get(req.method()).cloned();
            let method = req.method().clone();
            let allow = allow.clone();

            async move {
                let handler = match handler {
                    Some(handler) => handler,
                    None => return method_fallback_response(method_fallback, allow),
                };

                match handler.call(req).await {
                    Ok(res) => Ok(Some(res)),
                    Err(err) => {
                        tracing::warn!(%method, status = %err.status(), error = %err, "handler failed");
                        err.into_response().map(Some)
                    }
                }
            }
        })
    }

    /// Whether `consume` already ran.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    pub fn registry(&self) -> &Registry<T> {
        &self.registry
    }

    pub fn chain(&self) -> &Chain<T> {
        &self.chain
    }

    pub fn method_fallback(&self) -> MethodFallback {
        self.method_fallback
    }
}

fn method_fallback_response(
    method_fallback: MethodFallback,
    allow: Option<HeaderValue>,
) -> crate::Result<Option<Response<Full<Bytes>>>> {
    match method_fallback {
        MethodFallback::Silent => Ok(None),
        MethodFallback::MethodNotAllowed => {
            let mut res =
                ConsumerError::new(StatusCode::METHOD_NOT_ALLOWED, constants::METHOD_NOT_ALLOWED_DETAIL).into_response()?;
            if let Some(allow) = allow {
                res.headers_mut().insert(header::ALLOW, allow);
            }
            Ok(Some(res))
        }
    }
}

impl<T> Debug for Router<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ routes: {:?}, chain: {:?}, method_fallback: {:?}, consumed: {:?} }}",
            self.registry, self.chain, self.method_fallback, self.consumed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServeMux;
    use http_body_util::BodyExt;
    use std::sync::Mutex;

    type Body = Full<Bytes>;

    fn text(body: &'static str) -> impl Fn(Request<Body>) -> std::future::Ready<crate::handler::HandlerResult> {
        move |_| std::future::ready(Ok(Response::new(Full::new(Bytes::from(body)))))
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    async fn body_text(res: Response<Body>) -> String {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn should_dispatch_by_method() {
        let mut router = Router::builder()
            .without_logger()
            .get("/users", text("list"))
            .post("/users", text("create"))
            .build()
            .unwrap();
        let mut mux = ServeMux::new();
        router.consume("", &mut mux).unwrap();

        let endpoint = mux.endpoint("/users").unwrap();
        let res = endpoint.call(request(Method::GET, "/users")).await.unwrap().unwrap();
        assert_eq!(body_text(res).await, "list");
        let res = endpoint.call(request(Method::POST, "/users")).await.unwrap().unwrap();
        assert_eq!(body_text(res).await, "create");
        assert!(endpoint.call(request(Method::DELETE, "/users")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_answer_405_when_configured() {
        let mut router = Router::builder()
            .get("/users", text("list"))
            .post("/users", text("create"))
            .method_fallback(MethodFallback::MethodNotAllowed)
            .build()
            .unwrap();
        let mut mux = ServeMux::new();
        router.consume("", &mut mux).unwrap();

        let res = mux
            .endpoint("/users")
            .unwrap()
            .call(request(Method::PUT, "/users"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.headers()[header::ALLOW], "GET, POST");
        assert_eq!(body_text(res).await, r#"{"detail":"405 method not allowed"}"#);
    }

    #[tokio::test]
    async fn should_render_handler_errors() {
        let mut router = Router::builder()
            .get("/fail", |_: Request<Body>| async move {
                Err(ConsumerError::from_cause(
                    "password=hunter2",
                    StatusCode::SERVICE_UNAVAILABLE,
                    "database unavailable",
                ))
            })
            .build()
            .unwrap();
        let mut mux = ServeMux::new();
        router.consume("", &mut mux).unwrap();

        let res = mux
            .endpoint("/fail")
            .unwrap()
            .call(request(Method::GET, "/fail"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json; charset=utf-8");
        assert_eq!(body_text(res).await, r#"{"detail":"database unavailable"}"#);
    }

    #[test]
    fn should_reject_second_consume() {
        let mut router = Router::builder().get("/", text("home")).build().unwrap();
        let mut mux = ServeMux::new();

        router.consume("", &mut mux).unwrap();
        assert!(router.is_consumed());

        let mut other = ServeMux::new();
        assert!(matches!(router.consume("/v2", &mut other), Err(Error::AlreadyConsumed)));
        assert!(other.is_empty());
    }

    #[test]
    fn should_report_sorted_methods_per_path() {
        let reported = Arc::new(Mutex::new(Vec::new()));
        let sink = reported.clone();

        let mut router = Router::builder()
            .put("/users", text("replace"))
            .get("/users", text("list"))
            .delete("/users", text("remove"))
            .get("/health", text("ok"))
            .set_print_method(move |path: &str, methods: &[&str]| {
                sink.lock().unwrap().push(format!("{} {}", path, methods.join(",")));
            })
            .build()
            .unwrap();
        router.consume("/api", &mut ServeMux::new()).unwrap();

        assert_eq!(
            *reported.lock().unwrap(),
            vec!["/api/health GET", "/api/users DELETE,GET,PUT"]
        );
    }

    #[test]
    fn should_bind_nothing_when_a_path_clashes() {
        let mut mux = ServeMux::new();
        let mut first = Router::builder()
            .get("/users", text("a"))
            .set_print_method(|_: &str, _: &[&str]| {})
            .build()
            .unwrap();
        first.consume("", &mut mux).unwrap();

        let reported = Arc::new(Mutex::new(Vec::new()));
        let sink = reported.clone();
        let mut second = Router::builder()
            .get("/aaa", text("b"))
            .post("/users", text("c"))
            .set_print_method(move |path: &str, _: &[&str]| sink.lock().unwrap().push(path.to_owned()))
            .build()
            .unwrap();

        assert!(matches!(second.consume("", &mut mux), Err(Error::DuplicatePath(ref path)) if path == "/users"));
        assert_eq!(mux.paths(), vec!["/users"]);
        assert!(reported.lock().unwrap().is_empty());
        assert!(!second.is_consumed());

        // Nothing was bound, so the same router can be consumed elsewhere.
        second.consume("/v2", &mut mux).unwrap();
        assert_eq!(mux.paths(), vec!["/users", "/v2/aaa", "/v2/users"]);
        assert_eq!(*reported.lock().unwrap(), vec!["/v2/aaa", "/v2/users"]);
        assert!(matches!(second.consume("/v3", &mut mux), Err(Error::AlreadyConsumed)));
    }
}
