//! `consumer-router` keeps a registry of routes and a chain of middlewares, then binds them into a path-based
//! HTTP dispatcher in one shot.
//!
//! Its core features:
//!
//! - A route registry indexed by pattern, then by method, with incremental add and remove.
//!
//! - Onion-style middleware nesting: the first declared middleware is the outermost one.
//!
//! - A one-shot [`consume`](./struct.Router.html#method.consume) step binding one method-dispatching endpoint per
//!   pattern into any [`Dispatcher`](./trait.Dispatcher.html).
//!
//! - A structured [`ConsumerError`](./struct.ConsumerError.html) rendered as a `{"detail": "..."}` JSON response,
//!   keeping its cause on the server.
//!
//! ## Basic Example
//!
//! ```no_run
//! use consumer_router::prelude::*;
//! use consumer_router::{ConsumerError, Middleware, Router, RouterService, ServeMux};
//! use http::StatusCode;
//! use http_body_util::Full;
//! use hyper::body::{Bytes, Incoming};
//! use hyper::service::Service;
//! use hyper::{Request, Response};
//! use hyper_util::rt::{TokioExecutor, TokioIo};
//! use hyper_util::server::conn::auto::Builder;
//! use std::net::SocketAddr;
//! use tokio::net::TcpListener;
//!
//! // A handler for "/health".
//! async fn health_handler(_: Request<Incoming>) -> Result<Response<Full<Bytes>>, ConsumerError> {
//!     Ok(Response::new(Full::new(Bytes::from("ok"))))
//! }
//!
//! // A handler for "/users" which fails.
//! async fn users_handler(_: Request<Incoming>) -> Result<Response<Full<Bytes>>, ConsumerError> {
//!     Err(ConsumerError::new(StatusCode::SERVICE_UNAVAILABLE, "the user store is offline"))
//! }
//!
//! // A middleware which rejects requests coming from an unknown address.
//! async fn known_peers(req: Request<Incoming>) -> Result<Request<Incoming>, ConsumerError> {
//!     match req.remote_addr() {
//!         Some(_) => Ok(req),
//!         None => Err(ConsumerError::new(StatusCode::FORBIDDEN, "unknown peer")),
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let mut router = Router::builder()
//!         .get("/health", health_handler)
//!         .get("/users", users_handler)
//!         .middleware(Middleware::pre(known_peers))
//!         .build()?;
//!
//!     // Prints "[GET   ] /api/health" and "[GET   ] /api/users".
//!     let mut mux = ServeMux::new();
//!     router.consume("/api", &mut mux)?;
//!
//!     let service = RouterService::new(mux);
//!     let addr = SocketAddr::from(([127, 0, 0, 1], 3001));
//!     let listener = TcpListener::bind(addr).await?;
//!     println!("App is running on: {}", addr);
//!
//!     loop {
//!         let (stream, _) = listener.accept().await?;
//!         let router_service = service.clone();
//!
//!         tokio::spawn(async move {
//!             let request_service = router_service.call(&stream).await.unwrap();
//!             let io = TokioIo::new(stream);
//!             let builder = Builder::new(TokioExecutor::new());
//!             if let Err(err) = builder.serve_connection(io, request_service).await {
//!                 eprintln!("Error serving connection: {:?}", err);
//!             }
//!         });
//!     }
//! }
//! ```
//!
//! ## Routing
//!
//! ### Route Handlers
//!
//! A handler is a function receiving a [`Request<T>`](https://docs.rs/hyper/1/hyper/struct.Request.html) and
//! returning a future of `Result<Response<Full<Bytes>>, ConsumerError>`. Routes are identified by their pattern and
//! method: registering the same pair twice keeps the latest handler.
//!
//! ```
//! use consumer_router::Router;
//! use http_body_util::Full;
//! use hyper::{body::Bytes, Method, Request, Response};
//!
//! # fn run() -> Router<Full<Bytes>> {
//! let router = Router::builder()
//!     .get("/users", |_: Request<Full<Bytes>>| async move { Ok(Response::new(Full::new(Bytes::from("first")))) })
//!     // Replaces the handler above.
//!     .get("/users", |_: Request<Full<Bytes>>| async move { Ok(Response::new(Full::new(Bytes::from("second")))) })
//!     .post("/users", |_: Request<Full<Bytes>>| async move { Ok(Response::new(Full::new(Bytes::new()))) })
//!     // Drops POST from every pattern.
//!     .delete_by_method(Method::POST)
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! Patterns are matched exactly by the dispatcher, as `prefix + pattern`. There are no path parameters nor
//! wildcards.
//!
//! ### Unmatched Methods
//!
//! The dispatcher only knows paths, the bound endpoint picks the route by method. By default, a method without a
//! route is left unhandled: the endpoint resolves to `None` and [`ServeMux`](./struct.ServeMux.html) answers an
//! empty `200 OK`. Use [`MethodFallback::MethodNotAllowed`](./enum.MethodFallback.html) to answer `405` instead.
//!
//! ## Middleware
//!
//! A middleware wraps the next handler of the chain. Every router starts with the access
//! [`logger`](./middleware/fn.logger.html) at the head of its chain, which emits a `tracing` event per request.
//! Remove it with [`without_logger`](./struct.RouterBuilder.html#method.without_logger).
//!
//! Middlewares nest in declaration order: with `[m1, m2]` around handler `h`, a request runs m1, then m2, then `h`,
//! and the response goes back through m2, then m1.
//!
//! ### Pre Middleware
//!
//! A pre middleware transforms the request before the rest of the chain runs. An error short-circuits the chain.
//!
//! ```
//! use consumer_router::{Middleware, Router};
//! use http_body_util::Full;
//! use hyper::{body::Bytes, Request};
//!
//! async fn tag_request(mut req: Request<Full<Bytes>>) -> Result<Request<Full<Bytes>>, consumer_router::ConsumerError> {
//!     req.headers_mut().insert("x-tagged", "1".parse().unwrap());
//!     Ok(req)
//! }
//!
//! # fn run() -> Router<Full<Bytes>> {
//! let router = Router::builder()
//!     .middleware(Middleware::pre(tag_request))
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! ### Post Middleware
//!
//! A post middleware transforms the response of the rest of the chain, when it succeeded.
//!
//! ```
//! use consumer_router::{Middleware, Router};
//! use http_body_util::Full;
//! use hyper::{body::Bytes, Response};
//!
//! async fn no_store(mut res: Response<Full<Bytes>>) -> Result<Response<Full<Bytes>>, consumer_router::ConsumerError> {
//!     res.headers_mut().insert("cache-control", "no-store".parse().unwrap());
//!     Ok(res)
//! }
//!
//! # fn run() -> Router<Full<Bytes>> {
//! let router = Router::builder()
//!     .middleware(Middleware::post(no_store))
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! ## Error Handling
//!
//! Handlers and middlewares fail with a [`ConsumerError`](./struct.ConsumerError.html). The endpoint renders it as
//! a JSON body with the stored status and `Content-Type: application/json; charset=utf-8`, and logs it with its
//! cause. Configuration mistakes (an invalid pattern, a duplicate path, consuming twice) are reported as
//! [`Error`](./enum.Error.html) values instead.

pub use self::consumer_error::ConsumerError;
pub use self::dispatcher::{Dispatcher, Endpoint, EndpointFuture, ServeMux};
pub use self::error::Error;
pub use self::handler::{Handler, HandlerFuture, HandlerResult};
pub use self::middleware::Middleware;
pub use self::registry::Registry;
pub use self::route::Route;
pub use self::router::{print_method, MethodFallback, PrintMethod, Router, RouterBuilder};
pub use self::service::{RequestService, RouterService};

mod constants;
mod consumer_error;
mod dispatcher;
mod error;
pub mod ext;
mod handler;
mod helpers;
pub mod middleware;
pub mod prelude;
mod registry;
mod route;
mod router;
mod service;

/// A Result type often returned from methods that can have consumer-router errors.
pub type Result<T> = std::result::Result<T, Error>;
