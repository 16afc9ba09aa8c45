use crate::dispatcher::ServeMux;
use crate::service::request_service::RequestService;
use hyper::body::Incoming;
use hyper::service::Service;
use std::convert::Infallible;
use std::future::{ready, Ready};
use std::sync::Arc;
use tokio::net::TcpStream;

/// A [`Service`](https://docs.rs/hyper/1/hyper/service/trait.Service.html) producing one
/// [`RequestService`] per accepted connection.
///
/// # Examples
///
/// ```no_run
/// use consumer_router::{ConsumerError, Router, RouterService, ServeMux};
/// use http_body_util::Full;
/// use hyper::body::{Bytes, Incoming};
/// use hyper::service::Service;
/// use hyper::{Request, Response};
/// use hyper_util::rt::{TokioExecutor, TokioIo};
/// use hyper_util::server::conn::auto::Builder;
/// use std::net::SocketAddr;
/// use tokio::net::TcpListener;
///
/// async fn home(_: Request<Incoming>) -> Result<Response<Full<Bytes>>, ConsumerError> {
///     Ok(Response::new(Full::new(Bytes::from("Home page"))))
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     let mut router = Router::builder().get("/", home).build()?;
///     let mut mux = ServeMux::new();
///     router.consume("", &mut mux)?;
///
///     let service = RouterService::new(mux);
///     let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 3001))).await?;
///
///     loop {
///         let (stream, _) = listener.accept().await?;
///         let router_service = service.clone();
///
///         tokio::spawn(async move {
///             let request_service = router_service.call(&stream).await.unwrap();
///             let io = TokioIo::new(stream);
///             if let Err(err) = Builder::new(TokioExecutor::new()).serve_connection(io, request_service).await {
///                 eprintln!("Error serving connection: {:?}", err);
///             }
///         });
///     }
/// }
/// ```
#[derive(Debug)]
pub struct RouterService {
    mux: Arc<ServeMux<Incoming>>,
}

impl RouterService {
    pub fn new(mux: ServeMux<Incoming>) -> RouterService {
        RouterService { mux: Arc::new(mux) }
    }
}

impl Clone for RouterService {
    fn clone(&self) -> Self {
        RouterService {
            mux: Arc::clone(&self.mux),
        }
    }
}

impl Service<&TcpStream> for RouterService {
    type Response = RequestService<Incoming>;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn call(&self, conn: &TcpStream) -> Self::Future {
        let addr = match conn.peer_addr() {
            Ok(addr) => addr,
            Err(_) => std::net::SocketAddr::from(([0, 0, 0, 0], 0)),
        };

        ready(Ok(RequestService::new(Arc::clone(&self.mux), addr)))
    }
}
