#![allow(dead_code)]

use consumer_router::{RouterService, ServeMux};
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::service::Service;
use hyper::{Request, Response};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot::{self, Sender};

pub struct Serve {
    addr: SocketAddr,
    tx: Sender<()>,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl Serve {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn new_request(&self, method: &str, route: &str) -> http::request::Builder {
        http::request::Request::builder()
            .method(method.to_ascii_uppercase().as_str())
            .uri(format!("http://{}{}", self.addr(), route))
    }

    pub async fn send(&self, req: Request<Full<Bytes>>) -> Response<Incoming> {
        self.client.request(req).await.unwrap()
    }

    pub fn shutdown(self) {
        let _ = self.tx.send(());
    }
}

pub async fn serve(mux: ServeMux<Incoming>) -> Serve {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router_service = RouterService::new(mux);
    let (tx, mut rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        loop {
            let (stream, _) = tokio::select! {
                conn = listener.accept() => match conn {
                    Ok(conn) => conn,
                    Err(_) => continue,
                },
                _ = &mut rx => break,
            };

            let router_service = router_service.clone();
            tokio::spawn(async move {
                let request_service = router_service.call(&stream).await.expect("RouterService failed");
                let io = TokioIo::new(stream);
                let _ = Builder::new(TokioExecutor::new())
                    .serve_connection(io, request_service)
                    .await;
            });
        }
    });

    let client = Client::builder(TokioExecutor::new()).build_http();

    Serve { addr, tx, client }
}

pub async fn into_text<B>(body: B) -> String
where
    B: hyper::body::Body<Data = Bytes> + Send,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    use http_body_util::BodyExt;
    String::from_utf8_lossy(&body.collect().await.unwrap().to_bytes()).to_string()
}
