use clap::Parser;
use consumer_router::prelude::*;
use consumer_router::{ConsumerError, Middleware, MethodFallback, Router, RouterService, ServeMux};
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::service::Service;
use hyper::{Request, Response};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Demo service for consumer-router.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "CONSUMER_ADDR", default_value = "127.0.0.1:3000")]
    addr: SocketAddr,

    /// Prefix prepended to every route pattern.
    #[arg(long, env = "CONSUMER_PREFIX", default_value = "/api")]
    prefix: String,

    /// Answer 405 instead of leaving unmatched methods unhandled.
    #[arg(long)]
    strict_methods: bool,
}

// A handler for "/health".
async fn health_handler(_: Request<Incoming>) -> Result<Response<Full<Bytes>>, ConsumerError> {
    Ok(Response::new(Full::new(Bytes::from("ok"))))
}

// A handler for "/echo" which sends the request body back.
async fn echo_handler(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, ConsumerError> {
    let body = req
        .into_body()
        .collect()
        .await
        .map_err(|e| ConsumerError::from_cause(e, StatusCode::BAD_REQUEST, "could not read the request body"))?
        .to_bytes();

    Ok(Response::new(Full::new(body)))
}

// A handler for "/teapot" which always fails.
async fn teapot_handler(_: Request<Incoming>) -> Result<Response<Full<Bytes>>, ConsumerError> {
    Err(ConsumerError::new(StatusCode::IM_A_TEAPOT, "this service only brews tea"))
}

// A middleware which stamps every successful response.
async fn powered_by(mut res: Response<Full<Bytes>>) -> Result<Response<Full<Bytes>>, ConsumerError> {
    res.headers_mut()
        .insert("x-powered-by", http::HeaderValue::from_static("consumer-router"));
    Ok(res)
}

// A middleware which refuses requests without a known peer.
async fn require_peer(req: Request<Incoming>) -> Result<Request<Incoming>, ConsumerError> {
    match req.remote_addr() {
        Some(_) => Ok(req),
        None => Err(ConsumerError::new(StatusCode::FORBIDDEN, "unknown peer")),
    }
}

fn router(args: &Args) -> consumer_router::Result<Router<Incoming>> {
    let method_fallback = if args.strict_methods {
        MethodFallback::MethodNotAllowed
    } else {
        MethodFallback::Silent
    };

    Router::builder()
        .get("/health", health_handler)
        .post("/echo", echo_handler)
        .get("/teapot", teapot_handler)
        .middleware(Middleware::pre(require_peer))
        .middleware(Middleware::post(powered_by))
        .method_fallback(method_fallback)
        .build()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut router = router(&args)?;
    let mut mux = ServeMux::new();
    router.consume(&args.prefix, &mut mux)?;

    let service = RouterService::new(mux);
    let listener = TcpListener::bind(args.addr).await?;
    tracing::info!(addr = %args.addr, prefix = %args.prefix, "listening");

    loop {
        let (stream, _) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                tracing::warn!(error = %err, "error accepting connection");
                continue;
            }
        };

        let router_service = service.clone();

        tokio::spawn(async move {
            let request_service = match router_service.call(&stream).await {
                Ok(request_service) => request_service,
                Err(err) => match err {},
            };

            let io = TokioIo::new(stream);
            let builder = Builder::new(TokioExecutor::new());

            if let Err(err) = builder.serve_connection(io, request_service).await {
                tracing::warn!(error = %err, "error serving connection");
            }
        });
    }
}
