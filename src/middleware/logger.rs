use super::Middleware;
use crate::ext::RequestExt;
use crate::handler::Handler;
use hyper::Request;
use std::time::Instant;

/// The access logger every router starts with.
///
/// It emits one `INFO` event per request, after the wrapped handler returned, carrying the method, the URI, the
/// response status and the elapsed time. Remove it with
/// [`RouterBuilder::without_logger`](crate::RouterBuilder::without_logger).
pub fn logger<T: Send + 'static>() -> Middleware<T> {
    Middleware::new(|next: Handler<T>| {
        Handler::new(move |req: Request<T>| {
            let next = next.clone();
            let method = req.method().clone();
            let uri = req.uri().clone();
            let remote_addr = req.remote_addr();

            async move {
                let started = Instant::now();
                let res = next.call(req).await;
                let elapsed = started.elapsed();

                let status = match res {
                    Ok(ref res) => res.status(),
                    Err(ref err) => err.status(),
                };

                match remote_addr {
                    Some(addr) => tracing::info!(%method, %uri, %status, ?elapsed, remote_addr = %addr, "request"),
                    None => tracing::info!(%method, %uri, %status, ?elapsed, "request"),
                }

                res
            }
        })
    })
}
