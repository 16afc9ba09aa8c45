use super::Middleware;
use crate::handler::Handler;
use crate::ConsumerError;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::future::Future;
use std::sync::Arc;

pub(super) fn wrap<T, H, R>(handler: H) -> Middleware<T>
where
    T: Send + 'static,
    H: Fn(Response<Full<Bytes>>) -> R + Send + Sync + 'static,
    R: Future<Output = Result<Response<Full<Bytes>>, ConsumerError>> + Send + 'static,
{
    let handler = Arc::new(handler);

    Middleware::new(move |next: Handler<T>| {
        let handler = Arc::clone(&handler);

        Handler::new(move |req: Request<T>| {
            let handler = Arc::clone(&handler);
            let fut = next.call(req);

            async move {
                let res = fut.await?;
                (handler.as_ref())(res).await
            }
        })
    })
}
