use super::Middleware;
use crate::handler::Handler;
use crate::ConsumerError;
use hyper::Request;
use std::future::Future;
use std::sync::Arc;

pub(super) fn wrap<T, H, R>(handler: H) -> Middleware<T>
where
    T: Send + 'static,
    H: Fn(Request<T>) -> R + Send + Sync + 'static,
    R: Future<Output = Result<Request<T>, ConsumerError>> + Send + 'static,
{
    let handler = Arc::new(handler);

    Middleware::new(move |next: Handler<T>| {
        let handler = Arc::clone(&handler);

        Handler::new(move |req: Request<T>| {
            let fut = (handler.as_ref())(req);
            let next = next.clone();

            async move {
                let req = fut.await?;
                next.call(req).await
            }
        })
    })
}
