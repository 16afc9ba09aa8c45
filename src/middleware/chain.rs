use super::Middleware;
use crate::handler::Handler;
use std::fmt::{self, Debug, Formatter};

/// Nests `chain` around `terminal`, outside-in.
///
/// The chain is applied from its tail to its head, so the result is `chain[0](chain[1](...chain[n-1](terminal)))`:
/// the first middleware observes the request first and the response last. An empty chain returns `terminal` as is.
pub fn compose<T>(terminal: Handler<T>, chain: &[Middleware<T>]) -> Handler<T> {
    chain.iter().rev().fold(terminal, |next, middleware| middleware.wrap(next))
}

/// The ordered middlewares of a router.
///
/// A chain created with [`Chain::with_default_logger`] starts with the access [`logger`](super::logger) at its head.
pub struct Chain<T> {
    middlewares: Vec<Middleware<T>>,
}

impl<T: Send + 'static> Chain<T> {
    pub fn with_default_logger() -> Chain<T> {
        Chain {
            middlewares: vec![super::logger()],
        }
    }
}

impl<T> Chain<T> {
    pub fn new() -> Chain<T> {
        Chain { middlewares: Vec::new() }
    }

    pub fn append<I>(&mut self, middlewares: I)
    where
        I: IntoIterator<Item = Middleware<T>>,
    {
        self.middlewares.extend(middlewares);
    }

    /// Drops the head of the chain, which holds the default logger unless it was removed already.
    ///
    /// Returns `false` and leaves the chain untouched when it is empty.
    pub fn remove_default_logger(&mut self) -> bool {
        if self.middlewares.is_empty() {
            return false;
        }
        self.middlewares.remove(0);
        true
    }

    pub fn compose(&self, terminal: Handler<T>) -> Handler<T> {
        compose(terminal, &self.middlewares)
    }

    pub fn as_slice(&self) -> &[Middleware<T>] {
        &self.middlewares
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Chain::new()
    }
}

impl<T> Debug for Chain<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Chain {{ len: {} }}", self.middlewares.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::{BodyExt, Full};
    use hyper::body::Bytes;
    use hyper::{Request, Response};
    use std::sync::{Arc, Mutex};

    type Body = Full<Bytes>;
    type Events = Arc<Mutex<Vec<String>>>;

    fn recording(name: &'static str, events: Events) -> Middleware<Body> {
        Middleware::new(move |next: Handler<Body>| {
            let events = events.clone();
            Handler::new(move |req: Request<Body>| {
                let events = events.clone();
                let next = next.clone();
                async move {
                    events.lock().unwrap().push(format!("{}:pre", name));
                    let res = next.call(req).await;
                    events.lock().unwrap().push(format!("{}:post", name));
                    res
                }
            })
        })
    }

    fn terminal(events: Events) -> Handler<Body> {
        Handler::new(move |_: Request<Body>| {
            let events = events.clone();
            async move {
                events.lock().unwrap().push("handler".to_string());
                Ok(Response::new(Full::new(Bytes::from("done"))))
            }
        })
    }

    fn request() -> Request<Body> {
        Request::new(Full::new(Bytes::new()))
    }

    #[tokio::test]
    async fn should_nest_first_middleware_outermost() {
        let events = Events::default();
        let chain = [recording("m1", events.clone()), recording("m2", events.clone())];

        let handler = compose(terminal(events.clone()), &chain);
        let res = handler.call(request()).await.unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec!["m1:pre", "m2:pre", "handler", "m2:post", "m1:post"]
        );
        let body = res.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"done");
    }

    #[tokio::test]
    async fn should_return_terminal_for_empty_chain() {
        let events = Events::default();
        let handler = compose(terminal(events.clone()), &[]);

        handler.call(request()).await.unwrap();

        assert_eq!(*events.lock().unwrap(), vec!["handler"]);
    }

    #[test]
    fn should_remove_head_until_empty() {
        let mut chain: Chain<Body> = Chain::with_default_logger();
        assert_eq!(chain.len(), 1);

        assert!(chain.remove_default_logger());
        assert!(chain.is_empty());
        assert!(!chain.remove_default_logger());
        assert!(chain.is_empty());
    }

    #[tokio::test]
    async fn should_append_to_tail() {
        let events = Events::default();
        let mut chain = Chain::new();
        chain.append([recording("a", events.clone())]);
        chain.append([recording("b", events.clone()), recording("c", events.clone())]);

        chain.compose(terminal(events.clone())).call(request()).await.unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec!["a:pre", "b:pre", "c:pre", "handler", "c:post", "b:post", "a:post"]
        );
    }
}
