use crate::constants;
use crate::helpers;
use crate::{ConsumerError, Error};
use http::StatusCode;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The future returned by an [`Endpoint`].
///
/// It resolves to `Ok(None)` when the endpoint leaves the request unhandled.
pub type EndpointFuture = Pin<Box<dyn Future<Output = crate::Result<Option<Response<Full<Bytes>>>>> + Send + 'static>>;

/// The function a router binds for one pattern. It discriminates by method itself.
pub struct Endpoint<T> {
    inner: Arc<dyn Fn(Request<T>) -> EndpointFuture + Send + Sync + 'static>,
}

impl<T: Send + 'static> Endpoint<T> {
    pub fn new<F, R>(endpoint: F) -> Endpoint<T>
    where
        F: Fn(Request<T>) -> R + Send + Sync + 'static,
        R: Future<Output = crate::Result<Option<Response<Full<Bytes>>>>> + Send + 'static,
    {
        Endpoint {
            inner: Arc::new(move |req: Request<T>| -> EndpointFuture { Box::pin(endpoint(req)) }),
        }
    }

    pub fn call(&self, req: Request<T>) -> EndpointFuture {
        (self.inner)(req)
    }
}

impl<T> Clone for Endpoint<T> {
    fn clone(&self) -> Self {
        Endpoint {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Debug for Endpoint<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Endpoint {{ .. }}")
    }
}

/// Something endpoints can be bound into, keyed by path only.
///
/// [`Router::consume`](crate::Router::consume) binds through this trait, so anything that can map a path to a
/// function can host a router: the bundled [`ServeMux`], a test double, or another server's routing table.
pub trait Dispatcher<T> {
    fn bind(&mut self, path: &str, endpoint: Endpoint<T>) -> crate::Result<()>;

    /// Binds a whole router at once.
    ///
    /// The default binds one path after the other and stops at the first error. Dispatchers that can check
    /// the batch up front should override it so that a failure binds nothing.
    fn bind_all(&mut self, endpoints: Vec<(String, Endpoint<T>)>) -> crate::Result<()> {
        for (path, endpoint) in endpoints {
            self.bind(&path, endpoint)?;
        }
        Ok(())
    }
}

/// An in-memory, exact-path dispatcher.
///
/// Binding a batch is all-or-nothing: if one path of the batch is already bound (or appears twice), none of them
/// are. Requests to an unknown path get a `404` rendered as a [`ConsumerError`], that is a JSON
/// `{"detail":"404 page not found"}` body, not the `text/plain` body Go's `http.ServeMux` sends.
///
/// # Examples
///
/// ```
/// use consumer_router::{Router, ServeMux};
/// use http_body_util::Full;
/// use hyper::{body::Bytes, Request, Response};
///
/// # async fn run() -> consumer_router::Result<()> {
/// let mut router = Router::builder()
///     .get("/health", |_: Request<Full<Bytes>>| async move { Ok(Response::new(Full::new(Bytes::from("ok")))) })
///     .build()?;
///
/// let mut mux = ServeMux::new();
/// router.consume("/api", &mut mux)?;
///
/// let req = Request::get("/api/health").body(Full::new(Bytes::new())).unwrap();
/// let res = mux.serve(req).await?;
/// assert_eq!(res.status(), 200);
/// # Ok(())
/// # }
/// ```
pub struct ServeMux<T> {
    endpoints: HashMap<String, Endpoint<T>>,
}

impl<T> ServeMux<T> {
    pub fn new() -> ServeMux<T> {
        ServeMux {
            endpoints: HashMap::new(),
        }
    }

    pub fn endpoint(&self, path: &str) -> Option<&Endpoint<T>> {
        self.endpoints.get(path)
    }

    /// The bound paths, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.endpoints.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl<T: Send + 'static> ServeMux<T> {
    /// Routes the request to the endpoint bound at its (percent-decoded) path.
    ///
    /// An unknown path gets a `404` JSON error. A request the endpoint leaves unhandled gets an empty `200 OK`,
    /// the same as a handler that never touched its response.
    pub async fn serve(&self, req: Request<T>) -> crate::Result<Response<Full<Bytes>>> {
        let path = match helpers::percent_decode_request_path(req.uri().path()) {
            Ok(path) => path,
            Err(err) => {
                tracing::debug!(path = req.uri().path(), error = %err, "could not decode request path");
                return ConsumerError::from_cause(err, StatusCode::BAD_REQUEST, constants::BAD_PATH_DETAIL)
                    .into_response();
            }
        };

        let endpoint = match self.endpoints.get(&path) {
            Some(endpoint) => endpoint.clone(),
            None => {
                tracing::debug!(%path, "no endpoint bound");
                return ConsumerError::new(StatusCode::NOT_FOUND, constants::NOT_FOUND_DETAIL).into_response();
            }
        };

        let method = req.method().clone();
        match endpoint.call(req).await? {
            Some(res) => Ok(res),
            None => {
                tracing::debug!(%method, %path, "request left unhandled");
                Ok(Response::new(Full::new(Bytes::new())))
            }
        }
    }
}

impl<T> Dispatcher<T> for ServeMux<T> {
    fn bind(&mut self, path: &str, endpoint: Endpoint<T>) -> crate::Result<()> {
        if self.endpoints.contains_key(path) {
            return Err(Error::DuplicatePath(path.to_owned()));
        }
        self.endpoints.insert(path.to_owned(), endpoint);
        Ok(())
    }

    fn bind_all(&mut self, endpoints: Vec<(String, Endpoint<T>)>) -> crate::Result<()> {
        let mut seen = HashSet::with_capacity(endpoints.len());
        for (path, _) in &endpoints {
            if self.endpoints.contains_key(path) || !seen.insert(path.as_str()) {
                return Err(Error::DuplicatePath(path.clone()));
            }
        }
        self.endpoints.extend(endpoints);
        Ok(())
    }
}

impl<T> Default for ServeMux<T> {
    fn default() -> Self {
        ServeMux::new()
    }
}

impl<T> Debug for ServeMux<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ServeMux {{ paths: {:?} }}", self.paths())
    }
}
