use crate::route::Route;
use hyper::Method;
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Debug, Formatter};

/// The routes of a router, indexed by pattern and then by method.
///
/// Patterns are kept in lexicographic order so that everything enumerating the registry (endpoint binding, the
/// route listing printed on consume) is deterministic. A pattern never maps to an empty method table: removing the
/// last method of a pattern removes the pattern.
pub struct Registry<T> {
    routes: BTreeMap<String, HashMap<Method, Route<T>>>,
}

impl<T> Registry<T> {
    pub fn new() -> Registry<T> {
        Registry { routes: BTreeMap::new() }
    }

    /// Inserts the routes, replacing any route already stored under the same `(pattern, method)`.
    pub fn add_routes<I>(&mut self, routes: I)
    where
        I: IntoIterator<Item = Route<T>>,
    {
        for route in routes {
            self.routes
                .entry(route.pattern.clone())
                .or_default()
                .insert(route.method.clone(), route);
        }
    }

    /// Removes `method` from every pattern.
    pub fn delete_by_method(&mut self, method: &Method) {
        self.routes.retain(|_, methods| {
            methods.remove(method);
            !methods.is_empty()
        });
    }

    /// Removes every method registered under `pattern`.
    pub fn delete_by_pattern(&mut self, pattern: &str) {
        self.routes.remove(pattern);
    }

    pub fn get(&self, pattern: &str, method: &Method) -> Option<&Route<T>> {
        self.routes.get(pattern).and_then(|methods| methods.get(method))
    }

    pub fn methods(&self, pattern: &str) -> Option<&HashMap<Method, Route<T>>> {
        self.routes.get(pattern)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HashMap<Method, Route<T>>)> {
        self.routes.iter().map(|(pattern, methods)| (pattern.as_str(), methods))
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Number of distinct patterns.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Registry::new()
    }
}

impl<T> Debug for Registry<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.routes
                    .iter()
                    .map(|(pattern, methods)| (pattern, methods.keys().collect::<Vec<_>>())),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;
    use hyper::body::Bytes;
    use hyper::{Request, Response};

    type Body = Full<Bytes>;

    fn route(name: &str, method: Method, pattern: &str) -> Route<Body> {
        Route::new(name, method, pattern, |_: Request<Body>| async move {
            Ok(Response::new(Full::new(Bytes::new())))
        })
    }

    #[test]
    fn should_index_by_pattern_then_method() {
        let mut registry = Registry::new();
        registry.add_routes([
            route("list users", Method::GET, "/users"),
            route("create user", Method::POST, "/users"),
            route("health", Method::GET, "/health"),
        ]);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.methods("/users").unwrap().len(), 2);
        assert_eq!(registry.get("/users", &Method::POST).unwrap().name(), "create user");
        assert!(registry.get("/health", &Method::POST).is_none());
        assert_eq!(registry.patterns().collect::<Vec<_>>(), vec!["/health", "/users"]);
    }

    #[test]
    fn should_overwrite_same_pattern_and_method() {
        let mut registry = Registry::new();
        registry.add_routes([route("first", Method::GET, "/users")]);
        registry.add_routes([route("second", Method::GET, "/users")]);

        assert_eq!(registry.methods("/users").unwrap().len(), 1);
        assert_eq!(registry.get("/users", &Method::GET).unwrap().name(), "second");
    }

    #[test]
    fn should_delete_method_across_patterns() {
        let mut registry = Registry::new();
        registry.add_routes([
            route("list users", Method::GET, "/users"),
            route("create user", Method::POST, "/users"),
            route("health", Method::GET, "/health"),
        ]);

        registry.delete_by_method(&Method::GET);

        assert!(registry.get("/users", &Method::GET).is_none());
        assert!(registry.get("/users", &Method::POST).is_some());
        // `/health` had nothing but GET.
        assert!(registry.methods("/health").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn should_delete_whole_pattern() {
        let mut registry = Registry::new();
        registry.add_routes([
            route("list users", Method::GET, "/users"),
            route("create user", Method::POST, "/users"),
        ]);

        registry.delete_by_pattern("/users");
        registry.delete_by_pattern("/unknown");

        assert!(registry.get("/users", &Method::GET).is_none());
        assert!(registry.get("/users", &Method::POST).is_none());
        assert!(registry.is_empty());
    }
}
