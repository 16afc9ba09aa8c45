pub(crate) const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

pub(crate) const NOT_FOUND_DETAIL: &str = "404 page not found";

pub(crate) const METHOD_NOT_ALLOWED_DETAIL: &str = "405 method not allowed";

pub(crate) const BAD_PATH_DETAIL: &str = "400 request path is not valid utf-8";
