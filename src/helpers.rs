use percent_encoding::percent_decode_str;
use std::str::Utf8Error;

pub(crate) fn percent_decode_request_path(val: &str) -> Result<String, Utf8Error> {
    percent_decode_str(val).decode_utf8().map(|val| val.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_decode_percent_encoded_path() {
        assert_eq!(percent_decode_request_path("/caf%C3%A9/menu").unwrap(), "/café/menu");
        assert_eq!(percent_decode_request_path("/plain").unwrap(), "/plain");
        assert!(percent_decode_request_path("/%FF").is_err());
    }
}
