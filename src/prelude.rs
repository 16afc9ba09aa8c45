//! Extension traits, for `use consumer_router::prelude::*`.

pub use crate::ext::RequestExt;
