// Shared plumbing for vendor adapters
//
// Every adapter issues HTTP requests through the same timeout-bound client
// and builds absolute photo URLs with the same join rules.

pub mod constants;
pub mod http;
pub mod url_utils;

pub use constants::*;
pub use http::{build_client, read_body, ErrorType};
pub use url_utils::{join_path, resolve_reference};
