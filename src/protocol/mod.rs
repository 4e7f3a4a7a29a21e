//! Wire-level building blocks shared by the transport and the alias layer.
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | `query` | Joining endpoints with query strings |
//! | `body` | Request body encoding and response body parsing |
//! | `headers` | Header validation and override merging |
//!
//! Everything here is pure: no I/O, no shared state.
//!
//! # Examples
//!
//! ```
//! use alias_fetch::protocol::{endpoint_with_params, parse_body_text};
//!
//! let url = endpoint_with_params(
//!     "https://api.example.com/users",
//!     Some(&[("page".to_string(), "2".to_string())][..]),
//! );
//! assert_eq!(url, "https://api.example.com/users?page=2");
//!
//! assert_eq!(parse_body_text("").unwrap(), None);
//! ```

mod body;
mod headers;
mod query;

pub use body::{encode_body, parse_body_text, EncodedBody};
pub use headers::{header_map, merge_headers, JSON_CONTENT_TYPE};
pub use query::{endpoint_with_params, join_url};
