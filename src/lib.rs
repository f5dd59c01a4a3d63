//! A process-wide, write-once context store.
//!
//! Tests and bootstrap code seed named values (`test = true`, say) through
//! [`ContextStore::set_context`]; everything downstream reads them through
//! [`ContextRead`]. The first value admitted for a key is permanent.
//!
//! ```
//! use context_aware::{ContextRead, ContextStore};
//! use serde_json::json;
//!
//! let ctx = ContextStore::instance();
//! ctx.set_context([("doc.test", json!(true))]);
//! ctx.set_context([("doc.test", json!(false))]);
//! assert_eq!(ctx.get("doc.test").unwrap(), json!(true));
//! ```
pub mod errors;
pub mod context;
pub mod cli;

pub use context::{ContextRead, ContextStore, ContextWrite};
pub use errors::{ContextError, Result};
