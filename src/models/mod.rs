pub mod common;
pub mod document;
pub mod line_item;
pub mod preview;
pub mod request;

pub use common::*;
pub use document::*;
pub use line_item::*;
pub use preview::*;
pub use request::{DocumentOptions, DocumentRequest};
