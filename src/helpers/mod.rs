//! Helper functions for page rendering
//!
//! Date formatting, reading time, URLs and the HTML trust boundary.

mod date;
mod html;
mod reading;
mod url;

pub use date::*;
pub use html::*;
pub use reading::*;
pub use url::*;
