//! Report output formats

pub mod html;

pub use html::{generate, html_escape, render_standalone, DEFAULT_HTML_COMPANY};
