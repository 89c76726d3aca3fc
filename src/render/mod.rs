//! Output renderers: JSON and markdown for the CLI, HTML pages for the web server.

pub(crate) mod html;
pub(crate) mod json;
pub(crate) mod markdown;
