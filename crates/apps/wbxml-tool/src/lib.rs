//! Library side of the `wbxml` command line tool.

pub mod cli;
pub mod json;
pub mod render;
