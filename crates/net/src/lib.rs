//! Dictionary lookups over HTTP.

mod tls;
mod youdao;

pub use youdao::{YoudaoClient, YoudaoConfig, parse_definitions};
