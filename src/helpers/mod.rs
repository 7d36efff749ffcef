//! Helper functions shared by the resolver and commands

mod url;

pub use url::*;
