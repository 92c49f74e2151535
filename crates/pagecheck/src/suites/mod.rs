//! Built-in page suites.

pub mod homepage;

pub use homepage::homepage_suite;
