// Library exports for the binary and integration tests

pub mod catalog;
pub mod config;
pub mod folder_scanner;
pub mod prompt;
pub mod rename;
pub mod renamer;
pub mod resolve;
pub mod retry;

// Test support (unit tests only)
#[cfg(test)]
pub mod test_support;
