pub mod fake_catalog;

pub use fake_catalog::FakeCatalog;

use reelname::catalog::Candidate;

/// Initialize tracing for tests with proper test output handling
pub fn tracing_init() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn movie(title: &str, year: i32, rating: f32, votes: u64, id: &str) -> Candidate {
    Candidate {
        title: title.to_string(),
        year: Some(year),
        rating,
        votes,
        source_id: id.to_string(),
    }
}
