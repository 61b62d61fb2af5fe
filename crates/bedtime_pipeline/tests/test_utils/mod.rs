//! Test utilities for pipeline tests.
//!
//! Provides a scripted generation driver and a blob store that fails on demand.

#![allow(dead_code)]

pub mod flaky_store;
pub mod mock_driver;

pub use flaky_store::FlakyBlobStore;
pub use mock_driver::MockStoryDriver;

/// A story response in the shape the writer asks for.
pub fn story_json(scenes: &[&str]) -> String {
    serde_json::json!({
        "story_scenes": scenes,
        "full_narrative": scenes.join(" "),
    })
    .to_string()
}

/// PNG signature bytes, enough for MIME sniffing.
pub fn photo() -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]
}
