//! History mining.
//!
//! A background `std::thread` owns the `git2::Repository` for its lifetime
//! (Repository is !Send, so it must never cross a thread boundary) and turns
//! the commit graph into the owned [`ganim_core::Commit`] list the playback
//! driver consumes.
pub mod miner;
pub mod types;
pub mod worker;
