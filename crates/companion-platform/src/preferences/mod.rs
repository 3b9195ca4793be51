//! File-backed preference storage.
//!
//! One JSON document maps each model path to its last settled position,
//! scale and display origin.

mod store;


pub use store::JsonPreferenceStore;
