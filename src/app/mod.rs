pub mod artwork;
pub mod launch;

pub use artwork::ArtworkPlugin;
pub use launch::{build_app, run_scene};
