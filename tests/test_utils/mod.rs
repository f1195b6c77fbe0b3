pub mod fixtures;

pub use fixtures::{WorkingDir, working_dir};
