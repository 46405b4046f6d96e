pub mod artifacts;
pub mod jobs;
pub mod utils;
pub mod workers;
