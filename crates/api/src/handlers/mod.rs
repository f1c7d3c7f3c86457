pub mod clip;
pub mod post;
pub mod program;
pub mod stats;
pub mod video;
