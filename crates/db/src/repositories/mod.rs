//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod clip_repo;
pub mod post_repo;
pub mod program_repo;
pub mod stats_repo;
pub mod video_repo;

pub use clip_repo::ClipRepo;
pub use post_repo::PostRepo;
pub use program_repo::ProgramRepo;
pub use stats_repo::StatsRepo;
pub use video_repo::VideoRepo;
