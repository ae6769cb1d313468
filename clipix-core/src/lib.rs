pub mod config;
pub mod job;
pub mod nav;
pub mod types;
pub mod video;

pub use config::*;
pub use job::*;
pub use nav::*;
pub use types::*;
pub use video::*;
