pub mod error;
pub mod pointcloud;
pub mod record;

pub use error::Error;
