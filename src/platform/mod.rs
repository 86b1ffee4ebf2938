mod native;

pub use native::{run, WindowRequests};
