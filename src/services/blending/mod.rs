mod cold;
mod warm;

pub use cold::ColdStartBlender;
pub use warm::WarmCalibrator;
