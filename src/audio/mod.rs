pub mod file;
pub mod format;
pub mod storage;

pub use file::WavInfo;
pub use format::AudioFormat;
pub use storage::AudioStorage;
