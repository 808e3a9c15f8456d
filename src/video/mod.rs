mod encoder;
mod timeline;

pub use encoder::{concat_list, EncodeSettings, EncodedVideo, FfmpegEncoder, VideoOutput};
pub use timeline::{Clip, Timeline};
