mod decode;

pub use decode::{inspect_audio, mp3_duration, AudioInfo};
