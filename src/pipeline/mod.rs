mod creator;
mod publish;

pub use creator::{output_file_path, PreparedVideo, SegmentInfo, VideoArtifact, VideoCreator};
pub use publish::{publish_video, video_metadata};
