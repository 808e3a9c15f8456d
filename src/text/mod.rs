mod segmenter;

pub use segmenter::{
    description_excerpt, group_sentences, segment_text, segment_text_with_limit,
    split_sentences, DEFAULT_DESCRIPTION_CHARS, DEFAULT_SEGMENT_CHARS,
};
