pub mod codec;
pub mod wire;

pub use codec::{decode_frame, encode_frame, FrameCodec, DEFAULT_MAX_FRAME_BYTES};
pub use wire::RankingUpdate;
