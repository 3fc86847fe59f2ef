use xxhash_rust::xxh3::xxh3_64;

use crate::core::{RankingError, RankingResult};
use crate::storage::wire::RankingUpdate;

/// 排名帧 Header
const MAGIC: u32 = 0x524E_4B31; // "RNK1"
const VERSION_CURRENT: u32 = 1;
const HEADER_SIZE: usize = 4 + 4 + 4 + 8; // magic + version + body_len + checksum

pub const DEFAULT_MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

/// 跨进程排名帧（一次更新一帧）
///
/// 布局（LE）：magic | version | body_len | xxh3(body) | bincode(RankingUpdate)
///
/// 解码时校验 magic + version + body_len + checksum，任何不一致都拒绝；
/// 传输层可能截断或损坏字节，不做任何"尽力恢复"。
#[derive(Clone, Debug)]
pub struct FrameCodec {
    max_frame_bytes: usize,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_BYTES)
    }
}

impl FrameCodec {
    pub fn new(max_frame_bytes: usize) -> Self {
        Self { max_frame_bytes }
    }

    pub fn max_frame_bytes(&self) -> usize {
        self.max_frame_bytes
    }

    pub fn encode(&self, update: &RankingUpdate) -> RankingResult<Vec<u8>> {
        let body = bincode::serialize(update)
            .map_err(|e| RankingError::Frame(format!("serialize failed: {e}")))?;

        let total = HEADER_SIZE + body.len();
        if total > self.max_frame_bytes {
            return Err(RankingError::Frame(format!(
                "frame too large: {} > {} bytes",
                total, self.max_frame_bytes
            )));
        }
        let body_len: u32 = body
            .len()
            .try_into()
            .map_err(|_| RankingError::Frame(format!("body too large (>{} bytes)", u32::MAX)))?;

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&MAGIC.to_le_bytes());
        out.extend_from_slice(&VERSION_CURRENT.to_le_bytes());
        out.extend_from_slice(&body_len.to_le_bytes());
        out.extend_from_slice(&xxh3_64(&body).to_le_bytes());
        out.extend_from_slice(&body);

        tracing::debug!(
            "Ranking frame encoded: {} keys, {} bytes",
            update.key_count(),
            out.len()
        );
        Ok(out)
    }

    pub fn decode(&self, data: &[u8]) -> RankingResult<RankingUpdate> {
        if data.len() > self.max_frame_bytes {
            return Err(RankingError::Frame(format!(
                "frame too large: {} > {} bytes",
                data.len(),
                self.max_frame_bytes
            )));
        }
        if data.len() < HEADER_SIZE {
            return Err(RankingError::Frame(format!(
                "frame too small: {} bytes",
                data.len()
            )));
        }

        let magic = read_u32(data, 0)?;
        let version = read_u32(data, 4)?;
        let body_len = read_u32(data, 8)? as usize;
        let stored_checksum = read_u64(data, 12)?;

        if magic != MAGIC {
            return Err(RankingError::Frame(format!(
                "magic mismatch: {:#x} != {:#x}",
                magic, MAGIC
            )));
        }
        if version != VERSION_CURRENT {
            return Err(RankingError::Frame(format!(
                "version mismatch: {} != {}",
                version, VERSION_CURRENT
            )));
        }

        let body = &data[HEADER_SIZE..];
        if body.len() != body_len {
            return Err(RankingError::Frame(format!(
                "body length mismatch: {} != {}",
                body.len(),
                body_len
            )));
        }

        let computed = xxh3_64(body);
        if computed != stored_checksum {
            return Err(RankingError::Frame(format!(
                "checksum mismatch: {:#x} != {:#x}",
                computed, stored_checksum
            )));
        }

        bincode::deserialize::<RankingUpdate>(body)
            .map_err(|e| RankingError::Frame(format!("deserialize failed: {e}")))
    }
}

fn read_u32(data: &[u8], off: usize) -> RankingResult<u32> {
    data.get(off..off + 4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| RankingError::Frame(format!("truncated header at {off}")))
}

fn read_u64(data: &[u8], off: usize) -> RankingResult<u64> {
    data.get(off..off + 8)
        .and_then(|b| b.try_into().ok())
        .map(u64::from_le_bytes)
        .ok_or_else(|| RankingError::Frame(format!("truncated header at {off}")))
}

pub fn encode_frame(update: &RankingUpdate) -> RankingResult<Vec<u8>> {
    FrameCodec::default().encode(update)
}

pub fn decode_frame(data: &[u8]) -> RankingResult<RankingUpdate> {
    FrameCodec::default().decode(data)
}
