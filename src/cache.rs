//! On-disk cache for a planned timeline: the bespoke big-endian layout
//! (magic, logical resolution, then records read until EOF) rather than a
//! general-purpose serde wire format. Keyed by a fast content hash of the
//! raw chart text — cryptographic strength isn't needed for a cache key.

use std::io::{self, Read, Write};

use twox_hash::XxHash64;

use crate::error::CacheError;
use crate::geometry::Vec2;
use crate::planner::TouchAction;
use crate::timeline::{Frame, TouchEvent};

const MAGIC: &[u8; 4] = b"PSAP";
const HASH_SEED: u64 = 0;

/// A fast, non-cryptographic content hash used to key the cache — collision
/// resistance against an adversary is not a requirement here.
pub fn content_hash(chart_text: &str) -> u64 {
    XxHash64::oneshot(HASH_SEED, chart_text.as_bytes())
}

pub fn dump<W: Write>(mut out: W, width: u32, height: u32, timeline: &[Frame]) -> io::Result<()> {
    out.write_all(MAGIC)?;
    out.write_all(&width.to_be_bytes())?;
    out.write_all(&height.to_be_bytes())?;

    for (ts, events) in timeline {
        out.write_all(&ts.to_be_bytes())?;
        out.write_all(&(events.len() as u8).to_be_bytes())?;
        for event in events {
            out.write_all(&(event.action as u8).to_be_bytes())?;
            out.write_all(&event.pointer_id.to_be_bytes())?;
            out.write_all(&event.pos.x.to_be_bytes())?;
            out.write_all(&event.pos.y.to_be_bytes())?;
        }
    }
    Ok(())
}

pub fn load<R: Read>(mut input: R) -> Result<(u32, u32, Vec<Frame>), CacheError> {
    let mut magic = [0u8; 4];
    input.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(CacheError::CacheCorrupt(format!("bad magic {magic:?}")));
    }

    let width = read_u32(&mut input)?;
    let height = read_u32(&mut input)?;

    let mut timeline = Vec::new();
    loop {
        let mut first_byte = [0u8; 1];
        if input.read(&mut first_byte).map_err(cache_io_err)? == 0 {
            break;
        }
        let mut ts_buf = [0u8; 4];
        ts_buf[0] = first_byte[0];
        input.read_exact(&mut ts_buf[1..]).map_err(cache_io_err)?;
        let ts = i32::from_be_bytes(ts_buf);

        let n = read_u8(&mut input)?;
        let mut events = Vec::with_capacity(n as usize);
        for _ in 0..n {
            let action_byte = read_u8(&mut input)?;
            let action = TouchAction::from_u8(action_byte)
                .ok_or_else(|| CacheError::CacheCorrupt(format!("bad action byte {action_byte}")))?;
            let pointer_id = read_u32(&mut input)?;
            let x = read_f64(&mut input)?;
            let y = read_f64(&mut input)?;
            events.push(TouchEvent { action, pointer_id, pos: Vec2::new(x, y) });
        }
        timeline.push((ts, events));
    }

    Ok((width, height, timeline))
}

fn read_u8<R: Read>(input: &mut R) -> Result<u8, CacheError> {
    let mut buf = [0u8; 1];
    input.read_exact(&mut buf).map_err(cache_io_err)?;
    Ok(buf[0])
}

fn read_u32<R: Read>(input: &mut R) -> Result<u32, CacheError> {
    let mut buf = [0u8; 4];
    input.read_exact(&mut buf).map_err(cache_io_err)?;
    Ok(u32::from_be_bytes(buf))
}

fn read_f64<R: Read>(input: &mut R) -> Result<f64, CacheError> {
    let mut buf = [0u8; 8];
    input.read_exact(&mut buf).map_err(cache_io_err)?;
    Ok(f64::from_be_bytes(buf))
}

fn cache_io_err(e: io::Error) -> CacheError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        CacheError::CacheCorrupt("truncated record".to_string())
    } else {
        CacheError::Io(e)
    }
}
