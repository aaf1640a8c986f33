//! GIF frame extraction.

use std::io::Cursor;

use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;

use super::Frame;

/// After this many failed frames in a row the rest of the stream is abandoned.
const MAX_CONSECUTIVE_FRAME_ERRORS: usize = 8;

/// Decodes every frame of a GIF container, in order.
///
/// Frames that fail to decode are logged and skipped. An unreadable container
/// yields an empty list.
#[must_use]
pub fn decode(bytes: &[u8]) -> Vec<Frame> {
    let decoder = match GifDecoder::new(Cursor::new(bytes)) {
        Ok(decoder) => decoder,
        Err(err) => {
            tracing::warn!(error = %err, "failed to open gif container");
            return Vec::new();
        }
    };

    let mut frames = Vec::new();
    let mut consecutive_errors = 0;

    for (index, frame) in decoder.into_frames().enumerate() {
        match frame {
            Ok(frame) => {
                consecutive_errors = 0;
                frames.push(frame.into_buffer());
            }
            Err(err) => {
                tracing::warn!(index, error = %err, "failed to decode gif frame, skipping");
                consecutive_errors += 1;
                if consecutive_errors >= MAX_CONSECUTIVE_FRAME_ERRORS {
                    tracing::warn!(index, "too many consecutive gif frame errors, stopping");
                    break;
                }
            }
        }
    }

    tracing::debug!(frames = frames.len(), "extracted gif frames");
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::test_support::{gif_bytes, solid};

    #[test]
    fn test_decode_returns_frames_in_order() {
        let source = vec![
            solid(12, 10, [255, 0, 0, 255]),
            solid(12, 10, [0, 255, 0, 255]),
            solid(12, 10, [0, 0, 255, 255]),
        ];

        let frames = decode(&gif_bytes(&source));

        assert_eq!(frames.len(), 3);
        assert!(frames.iter().all(|f| f.dimensions() == (12, 10)));
        assert!(frames[0].get_pixel(5, 5)[0] > 200);
        assert!(frames[1].get_pixel(5, 5)[1] > 200);
        assert!(frames[2].get_pixel(5, 5)[2] > 200);
    }

    #[test]
    fn test_decode_garbage_is_empty() {
        assert!(decode(b"definitely not a gif").is_empty());
        assert!(decode(&[]).is_empty());
    }

    #[test]
    fn test_decode_truncated_stream_keeps_leading_frames() {
        let source: Vec<Frame> =
            (0..4).map(|i| solid(8, 8, [i * 60, 0, 0, 255])).collect();
        let bytes = gif_bytes(&source);

        let full = decode(&bytes);
        let truncated = decode(&bytes[..bytes.len() / 2]);

        assert_eq!(full.len(), 4);
        assert!(truncated.len() < full.len());
    }
}
