//! Animated image detection on raw upload bytes.
//!
//! Runs before any decoding, classification or storage. Only file signatures are
//! inspected, so truncated or garbage input simply falls through every rule and is
//! reported as static.

const GIF87A: &[u8] = b"GIF87a";
const GIF89A: &[u8] = b"GIF89a";
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const WEBP_EXTENDED_CHUNK: &[u8] = b"VP8X";
const APNG_CONTROL_CHUNK: &[u8] = b"acTL";

/// Offset from the start of the `VP8X` tag to its feature flags byte
const VP8X_FLAGS_OFFSET: usize = 8;
const VP8X_ANIMATION_FLAG: u8 = 0x02;

/// Returns `true` when the buffer carries an animated GIF, WebP or PNG signature.
///
/// Rules are applied in order and the first match wins:
/// 1. `GIF87a` / `GIF89a` header
/// 2. `VP8X` chunk whose flags byte has the animation bit set
/// 3. PNG signature plus an `acTL` chunk anywhere in the buffer
pub fn is_animated(bytes: &[u8]) -> bool {
    if bytes.starts_with(GIF87A) || bytes.starts_with(GIF89A) {
        return true;
    }

    if let Some(idx) = find(bytes, WEBP_EXTENDED_CHUNK) {
        // A flags byte past the end of the buffer means the WebP rule cannot match
        let animated = bytes
            .get(idx + VP8X_FLAGS_OFFSET)
            .is_some_and(|flags| flags & VP8X_ANIMATION_FLAG != 0);
        if animated {
            return true;
        }
    }

    bytes.starts_with(PNG_SIGNATURE) && find(bytes, APNG_CONTROL_CHUNK).is_some()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal RIFF/WEBP container with a VP8X chunk carrying `flags`
    fn webp_with_flags(flags: u8) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&[0x1e, 0x00, 0x00, 0x00]);
        bytes.extend_from_slice(b"WEBP");
        bytes.extend_from_slice(b"VP8X");
        bytes.extend_from_slice(&[0x0a, 0x00, 0x00, 0x00]); // chunk size
        bytes.push(flags);
        bytes.extend_from_slice(&[0x00; 9]);
        bytes
    }

    fn png_with_chunks(chunks: &[&[u8]]) -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        for chunk in chunks {
            bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x08]);
            bytes.extend_from_slice(chunk);
            bytes.extend_from_slice(&[0x00; 12]);
        }
        bytes
    }

    #[test]
    fn test_gif_headers_are_animated() {
        assert!(is_animated(b"GIF89a\x01\x00\x01\x00\x80\x00\x00"));
        assert!(is_animated(b"GIF87a"));
    }

    #[test]
    fn test_gif_header_must_be_at_start() {
        assert!(!is_animated(b"xxGIF89a"));
        assert!(!is_animated(b"GIF8"));
    }

    #[test]
    fn test_jpeg_is_static() {
        let jpeg = [0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];
        assert!(!is_animated(&jpeg));
    }

    #[test]
    fn test_png_without_actl_is_static() {
        assert!(!is_animated(&png_with_chunks(&[b"IHDR", b"IDAT", b"IEND"])));
    }

    #[test]
    fn test_png_with_actl_is_animated() {
        assert!(is_animated(&png_with_chunks(&[b"IHDR", b"acTL", b"IDAT"])));
    }

    #[test]
    fn test_actl_without_png_signature_is_static() {
        assert!(!is_animated(b"\x00\x00\x00\x08acTL\x00\x00"));
    }

    #[test]
    fn test_webp_animation_flag() {
        assert!(is_animated(&webp_with_flags(0x02)));
        assert!(is_animated(&webp_with_flags(0x12)));
        assert!(!is_animated(&webp_with_flags(0x00)));
        assert!(!is_animated(&webp_with_flags(0x10)));
    }

    #[test]
    fn test_truncated_vp8x_is_static() {
        assert!(!is_animated(b"RIFF\x00\x00\x00\x00WEBPVP8X\x0a\x00"));
        assert!(!is_animated(b"VP8X"));
    }

    #[test]
    fn test_flags_byte_at_end_of_buffer_is_read() {
        // The flags byte is all the rule needs, even with nothing after it
        assert!(is_animated(b"VP8X\x0a\x00\x00\x00\x02"));
    }

    #[test]
    fn test_empty_and_garbage_are_static() {
        assert!(!is_animated(&[]));
        assert!(!is_animated(&[0x00]));
        assert!(!is_animated(b"definitely not an image"));
    }

    #[test]
    fn test_detection_is_deterministic() {
        let bytes = webp_with_flags(0x02);
        assert_eq!(is_animated(&bytes), is_animated(&bytes));
    }
}
