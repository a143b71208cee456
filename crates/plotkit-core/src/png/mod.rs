// File: crates/plotkit-core/src/png/mod.rs
// Summary: Minimal PNG codec for 8-bit RGBA: uncompressed encoder, strict decoder,
//          and a header-only info pre-scan.
//
// Row order: scanline 0 of the stream holds buffer row `height - 1` and the last
// scanline holds row 0. With the buffer's bottom-up rows this is the conventional
// top-to-bottom PNG orientation; the decoder mirrors it exactly.

pub mod checksum;
pub mod zlib;

use tracing::debug;

use self::checksum::crc32;
use crate::color::Color;
use crate::error::{PngError, PngResult};
use crate::image::PixelBuffer;

pub const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

const IHDR: [u8; 4] = *b"IHDR";
const PHYS: [u8; 4] = *b"pHYs";
const IDAT: [u8; 4] = *b"IDAT";
const IEND: [u8; 4] = *b"IEND";

const IHDR_LEN: usize = 13;
const PHYS_LEN: usize = 9;
const BIT_DEPTH: u8 = 8;
const COLOR_TYPE_RGBA: u8 = 6;
const BYTES_PER_PIXEL: usize = 4;
const METERS_PER_INCH: f64 = 0.0254;
/// pHYs unit specifier for "pixels per meter".
const UNIT_METER: u8 = 1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PngEncoderOptions {
    pub dpi_x: f64,
    pub dpi_y: f64,
}

impl PngEncoderOptions {
    pub fn with_dpi(dpi: f64) -> Self {
        Self { dpi_x: dpi, dpi_y: dpi }
    }
}

impl Default for PngEncoderOptions {
    fn default() -> Self {
        Self::with_dpi(96.0)
    }
}

/// Header facts available without inflating the image data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    /// `None` when there is no pHYs chunk or its unit is not the meter.
    pub dpi_x: Option<f64>,
    pub dpi_y: Option<f64>,
}

#[derive(Clone, Copy, Debug)]
struct Header {
    width: u32,
    height: u32,
    bit_depth: u8,
    color_type: u8,
    compression: u8,
    filter: u8,
    interlace: u8,
}

impl Header {
    fn parse(data: &[u8]) -> PngResult<Self> {
        if data.len() != IHDR_LEN {
            return Err(PngError::format(format!("IHDR length is {}, expected {IHDR_LEN}", data.len())));
        }
        let header = Self {
            width: read_u32(&data[0..4]),
            height: read_u32(&data[4..8]),
            bit_depth: data[8],
            color_type: data[9],
            compression: data[10],
            filter: data[11],
            interlace: data[12],
        };
        if header.width == 0 || header.height == 0 {
            return Err(PngError::format("image has zero width or height"));
        }
        Ok(header)
    }

    fn to_bytes(self) -> [u8; IHDR_LEN] {
        let mut b = [0u8; IHDR_LEN];
        b[0..4].copy_from_slice(&self.width.to_be_bytes());
        b[4..8].copy_from_slice(&self.height.to_be_bytes());
        b[8] = self.bit_depth;
        b[9] = self.color_type;
        b[10] = self.compression;
        b[11] = self.filter;
        b[12] = self.interlace;
        b
    }

    fn ensure_supported(&self) -> PngResult<()> {
        if self.bit_depth != BIT_DEPTH {
            return Err(PngError::not_implemented(format!("bit depth {}", self.bit_depth)));
        }
        if self.color_type != COLOR_TYPE_RGBA {
            return Err(PngError::not_implemented(format!("color type {}", self.color_type)));
        }
        if self.compression != 0 {
            return Err(PngError::not_implemented(format!("compression method {}", self.compression)));
        }
        if self.filter != 0 {
            return Err(PngError::not_implemented(format!("filter method {}", self.filter)));
        }
        if self.interlace != 0 {
            return Err(PngError::not_implemented(format!("interlace method {}", self.interlace)));
        }
        Ok(())
    }

    fn info(&self, dpi: Option<(f64, f64)>) -> ImageInfo {
        ImageInfo {
            width: self.width,
            height: self.height,
            bit_depth: self.bit_depth,
            color_type: self.color_type,
            dpi_x: dpi.map(|d| d.0),
            dpi_y: dpi.map(|d| d.1),
        }
    }
}

#[inline]
fn read_u32(b: &[u8]) -> u32 {
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

fn chunk_name(kind: &[u8; 4]) -> String {
    String::from_utf8_lossy(kind).into_owned()
}

struct Chunk<'a> {
    kind: [u8; 4],
    data: &'a [u8],
}

/// Sequential chunk reader over a signature-checked stream; verifies every CRC.
struct ChunkReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ChunkReader<'a> {
    fn new(bytes: &'a [u8]) -> PngResult<Self> {
        if bytes.len() < SIGNATURE.len() || bytes[..SIGNATURE.len()] != SIGNATURE {
            return Err(PngError::InvalidSignature);
        }
        Ok(Self { bytes, pos: SIGNATURE.len() })
    }

    fn take(&mut self, n: usize, context: &'static str) -> PngResult<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or_else(|| PngError::eof(context))?;
        let slice = self.bytes.get(self.pos..end).ok_or_else(|| PngError::eof(context))?;
        self.pos = end;
        Ok(slice)
    }

    fn next_chunk(&mut self) -> PngResult<Chunk<'a>> {
        let len = read_u32(self.take(4, "chunk length")?) as usize;
        let kind_bytes = self.take(4, "chunk type")?;
        let kind = [kind_bytes[0], kind_bytes[1], kind_bytes[2], kind_bytes[3]];
        let data = self.take(len, "chunk data")?;
        let expected = read_u32(self.take(4, "chunk CRC")?);
        let actual = crc32(&[&kind, data]);
        if expected != actual {
            return Err(PngError::CrcMismatch { chunk: chunk_name(&kind), expected, actual });
        }
        Ok(Chunk { kind, data })
    }

    /// The first chunk, which must be IHDR.
    fn header(&mut self) -> PngResult<Header> {
        let chunk = self.next_chunk()?;
        if chunk.kind != IHDR {
            return Err(PngError::format(format!("first chunk is {}, expected IHDR", chunk_name(&chunk.kind))));
        }
        Header::parse(chunk.data)
    }
}

fn parse_phys(data: &[u8]) -> PngResult<Option<(f64, f64)>> {
    if data.len() != PHYS_LEN {
        return Err(PngError::format(format!("pHYs length is {}, expected {PHYS_LEN}", data.len())));
    }
    if data[8] != UNIT_METER {
        return Ok(None);
    }
    let ppm_x = read_u32(&data[0..4]) as f64;
    let ppm_y = read_u32(&data[4..8]) as f64;
    Ok(Some((ppm_x * METERS_PER_INCH, ppm_y * METERS_PER_INCH)))
}

fn write_chunk(out: &mut Vec<u8>, kind: [u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(&kind);
    out.extend_from_slice(data);
    out.extend_from_slice(&crc32(&[&kind, data]).to_be_bytes());
}

fn dots_per_meter(dpi: f64) -> u32 {
    (dpi / METERS_PER_INCH).round() as u32
}

/// Filter byte 0 then R,G,B,A per pixel, for rows `height - 1` down to 0.
fn scanlines(pixels: &PixelBuffer) -> Vec<u8> {
    let stride = 1 + pixels.width() * BYTES_PER_PIXEL;
    let mut raw = Vec::with_capacity(stride * pixels.height());
    for y in (0..pixels.height()).rev() {
        raw.push(0);
        for c in pixels.row(y) {
            raw.extend_from_slice(&c.to_rgba8());
        }
    }
    raw
}

/// Encode an RGBA buffer as an uncompressed PNG.
#[tracing::instrument(skip(pixels), fields(width = pixels.width(), height = pixels.height()))]
pub fn encode(pixels: &PixelBuffer, options: &PngEncoderOptions) -> PngResult<Vec<u8>> {
    if pixels.is_empty() {
        return Err(PngError::EmptyImage);
    }
    let width = u32::try_from(pixels.width()).map_err(|_| PngError::format("width exceeds u32"))?;
    let height = u32::try_from(pixels.height()).map_err(|_| PngError::format("height exceeds u32"))?;

    let header = Header {
        width,
        height,
        bit_depth: BIT_DEPTH,
        color_type: COLOR_TYPE_RGBA,
        compression: 0,
        filter: 0,
        interlace: 0,
    };

    let mut phys = [0u8; PHYS_LEN];
    phys[0..4].copy_from_slice(&dots_per_meter(options.dpi_x).to_be_bytes());
    phys[4..8].copy_from_slice(&dots_per_meter(options.dpi_y).to_be_bytes());
    phys[8] = UNIT_METER;

    let idat = zlib::compress_stored(&scanlines(pixels));

    let mut out = Vec::with_capacity(SIGNATURE.len() + idat.len() + 64);
    out.extend_from_slice(&SIGNATURE);
    write_chunk(&mut out, IHDR, &header.to_bytes());
    write_chunk(&mut out, PHYS, &phys);
    write_chunk(&mut out, IDAT, &idat);
    write_chunk(&mut out, IEND, &[]);
    debug!(bytes = out.len(), "encoded PNG");
    Ok(out)
}

/// Decode an 8-bit RGBA, non-interlaced, unfiltered PNG.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode(bytes: &[u8]) -> PngResult<PixelBuffer> {
    let mut reader = ChunkReader::new(bytes)?;
    let header = reader.header()?;
    header.ensure_supported()?;

    let mut compressed = Vec::new();
    loop {
        let chunk = reader.next_chunk()?;
        match chunk.kind {
            IEND => break,
            IDAT => compressed.extend_from_slice(chunk.data),
            other => debug!(chunk = %chunk_name(&other), len = chunk.data.len(), "skipping chunk"),
        }
    }
    if compressed.is_empty() {
        return Err(PngError::format("no IDAT data"));
    }

    let width = header.width as usize;
    let height = header.height as usize;
    let stride = width
        .checked_mul(BYTES_PER_PIXEL)
        .and_then(|w| w.checked_add(1))
        .ok_or_else(|| PngError::format("image too wide"))?;
    let expected = stride.checked_mul(height).ok_or_else(|| PngError::format("image too large"))?;

    // One zlib stream normally spans all IDAT chunks; streams written one per
    // chunk are accepted too, each checked against its own trailer. Inflation
    // stops as soon as the output would exceed the size IHDR declares.
    let mut raw = Vec::new();
    let mut offset = 0;
    let mut streams = 0;
    while offset < compressed.len() {
        let (data, used) = zlib::decompress(&compressed[offset..], expected - raw.len())?;
        raw.extend_from_slice(&data);
        offset += used;
        streams += 1;
    }
    debug!(streams, inflated = raw.len(), "inflated image data");

    if raw.len() != expected {
        return Err(PngError::format(format!("image data is {} bytes, expected {expected}", raw.len())));
    }

    let mut pixels = PixelBuffer::new(width, height);
    for (row, line) in raw.chunks_exact(stride).enumerate() {
        let filter = line[0];
        if filter != 0 {
            return Err(PngError::not_implemented(format!("scanline filter type {filter}")));
        }
        let y = height - 1 - row;
        for (x, px) in line[1..].chunks_exact(BYTES_PER_PIXEL).enumerate() {
            pixels[(x, y)] = Color::from_rgba8([px[0], px[1], px[2], px[3]]);
        }
    }
    Ok(pixels)
}

/// Read width/height/bit depth/color type from IHDR and the resolution from pHYs,
/// without touching the image data.
pub fn get_image_info(bytes: &[u8]) -> PngResult<ImageInfo> {
    let mut reader = ChunkReader::new(bytes)?;
    let header = reader.header()?;
    let mut dpi = None;
    loop {
        let chunk = reader.next_chunk()?;
        match chunk.kind {
            // pHYs must precede the first IDAT
            PHYS => {
                dpi = parse_phys(chunk.data)?;
                break;
            }
            IDAT | IEND => break,
            _ => {}
        }
    }
    Ok(header.info(dpi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_layout() {
        let px = PixelBuffer::filled(3, 2, Color::RED);
        let bytes = encode(&px, &PngEncoderOptions::default()).unwrap();
        assert_eq!(&bytes[..8], &SIGNATURE);
        assert_eq!(&bytes[8..12], &13u32.to_be_bytes());
        assert_eq!(&bytes[12..16], b"IHDR");
        assert_eq!(&bytes[16..20], &3u32.to_be_bytes());
        assert_eq!(&bytes[20..24], &2u32.to_be_bytes());
        assert_eq!(&bytes[24..29], &[8, 6, 0, 0, 0]);
        assert_eq!(&bytes[33..37], &9u32.to_be_bytes());
        assert_eq!(&bytes[37..41], b"pHYs");
        // 96 dpi = 3780 dots per meter
        assert_eq!(&bytes[41..45], &3780u32.to_be_bytes());
        assert_eq!(bytes[49], 1);
        assert_eq!(&bytes[bytes.len() - 12..], &[0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]);
    }

    #[test]
    fn first_scanline_is_top_row() {
        let px = PixelBuffer::from_fn(1, 2, |_, y| if y == 1 { Color::WHITE } else { Color::BLACK });
        let raw = scanlines(&px);
        assert_eq!(raw, vec![0, 255, 255, 255, 255, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn crc_corruption_is_detected() {
        let px = PixelBuffer::filled(2, 2, Color::RED);
        let mut bytes = encode(&px, &PngEncoderOptions::default()).unwrap();
        bytes[20] ^= 0x01; // inside IHDR payload
        assert!(matches!(decode(&bytes), Err(PngError::CrcMismatch { .. })));
    }
}
