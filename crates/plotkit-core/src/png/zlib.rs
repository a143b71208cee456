// File: crates/plotkit-core/src/png/zlib.rs
// Summary: zlib framing (RFC 1950) over deflate stored blocks for writing, and a
//          complete inflater (stored, fixed and dynamic Huffman blocks, RFC 1951) for reading.

use tracing::trace;

use super::checksum::adler32;
use crate::error::{PngError, PngResult};

/// CM = 8 (deflate), CINFO = 0. Stored blocks never reference back, so the smallest
/// window is sufficient.
pub const ZLIB_CMF: u8 = 0x08;
/// Largest payload of one stored block.
pub const MAX_STORED_BLOCK: usize = 0xFFFF;

/// FLG byte whose FCHECK bits make `(cmf * 256 + flg) % 31 == 0`, with FDICT and FLEVEL clear.
pub const fn zlib_flg(cmf: u8) -> u8 {
    let base = (cmf as u16) * 256;
    let rem = base % 31;
    if rem == 0 { 0 } else { (31 - rem) as u8 }
}

/// Wrap `data` in a zlib stream made of uncompressed deflate blocks.
pub fn compress_stored(data: &[u8]) -> Vec<u8> {
    let blocks = data.len().div_ceil(MAX_STORED_BLOCK).max(1);
    let mut out = Vec::with_capacity(data.len() + blocks * 5 + 6);
    out.push(ZLIB_CMF);
    out.push(zlib_flg(ZLIB_CMF));

    if data.is_empty() {
        write_stored_block(&mut out, &[], true);
    } else {
        let mut chunks = data.chunks(MAX_STORED_BLOCK).peekable();
        while let Some(chunk) = chunks.next() {
            write_stored_block(&mut out, chunk, chunks.peek().is_none());
        }
    }

    out.extend_from_slice(&adler32(data).to_be_bytes());
    out
}

fn write_stored_block(out: &mut Vec<u8>, chunk: &[u8], last: bool) {
    // BFINAL in bit 0, BTYPE = 00; the remaining bits pad to the byte boundary.
    out.push(u8::from(last));
    let len = chunk.len() as u16;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&(!len).to_le_bytes());
    out.extend_from_slice(chunk);
}

/// Decode one zlib stream at the start of `data`, producing at most `limit` bytes.
/// Returns the inflated bytes and the number of input bytes consumed.
pub fn decompress(data: &[u8], limit: usize) -> PngResult<(Vec<u8>, usize)> {
    if data.len() < 2 {
        return Err(PngError::eof("zlib header"));
    }
    let (cmf, flg) = (data[0], data[1]);
    if cmf & 0x0F != 8 {
        return Err(PngError::format(format!("unsupported zlib compression method {}", cmf & 0x0F)));
    }
    if cmf >> 4 > 7 {
        return Err(PngError::format(format!("invalid zlib window size {}", cmf >> 4)));
    }
    if (cmf as u16 * 256 + flg as u16) % 31 != 0 {
        return Err(PngError::format("zlib header check bits are wrong"));
    }
    if flg & 0x20 != 0 {
        return Err(PngError::not_implemented("zlib preset dictionary"));
    }

    let mut reader = BitReader::new(&data[2..]);
    let inflated = inflate(&mut reader, limit)?;
    let end = 2 + reader.byte_pos();

    let trailer = data.get(end..end + 4).ok_or_else(|| PngError::eof("Adler-32 trailer"))?;
    let expected = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    let actual = adler32(&inflated);
    if expected != actual {
        return Err(PngError::AdlerMismatch { expected, actual });
    }
    Ok((inflated, end + 4))
}

// ---- inflate -----------------------------------------------------------------

const MAX_BITS: usize = 15;
const MAX_LIT_CODES: usize = 288;
const MAX_DIST_CODES: usize = 30;

const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];
const LENGTH_EXTRA: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];
const DIST_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];
const DIST_EXTRA: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13, 13,
];
const CODE_LENGTH_ORDER: [usize; 19] = [16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15];

/// LSB-first bit reader. Loads one byte at a time so that fewer than eight
/// buffered bits remain after any read, all belonging to the last loaded byte.
struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    buf: u32,
    count: u32,
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0, buf: 0, count: 0 }
    }

    fn bits(&mut self, n: u32) -> PngResult<u32> {
        while self.count < n {
            let byte = *self.data.get(self.pos).ok_or_else(|| PngError::eof("deflate stream"))?;
            self.pos += 1;
            self.buf |= (byte as u32) << self.count;
            self.count += 8;
        }
        let v = self.buf & ((1u32 << n) - 1);
        self.buf = if n == 32 { 0 } else { self.buf >> n };
        self.count -= n;
        Ok(v)
    }

    fn align(&mut self) {
        self.buf = 0;
        self.count = 0;
    }

    fn read_bytes(&mut self, n: usize) -> PngResult<&'a [u8]> {
        let end = self.pos + n;
        let slice = self.data.get(self.pos..end).ok_or_else(|| PngError::eof("stored block"))?;
        self.pos = end;
        Ok(slice)
    }

    fn byte_pos(&self) -> usize {
        self.pos
    }
}

/// Canonical Huffman code: per-length counts and symbols ordered by code.
struct Huffman {
    counts: [u16; MAX_BITS + 1],
    symbols: Vec<u16>,
}

impl Huffman {
    fn new(lengths: &[u8]) -> PngResult<Self> {
        let mut counts = [0u16; MAX_BITS + 1];
        for &len in lengths {
            counts[len as usize] += 1;
        }
        let mut left: i32 = 1;
        for &count in &counts[1..] {
            left <<= 1;
            left -= count as i32;
            if left < 0 {
                return Err(PngError::format("over-subscribed Huffman code"));
            }
        }

        let mut offsets = [0u16; MAX_BITS + 2];
        for len in 1..=MAX_BITS {
            offsets[len + 1] = offsets[len] + counts[len];
        }
        let mut symbols = vec![0u16; lengths.len()];
        for (symbol, &len) in lengths.iter().enumerate() {
            if len != 0 {
                symbols[offsets[len as usize] as usize] = symbol as u16;
                offsets[len as usize] += 1;
            }
        }
        Ok(Self { counts, symbols })
    }

    fn decode(&self, reader: &mut BitReader<'_>) -> PngResult<u16> {
        let mut code: i32 = 0;
        let mut first: i32 = 0;
        let mut index: i32 = 0;
        for len in 1..=MAX_BITS {
            code |= reader.bits(1)? as i32;
            let count = self.counts[len] as i32;
            if code - first < count {
                return Ok(self.symbols[(index + code - first) as usize]);
            }
            index += count;
            first += count;
            first <<= 1;
            code <<= 1;
        }
        Err(PngError::format("invalid Huffman code"))
    }
}

fn fixed_tables() -> PngResult<(Huffman, Huffman)> {
    let mut lit = [0u8; MAX_LIT_CODES];
    lit[..144].fill(8);
    lit[144..256].fill(9);
    lit[256..280].fill(7);
    lit[280..].fill(8);
    let dist = [5u8; MAX_DIST_CODES];
    Ok((Huffman::new(&lit)?, Huffman::new(&dist)?))
}

fn dynamic_tables(reader: &mut BitReader<'_>) -> PngResult<(Huffman, Huffman)> {
    let nlen = reader.bits(5)? as usize + 257;
    let ndist = reader.bits(5)? as usize + 1;
    let ncode = reader.bits(4)? as usize + 4;
    if nlen > 286 || ndist > MAX_DIST_CODES {
        return Err(PngError::format("bad dynamic block code counts"));
    }

    let mut code_lengths = [0u8; 19];
    for &idx in &CODE_LENGTH_ORDER[..ncode] {
        code_lengths[idx] = reader.bits(3)? as u8;
    }
    let lencode = Huffman::new(&code_lengths)?;

    let mut lengths = vec![0u8; nlen + ndist];
    let mut i = 0;
    while i < nlen + ndist {
        let symbol = lencode.decode(reader)?;
        if symbol < 16 {
            lengths[i] = symbol as u8;
            i += 1;
            continue;
        }
        let (value, repeat) = match symbol {
            16 => {
                let prev = *i.checked_sub(1).and_then(|p| lengths.get(p))
                    .ok_or_else(|| PngError::format("repeat with no previous length"))?;
                (prev, 3 + reader.bits(2)? as usize)
            }
            17 => (0, 3 + reader.bits(3)? as usize),
            _ => (0, 11 + reader.bits(7)? as usize),
        };
        if i + repeat > nlen + ndist {
            return Err(PngError::format("too many code lengths"));
        }
        lengths[i..i + repeat].fill(value);
        i += repeat;
    }
    if lengths[256] == 0 {
        return Err(PngError::format("missing end-of-block code"));
    }

    Ok((Huffman::new(&lengths[..nlen])?, Huffman::new(&lengths[nlen..])?))
}

fn ensure_room(out: &[u8], extra: usize, limit: usize) -> PngResult<()> {
    if extra > limit.saturating_sub(out.len()) {
        return Err(PngError::format("image data exceeds declared size"));
    }
    Ok(())
}

fn inflate_codes(
    reader: &mut BitReader<'_>,
    out: &mut Vec<u8>,
    lit: &Huffman,
    dist: &Huffman,
    limit: usize,
) -> PngResult<()> {
    loop {
        let symbol = lit.decode(reader)? as usize;
        if symbol < 256 {
            ensure_room(out, 1, limit)?;
            out.push(symbol as u8);
            continue;
        }
        if symbol == 256 {
            return Ok(());
        }

        let idx = symbol - 257;
        if idx >= LENGTH_BASE.len() {
            return Err(PngError::format("invalid length symbol"));
        }
        let len = LENGTH_BASE[idx] as usize + reader.bits(LENGTH_EXTRA[idx] as u32)? as usize;

        let didx = dist.decode(reader)? as usize;
        if didx >= DIST_BASE.len() {
            return Err(PngError::format("invalid distance symbol"));
        }
        let distance = DIST_BASE[didx] as usize + reader.bits(DIST_EXTRA[didx] as u32)? as usize;
        if distance > out.len() {
            return Err(PngError::format("distance reaches before start of output"));
        }
        ensure_room(out, len, limit)?;

        let start = out.len() - distance;
        for k in 0..len {
            let b = out[start + k];
            out.push(b);
        }
    }
}

fn inflate(reader: &mut BitReader<'_>, limit: usize) -> PngResult<Vec<u8>> {
    let mut out = Vec::new();
    loop {
        let last = reader.bits(1)? == 1;
        let kind = reader.bits(2)?;
        trace!(kind, last, "deflate block");
        match kind {
            0 => {
                reader.align();
                let header = reader.read_bytes(4)?;
                let len = u16::from_le_bytes([header[0], header[1]]);
                let nlen = u16::from_le_bytes([header[2], header[3]]);
                if len != !nlen {
                    return Err(PngError::format("stored block length check failed"));
                }
                ensure_room(&out, len as usize, limit)?;
                out.extend_from_slice(reader.read_bytes(len as usize)?);
            }
            1 => {
                let (lit, dist) = fixed_tables()?;
                inflate_codes(reader, &mut out, &lit, &dist, limit)?;
            }
            2 => {
                let (lit, dist) = dynamic_tables(reader)?;
                inflate_codes(reader, &mut out, &lit, &dist, limit)?;
            }
            _ => return Err(PngError::format("reserved deflate block type")),
        }
        if last {
            return Ok(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_check_bits() {
        let flg = zlib_flg(ZLIB_CMF);
        assert_eq!((ZLIB_CMF as u16 * 256 + flg as u16) % 31, 0);
        assert_eq!(zlib_flg(0x78), 0x01);
    }

    #[test]
    fn stored_roundtrip_spans_blocks() {
        let data: Vec<u8> = (0..200_000u32).map(|i| (i * 31 % 251) as u8).collect();
        let z = compress_stored(&data);
        // 4 blocks of framing (5 bytes each) + header + trailer
        assert_eq!(z.len(), data.len() + 4 * 5 + 6);
        let (back, used) = decompress(&z, usize::MAX).unwrap();
        assert_eq!(used, z.len());
        assert_eq!(back, data);
    }

    #[test]
    fn empty_input_is_one_final_block() {
        let z = compress_stored(&[]);
        assert_eq!(&z[2..7], &[0x01, 0x00, 0x00, 0xFF, 0xFF]);
        let (back, _) = decompress(&z, usize::MAX).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn fixed_huffman_stream() {
        // zlib.compress(b"hello hello hello hello")
        let z = [
            0x78, 0x9c, 0xcb, 0x48, 0xcd, 0xc9, 0xc9, 0x57, 0xc8, 0x40, 0x27, 0x01, 0x68, 0x03, 0x08,
            0xb1,
        ];
        let (back, used) = decompress(&z, usize::MAX).unwrap();
        assert_eq!(back, b"hello hello hello hello");
        assert_eq!(used, z.len());
    }

    #[test]
    fn dynamic_huffman_stream() {
        // zlib.compress(<300 random bytes over "abcde">, 9); first block is BTYPE=2
        let z = [
            0x78, 0xda, 0x4d, 0x4f, 0xdb, 0x0d, 0xc4, 0x30, 0x0c, 0x9a, 0x15, 0x0c, 0xfb, 0xaf, 0x70,
            0x40, 0xf3, 0x71, 0x8d, 0x64, 0xc5, 0xe5, 0x19, 0x82, 0x06, 0x0e, 0x54, 0x06, 0x40, 0x66,
            0x1c, 0x21, 0xc0, 0x16, 0xa4, 0xed, 0xf9, 0x9f, 0x11, 0x46, 0xa8, 0x92, 0xdf, 0xa6, 0x48,
            0x8f, 0xa4, 0x26, 0x42, 0xf1, 0x6c, 0x95, 0xc6, 0x80, 0xb5, 0x32, 0x4e, 0x23, 0xcc, 0xa6,
            0x41, 0xb0, 0x1c, 0xc8, 0x83, 0x63, 0x30, 0x61, 0x55, 0x19, 0x8d, 0x49, 0x91, 0x82, 0xfb,
            0x42, 0x4f, 0xab, 0x11, 0x8e, 0x6d, 0x72, 0xb2, 0x5f, 0xe6, 0xe7, 0x51, 0xe8, 0x91, 0xf4,
            0xbd, 0x21, 0x97, 0xc6, 0x7e, 0x9d, 0xc6, 0x1b, 0xa7, 0x85, 0xdb, 0xea, 0x72, 0xfc, 0xfa,
            0xdd, 0x5d, 0x1a, 0x69, 0x16, 0x37, 0x22, 0xab, 0xfe, 0xd3, 0x24, 0xb4, 0x31, 0xae, 0x61,
            0xcf, 0x0f, 0x9e, 0x4d, 0x72, 0xf1,
        ];
        assert_eq!((z[2] >> 1) & 3, 2);
        // Adler-32 is verified inside decompress.
        let (back, used) = decompress(&z, usize::MAX).unwrap();
        assert_eq!(used, z.len());
        assert_eq!(back.len(), 300);
        assert!(back.starts_with(b"babeaacabdacaaabb"));
        assert!(back.iter().all(|b| (b'a'..=b'e').contains(b)));
    }

    #[test]
    fn corrupted_trailer_is_rejected() {
        let mut z = compress_stored(b"abc");
        let n = z.len();
        z[n - 1] ^= 0xFF;
        assert!(matches!(decompress(&z, usize::MAX), Err(PngError::AdlerMismatch { .. })));
    }

    #[test]
    fn bad_header_is_rejected() {
        let mut z = compress_stored(b"abc");
        z[1] ^= 0x01;
        assert!(matches!(decompress(&z, usize::MAX), Err(PngError::Format(_))));
    }

    #[test]
    fn output_beyond_limit_is_rejected() {
        let data = [7u8; 100];
        let z = compress_stored(&data);
        assert!(decompress(&z, 100).is_ok());
        assert!(matches!(decompress(&z, 99), Err(PngError::Format(_))));

        // "hello hello hello hello" as fixed Huffman; its back-reference copy crosses a 10-byte limit
        let z = [0x78, 0x9c, 0xcb, 0x48, 0xcd, 0xc9, 0xc9, 0x57, 0xc8, 0x40, 0x27, 0x01, 0x68, 0x03, 0x08, 0xb1];
        assert!(decompress(&z, 23).is_ok());
        assert!(matches!(decompress(&z, 10), Err(PngError::Format(_))));
    }
}
