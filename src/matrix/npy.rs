//! Minimal NumPy `.npy` codec for 2-D numeric arrays
//!
//! Layout: 6-byte magic, 2-byte version, header length (u16 for v1, u32 for
//! v2/v3), an ASCII Python dict literal describing dtype/order/shape, then the
//! raw element data.
//!
//! Reading accepts `f8`, `f4`, `i8` and `i4` in either byte order and either
//! memory order; everything is widened to `f64`. Writing always produces
//! version 1.0, little-endian `f8`, C order.

use std::io::{self, Write};

use crate::error::{Result, SimError};
use crate::matrix::Matrix;

const MAGIC: &[u8; 6] = b"\x93NUMPY";

// numpy pads the header so element data starts on this boundary
const ALIGN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endian {
    Little,
    Big,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    F8,
    F4,
    I8,
    I4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Dtype {
    endian: Endian,
    kind: Kind,
}

impl Dtype {
    fn parse(descr: &str) -> Result<Self> {
        let mut chars = descr.chars();
        let endian = match chars.next() {
            Some('<') => Endian::Little,
            Some('>') => Endian::Big,
            Some('=') if cfg!(target_endian = "big") => Endian::Big,
            Some('=') => Endian::Little,
            _ => return Err(SimError::Npy(format!("unsupported dtype '{descr}'"))),
        };
        let kind = match chars.as_str() {
            "f8" => Kind::F8,
            "f4" => Kind::F4,
            "i8" => Kind::I8,
            "i4" => Kind::I4,
            _ => return Err(SimError::Npy(format!("unsupported dtype '{descr}'"))),
        };
        Ok(Self { endian, kind })
    }

    fn size(&self) -> usize {
        match self.kind {
            Kind::F8 | Kind::I8 => 8,
            Kind::F4 | Kind::I4 => 4,
        }
    }

    fn read(&self, b: &[u8]) -> f64 {
        macro_rules! load {
            ($t:ty, $n:expr) => {{
                let mut raw = [0u8; $n];
                raw.copy_from_slice(b);
                match self.endian {
                    Endian::Little => <$t>::from_le_bytes(raw),
                    Endian::Big => <$t>::from_be_bytes(raw),
                }
            }};
        }
        match self.kind {
            Kind::F8 => load!(f64, 8),
            Kind::F4 => load!(f32, 4) as f64,
            Kind::I8 => load!(i64, 8) as f64,
            Kind::I4 => load!(i32, 4) as f64,
        }
    }
}

/// Decode a complete `.npy` byte buffer into a [`Matrix`]
pub fn decode(bytes: &[u8]) -> Result<Matrix> {
    if bytes.len() < 10 || &bytes[..6] != MAGIC {
        return Err(SimError::Npy("missing NUMPY magic".into()));
    }

    let major = bytes[6];
    let (header_len, offset) = match major {
        1 => (u16::from_le_bytes([bytes[8], bytes[9]]) as usize, 10),
        2 | 3 => {
            if bytes.len() < 12 {
                return Err(SimError::Npy("truncated header".into()));
            }
            let len = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
            (len as usize, 12)
        }
        v => return Err(SimError::Npy(format!("unsupported format version {v}"))),
    };

    let data_start = offset + header_len;
    if bytes.len() < data_start {
        return Err(SimError::Npy("truncated header".into()));
    }
    let header = std::str::from_utf8(&bytes[offset..data_start])
        .map_err(|_| SimError::Npy("header is not valid text".into()))?;

    let dtype = Dtype::parse(dict_value(header, "descr")?.trim_matches(|c: char| c == '\'' || c == '"'))?;
    let fortran_order = match dict_value(header, "fortran_order")? {
        "True" => true,
        "False" => false,
        other => return Err(SimError::Npy(format!("bad fortran_order '{other}'"))),
    };
    let (rows, cols) = parse_shape(dict_value(header, "shape")?)?;

    let count = rows
        .checked_mul(cols)
        .ok_or(SimError::Allocation { rows, cols })?;
    let payload = &bytes[data_start..];
    let needed = count
        .checked_mul(dtype.size())
        .ok_or(SimError::Allocation { rows, cols })?;
    if payload.len() < needed {
        return Err(SimError::Npy(format!(
            "expected {needed} bytes of data, found {}",
            payload.len()
        )));
    }

    let mut matrix = Matrix::create(rows, cols)?;
    let values = payload.chunks_exact(dtype.size()).take(count).map(|b| dtype.read(b));
    if fortran_order {
        // column-major on disk: element k is (k % rows, k / rows)
        for (k, value) in values.enumerate() {
            matrix.row_mut(k % rows)[k / rows] = value;
        }
    } else {
        for (k, value) in values.enumerate() {
            matrix.row_mut(k / cols)[k % cols] = value;
        }
    }
    Ok(matrix)
}

/// Encode `matrix` as a version 1.0 `.npy` stream
pub fn encode<W: Write>(w: &mut W, matrix: &Matrix) -> io::Result<()> {
    let dict = format!(
        "{{'descr': '<f8', 'fortran_order': False, 'shape': ({}, {}), }}",
        matrix.rows(),
        matrix.cols()
    );

    // magic + version + u16 length + dict + trailing newline, padded to ALIGN
    let unpadded = MAGIC.len() + 2 + 2 + dict.len() + 1;
    let padding = (ALIGN - unpadded % ALIGN) % ALIGN;
    let header_len = dict.len() + padding + 1;
    let header_len = u16::try_from(header_len)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "npy header too long"))?;

    w.write_all(MAGIC)?;
    w.write_all(&[1, 0])?;
    w.write_all(&header_len.to_le_bytes())?;
    w.write_all(dict.as_bytes())?;
    w.write_all(&vec![b' '; padding])?;
    w.write_all(b"\n")?;

    for value in matrix.data() {
        w.write_all(&value.to_le_bytes())?;
    }
    Ok(())
}

/// Extract the raw text of `key`'s value from the header dict literal
fn dict_value<'a>(header: &'a str, key: &str) -> Result<&'a str> {
    let missing = || SimError::Npy(format!("header has no '{key}' entry"));

    let quoted = format!("'{key}'");
    let start = header
        .find(&quoted)
        .or_else(|| header.find(&format!("\"{key}\"")))
        .ok_or_else(missing)?;
    let rest = header[start + quoted.len()..].trim_start();
    let rest = rest.strip_prefix(':').ok_or_else(missing)?.trim_start();

    let end = match rest.chars().next() {
        Some(q @ ('\'' | '"')) => rest[1..].find(q).map(|i| i + 2),
        Some('(') => rest.find(')').map(|i| i + 1),
        Some(_) => rest.find([',', '}']),
        None => None,
    }
    .ok_or_else(|| SimError::Npy(format!("unterminated '{key}' entry")))?;

    Ok(rest[..end].trim())
}

fn parse_shape(raw: &str) -> Result<(usize, usize)> {
    let inner = raw
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| SimError::Npy(format!("bad shape '{raw}'")))?;

    let dims = inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| SimError::Npy(format!("bad shape '{raw}'")))
        })
        .collect::<Result<Vec<_>>>()?;

    match dims[..] {
        [rows, cols] => Ok((rows, cols)),
        _ => Err(SimError::Npy(format!(
            "expected a 2-D array, found {} dimensions",
            dims.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(dict: &str) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&[1, 0]);
        out.extend_from_slice(&(dict.len() as u16).to_le_bytes());
        out.extend_from_slice(dict.as_bytes());
        out
    }

    #[test]
    fn header_is_aligned() {
        let m = Matrix::create(3, 7).unwrap();
        let mut buf = Vec::new();
        encode(&mut buf, &m).unwrap();

        let header_len = u16::from_le_bytes([buf[8], buf[9]]) as usize;
        assert_eq!((10 + header_len) % ALIGN, 0);
        assert_eq!(buf[10 + header_len - 1], b'\n');
        assert_eq!(buf.len(), 10 + header_len + 21 * 8);
    }

    #[test]
    fn reads_fortran_order_int32() {
        // 2x3 [[1,2,3],[4,5,6]] stored column-major
        let mut bytes = header_bytes("{'descr': '<i4', 'fortran_order': True, 'shape': (2, 3), }\n");
        for v in [1i32, 4, 2, 5, 3, 6] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let m = decode(&bytes).unwrap();
        assert_eq!(m.row(0), &[1.0, 2.0, 3.0]);
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn reads_big_endian_f8() {
        let mut bytes = header_bytes("{'descr': '>f8', 'fortran_order': False, 'shape': (1, 2), }\n");
        bytes.extend_from_slice(&1.5f64.to_be_bytes());
        bytes.extend_from_slice(&(-2.25f64).to_be_bytes());
        let m = decode(&bytes).unwrap();
        assert_eq!(m.row(0), &[1.5, -2.25]);
    }

    #[test]
    fn reads_version_2_header() {
        let dict = "{'descr': '<f4', 'fortran_order': False, 'shape': (2, 1), }\n";
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&[2, 0]);
        bytes.extend_from_slice(&(dict.len() as u32).to_le_bytes());
        bytes.extend_from_slice(dict.as_bytes());
        bytes.extend_from_slice(&0.5f32.to_le_bytes());
        bytes.extend_from_slice(&(-8.0f32).to_le_bytes());

        let m = decode(&bytes).unwrap();
        assert_eq!((m.rows(), m.cols()), (2, 1));
        assert_eq!(m.data(), &[0.5, -8.0]);

        // version 3.0 shares the 4-byte length field
        bytes[6] = 3;
        assert_eq!(decode(&bytes).unwrap(), m);
    }

    #[test]
    fn rejects_one_dimensional_arrays() {
        let mut bytes = header_bytes("{'descr': '<f8', 'fortran_order': False, 'shape': (4,), }\n");
        bytes.extend_from_slice(&[0u8; 32]);
        assert!(matches!(decode(&bytes), Err(SimError::Npy(_))));
    }

    #[test]
    fn rejects_truncated_data() {
        let mut bytes = header_bytes("{'descr': '<f8', 'fortran_order': False, 'shape': (2, 2), }\n");
        bytes.extend_from_slice(&[0u8; 16]);
        assert!(matches!(decode(&bytes), Err(SimError::Npy(_))));
    }

    #[test]
    fn rejects_bad_magic() {
        assert!(decode(b"not an npy file at all").is_err());
    }
}
