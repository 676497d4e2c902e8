/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the raw binary codec used to persist and restore network state.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # serializer
//!
//! A small, type-driven byte codec for numeric state.
//!
//! Every persisted type implements [`BinaryCodec`], which reports its encoded
//! size and writes/reads itself to/from a [`Serializer`] stream. Composite
//! records list their fields once with the `binary_fields!` macro, so encoding
//! and decoding always walk the same field order.
//!
//! The stream is raw: values are written in native byte order, with no header,
//! version tag or compression. Vectors are prefixed by their length and
//! matrices by `[rows][cols]` followed by row-major elements. The format is not
//! self-describing; the reader has to know which type it is decoding.
//!
//! Decoding never reads past the end of the stream and never allocates from a
//! size prefix that the remaining bytes could not satisfy.

use faer::{
    sparse::{SparseColMat, Triplet},
    Col, Mat,
};
use rbfnet_utils::{KernelParams, KernelType};
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    mem::size_of,
    path::{Path, PathBuf},
};

/// Errors raised while encoding, decoding, or moving a byte stream to and from disk.
#[derive(Debug, thiserror::Error)]
pub enum SerializerError {
    /// Failed to open or read an existing file for deserializing.
    #[error("unable to open {} for deserializing: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    /// Failed to create the target file.
    #[error("creating {}: {source}", path.display())]
    Create { path: PathBuf, source: io::Error },

    /// Low-level write error while streaming bytes to disk.
    #[error("writing {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    /// The stream ended before a value could be read.
    #[error("unexpected end of stream: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// Bytes were left over after the expected value was decoded.
    #[error("{remaining} trailing bytes after decoding")]
    TrailingBytes { remaining: usize },

    /// The bytes decoded to a value that cannot be represented.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A decoded record is internally inconsistent.
    #[error("invalid model: {0}")]
    InvalidModel(String),
}

type SerializerResult<T> = std::result::Result<T, SerializerError>;

/// A value with a fixed binary layout.
///
/// `encode` must write exactly `encoded_size` bytes, and `decode` must consume
/// exactly the bytes `encode` wrote.
pub trait BinaryCodec: Sized {
    /// Lower bound on the encoded size of any value of this type. Used to
    /// reject size prefixes that the remaining stream cannot satisfy.
    const MIN_ENCODED_SIZE: usize = 1;

    fn encoded_size(&self) -> usize;

    fn encode(&self, s: &mut Serializer);

    fn decode(s: &mut Serializer) -> SerializerResult<Self>;
}

/// Byte stream with a read cursor.
#[derive(Debug, Default, Clone)]
pub struct Serializer {
    stream: Vec<u8>,
    read: usize,
}

impl Serializer {
    /// Creates an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing byte buffer for decoding.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            stream: bytes,
            read: 0,
        }
    }

    /// Reads a whole file into a new stream.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SerializerResult<Self> {
        let path_ref = path.as_ref();
        let bytes = fs::read(path_ref).map_err(|e| SerializerError::Open {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        Ok(Self::from_bytes(bytes))
    }

    /// Writes the whole stream to a file, replacing any existing content.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> SerializerResult<()> {
        let path_ref = path.as_ref();
        let file = File::create(path_ref).map_err(|e| SerializerError::Create {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        let mut w = BufWriter::new(file);

        w.write_all(&self.stream)
            .and_then(|_| w.flush())
            .map_err(|e| SerializerError::Write {
                path: path_ref.to_path_buf(),
                source: e,
            })
    }

    /// Number of bytes `obj` encodes to.
    pub fn get_size<T: BinaryCodec>(obj: &T) -> usize {
        obj.encoded_size()
    }

    /// Appends `obj` to the stream.
    pub fn serialize<T: BinaryCodec>(&mut self, obj: &T) {
        self.stream.reserve(obj.encoded_size());
        obj.encode(self);
    }

    /// Reads the next value of type `T` from the stream.
    pub fn deserialize<T: BinaryCodec>(&mut self) -> SerializerResult<T> {
        T::decode(self)
    }

    /// Fails if any bytes are left unread.
    pub fn finish(&self) -> SerializerResult<()> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(SerializerError::TrailingBytes { remaining }),
        }
    }

    /// The full encoded stream.
    pub fn as_bytes(&self) -> &[u8] {
        &self.stream
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.stream
    }

    /// Total stream length in bytes.
    pub fn len(&self) -> usize {
        self.stream.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stream.is_empty()
    }

    /// Bytes not yet consumed by decoding.
    pub fn remaining(&self) -> usize {
        self.stream.len() - self.read
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.stream.extend_from_slice(bytes);
    }

    fn read_array<const N: usize>(&mut self) -> SerializerResult<[u8; N]> {
        let remaining = self.remaining();
        if N > remaining {
            return Err(SerializerError::UnexpectedEnd {
                needed: N,
                remaining,
            });
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.stream[self.read..self.read + N]);
        self.read += N;
        Ok(out)
    }

    /// Reads a length prefix and checks that `count` items of at least
    /// `min_item_size` bytes each can still be present.
    fn read_count(&mut self, min_item_size: usize) -> SerializerResult<usize> {
        let count = usize::decode(self)?;
        self.ensure_available(count, min_item_size)?;
        Ok(count)
    }

    fn ensure_available(&self, count: usize, min_item_size: usize) -> SerializerResult<()> {
        let remaining = self.remaining();
        match count.checked_mul(min_item_size) {
            Some(needed) if needed <= remaining => Ok(()),
            Some(needed) => Err(SerializerError::UnexpectedEnd { needed, remaining }),
            None => Err(SerializerError::InvalidData(format!(
                "size prefix {count} overflows the address space"
            ))),
        }
    }
}

// Fixed-width numbers are written as their native-endian bytes.
macro_rules! impl_codec_for_numbers {
    ( $( $t:ty ),* $(,)? ) => {
        $(
            impl BinaryCodec for $t {
                const MIN_ENCODED_SIZE: usize = size_of::<$t>();

                #[inline]
                fn encoded_size(&self) -> usize {
                    size_of::<$t>()
                }

                #[inline]
                fn encode(&self, s: &mut Serializer) {
                    s.write_bytes(&self.to_ne_bytes());
                }

                #[inline]
                fn decode(s: &mut Serializer) -> SerializerResult<Self> {
                    Ok(<$t>::from_ne_bytes(s.read_array::<{ size_of::<$t>() }>()?))
                }
            }
        )*
    };
}

impl_codec_for_numbers!(u8, u32, u64, usize, i32, i64, f64);

impl BinaryCodec for bool {
    fn encoded_size(&self) -> usize {
        1
    }

    fn encode(&self, s: &mut Serializer) {
        s.write_bytes(&[*self as u8]);
    }

    fn decode(s: &mut Serializer) -> SerializerResult<Self> {
        match u8::decode(s)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(SerializerError::InvalidData(format!(
                "byte {other} is not a boolean"
            ))),
        }
    }
}

impl<T: BinaryCodec> BinaryCodec for Vec<T> {
    const MIN_ENCODED_SIZE: usize = size_of::<usize>();

    fn encoded_size(&self) -> usize {
        size_of::<usize>() + self.iter().map(BinaryCodec::encoded_size).sum::<usize>()
    }

    fn encode(&self, s: &mut Serializer) {
        self.len().encode(s);
        for item in self {
            item.encode(s);
        }
    }

    fn decode(s: &mut Serializer) -> SerializerResult<Self> {
        let len = s.read_count(T::MIN_ENCODED_SIZE)?;
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(T::decode(s)?);
        }
        Ok(out)
    }
}

impl BinaryCodec for Col<f64> {
    const MIN_ENCODED_SIZE: usize = size_of::<usize>();

    fn encoded_size(&self) -> usize {
        size_of::<usize>() + self.nrows() * size_of::<f64>()
    }

    fn encode(&self, s: &mut Serializer) {
        // Store the number of vector rows, then the elements
        self.nrows().encode(s);
        for value in self.iter() {
            value.encode(s);
        }
    }

    fn decode(s: &mut Serializer) -> SerializerResult<Self> {
        let rows = s.read_count(size_of::<f64>())?;
        let mut out = Col::<f64>::zeros(rows);
        for i in 0..rows {
            out[i] = f64::decode(s)?;
        }
        Ok(out)
    }
}

impl BinaryCodec for Mat<f64> {
    const MIN_ENCODED_SIZE: usize = 2 * size_of::<usize>();

    fn encoded_size(&self) -> usize {
        2 * size_of::<usize>() + self.nrows() * self.ncols() * size_of::<f64>()
    }

    fn encode(&self, s: &mut Serializer) {
        // Store the number of matrix rows and columns first
        self.nrows().encode(s);
        self.ncols().encode(s);
        for i in 0..self.nrows() {
            for j in 0..self.ncols() {
                self[(i, j)].encode(s);
            }
        }
    }

    fn decode(s: &mut Serializer) -> SerializerResult<Self> {
        let rows = usize::decode(s)?;
        let cols = usize::decode(s)?;
        let num_elements = rows.checked_mul(cols).ok_or_else(|| {
            SerializerError::InvalidData(format!("matrix shape {rows}x{cols} overflows"))
        })?;
        s.ensure_available(num_elements, size_of::<f64>())?;

        let mut out = Mat::<f64>::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                out[(i, j)] = f64::decode(s)?;
            }
        }
        Ok(out)
    }
}

/// Sparse matrices are stored through their dense equivalent. Explicit zeros
/// are not preserved.
impl BinaryCodec for SparseColMat<usize, f64> {
    const MIN_ENCODED_SIZE: usize = 2 * size_of::<usize>();

    fn encoded_size(&self) -> usize {
        2 * size_of::<usize>() + self.nrows() * self.ncols() * size_of::<f64>()
    }

    fn encode(&self, s: &mut Serializer) {
        self.as_ref().to_dense().encode(s);
    }

    fn decode(s: &mut Serializer) -> SerializerResult<Self> {
        let dense = Mat::<f64>::decode(s)?;

        let mut triplets = Vec::new();
        for j in 0..dense.ncols() {
            for i in 0..dense.nrows() {
                let value = dense[(i, j)];
                if value != 0.0 {
                    triplets.push(Triplet::new(i, j, value));
                }
            }
        }

        SparseColMat::try_new_from_triplets(dense.nrows(), dense.ncols(), &triplets)
            .map_err(|e| SerializerError::InvalidData(format!("sparse matrix: {e:?}")))
    }
}

impl BinaryCodec for KernelType {
    fn encoded_size(&self) -> usize {
        size_of::<u8>()
    }

    fn encode(&self, s: &mut Serializer) {
        self.tag().encode(s);
    }

    fn decode(s: &mut Serializer) -> SerializerResult<Self> {
        let tag = u8::decode(s)?;
        KernelType::from_tag(tag)
            .ok_or_else(|| SerializerError::InvalidData(format!("unknown kernel tag {tag}")))
    }
}

/// Implements [`BinaryCodec`] for a record by listing its fields, in stream
/// order, exactly once.
///
/// - `skip { .. }` fields are not stored and are rebuilt with `Default::default()`.
/// - `check path` runs `fn(Self) -> Result<Self, SerializerError>` on every
///   decoded value before it is returned.
macro_rules! binary_fields {
    (
        $ty:ty {
            $( $field:ident : $fty:ty ),* $(,)?
        }
        $( skip { $( $skipped:ident ),* $(,)? } )?
        $( check $check:path )?
    ) => {
        impl $crate::serializer::BinaryCodec for $ty {
            fn encoded_size(&self) -> usize {
                0 $( + $crate::serializer::BinaryCodec::encoded_size(&self.$field) )*
            }

            fn encode(&self, s: &mut $crate::serializer::Serializer) {
                $( $crate::serializer::BinaryCodec::encode(&self.$field, s); )*
            }

            fn decode(
                s: &mut $crate::serializer::Serializer,
            ) -> ::std::result::Result<Self, $crate::serializer::SerializerError> {
                $( let $field = <$fty as $crate::serializer::BinaryCodec>::decode(s)?; )*
                let value = Self {
                    $( $field, )*
                    $( $( $skipped: ::std::default::Default::default(), )* )?
                };
                $( let value = $check(value)?; )?
                Ok(value)
            }
        }
    };
}

pub(crate) use binary_fields;

binary_fields!(KernelParams {
    kernel_type: KernelType,
    shape: f64,
});

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_matrix(rows: usize, cols: usize, seed: u64) -> Mat<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        Mat::from_fn(rows, cols, |_, _| rng.random_range(-1e6..1e6))
    }

    #[test]
    fn dense_matrix_size_and_exact_values() {
        let m = random_matrix(5, 3, 7);

        let mut s = Serializer::new();
        s.serialize(&m);

        assert!(Serializer::get_size(&m) == 2 * size_of::<usize>() + 15 * size_of::<f64>());
        assert!(s.len() == 2 * size_of::<usize>() + 15 * size_of::<f64>());

        let mut r = Serializer::from_bytes(s.into_bytes());
        let decoded: Mat<f64> = r.deserialize().unwrap();
        r.finish().unwrap();

        assert!(decoded == m);
    }

    #[test]
    fn matrix_elements_are_row_major() {
        let m = Mat::from_fn(2, 2, |i, j| (10 * i + j) as f64);

        let mut s = Serializer::new();
        s.serialize(&m);

        let bytes = s.as_bytes();
        let offset = 2 * size_of::<usize>();
        let second = f64::from_ne_bytes(bytes[offset + 8..offset + 16].try_into().unwrap());
        let third = f64::from_ne_bytes(bytes[offset + 16..offset + 24].try_into().unwrap());

        assert!(second == 1.0);
        assert!(third == 10.0);
    }

    #[test]
    fn vectors_and_scalars_in_sequence() {
        let weights = Col::from_fn(4, |i| i as f64 * 0.25 - 1.0);
        let nested = vec![vec![1.0, 2.0], vec![], vec![f64::MIN_POSITIVE]];

        let mut s = Serializer::new();
        s.serialize(&true);
        s.serialize(&42usize);
        s.serialize(&-7i32);
        s.serialize(&weights);
        s.serialize(&nested);

        let expected_len = 1
            + size_of::<usize>()
            + size_of::<i32>()
            + Serializer::get_size(&weights)
            + Serializer::get_size(&nested);
        assert!(s.len() == expected_len);

        let mut r = Serializer::from_bytes(s.into_bytes());
        assert!(r.deserialize::<bool>().unwrap());
        assert!(r.deserialize::<usize>().unwrap() == 42);
        assert!(r.deserialize::<i32>().unwrap() == -7);
        assert!(r.deserialize::<Col<f64>>().unwrap() == weights);
        assert!(r.deserialize::<Vec<Vec<f64>>>().unwrap() == nested);
        assert!(r.remaining() == 0);
    }

    #[test]
    fn truncated_stream_is_an_error() {
        let m = random_matrix(3, 3, 11);
        let mut s = Serializer::new();
        s.serialize(&m);

        let mut bytes = s.into_bytes();
        bytes.truncate(bytes.len() - 3);

        let mut r = Serializer::from_bytes(bytes);
        let err = r.deserialize::<Mat<f64>>().unwrap_err();
        assert!(matches!(err, SerializerError::UnexpectedEnd { .. }));
    }

    #[test]
    fn oversized_prefix_is_rejected_before_allocating() {
        let mut s = Serializer::new();
        s.serialize(&(usize::MAX / 2));
        s.serialize(&1.0f64);

        let mut r = Serializer::from_bytes(s.into_bytes());
        assert!(r.deserialize::<Col<f64>>().is_err());

        let mut s = Serializer::new();
        s.serialize(&usize::MAX);
        s.serialize(&usize::MAX);
        let mut r = Serializer::from_bytes(s.into_bytes());
        let err = r.deserialize::<Mat<f64>>().unwrap_err();
        assert!(matches!(err, SerializerError::InvalidData(_)));
    }

    #[test]
    fn invalid_boolean_byte() {
        let mut r = Serializer::from_bytes(vec![2u8]);
        assert!(matches!(
            r.deserialize::<bool>().unwrap_err(),
            SerializerError::InvalidData(_)
        ));
    }

    #[test]
    fn kernel_params_record() {
        let params = KernelParams::builder(KernelType::InverseMultiquadric)
            .shape(0.3)
            .build();

        let mut s = Serializer::new();
        s.serialize(&params);
        assert!(s.len() == 1 + size_of::<f64>());

        let mut r = Serializer::from_bytes(s.into_bytes());
        assert!(r.deserialize::<KernelParams>().unwrap() == params);

        let mut r = Serializer::from_bytes(vec![200u8; 9]);
        assert!(r.deserialize::<KernelParams>().is_err());
    }

    #[test]
    fn sparse_matrix_goes_through_dense() {
        let triplets = [
            Triplet::new(0usize, 0usize, 1.5f64),
            Triplet::new(2, 1, -2.0),
            Triplet::new(1, 3, 4.25),
        ];
        let sparse = SparseColMat::<usize, f64>::try_new_from_triplets(3, 4, &triplets).unwrap();

        let mut s = Serializer::new();
        s.serialize(&sparse);
        assert!(s.len() == 2 * size_of::<usize>() + 12 * size_of::<f64>());

        let mut r = Serializer::from_bytes(s.into_bytes());
        let decoded: SparseColMat<usize, f64> = r.deserialize().unwrap();

        assert!(decoded.as_ref().to_dense() == sparse.as_ref().to_dense());
    }

    #[test]
    fn file_round_trip_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.bin");

        let m = random_matrix(4, 2, 3);
        let mut s = Serializer::new();
        s.serialize(&m);
        s.save_to_file(&path).unwrap();

        let mut r = Serializer::load_from_file(&path).unwrap();
        assert!(r.deserialize::<Mat<f64>>().unwrap() == m);

        let missing = dir.path().join("missing.bin");
        let err = Serializer::load_from_file(&missing).unwrap_err();
        assert!(err.to_string().contains("missing.bin"));
    }
}
