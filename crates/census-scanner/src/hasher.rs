//! Streaming content hashing via xxh3-128 or blake3.

use std::io::{self, Read};

use census_core::constants::HASH_CHUNK_SIZE;
use census_core::types::HashAlgorithm;
use xxhash_rust::xxh3::Xxh3;

/// An in-progress digest for one of the supported algorithms.
pub enum ContentHasher {
    Xxh3(Box<Xxh3>),
    Blake3(Box<blake3::Hasher>),
}

impl ContentHasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Xxh3 => Self::Xxh3(Box::new(Xxh3::new())),
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    pub fn update(&mut self, bytes: &[u8]) {
        match self {
            Self::Xxh3(h) => h.update(bytes),
            Self::Blake3(h) => {
                h.update(bytes);
            }
        }
    }

    /// Lowercase hex digest: 32 chars for xxh3, 64 for blake3.
    pub fn finish_hex(self) -> String {
        match self {
            Self::Xxh3(h) => format!("{:032x}", h.digest128()),
            Self::Blake3(h) => h.finalize().to_hex().to_string(),
        }
    }
}

/// Hash everything `reader` yields, `HASH_CHUNK_SIZE` bytes at a time.
pub fn hash_reader<R: Read>(algorithm: HashAlgorithm, mut reader: R) -> io::Result<(String, u64)> {
    let mut hasher = ContentHasher::new(algorithm);
    let mut buf = vec![0u8; HASH_CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
        total += n as u64;
    }
    Ok((hasher.finish_hex(), total))
}

/// Hash an in-memory buffer.
#[inline]
pub fn hash_bytes(algorithm: HashAlgorithm, bytes: &[u8]) -> String {
    let mut hasher = ContentHasher::new(algorithm);
    hasher.update(bytes);
    hasher.finish_hex()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn deterministic_hash() {
        for algo in HashAlgorithm::all() {
            assert_eq!(hash_bytes(*algo, b"hello world"), hash_bytes(*algo, b"hello world"));
        }
    }

    #[test]
    fn digest_length_matches_algorithm() {
        for algo in HashAlgorithm::all() {
            let hex = hash_bytes(*algo, b"");
            assert_eq!(hex.len(), algo.hex_len());
            assert!(hex.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
        }
    }

    #[test]
    fn different_content_different_hash() {
        assert_ne!(
            hash_bytes(HashAlgorithm::Xxh3, b"hello"),
            hash_bytes(HashAlgorithm::Xxh3, b"world")
        );
    }

    #[test]
    fn blake3_matches_reference() {
        assert_eq!(
            hash_bytes(HashAlgorithm::Blake3, b"abc"),
            blake3::hash(b"abc").to_hex().to_string()
        );
    }

    #[test]
    fn xxh3_matches_one_shot() {
        let data = vec![7u8; HASH_CHUNK_SIZE * 3 + 11];
        let (hex, len) = hash_reader(HashAlgorithm::Xxh3, data.as_slice()).unwrap();
        assert_eq!(hex, format!("{:032x}", xxhash_rust::xxh3::xxh3_128(&data)));
        assert_eq!(len, data.len() as u64);
    }

    /// Reader that returns at most `step` bytes per call.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    proptest! {
        #[test]
        fn chunking_never_changes_digest(
            data in proptest::collection::vec(any::<u8>(), 0..4096),
            step in 1usize..512,
        ) {
            for algo in HashAlgorithm::all() {
                let (streamed, _) = hash_reader(*algo, Trickle { data: &data, step }).unwrap();
                prop_assert_eq!(streamed, hash_bytes(*algo, &data));
            }
        }
    }
}
