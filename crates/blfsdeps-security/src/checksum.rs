use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use md5::Md5;
use sha2::{Digest, Sha256};

/// Digest algorithms a declared hash can use, told apart by length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    Md5,
    Sha256,
}

impl ChecksumAlgorithm {
    /// BLFS publishes MD5 digests; a 64-digit value is taken as SHA-256.
    /// Anything else is compared as MD5 and can only mismatch.
    pub fn infer(expected_hex: &str) -> Self {
        let trimmed = expected_hex.trim();
        if trimmed.len() == 64 && trimmed.chars().all(|ch| ch.is_ascii_hexdigit()) {
            Self::Sha256
        } else {
            Self::Md5
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksumVerdict {
    Match,
    Mismatch { actual: String },
}

fn digest_reader<D: Digest, R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = [0_u8; 64 * 1024];
    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn digest_file_hex(path: &Path, algorithm: ChecksumAlgorithm) -> Result<String> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let digest = match algorithm {
        ChecksumAlgorithm::Md5 => digest_reader::<Md5, _>(file),
        ChecksumAlgorithm::Sha256 => digest_reader::<Sha256, _>(file),
    };
    digest.with_context(|| format!("failed to read {}", path.display()))
}

/// Hashes `path` with the algorithm implied by `expected_hex` and compares
/// case-insensitively.
pub fn verify_checksum_file(path: &Path, expected_hex: &str) -> Result<ChecksumVerdict> {
    let algorithm = ChecksumAlgorithm::infer(expected_hex);
    let actual = digest_file_hex(path, algorithm)?;
    if actual.eq_ignore_ascii_case(expected_hex.trim()) {
        Ok(ChecksumVerdict::Match)
    } else {
        Ok(ChecksumVerdict::Mismatch { actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    const EMPTY_MD5: &str = "d41d8cd98f00b204e9800998ecf8427e";
    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    fn fixture(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "blfsdeps-security-{}-{}",
            std::process::id(),
            name
        ));
        fs::write(&path, contents).expect("must write fixture");
        path
    }

    #[test]
    fn digests_known_values() {
        let empty = fixture("empty", b"");
        let abc = fixture("abc", b"abc");
        assert_eq!(
            digest_file_hex(&empty, ChecksumAlgorithm::Md5).expect("must digest"),
            EMPTY_MD5
        );
        assert_eq!(
            digest_file_hex(&empty, ChecksumAlgorithm::Sha256).expect("must digest"),
            EMPTY_SHA256
        );
        assert_eq!(
            digest_file_hex(&abc, ChecksumAlgorithm::Md5).expect("must digest"),
            "900150983cd24fb0d6963f7d28e17f72"
        );
        let _ = fs::remove_file(&empty);
        let _ = fs::remove_file(&abc);
    }

    #[test]
    fn infers_algorithm_from_length() {
        assert_eq!(ChecksumAlgorithm::infer(EMPTY_MD5), ChecksumAlgorithm::Md5);
        assert_eq!(
            ChecksumAlgorithm::infer(EMPTY_SHA256),
            ChecksumAlgorithm::Sha256
        );
        assert_eq!(ChecksumAlgorithm::infer("deadbeef"), ChecksumAlgorithm::Md5);
    }

    #[test]
    fn malformed_expected_digest_is_a_mismatch() {
        let path = fixture("malformed", b"abc");
        let verdict =
            verify_checksum_file(&path, "deadbeef").expect("verification must complete");
        assert!(matches!(verdict, ChecksumVerdict::Mismatch { .. }));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn verify_accepts_matching_file_case_insensitively() {
        let path = fixture("match", b"abc");
        let verdict = verify_checksum_file(&path, "900150983CD24FB0D6963F7D28E17F72")
            .expect("verification must complete");
        assert_eq!(verdict, ChecksumVerdict::Match);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn verify_reports_actual_digest_on_mismatch() {
        let path = fixture("mismatch", b"tampered");
        let verdict =
            verify_checksum_file(&path, EMPTY_MD5).expect("verification must complete");
        assert_eq!(
            verdict,
            ChecksumVerdict::Mismatch {
                actual: digest_file_hex(&path, ChecksumAlgorithm::Md5).expect("must digest")
            }
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn verify_uses_sha256_for_long_digests() {
        let path = fixture("sha256", b"");
        let verdict =
            verify_checksum_file(&path, EMPTY_SHA256).expect("verification must complete");
        assert_eq!(verdict, ChecksumVerdict::Match);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn verify_errors_for_missing_file() {
        let path = std::env::temp_dir().join("blfsdeps-security-does-not-exist");
        assert!(verify_checksum_file(&path, EMPTY_MD5).is_err());
    }
}
