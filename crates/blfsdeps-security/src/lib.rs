mod checksum;

pub use checksum::{digest_file_hex, verify_checksum_file, ChecksumAlgorithm, ChecksumVerdict};
