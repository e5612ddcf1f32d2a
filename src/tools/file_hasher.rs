use crate::config::HashAlgorithm;
use anyhow::{Context, Result};
use md5::{Digest, Md5};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

const BUFFER_SIZE: usize = 4 * 1024 * 1024; // 4MB buffer

/// 超過此大小的檔案只讀取頭尾兩段
pub const DEFAULT_PARTIAL_HASH_THRESHOLD: u64 = 2 * 1000 * 1000;

enum FingerprintHasher {
    Md5(Md5),
    Blake3(Box<blake3::Hasher>),
}

impl FingerprintHasher {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => Self::Md5(Md5::new()),
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Md5(hasher) => hasher.update(data),
            Self::Blake3(hasher) => {
                hasher.update(data);
            }
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            Self::Md5(hasher) => format!("{:x}", hasher.finalize()),
            Self::Blake3(hasher) => hasher.finalize().to_hex().to_string(),
        }
    }
}

/// 計算檔案指紋
///
/// 檔案大小不超過 `threshold` 時雜湊全部內容；超過時只雜湊前 `threshold / 2`
/// 與後 `threshold / 2` 位元組的串接，兩段各自 seek 讀取。
pub fn calculate_fingerprint(
    path: &Path,
    algorithm: HashAlgorithm,
    threshold: u64,
) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("無法開啟檔案: {}", path.display()))?;
    let file_size = file
        .metadata()
        .with_context(|| format!("無法取得檔案資訊: {}", path.display()))?
        .len();

    let mut hasher = FingerprintHasher::new(algorithm);
    let mut buffer = vec![0u8; BUFFER_SIZE];

    if file_size > threshold {
        let half = threshold >> 1;

        hash_window(&mut file, half, &mut hasher, &mut buffer)
            .with_context(|| format!("讀取檔案開頭失敗: {}", path.display()))?;

        file.seek(SeekFrom::Start(file_size - half))
            .with_context(|| format!("檔案定位失敗: {}", path.display()))?;
        hash_window(&mut file, half, &mut hasher, &mut buffer)
            .with_context(|| format!("讀取檔案結尾失敗: {}", path.display()))?;
    } else {
        let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);
        loop {
            let bytes_read = reader
                .read(&mut buffer)
                .with_context(|| format!("讀取檔案失敗: {}", path.display()))?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }
    }

    Ok(hasher.finalize_hex())
}

/// 從目前位置讀取剛好 `len` 位元組送入 hasher
fn hash_window(
    file: &mut File,
    len: u64,
    hasher: &mut FingerprintHasher,
    buffer: &mut [u8],
) -> std::io::Result<()> {
    let mut remaining = len;

    while remaining > 0 {
        let chunk = usize::try_from(remaining).map_or(buffer.len(), |r| r.min(buffer.len()));
        let bytes_read = match file.read(&mut buffer[..chunk]) {
            Ok(0) => return Err(ErrorKind::UnexpectedEof.into()),
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
        remaining -= bytes_read as u64;
    }

    Ok(())
}
