//! Security Module
//!
//! 入力データのサイズ制限を実装するモジュール。
//! 解析前に入力全体をメモリに読み込むため、上限を超える入力は拒否します。

use std::io::Read;

use crate::error::ConvertError;

/// 入力ファイルの最大サイズのデフォルト値（2GB）
pub(crate) const DEFAULT_MAX_INPUT_FILE_SIZE: u64 = 2_147_483_648;

/// セキュリティ設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SecurityConfig {
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 2GB (2_147_483_648 bytes)
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: DEFAULT_MAX_INPUT_FILE_SIZE,
        }
    }
}

impl SecurityConfig {
    /// 入力全体をサイズ制限付きで読み込む
    ///
    /// 上限+1バイトまでしか読まないため、巨大な入力でもメモリを使い切りません。
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<u8>)` - 読み込んだバイト列
    /// * `Err(ConvertError::SecurityViolation)` - 上限を超えた場合
    /// * `Err(ConvertError::Io)` - 読み込みに失敗した場合
    pub fn read_limited<R: Read>(&self, reader: R) -> Result<Vec<u8>, ConvertError> {
        let mut buffer = Vec::new();
        let bytes_read = reader
            .take(self.max_input_file_size.saturating_add(1))
            .read_to_end(&mut buffer)?;

        if bytes_read as u64 > self.max_input_file_size {
            return Err(ConvertError::SecurityViolation(format!(
                "Input file size exceeds maximum: more than {} bytes",
                self.max_input_file_size
            )));
        }

        Ok(buffer)
    }
}
