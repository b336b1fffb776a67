//! data URLエンコーディングの解析
//!
//! "data:image/jpeg;base64,..." 形式の文字列をMIMEタイプと
//! base64ペイロードに分解する。形状が合わない入力は
//! `InvalidImageEncoding` として拒否する。

use crate::error::{Error, Result};

/// 解析済みdata URL（MIMEタイプ + base64ペイロード）
///
/// ペイロードはデコードしない。画像のエンコード・デコードは
/// プラットフォームAPIに委譲するため、ここでは形状検証のみ行う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUrl<'a> {
    pub mime_type: &'a str,
    pub data: &'a str,
}

impl<'a> DataUrl<'a> {
    /// data URL文字列を解析する
    ///
    /// # Arguments
    /// * `input` - "data:image/jpeg;base64,/9j/4AAQ..." 形式のdata URL
    ///
    /// # Returns
    /// * `Ok(DataUrl)` - MIMEタイプとbase64ペイロード
    /// * `Err(InvalidImageEncoding)` - 形状が合わない場合
    pub fn parse(input: &'a str) -> Result<Self> {
        let rest = input
            .strip_prefix("data:")
            .ok_or_else(|| Error::InvalidImageEncoding("data URLではありません".to_string()))?;

        let (header, data) = rest.split_once(',').ok_or_else(|| {
            Error::InvalidImageEncoding("ペイロード区切りがありません".to_string())
        })?;

        let mime_type = header.strip_suffix(";base64").ok_or_else(|| {
            Error::InvalidImageEncoding("base64指定がありません".to_string())
        })?;

        if !mime_type.starts_with("image/") {
            return Err(Error::InvalidImageEncoding(format!(
                "画像以外のMIMEタイプ: {}",
                mime_type
            )));
        }

        Ok(Self { mime_type, data })
    }
}
