//! エラー型定義

use thiserror::Error;

/// 共通エラー型
///
/// セッション状態のスナップショットに保持されるため `Clone` を実装する。
/// `Parse` は内部的なパース種別で、解析クライアントが境界で
/// `AnalysisFailed` に包み直す。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// カメラ権限の拒否またはデバイスなし（明示的な再試行で回復可能）
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    /// data URL形状に合わない静止画ペイロード
    #[error("invalid image encoding: {0}")]
    InvalidImageEncoding(String),

    /// リモート解析の失敗（通信・パース・スキーマ不一致）
    #[error("analysis failed: {0}")]
    AnalysisFailed(String),

    /// 有効なフレームも静止画もない状態でのキャプチャ要求
    #[error("no frame or image available to capture")]
    CaptureUnavailable,

    /// 応答パースエラー
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_camera_unavailable() {
        let error = Error::CameraUnavailable("permission denied".to_string());
        let display = format!("{}", error);
        assert!(display.contains("camera unavailable"));
        assert!(display.contains("permission denied"));
    }

    #[test]
    fn test_error_display_invalid_image_encoding() {
        let error = Error::InvalidImageEncoding("not a data URL".to_string());
        let display = format!("{}", error);
        assert!(display.contains("invalid image encoding"));
    }

    #[test]
    fn test_error_display_analysis_failed() {
        let error = Error::AnalysisFailed("API error: 500".to_string());
        let display = format!("{}", error);
        assert_eq!(display, "analysis failed: API error: 500");
    }

    #[test]
    fn test_error_display_capture_unavailable() {
        let display = format!("{}", Error::CaptureUnavailable);
        assert!(display.contains("no frame or image"));
    }

    #[test]
    fn test_error_clone_eq() {
        // スナップショットに載せるためCloneと比較が効くこと
        let error = Error::AnalysisFailed("x".to_string());
        assert_eq!(error.clone(), error);
    }

    #[test]
    fn test_error_debug() {
        let error = Error::Parse("テスト".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("Parse"));
        assert!(debug.contains("テスト"));
    }
}
