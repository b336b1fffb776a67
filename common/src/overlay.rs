//! バウンディングボックスのオーバーレイ配置計算
//!
//! 割合座標のボックスをビューポート百分率の絶対配置へ写す純関数。
//! クランプは行わない: 不正な割合は崩れた（ただし落ちない）矩形になる

use crate::types::BoundingBox;

/// ビューポート幅・高さに対する百分率配置
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverlayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl OverlayRect {
    /// ボックスの割合座標を百分率配置へ変換する
    ///
    /// left = x_min×100%, top = y_min×100%,
    /// width = (x_max−x_min)×100%, height = (y_max−y_min)×100%
    pub fn from_bounding_box(bbox: &BoundingBox) -> Self {
        Self {
            left: bbox.x_min * 100.0,
            top: bbox.y_min * 100.0,
            width: (bbox.x_max - bbox.x_min) * 100.0,
            height: (bbox.y_max - bbox.y_min) * 100.0,
        }
    }

    /// CSSのstyle属性値として整形する
    pub fn to_css(&self) -> String {
        format!(
            "left:{}%;top:{}%;width:{}%;height:{}%",
            self.left, self.top, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bounding_box() {
        let bbox = BoundingBox {
            x_min: 0.1,
            y_min: 0.2,
            x_max: 0.5,
            y_max: 0.6,
        };
        let rect = OverlayRect::from_bounding_box(&bbox);

        assert!((rect.left - 10.0).abs() < 1e-9);
        assert!((rect.top - 20.0).abs() < 1e-9);
        assert!((rect.width - 40.0).abs() < 1e-9);
        assert!((rect.height - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_full_frame_box() {
        let bbox = BoundingBox {
            x_min: 0.0,
            y_min: 0.0,
            x_max: 1.0,
            y_max: 1.0,
        };
        let rect = OverlayRect::from_bounding_box(&bbox);

        assert_eq!(rect.left, 0.0);
        assert_eq!(rect.top, 0.0);
        assert_eq!(rect.width, 100.0);
        assert_eq!(rect.height, 100.0);
    }

    #[test]
    fn test_inverted_box_not_clamped() {
        // min > max はクランプせずにそのまま負の幅として写す
        let bbox = BoundingBox {
            x_min: 0.8,
            y_min: 0.9,
            x_max: 0.2,
            y_max: 0.1,
        };
        let rect = OverlayRect::from_bounding_box(&bbox);

        assert!((rect.width - -60.0).abs() < 1e-9);
        assert!((rect.height - -80.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_box_not_clamped() {
        let bbox = BoundingBox {
            x_min: -0.5,
            y_min: 0.0,
            x_max: 1.5,
            y_max: 1.0,
        };
        let rect = OverlayRect::from_bounding_box(&bbox);

        assert_eq!(rect.left, -50.0);
        assert_eq!(rect.width, 200.0);
    }

    #[test]
    fn test_to_css() {
        let rect = OverlayRect {
            left: 10.0,
            top: 20.0,
            width: 40.0,
            height: 40.0,
        };
        assert_eq!(rect.to_css(), "left:10%;top:20%;width:40%;height:40%");
    }
}
