//! 識別結果の型定義
//!
//! ネイティブテストとWeb(WASM)で共有される型:
//! - Mode: 解析モード（Normal / Health）
//! - BoundingBox: 画像内の割合座標ボックス
//! - Identification: モードで定まるタグ付き識別結果

use serde::{Deserialize, Serialize};

/// 解析モード
///
/// モードが応答スキーマとプロンプトを決定する。
/// モード切替時は旧モードの識別結果を破棄する（スキーマ互換性なし）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// 一般物体識別
    #[default]
    Normal,
    /// 植物・皮膚の健康懸念識別
    Health,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Normal => "Normal",
            Mode::Health => "Health",
        }
    }
}

/// カメラの向き（getUserMediaのfacingMode値に対応）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// 前面カメラ
    User,
    /// 背面カメラ
    #[default]
    Environment,
}

impl Facing {
    /// 反対側の向きを返す
    pub fn opposite(self) -> Self {
        match self {
            Facing::User => Facing::Environment,
            Facing::Environment => Facing::User,
        }
    }

    /// getUserMediaのfacingMode文字列
    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::User => "user",
            Facing::Environment => "environment",
        }
    }
}

/// 画像サイズに対する割合座標のバウンディングボックス
///
/// 各値は [0.0, 1.0] の割合を想定するが、モデル出力は信頼できないため
/// 範囲検証は行わない（不正な値でも描画は崩れるだけでクラッシュしない）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

/// Normalモードの識別結果（物体識別）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectIdentification {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cool_facts: Vec<String>,
    #[serde(default)]
    pub technicalities: String,
    #[serde(default)]
    pub wikipedia_url: String,
    #[serde(rename = "boundingBox", default)]
    pub bounding_box: BoundingBox,
}

/// Healthモードの識別結果（健康懸念識別）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HealthIdentification {
    pub issue: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub simple_cures: Vec<String>,
    #[serde(default)]
    pub natural_remedies: Vec<String>,
    #[serde(rename = "boundingBox", default)]
    pub bounding_box: BoundingBox,
}

/// 識別結果（タグ付きユニオン）
///
/// 元実装はフィールドの有無で変種を判別していたが、欠損・不正な
/// フィールドで曖昧になるため明示的なタグ付き変種にしている。
/// 変種は結果を生成したモードで決まり、他方の変種の必須フィールドに
/// 対して検証されることはない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identification {
    Object(ObjectIdentification),
    Health(HealthIdentification),
}

impl Identification {
    /// 表示用ラベル（物体名または懸念名）
    pub fn label(&self) -> &str {
        match self {
            Identification::Object(o) => &o.name,
            Identification::Health(h) => &h.issue,
        }
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        match self {
            Identification::Object(o) => &o.bounding_box,
            Identification::Health(h) => &h.bounding_box,
        }
    }
}
