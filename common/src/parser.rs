//! モデル応答パーサー
//!
//! Gemini応答テキストからJSONを抽出し、識別結果の配列へ
//! 正規化・デシリアライズする

use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::{HealthIdentification, Identification, Mode, ObjectIdentification};

/// 応答テキストからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 最初に始まる生の [...] 配列または {...} オブジェクト
/// 3. トリムした応答全体（"null" やスカラーもJSONとして有効なため）
///
/// # Arguments
/// * `response` - APIレスポンス文字列
///
/// # Returns
/// JSONとしてパースを試みるべき部分文字列
pub fn extract_json(response: &str) -> &str {
    // ```json ... ``` ブロックを探す
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return response[start..end].trim();
        }
    }

    // 生の [...] / {...} のうち先に始まる方を探す
    let array_span = span_of(response, '[', ']');
    let object_span = span_of(response, '{', '}');
    let span = match (array_span, object_span) {
        (Some(a), Some(o)) => Some(if a.0 < o.0 { a } else { o }),
        (a, o) => a.or(o),
    };
    if let Some((start, end)) = span {
        return &response[start..=end];
    }

    response.trim()
}

fn span_of(response: &str, open: char, close: char) -> Option<(usize, usize)> {
    let start = response.find(open)?;
    let end = response.rfind(close)?;
    (end >= start).then_some((start, end))
}

/// パース済みJSON値を識別結果の配列形へ正規化
///
/// モデルは1件の結果を1要素配列ではなく単一オブジェクトで返すことが
/// あるため、ここで吸収する:
/// - 配列: そのまま
/// - 単一オブジェクト: 1要素配列に包む
/// - その他（null・スカラー等）: 空配列
pub fn normalize_to_array(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(_) => vec![value],
        _ => Vec::new(),
    }
}

/// モードに応じて応答テキストを識別結果へパースする
///
/// # Arguments
/// * `mode` - 解析モード（要素をどちらの変種として検証するかを決める）
/// * `response` - APIレスポンス文字列
///
/// # Returns
/// * `Ok(Vec<Identification>)` - 正規化・パース成功（0件もあり得る）
/// * `Err(Parse)` - JSONまたはスキーマ不一致
pub fn parse_identifications(mode: Mode, response: &str) -> Result<Vec<Identification>> {
    let json_str = extract_json(response);
    let value: Value = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("JSONパースエラー: {}", e)))?;

    normalize_to_array(value)
        .into_iter()
        .map(|item| parse_one(mode, item))
        .collect()
}

fn parse_one(mode: Mode, item: Value) -> Result<Identification> {
    match mode {
        Mode::Normal => serde_json::from_value::<ObjectIdentification>(item)
            .map(Identification::Object)
            .map_err(|e| Error::Parse(format!("物体識別のパースエラー: {}", e))),
        Mode::Health => serde_json::from_value::<HealthIdentification>(item)
            .map(Identification::Health)
            .map_err(|e| Error::Parse(format!("健康識別のパースエラー: {}", e))),
    }
}
