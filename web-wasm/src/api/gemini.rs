//! Gemini API連携
//!
//! モード別のプロンプトと応答スキーマ（構造化出力）で静止画を解析し、
//! 応答テキストを識別結果の配列へ正規化する

use async_trait::async_trait;
use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};
use world_lens_common::{
    parse_identifications, response_schema, system_instruction, task_prompt, DataUrl, Error,
    Identification, IdentificationClient, Mode, Result,
};

const GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: String,
}

/// モード別のリクエストを組み立てる
fn build_request(image: &DataUrl<'_>, mode: Mode) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.to_string(),
                        data: image.data.to_string(),
                    },
                },
                Part::Text {
                    text: task_prompt(mode).to_string(),
                },
            ],
        }],
        system_instruction: Content {
            parts: vec![Part::Text {
                text: system_instruction(mode).to_string(),
            }],
        },
        generation_config: GenerationConfig {
            temperature: 0.1,
            response_mime_type: "application/json".to_string(),
            response_schema: response_schema(mode),
        },
    }
}

fn transport(err: JsValue) -> Error {
    Error::AnalysisFailed(format!("{:?}", err))
}

/// Gemini API呼び出し（共通処理）
async fn call_gemini_api(api_key: &str, request: &GeminiRequest) -> Result<String> {
    let url = format!("{}?key={}", GEMINI_API_URL, api_key);
    let body = serde_json::to_string(request)
        .map_err(|e| Error::AnalysisFailed(format!("リクエスト生成エラー: {}", e)))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(&url, &opts).map_err(transport)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(transport)?;

    let window = web_sys::window().ok_or_else(|| Error::AnalysisFailed("no window".to_string()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(transport)?;
    let resp: Response = resp_value.dyn_into().map_err(transport)?;

    if !resp.ok() {
        return Err(Error::AnalysisFailed(format!("API error: {}", resp.status())));
    }

    let json = JsFuture::from(resp.json().map_err(transport)?)
        .await
        .map_err(transport)?;
    let response: GeminiResponse = serde_wasm_bindgen::from_value(json)
        .map_err(|e| Error::AnalysisFailed(format!("応答デシリアライズエラー: {}", e)))?;

    response
        .candidates
        .first()
        .and_then(|c| c.content.parts.first())
        .map(|p| p.text.clone())
        .ok_or_else(|| Error::AnalysisFailed("empty response".to_string()))
}

/// 静止画を解析する
///
/// # Arguments
/// * `api_key` - Gemini API key
/// * `image` - data URL形式の静止画
/// * `mode` - 解析モード（プロンプトと応答スキーマを決める）
///
/// # Returns
/// 識別結果の配列（0件もあり得る）。リトライは行わない
pub async fn analyze_image(api_key: &str, image: &str, mode: Mode) -> Result<Vec<Identification>> {
    let encoded = DataUrl::parse(image)?;
    let request = build_request(&encoded, mode);
    let response_text = call_gemini_api(api_key, &request).await?;

    // 通信以外（パース・スキーマ不一致）も解析失敗として報告する
    parse_identifications(mode, &response_text).map_err(|e| Error::AnalysisFailed(e.to_string()))
}

/// セッションコントローラへ差し込む解析クライアント
///
/// APIキーは設定パネルのシグナルを呼び出し時に読む
#[derive(Clone, Copy)]
pub struct GeminiClient {
    api_key: ReadSignal<String>,
}

impl GeminiClient {
    pub fn new(api_key: ReadSignal<String>) -> Self {
        Self { api_key }
    }
}

#[async_trait(?Send)]
impl IdentificationClient for GeminiClient {
    async fn analyze(&self, image: &str, mode: Mode) -> Result<Vec<Identification>> {
        let api_key = self.api_key.get_untracked();
        if api_key.is_empty() {
            return Err(Error::AnalysisFailed("API key is not set".to_string()));
        }
        analyze_image(&api_key, image, mode).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // Gemini リクエスト/レスポンス シリアライズテスト
    // =============================================

    #[test]
    fn test_build_request_normal() {
        let image = DataUrl {
            mime_type: "image/jpeg",
            data: "/9j/4AAQ",
        };
        let request = build_request(&image, Mode::Normal);

        let json = serde_json::to_string(&request).expect("シリアライズ失敗");
        assert!(json.contains("\"systemInstruction\""));
        assert!(json.contains("\"responseSchema\""));
        assert!(json.contains("\"responseMimeType\":\"application/json\""));
        assert!(json.contains("\"mime_type\":\"image/jpeg\""));
        assert!(json.contains("expert encyclopedia"));
    }

    #[test]
    fn test_build_request_health_schema() {
        let image = DataUrl {
            mime_type: "image/png",
            data: "iVBORw0KGgo=",
        };
        let request = build_request(&image, Mode::Health);

        let json = serde_json::to_string(&request).expect("シリアライズ失敗");
        assert!(json.contains("\"issue\""));
        assert!(json.contains("\"natural_remedies\""));
        assert!(json.contains("wellness and botany assistant"));
    }

    #[test]
    fn test_part_text_serialize() {
        let part = Part::Text {
            text: "Hello".to_string(),
        };
        let json = serde_json::to_string(&part).expect("シリアライズ失敗");
        assert_eq!(json, r#"{"text":"Hello"}"#);
    }

    #[test]
    fn test_part_inline_data_serialize() {
        let part = Part::InlineData {
            inline_data: InlineData {
                mime_type: "image/jpeg".to_string(),
                data: "base64data".to_string(),
            },
        };
        let json = serde_json::to_string(&part).expect("シリアライズ失敗");
        assert!(json.contains("\"inline_data\""));
        assert!(json.contains("\"mime_type\":\"image/jpeg\""));
        assert!(json.contains("\"data\":\"base64data\""));
    }

    #[test]
    fn test_gemini_response_deserialize() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{
                        "text": "[{\"name\": \"Mug\"}]"
                    }]
                }
            }]
        }"#;

        let response: GeminiResponse = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(response.candidates.len(), 1);
        assert!(response.candidates[0].content.parts[0].text.contains("Mug"));
    }
}
