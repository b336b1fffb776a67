//! プロンプト・応答スキーマ生成モジュール
//!
//! モードごとに以下を提供する:
//! - task_prompt: タスクプロンプト
//! - system_instruction: システムインストラクション
//! - response_schema: 構造化出力用の応答スキーマ（JSON配列）

use serde_json::{json, Value};

use crate::types::Mode;

/// Healthモードの注意書き
///
/// モデル出力には含めさせず、クライアント側で常にこの定数を表示する
pub const HEALTH_DISCLAIMER: &str = "Disclaimer: This is AI-generated information and not a \
substitute for professional medical or botanical advice. Consult an expert for any serious \
concerns.";

/// モード別のタスクプロンプト
pub fn task_prompt(mode: Mode) -> &'static str {
    match mode {
        Mode::Normal => {
            "Identify all significant objects in this image. For each, provide its name, \
             a description, cool facts, technical details, a Wikipedia link, and its \
             bounding box."
        }
        Mode::Health => {
            "Analyze this image for any significant health-related concerns (like a plant \
             disease or a common skin issue). For each, describe the issue, suggest simple \
             wellness tips, cures, and natural remedies. This is not medical advice. \
             Provide a bounding box for each area of concern."
        }
    }
}

/// モード別のシステムインストラクション
///
/// Healthモードは必ず「医療助言ではない」旨の注意書きを求める
pub fn system_instruction(mode: Mode) -> &'static str {
    match mode {
        Mode::Normal => {
            "You are an expert encyclopedia. For the given image, identify all significant \
             objects and return details about them in the specified JSON format."
        }
        Mode::Health => {
            "You are a helpful wellness and botany assistant. Identify potential health \
             issues in the image and provide general, non-medical advice in the specified \
             JSON format. Always include a disclaimer that this is not a substitute for \
             professional medical or botanical advice."
        }
    }
}

/// モード別の応答スキーマ（識別結果オブジェクトのJSON配列）
pub fn response_schema(mode: Mode) -> Value {
    json!({
        "type": "ARRAY",
        "items": item_schema(mode),
    })
}

fn item_schema(mode: Mode) -> Value {
    match mode {
        Mode::Normal => json!({
            "type": "OBJECT",
            "properties": {
                "name": {
                    "type": "STRING",
                    "description": "Name of the identified object."
                },
                "description": {
                    "type": "STRING",
                    "description": "A brief, interesting description of the object."
                },
                "cool_facts": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "Two bullet-point style cool facts about the object."
                },
                "technicalities": {
                    "type": "STRING",
                    "description": "A short technical detail or specification about the object."
                },
                "wikipedia_url": {
                    "type": "STRING",
                    "description": "The full URL to the object's English Wikipedia page."
                },
                "boundingBox": bounding_box_schema(),
            },
            "required": [
                "name", "description", "cool_facts", "technicalities",
                "wikipedia_url", "boundingBox"
            ],
        }),
        Mode::Health => json!({
            "type": "OBJECT",
            "properties": {
                "issue": {
                    "type": "STRING",
                    "description": "Name of the potential health issue (e.g., 'Leaf Rust', 'Minor Skin Rash')."
                },
                "description": {
                    "type": "STRING",
                    "description": "A simple description of the observed issue."
                },
                "simple_cures": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "List of simple, common cures or management tips. This is not medical advice."
                },
                "natural_remedies": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "List of natural remedies or preventative measures. This is not medical advice."
                },
                "boundingBox": bounding_box_schema(),
            },
            "required": [
                "issue", "description", "simple_cures", "natural_remedies", "boundingBox"
            ],
        }),
    }
}

fn bounding_box_schema() -> Value {
    json!({
        "type": "OBJECT",
        "description": "Bounding box coordinates as percentages (0.0 to 1.0).",
        "properties": {
            "x_min": { "type": "NUMBER" },
            "y_min": { "type": "NUMBER" },
            "x_max": { "type": "NUMBER" },
            "y_max": { "type": "NUMBER" }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // task_prompt / system_instruction テスト
    // =============================================

    #[test]
    fn test_task_prompt_normal() {
        let prompt = task_prompt(Mode::Normal);
        assert!(prompt.contains("significant objects"));
        assert!(prompt.contains("bounding box"));
    }

    #[test]
    fn test_task_prompt_health() {
        let prompt = task_prompt(Mode::Health);
        assert!(prompt.contains("health-related concerns"));
        assert!(prompt.contains("not medical advice"));
    }

    #[test]
    fn test_system_instruction_health_requires_disclaimer() {
        // Healthモードは常に注意書きを要求する
        let instruction = system_instruction(Mode::Health);
        assert!(instruction.contains("Always include a disclaimer"));
    }

    #[test]
    fn test_health_disclaimer_not_empty() {
        assert!(HEALTH_DISCLAIMER.contains("not a substitute"));
    }

    // =============================================
    // response_schema テスト
    // =============================================

    #[test]
    fn test_response_schema_is_array() {
        for mode in [Mode::Normal, Mode::Health] {
            let schema = response_schema(mode);
            assert_eq!(schema["type"], "ARRAY");
            assert_eq!(schema["items"]["type"], "OBJECT");
        }
    }

    #[test]
    fn test_response_schema_normal_fields() {
        let schema = response_schema(Mode::Normal);
        let properties = &schema["items"]["properties"];

        assert!(properties.get("name").is_some());
        assert!(properties.get("cool_facts").is_some());
        assert!(properties.get("wikipedia_url").is_some());
        assert!(properties.get("boundingBox").is_some());

        let required = schema["items"]["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "name"));
        assert!(required.iter().any(|v| v == "boundingBox"));
    }

    #[test]
    fn test_response_schema_health_fields() {
        let schema = response_schema(Mode::Health);
        let properties = &schema["items"]["properties"];

        assert!(properties.get("issue").is_some());
        assert!(properties.get("simple_cures").is_some());
        assert!(properties.get("natural_remedies").is_some());
        // Normalモードのフィールドは含まれない
        assert!(properties.get("name").is_none());
    }

    #[test]
    fn test_bounding_box_schema_coordinates() {
        let schema = response_schema(Mode::Normal);
        let bbox = &schema["items"]["properties"]["boundingBox"]["properties"];

        for key in ["x_min", "y_min", "x_max", "y_max"] {
            assert_eq!(bbox[key]["type"], "NUMBER");
        }
    }
}
