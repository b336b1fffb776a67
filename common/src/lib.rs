//! World Lens Common Library
//!
//! ネイティブテストとWeb(WASM)で共有される型・コントラクトと
//! セッション状態機械

pub mod data_url;
pub mod error;
pub mod overlay;
pub mod parser;
pub mod prompts;
pub mod session;
pub mod types;

pub use data_url::DataUrl;
pub use error::{Error, Result};
pub use overlay::OverlayRect;
pub use parser::{extract_json, normalize_to_array, parse_identifications};
pub use prompts::{response_schema, system_instruction, task_prompt, HEALTH_DISCLAIMER};
pub use session::{
    CameraAccess, CameraHandle, IdentificationClient, Session, SessionController,
    SessionSnapshot,
};
pub use types::{
    BoundingBox, Facing, HealthIdentification, Identification, Mode, ObjectIdentification,
};
