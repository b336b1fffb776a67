//! ブラウザカメラ連携（getUserMedia）
//!
//! カメラ能力トレイトのweb-sys実装:
//! - BrowserCamera: facingMode制約付きでストリームを要求し<video>へ接続
//! - CameraStream: トラックの停止とcanvas経由のフレームキャプチャ

use async_trait::async_trait;
use leptos::html::Video;
use leptos::prelude::*;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};
use world_lens_common::{CameraAccess, CameraHandle, Error, Facing, Result};

/// 取得済みカメラストリームのハンドル
///
/// 同時に表示されるハンドルは最大1本。解放はセッション側が
/// 全ての経路で保証する
pub struct CameraStream {
    stream: MediaStream,
    video: HtmlVideoElement,
}

impl CameraHandle for CameraStream {
    fn release(&mut self) {
        for track in self.stream.get_tracks().iter() {
            track.unchecked_into::<MediaStreamTrack>().stop();
        }
        self.video.set_src_object(None);
    }

    /// 現在のビデオフレームをcanvasへ描画しJPEGのdata URLにする
    fn capture_frame(&self) -> Result<String> {
        let width = self.video.video_width();
        let height = self.video.video_height();
        if width == 0 || height == 0 {
            // まだフレームが届いていない
            return Err(Error::CaptureUnavailable);
        }

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(Error::CaptureUnavailable)?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|_| Error::CaptureUnavailable)?
            .unchecked_into();
        canvas.set_width(width);
        canvas.set_height(height);

        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .ok_or(Error::CaptureUnavailable)?
            .unchecked_into();
        context
            .draw_image_with_html_video_element(&self.video, 0.0, 0.0)
            .map_err(|_| Error::CaptureUnavailable)?;

        canvas
            .to_data_url_with_type("image/jpeg")
            .map_err(|_| Error::CaptureUnavailable)
    }
}

/// getUserMediaによるカメラ取得能力
///
/// 取得したストリームはアプリの<video>要素に接続する
#[derive(Clone, Copy)]
pub struct BrowserCamera {
    video: NodeRef<Video>,
}

impl BrowserCamera {
    pub fn new(video: NodeRef<Video>) -> Self {
        Self { video }
    }
}

fn unavailable(err: JsValue) -> Error {
    Error::CameraUnavailable(format!("{:?}", err))
}

#[async_trait(?Send)]
impl CameraAccess for BrowserCamera {
    type Handle = CameraStream;

    async fn request_stream(&self, facing: Facing) -> Result<CameraStream> {
        let video = self
            .video
            .get_untracked()
            .ok_or_else(|| Error::CameraUnavailable("video element is not mounted".to_string()))?;
        let window = web_sys::window()
            .ok_or_else(|| Error::CameraUnavailable("no window".to_string()))?;
        let devices = window.navigator().media_devices().map_err(unavailable)?;

        let video_constraint =
            serde_wasm_bindgen::to_value(&serde_json::json!({ "facingMode": facing.as_str() }))
                .map_err(|e| Error::CameraUnavailable(e.to_string()))?;
        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&video_constraint);

        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(unavailable)?;
        let stream: MediaStream = JsFuture::from(promise)
            .await
            .map_err(unavailable)?
            .unchecked_into();

        video.set_src_object(Some(&stream));

        Ok(CameraStream { stream, video })
    }
}
