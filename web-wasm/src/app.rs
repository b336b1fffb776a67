//! メインアプリケーションコンポーネント
//!
//! セッションコントローラを生成し、スナップショットをシグナルへ
//! 射影して描画する。ビューは状態の純粋な投影で、操作は全て
//! コントローラへのインテント送出として実装する

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsValue;

use crate::api::gemini::GeminiClient;
use crate::camera::BrowserCamera;
use crate::components::{
    header::Header, info_modal::InfoModal, overlay::OverlayBoxes, settings_panel::SettingsPanel,
};
use world_lens_common::{Error, Mode, SessionController, SessionSnapshot};

type Controller = SessionController<BrowserCamera, GeminiClient>;

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let video_ref = NodeRef::<leptos::html::Video>::new();
    let (api_key, set_api_key) = signal(String::new());
    let (session, set_session) = signal(SessionSnapshot::default());

    let controller = Rc::new(Controller::new(
        BrowserCamera::new(video_ref),
        GeminiClient::new(api_key),
    ));
    controller.set_observer(move |snapshot| {
        if let Some(error) = &snapshot.last_error {
            // 新しく発生したエラーだけコンソールへ流す
            let is_new = session.with_untracked(|s| s.last_error.as_ref() != Some(error));
            if is_new {
                web_sys::console::error_1(&JsValue::from_str(&error.to_string()));
            }
        }
        set_session.set(snapshot);
    });
    let controller = StoredValue::new_local(controller);

    // <video>のマウント後に初期カメラを取得する
    Effect::new(move |_| {
        if video_ref.get().is_some() {
            let controller = controller.get_value();
            spawn_local(async move { controller.reset_camera().await });
        }
    });

    // インテントハンドラ
    let on_mode_change = move |mode: Mode| controller.get_value().change_mode(mode);
    let on_scan = move || {
        let controller = controller.get_value();
        spawn_local(async move { controller.trigger_scan().await });
    };
    let on_camera_reset = move || {
        let controller = controller.get_value();
        spawn_local(async move { controller.reset_camera().await });
    };
    let on_camera_toggle = move || {
        let controller = controller.get_value();
        spawn_local(async move { controller.toggle_facing().await });
    };
    let on_file_loaded = move |data_url: String| {
        let controller = controller.get_value();
        spawn_local(async move { controller.select_still_image(data_url).await });
    };
    let on_box_select = move |index: usize| controller.get_value().select_identification(index);
    let on_dismiss = move || controller.get_value().dismiss();

    // 投影
    let analyzing = move || session.with(|s| s.analyzing);
    let still_image = move || session.with(|s| s.still_image.clone());
    let camera_missing = move || session.with(|s| s.camera_missing());
    let camera_denied = move || {
        session.with(|s| matches!(s.last_error, Some(Error::CameraUnavailable(_))))
    };
    // カメラ喪失は持続的な全面表示で出すため、トーストからは除外する
    let toast_error = move || {
        session.with(|s| {
            s.last_error
                .as_ref()
                .filter(|error| !matches!(error, Error::CameraUnavailable(_)))
                .map(|error| error.to_string())
        })
    };

    view! {
        <div class="app">
            <Header
                mode=Signal::derive(move || session.with(|s| s.mode))
                analyzing=Signal::derive(analyzing)
                on_mode_change=on_mode_change
                on_file_loaded=on_file_loaded
                on_scan=on_scan
                on_camera_reset=on_camera_reset
                on_camera_toggle=on_camera_toggle
            />

            <SettingsPanel api_key=api_key set_api_key=set_api_key />

            <video
                node_ref=video_ref
                class="view-source"
                autoplay=true
                playsinline=true
                style:display=move || {
                    if still_image().is_some() { "none" } else { "block" }
                }
            ></video>
            {move || {
                still_image()
                    .map(|src| view! { <img class="view-source still" src=src alt="Uploaded preview" /> })
            }}

            <OverlayBoxes
                identifications=Signal::derive(move || session.with(|s| s.identifications.clone()))
                on_select=on_box_select
            />

            <Show when=camera_missing>
                <div class="camera-notice">
                    <div class="camera-notice-panel">
                        <h2>"Camera Not Found"</h2>
                        <p>
                            {move || {
                                if camera_denied() {
                                    "Could not access the camera. Please grant permission and retry."
                                } else {
                                    "Please enable camera access to begin exploring the world around you."
                                }
                            }}
                        </p>
                        <button class="retry-button" on:click=move |_| on_camera_reset()>
                            "Retry Camera"
                        </button>
                    </div>
                </div>
            </Show>

            <Show when=analyzing>
                <div class="processing">
                    <p>"AI is thinking..."</p>
                </div>
            </Show>

            <Show when=move || toast_error().is_some() && !analyzing()>
                <div class="error-toast">
                    <p>{move || toast_error().unwrap_or_default()}</p>
                </div>
            </Show>

            {move || {
                session
                    .with(|s| s.selected.clone())
                    .map(|identification| {
                        view! {
                            <InfoModal
                                identification=identification
                                on_close=on_dismiss
                            />
                        }
                    })
            }}
        </div>
    }
}
