//! ヘッダーコンポーネント
//!
//! モード切替・アップロード・カメラ操作・スキャンのコントロールバー

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{File, FileReader, HtmlInputElement};
use world_lens_common::Mode;

#[component]
pub fn Header<FM, FF, FS, FR, FT>(
    mode: Signal<Mode>,
    analyzing: Signal<bool>,
    on_mode_change: FM,
    on_file_loaded: FF,
    on_scan: FS,
    on_camera_reset: FR,
    on_camera_toggle: FT,
) -> impl IntoView
where
    FM: Fn(Mode) + 'static + Clone,
    FF: Fn(String) + 'static + Clone,
    FS: Fn() + 'static + Clone,
    FR: Fn() + 'static + Clone,
    FT: Fn() + 'static + Clone,
{
    let on_file_change = {
        let on_file_loaded = on_file_loaded.clone();
        move |ev: leptos::ev::Event| {
            let input: Option<HtmlInputElement> = ev.target().and_then(|t| t.dyn_into().ok());
            if let Some(input) = input {
                if let Some(file) = input.files().and_then(|files| files.get(0)) {
                    read_file(file, on_file_loaded.clone());
                }
                // 同じファイルをもう一度選択できるようにする
                input.set_value("");
            }
        }
    };

    view! {
        <div class="header">
            <div class="header-bar">
                <div class="header-group">
                    <label class="icon-button" aria-label="Upload Image">
                        "📁"
                        <input
                            type="file"
                            accept="image/*"
                            class="hidden"
                            on:change=on_file_change
                        />
                    </label>
                    <button
                        class="icon-button"
                        aria-label="Reset Camera"
                        on:click={
                            let on_camera_reset = on_camera_reset.clone();
                            move |_| on_camera_reset()
                        }
                    >
                        "📷"
                    </button>
                    <button
                        class="icon-button"
                        aria-label="Flip Camera"
                        on:click={
                            let on_camera_toggle = on_camera_toggle.clone();
                            move |_| on_camera_toggle()
                        }
                    >
                        "🔄"
                    </button>
                </div>

                <div class="mode-slider">
                    <button
                        class="mode-button"
                        class:active=move || mode.get() == Mode::Normal
                        on:click={
                            let on_mode_change = on_mode_change.clone();
                            move |_| on_mode_change(Mode::Normal)
                        }
                    >
                        "Normal"
                    </button>
                    <button
                        class="mode-button"
                        class:active=move || mode.get() == Mode::Health
                        on:click={
                            let on_mode_change = on_mode_change.clone();
                            move |_| on_mode_change(Mode::Health)
                        }
                    >
                        "Health"
                    </button>
                </div>

                <div class="header-group">
                    <button
                        class="scan-button"
                        aria-label="Scan current view"
                        disabled=move || analyzing.get()
                        on:click={
                            let on_scan = on_scan.clone();
                            move |_| on_scan()
                        }
                    >
                        "👁"
                    </button>
                </div>
            </div>
        </div>
    }
}

/// ファイルをdata URLとして読み込み、完了時にコールバックへ渡す
fn read_file<F>(file: File, on_loaded: F)
where
    F: Fn(String) + 'static,
{
    let reader = FileReader::new().unwrap();

    let reader_clone = reader.clone();
    let closure = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
        if let Ok(result) = reader_clone.result() {
            if let Some(data_url) = result.as_string() {
                on_loaded(data_url);
            }
        }
    }) as Box<dyn FnMut(_)>);

    reader.set_onload(Some(closure.as_ref().unchecked_ref()));
    closure.forget();

    let _ = reader.read_as_data_url(&file);
}
