//! バウンディングボックスオーバーレイ
//!
//! 識別結果ごとにクリック可能な矩形を絶対配置で重ねる。
//! リストは解析ごとに丸ごと置き換わるため、全体を再描画する

use leptos::prelude::*;
use world_lens_common::{Identification, OverlayRect};

#[component]
pub fn OverlayBoxes<F>(
    identifications: Signal<Vec<Identification>>,
    on_select: F,
) -> impl IntoView
where
    F: Fn(usize) + 'static + Clone + Send,
{
    view! {
        <div class="overlay-layer">
            {move || {
                let on_select = on_select.clone();
                identifications
                    .get()
                    .into_iter()
                    .enumerate()
                    .map(|(index, identification)| {
                        let rect = OverlayRect::from_bounding_box(identification.bounding_box());
                        let label = format!("Details about {}", identification.label());
                        let on_select = on_select.clone();
                        view! {
                            <button
                                class="bounding-box"
                                style=rect.to_css()
                                aria-label=label
                                on:click=move |_| on_select(index)
                            />
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}
