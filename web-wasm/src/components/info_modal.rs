//! 識別結果の詳細モーダル
//!
//! 変種ごとに内容を出し分ける。Healthは常にクライアント側の
//! 注意書きを表示する（モデル出力は信頼しない）

use leptos::prelude::*;
use world_lens_common::{
    HealthIdentification, Identification, ObjectIdentification, HEALTH_DISCLAIMER,
};

#[component]
pub fn InfoModal<F>(identification: Identification, on_close: F) -> impl IntoView
where
    F: Fn() + 'static + Clone,
{
    let on_backdrop_close = on_close.clone();

    view! {
        <div class="modal-backdrop" on:click=move |_| on_backdrop_close()>
            <div class="modal-panel" on:click=|ev| ev.stop_propagation()>
                <button
                    class="modal-close"
                    aria-label="Close"
                    on:click={
                        let on_close = on_close.clone();
                        move |_| on_close()
                    }
                >
                    "✕"
                </button>
                {match identification {
                    Identification::Object(object) => {
                        view! { <ObjectContent object=object /> }.into_any()
                    }
                    Identification::Health(health) => {
                        view! { <HealthContent health=health /> }.into_any()
                    }
                }}
            </div>
        </div>
    }
}

#[component]
fn ObjectContent(object: ObjectIdentification) -> impl IntoView {
    let ObjectIdentification {
        name,
        description,
        cool_facts,
        technicalities,
        wikipedia_url,
        ..
    } = object;
    let has_wikipedia = !wikipedia_url.is_empty();

    view! {
        <h2 class="modal-title">{name}</h2>
        <p class="modal-description">{description}</p>

        <div class="modal-section">
            <h3>"Cool Facts"</h3>
            <ul>
                {cool_facts
                    .into_iter()
                    .map(|fact| view! { <li>{fact}</li> })
                    .collect_view()}
            </ul>
        </div>
        <div class="modal-section">
            <h3>"Technicalities"</h3>
            <p class="technicalities">{technicalities}</p>
        </div>

        <Show when=move || has_wikipedia>
            <a
                href=wikipedia_url.clone()
                target="_blank"
                rel="noopener noreferrer"
                class="wikipedia-link"
            >
                "Read on Wikipedia"
            </a>
        </Show>
    }
}

#[component]
fn HealthContent(health: HealthIdentification) -> impl IntoView {
    let HealthIdentification {
        issue,
        description,
        simple_cures,
        natural_remedies,
        ..
    } = health;

    view! {
        <h2 class="modal-title health">{issue}</h2>
        <p class="modal-description">{description}</p>

        <div class="modal-section">
            <h3>"Simple Cures & Tips"</h3>
            <ul>
                {simple_cures
                    .into_iter()
                    .map(|cure| view! { <li>{cure}</li> })
                    .collect_view()}
            </ul>
        </div>
        <div class="modal-section">
            <h3>"Natural Remedies"</h3>
            <ul>
                {natural_remedies
                    .into_iter()
                    .map(|remedy| view! { <li>{remedy}</li> })
                    .collect_view()}
            </ul>
        </div>

        <p class="disclaimer">{HEALTH_DISCLAIMER}</p>
    }
}
