use crate::hooks::use_timeline;
use std::str::FromStr;
use wasm_bindgen_futures::spawn_local;
use wellpath_core::api::Page;
use wellpath_core::domain::Challenge;
use wellpath_core::{ChallengeType, ImprovementTag};
use yew::prelude::*;

#[derive(Debug, Clone, PartialEq)]
enum CatalogState {
    Loading,
    Ready(Page<Challenge>),
    Failed(String),
}

/// Browse challenges and join one
#[function_component(CatalogPanel)]
pub fn catalog_panel() -> Html {
    let timeline = use_timeline();
    let challenge_type = use_state(|| None::<ChallengeType>);
    let improvement_tag = use_state(|| None::<ImprovementTag>);
    let page_index = use_state(|| 1u32);
    let state = use_state(|| CatalogState::Loading);

    {
        let service = timeline.service.clone();
        let state = state.clone();
        use_effect_with(
            (*challenge_type, *improvement_tag, *page_index),
            move |(challenge_type, improvement_tag, page_index)| {
                match service.catalog_query(*challenge_type, *improvement_tag, *page_index) {
                    Ok(query) => {
                        state.set(CatalogState::Loading);
                        spawn_local(async move {
                            match service.browse_catalog(query).await {
                                Ok(page) => state.set(CatalogState::Ready(page)),
                                Err(e) => {
                                    tracing::warn!(error = %e, "catalog request failed");
                                    state.set(CatalogState::Failed(e.to_string()));
                                }
                            }
                        });
                    }
                    Err(e) => state.set(CatalogState::Failed(e.to_string())),
                }
                || ()
            },
        );
    }

    let on_type = {
        let challenge_type = challenge_type.clone();
        let page_index = page_index.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            challenge_type.set(ChallengeType::from_str(&select.value()).ok());
            page_index.set(1);
        })
    };

    let on_tag = {
        let improvement_tag = improvement_tag.clone();
        let page_index = page_index.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            improvement_tag.set(ImprovementTag::from_str(&select.value()).ok());
            page_index.set(1);
        })
    };

    let on_prev = {
        let page_index = page_index.clone();
        Callback::from(move |_: MouseEvent| page_index.set((*page_index).saturating_sub(1).max(1)))
    };

    let on_next = {
        let page_index = page_index.clone();
        Callback::from(move |_: MouseEvent| page_index.set(*page_index + 1))
    };

    let body = match &*state {
        CatalogState::Loading => html! {
            <div class="wellpath-catalog__loading"><div class="wellpath-spinner"></div></div>
        },
        CatalogState::Failed(reason) => html! {
            <p class="wellpath-catalog__error">{format!("Could not load challenges: {reason}")}</p>
        },
        CatalogState::Ready(page) if page.items.is_empty() => html! {
            <p class="wellpath-catalog__empty">{"No challenges match these filters"}</p>
        },
        CatalogState::Ready(page) => html! {
            <>
                <ul class="wellpath-catalog__items">
                    {for page.items.iter().map(|challenge| {
                        let on_join = {
                            let register = timeline.register.clone();
                            let challenge_id = challenge.id.clone();
                            Callback::from(move |_: MouseEvent| register(challenge_id.clone()))
                        };
                        html! {
                            <li key={challenge.id.clone()} class="wellpath-catalog__item">
                                <h3 class="wellpath-catalog__name">{challenge.name.clone()}</h3>
                                <span class="wellpath-catalog__length">{challenge.challenge_type.label()}</span>
                                {if let Some(tag) = challenge.improvement_tag {
                                    html! { <span class="wellpath-catalog__tag">{tag.label()}</span> }
                                } else {
                                    html! {}
                                }}
                                <p class="wellpath-catalog__description">{challenge.description.clone()}</p>
                                <button class="wellpath-btn wellpath-btn--primary" onclick={on_join}>
                                    {"Join"}
                                </button>
                            </li>
                        }
                    })}
                </ul>
                <div class="wellpath-catalog__pager">
                    <button class="wellpath-btn" disabled={*page_index <= 1} onclick={on_prev}>
                        {"Previous"}
                    </button>
                    <span>{format!("Page {}", *page_index)}</span>
                    <button
                        class="wellpath-btn"
                        disabled={page.has_more() != Some(true)}
                        onclick={on_next}
                    >
                        {"Next"}
                    </button>
                </div>
            </>
        },
    };

    html! {
        <aside class="wellpath-catalog">
            <h2 class="wellpath-catalog__title">{"Find a challenge"}</h2>
            <div class="wellpath-catalog__filters">
                <select onchange={on_type}>
                    <option value="" selected={challenge_type.is_none()}>{"Any length"}</option>
                    {for ChallengeType::ALL.into_iter().map(|option| html! {
                        <option value={option.as_str()} selected={*challenge_type == Some(option)}>
                            {option.label()}
                        </option>
                    })}
                </select>
                <select onchange={on_tag}>
                    <option value="" selected={improvement_tag.is_none()}>{"Any focus"}</option>
                    {for ImprovementTag::ALL.into_iter().map(|option| html! {
                        <option value={option.as_str()} selected={*improvement_tag == Some(option)}>
                            {option.label()}
                        </option>
                    })}
                </select>
            </div>
            {body}
        </aside>
    }
}
