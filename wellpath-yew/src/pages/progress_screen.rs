use crate::components::{
    challenge_anchor, CatalogPanel, ChallengeTimeline, DateTimeline, FilterBar, NoticeToasts,
};
use crate::hooks::use_timeline;
use wellpath_core::application::LoadState;
use wellpath_core::TimelineCommand;
use yew::prelude::*;

#[function_component(ProgressScreen)]
pub fn progress_screen() -> Html {
    let timeline = use_timeline();
    let snapshot = &timeline.snapshot;
    let show_catalog = use_state(|| false);

    // Deep-linked challenge: scroll once it is rendered
    {
        let send_command = timeline.send_command.clone();
        let scroll_to = snapshot.scroll_request().map(str::to_string);
        use_effect_with(scroll_to, move |scroll_to| {
            if let Some(progress_id) = scroll_to {
                let element = web_sys::window()
                    .and_then(|window| window.document())
                    .and_then(|document| document.get_element_by_id(&challenge_anchor(progress_id)));
                match element {
                    Some(element) => {
                        element.scroll_into_view();
                        send_command(TimelineCommand::ScrollHandled);
                    }
                    None => tracing::debug!(%progress_id, "scroll target not rendered yet"),
                }
            }
            || ()
        });
    }

    let on_retry = {
        let send_command = timeline.send_command.clone();
        Callback::from(move |_: MouseEvent| send_command(TimelineCommand::Retry))
    };

    let on_catalog = {
        let show_catalog = show_catalog.clone();
        Callback::from(move |_: MouseEvent| show_catalog.set(!*show_catalog))
    };

    let on_prev = {
        let send_command = timeline.send_command.clone();
        let page_index = snapshot.page_index;
        Callback::from(move |_: MouseEvent| {
            send_command(TimelineCommand::GoToPage(page_index.saturating_sub(1).max(1)))
        })
    };

    let on_next = {
        let send_command = timeline.send_command.clone();
        let page_index = snapshot.page_index;
        Callback::from(move |_: MouseEvent| send_command(TimelineCommand::GoToPage(page_index + 1)))
    };

    let content = match &snapshot.load_state {
        LoadState::Idle | LoadState::Loading => html! {
            <div class="wellpath-progress-screen__loading">
                <p>{"Loading your challenges..."}</p>
                <div class="wellpath-spinner"></div>
            </div>
        },
        LoadState::Failed(_) => html! {
            <div class="wellpath-progress-screen__error">
                <p>{"We couldn't load your challenges."}</p>
                <button class="wellpath-btn wellpath-btn--primary" onclick={on_retry}>
                    {"Try again"}
                </button>
            </div>
        },
        LoadState::Empty if snapshot.has_previous() => html! {
            <div class="wellpath-progress-screen__empty">
                <p>{"No more challenges on this page."}</p>
            </div>
        },
        LoadState::Empty => html! {
            <div class="wellpath-progress-screen__empty">
                <p>{"You haven't joined any challenges yet."}</p>
            </div>
        },
        LoadState::Loaded if snapshot.filters.show_by_challenge() => html! { <ChallengeTimeline /> },
        LoadState::Loaded => html! { <DateTimeline /> },
    };

    let settled = matches!(snapshot.load_state, LoadState::Loaded | LoadState::Empty);
    let pager = if settled && (snapshot.has_previous() || snapshot.has_more) {
        html! {
            <nav class="wellpath-progress-screen__pager">
                <button class="wellpath-btn" disabled={!snapshot.has_previous()} onclick={on_prev}>
                    {"Previous"}
                </button>
                <span>{format!("Page {}", snapshot.page_index)}</span>
                <button class="wellpath-btn" disabled={!snapshot.has_more} onclick={on_next}>
                    {"Next"}
                </button>
            </nav>
        }
    } else {
        html! {}
    };

    html! {
        <div class="wellpath-progress-screen">
            <header class="wellpath-progress-screen__header">
                <h1 class="wellpath-progress-screen__title">{"My challenges"}</h1>
                <button class="wellpath-btn wellpath-btn--secondary" onclick={on_catalog}>
                    {if *show_catalog { "Hide catalog" } else { "Find a challenge" }}
                </button>
            </header>

            <FilterBar />

            <div class="wellpath-progress-screen__content">
                <main class="wellpath-progress-screen__timeline">
                    {content}
                    {pager}
                </main>
                {if *show_catalog {
                    html! { <CatalogPanel /> }
                } else {
                    html! {}
                }}
            </div>

            <NoticeToasts />
        </div>
    }
}
