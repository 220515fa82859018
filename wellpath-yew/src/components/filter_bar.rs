use crate::hooks::use_timeline;
use chrono::NaiveDate;
use std::str::FromStr;
use wellpath_core::domain::date_key;
use wellpath_core::{ChallengeType, ProcessStatus, TimelineCommand};
use yew::prelude::*;

/// Empty select value means "no filter"
fn parse_option<T: FromStr>(value: &str) -> Option<T> {
    if value.is_empty() {
        None
    } else {
        value.parse().ok()
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

const MARKED_DATES_ID: &str = "wellpath-marked-dates";

/// `min`/`max` for the date input: first and last day that has a step
fn date_bounds(marked: &[NaiveDate]) -> (Option<String>, Option<String>) {
    (
        marked.iter().min().copied().map(date_key),
        marked.iter().max().copied().map(date_key),
    )
}

/// Status, type and date filters plus the projection switch
#[function_component(FilterBar)]
pub fn filter_bar() -> Html {
    let timeline = use_timeline();
    let filters = &timeline.snapshot.filters;

    let on_status = {
        let send_command = timeline.send_command.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            send_command(TimelineCommand::SetProcessStatusFilter(parse_option::<
                ProcessStatus,
            >(&select.value())));
        })
    };

    let on_type = {
        let send_command = timeline.send_command.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            send_command(TimelineCommand::SetChallengeTypeFilter(parse_option::<
                ChallengeType,
            >(&select.value())));
        })
    };

    let on_date = {
        let send_command = timeline.send_command.clone();
        Callback::from(move |e: Event| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            send_command(TimelineCommand::SelectDate(parse_date(&input.value())));
        })
    };

    let on_projection = {
        let send_command = timeline.send_command.clone();
        Callback::from(move |_: MouseEvent| send_command(TimelineCommand::ToggleProjection))
    };

    let on_clear = {
        let send_command = timeline.send_command.clone();
        Callback::from(move |_: MouseEvent| send_command(TimelineCommand::ClearFilters))
    };

    let selected_status = filters.process_status();
    let selected_type = filters.challenge_type();
    let selected_date = filters
        .selected_date()
        .map(date_key)
        .unwrap_or_default();
    let marked_dates = timeline.snapshot.marked_dates();
    let (min_date, max_date) = date_bounds(&marked_dates);

    html! {
        <div class="wellpath-filter-bar">
            <button
                class={classes!(
                    "wellpath-filter-bar__projection",
                    filters.show_by_challenge().then_some("by-challenge")
                )}
                onclick={on_projection}
            >
                {if filters.show_by_challenge() { "By challenge" } else { "By date" }}
            </button>

            // Status only narrows the "by challenge" projection
            {if filters.show_by_challenge() {
                html! {
                    <select class="wellpath-filter-bar__status" onchange={on_status}>
                        <option value="" selected={selected_status.is_none()}>{"All statuses"}</option>
                        {for ProcessStatus::ALL.into_iter().map(|status| html! {
                            <option
                                value={status.as_str()}
                                selected={selected_status == Some(status)}
                            >
                                {status.label()}
                            </option>
                        })}
                    </select>
                }
            } else {
                html! {}
            }}

            <select class="wellpath-filter-bar__type" onchange={on_type}>
                <option value="" selected={selected_type.is_none()}>{"All lengths"}</option>
                {for ChallengeType::ALL.into_iter().map(|challenge_type| html! {
                    <option
                        value={challenge_type.as_str()}
                        selected={selected_type == Some(challenge_type)}
                    >
                        {challenge_type.label()}
                    </option>
                })}
            </select>

            <input
                class="wellpath-filter-bar__date"
                type="date"
                list={MARKED_DATES_ID}
                min={min_date}
                max={max_date}
                value={selected_date}
                onchange={on_date}
            />
            <datalist id={MARKED_DATES_ID}>
                {for marked_dates.into_iter().map(|date| html! {
                    <option value={date_key(date)} />
                })}
            </datalist>

            <button
                class="wellpath-btn wellpath-btn--secondary"
                disabled={filters.is_empty()}
                onclick={on_clear}
            >
                {"Clear filters"}
            </button>
        </div>
    }
}
