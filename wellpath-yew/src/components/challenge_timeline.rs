use crate::components::StepItem;
use crate::hooks::use_timeline;
use wellpath_core::application::{challenge_day_key, ChallengeSection};
use wellpath_core::{StepKey, TimelineCommand, TimelineSnapshot};
use yew::prelude::*;

/// DOM id of a challenge section (scroll target for deep links)
pub fn challenge_anchor(progress_id: &str) -> String {
    format!("challenge-{progress_id}")
}

fn percent(ratio: f32) -> u32 {
    (ratio.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// "By challenge" projection: one collapsible section per challenge
#[function_component(ChallengeTimeline)]
pub fn challenge_timeline() -> Html {
    let timeline = use_timeline();
    let snapshot = &timeline.snapshot;
    let sections = snapshot.by_challenge();

    if sections.is_empty() {
        return html! {
            <p class="wellpath-timeline__empty">{"No activities on this date"}</p>
        };
    }

    html! {
        <div class="wellpath-timeline wellpath-timeline--by-challenge">
            {for sections.iter().map(|section| render_section(&timeline.send_command, snapshot, section))}
        </div>
    }
}

fn render_section(
    send_command: &std::rc::Rc<dyn Fn(TimelineCommand)>,
    snapshot: &TimelineSnapshot,
    section: &ChallengeSection<'_>,
) -> Html {
    let progress = section.progress;
    let expanded = snapshot.expansion.is_challenge_expanded(&progress.id);

    let on_toggle = {
        let send_command = send_command.clone();
        let progress_id = progress.id.clone();
        Callback::from(move |_: MouseEvent| {
            send_command(TimelineCommand::ToggleChallenge(progress_id.clone()))
        })
    };

    html! {
        <section
            id={challenge_anchor(&progress.id)}
            class={classes!("wellpath-challenge", expanded.then_some("expanded"))}
        >
            <header class="wellpath-challenge__header" onclick={on_toggle}>
                {if let Some(url) = &progress.challenge_media_url {
                    html! { <img class="wellpath-challenge__media" src={url.clone()} alt="" /> }
                } else {
                    html! {}
                }}
                <h2 class="wellpath-challenge__title">{progress.challenge_title.clone()}</h2>
                <span class="wellpath-challenge__status">{progress.process_status.label()}</span>
                <span class="wellpath-challenge__progress">
                    {format!("{}%", percent(progress.completion_ratio()))}
                </span>
            </header>

            {if expanded {
                html! {
                    <div class="wellpath-challenge__days">
                        {for section.days.iter().map(|day| {
                            let day_key = challenge_day_key(&progress.id, &day.key);
                            let day_expanded = snapshot.expansion.is_day_expanded(&day_key);
                            let on_day = {
                                let send_command = send_command.clone();
                                let day_key = day_key.clone();
                                Callback::from(move |_: MouseEvent| {
                                    send_command(TimelineCommand::ToggleDay(day_key.clone()))
                                })
                            };

                            html! {
                                <div class={classes!(
                                    "wellpath-day",
                                    day.is_today(snapshot.today).then_some("wellpath-day--today")
                                )}>
                                    <button class="wellpath-day__header" onclick={on_day}>
                                        <span class="wellpath-day__date">
                                            {day.date.format("%a, %b %-d").to_string()}
                                        </span>
                                        <span class="wellpath-day__count">{day.steps.len()}</span>
                                    </button>
                                    {if day_expanded {
                                        html! {
                                            <ul class="wellpath-day__steps">
                                                {for day.steps.iter().map(|step| {
                                                    let key = StepKey::new(progress.id.clone(), step.step_id.clone());
                                                    html! {
                                                        <StepItem
                                                            key={key.to_string()}
                                                            progress_id={progress.id.clone()}
                                                            start_date={progress.start_date}
                                                            step={(*step).clone()}
                                                            updating={snapshot.is_updating(&key)}
                                                            expanded={snapshot.expansion.is_task_expanded(&key)}
                                                        />
                                                    }
                                                })}
                                            </ul>
                                        }
                                    } else {
                                        html! {}
                                    }}
                                </div>
                            }
                        })}
                    </div>
                }
            } else {
                html! {}
            }}
        </section>
    }
}
