use crate::components::StepItem;
use crate::hooks::use_timeline;
use wellpath_core::{StepKey, TimelineCommand};
use yew::prelude::*;

/// "By date" projection: every challenge's steps under their calendar day
#[function_component(DateTimeline)]
pub fn date_timeline() -> Html {
    let timeline = use_timeline();
    let snapshot = &timeline.snapshot;
    let groups = snapshot.by_date();

    if groups.is_empty() {
        return html! {
            <p class="wellpath-timeline__empty">{"No activities on this date"}</p>
        };
    }

    html! {
        <div class="wellpath-timeline wellpath-timeline--by-date">
            {for groups.iter().map(|group| {
                let expanded = snapshot.expansion.is_day_expanded(&group.key);
                let on_day = {
                    let send_command = timeline.send_command.clone();
                    let key = group.key.clone();
                    Callback::from(move |_: MouseEvent| {
                        send_command(TimelineCommand::ToggleDay(key.clone()))
                    })
                };

                html! {
                    <div class={classes!(
                        "wellpath-day",
                        group.is_today(snapshot.today).then_some("wellpath-day--today")
                    )}>
                        <button class="wellpath-day__header" onclick={on_day}>
                            <span class="wellpath-day__date">
                                {group.date.format("%a, %b %-d").to_string()}
                            </span>
                            <span class="wellpath-day__count">{group.entries.len()}</span>
                        </button>
                        {if expanded {
                            html! {
                                <ul class="wellpath-day__steps">
                                    {for group.entries.iter().map(|entry| {
                                        let key = StepKey::new(entry.progress.id.clone(), entry.step.step_id.clone());
                                        html! {
                                            <StepItem
                                                key={key.to_string()}
                                                progress_id={entry.progress.id.clone()}
                                                start_date={entry.progress.start_date}
                                                step={entry.step.clone()}
                                                challenge_title={Some(AttrValue::from(entry.progress.challenge_title.clone()))}
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
}
