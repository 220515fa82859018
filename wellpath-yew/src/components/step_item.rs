use crate::hooks::use_timeline;
use chrono::NaiveDate;
use serde_json::Value;
use std::str::FromStr;
use wellpath_core::{Step, StepKey, StepStatus, TimelineCommand};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StepItemProps {
    pub progress_id: AttrValue,
    pub start_date: NaiveDate,
    pub step: Step,

    /// Shown when steps of several challenges are listed together
    #[prop_or_default]
    pub challenge_title: Option<AttrValue>,

    pub updating: bool,
    pub expanded: bool,
}

fn status_modifier(status: StepStatus) -> &'static str {
    match status {
        StepStatus::NotStarted => "not-started",
        StepStatus::Progressing => "progressing",
        StepStatus::Completed => "completed",
        StepStatus::Skipped => "skipped",
    }
}

/// Remounts the picker whenever the shown status or the updating flag
/// changes, so a refused pick never stays selected
fn picker_key(status: StepStatus, updating: bool) -> String {
    format!("{}-{}", status.as_str(), if updating { "updating" } else { "idle" })
}

fn duration_label(minutes: Option<u32>) -> Option<String> {
    match minutes? {
        0 => None,
        m if m < 60 => Some(format!("{m} min")),
        m if m % 60 == 0 => Some(format!("{} h", m / 60)),
        m => Some(format!("{} h {} min", m / 60, m % 60)),
    }
}

/// Flatten the activity's instruction payload into display lines
fn instruction_lines(instructions: &Value) -> Vec<String> {
    match instructions {
        Value::String(text) => text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Array(items) => items.iter().flat_map(instruction_lines).collect(),
        Value::Object(map) => ["text", "content", "description"]
            .iter()
            .find_map(|key| map.get(*key))
            .or_else(|| map.get("steps"))
            .map(instruction_lines)
            .unwrap_or_default(),
        Value::Number(n) => vec![n.to_string()],
        Value::Null | Value::Bool(_) => Vec::new(),
    }
}

/// One activity row with its status control
#[function_component(StepItem)]
pub fn step_item(props: &StepItemProps) -> Html {
    let timeline = use_timeline();
    let step = &props.step;
    let status = step.process_status;
    let key = StepKey::new(props.progress_id.to_string(), step.step_id.clone());

    let on_advance = {
        let send_command = timeline.send_command.clone();
        let progress_id = props.progress_id.to_string();
        let step_id = step.step_id.clone();
        let day_number = step.day_number;
        let start_date = props.start_date;
        Callback::from(move |_: MouseEvent| {
            send_command(TimelineCommand::AdvanceStep {
                progress_id: progress_id.clone(),
                step_id: step_id.clone(),
                day_number,
                start_date,
            })
        })
    };

    let on_pick = {
        let send_command = timeline.send_command.clone();
        let key = key.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            let picked = StepStatus::from_str(&select.value());
            // Keep showing the stored status until the update is applied
            select.set_value(status.as_str());
            match picked {
                Ok(picked) if picked == status => {}
                Ok(picked) => send_command(TimelineCommand::SetStepStatus {
                    progress_id: key.progress_id.clone(),
                    step_id: key.step_id.clone(),
                    status: picked,
                    post_mood_id: None,
                }),
                Err(e) => tracing::warn!(error = %e, "ignoring status pick"),
            }
        })
    };

    let on_toggle = {
        let send_command = timeline.send_command.clone();
        let key = key.clone();
        Callback::from(move |_: MouseEvent| send_command(TimelineCommand::ToggleTask(key.clone())))
    };

    let lines = if props.expanded {
        instruction_lines(&step.activity.instructions)
    } else {
        Vec::new()
    };

    html! {
        <li class={classes!(
            "wellpath-step",
            format!("wellpath-step--{}", status_modifier(status)),
            props.updating.then_some("wellpath-step--updating")
        )}>
            <button
                class="wellpath-step__status"
                title={format!("{} (tap to change)", status.label())}
                disabled={props.updating}
                onclick={on_advance}
            >
                {status.label()}
            </button>

            <div class="wellpath-step__body" onclick={on_toggle}>
                {if let Some(title) = &props.challenge_title {
                    html! { <span class="wellpath-step__challenge">{title.clone()}</span> }
                } else {
                    html! {}
                }}
                <span class="wellpath-step__name">{step.activity.name.clone()}</span>
                {if let Some(duration) = duration_label(step.activity.duration) {
                    html! { <span class="wellpath-step__duration">{duration}</span> }
                } else {
                    html! {}
                }}
            </div>

            <select
                key={picker_key(status, props.updating)}
                class="wellpath-step__picker"
                disabled={props.updating}
                onchange={on_pick}
            >
                {for StepStatus::CYCLE.into_iter().map(|option| html! {
                    <option value={option.as_str()} selected={option == status}>
                        {option.label()}
                    </option>
                })}
            </select>

            {if props.expanded {
                html! {
                    <div class="wellpath-step__details">
                        {if step.activity.description.is_empty() {
                            html! {}
                        } else {
                            html! { <p class="wellpath-step__description">{step.activity.description.clone()}</p> }
                        }}
                        <ol class="wellpath-step__instructions">
                            {for lines.iter().map(|line| html! { <li>{line.clone()}</li> })}
                        </ol>
                    </div>
                }
            } else {
                html! {}
            }}
        </li>
    }
}
