use crate::hooks::use_timeline;
use yew::prelude::*;

/// Stack of transient notices
#[function_component(NoticeToasts)]
pub fn notice_toasts() -> Html {
    let timeline = use_timeline();

    html! {
        <div class="wellpath-toasts" role="status">
            {for timeline.notices.iter().map(|notice| {
                let on_dismiss = {
                    let dismiss_notice = timeline.dismiss_notice.clone();
                    let id = notice.id;
                    Callback::from(move |_: MouseEvent| dismiss_notice(id))
                };

                html! {
                    <div
                        key={notice.id.to_string()}
                        class={classes!(
                            "wellpath-toast",
                            format!("wellpath-toast--{}", notice.level().as_str())
                        )}
                    >
                        <span class="wellpath-toast__message">{notice.message()}</span>
                        <button class="wellpath-toast__close" onclick={on_dismiss}>{"×"}</button>
                    </div>
                }
            })}
        </div>
    }
}
