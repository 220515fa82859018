use crate::hooks::TimelineContext;
use crate::services::HttpProgressApi;
use futures::StreamExt;
use gloo_timers::future::TimeoutFuture;
use std::rc::Rc;
use uuid::Uuid;
use wasm_bindgen_futures::spawn_local;
use wellpath_core::domain::ChallengeId;
use wellpath_core::{ApiConfig, Notice, TimelineCommand, TimelineEventLoop, TimelineService};
use yew::prelude::*;

/// How long a toast stays up unless dismissed
const NOTICE_TIMEOUT_MS: u32 = 4_000;

#[derive(Properties, PartialEq)]
pub struct ProgressProviderProps {
    /// Backend base URL; the compiled-in default is used when absent
    #[prop_or_default]
    pub api_url: Option<AttrValue>,

    /// Challenge progress to expand and scroll to after the first load
    #[prop_or_default]
    pub deep_link: Option<AttrValue>,

    pub children: Children,
}

#[function_component(ProgressProvider)]
pub fn progress_provider(props: &ProgressProviderProps) -> Html {
    let service = {
        let api_url = props.api_url.clone();
        let deep_link = props.deep_link.clone();
        use_memo((), move |_| {
            let config = match api_url {
                Some(url) => ApiConfig::new(url.to_string()),
                None => ApiConfig::default(),
            };
            let mut event_loop = TimelineEventLoop::new(&config);
            if let Some(progress_id) = deep_link {
                tracing::info!(%progress_id, "opening with deep link");
                event_loop = event_loop.with_deep_link(progress_id.to_string());
            }
            let api = HttpProgressApi::from_storage(config.clone());
            TimelineService::with_event_loop(api, config, event_loop)
        })
    };

    let snapshot = {
        let service = service.clone();
        use_state(move || service.snapshot())
    };
    let notices = use_state(Vec::<Notice>::new);
    let notice_store = use_mut_ref(Vec::<Notice>::new);

    let send_command = {
        let service = service.clone();
        let snapshot = snapshot.clone();
        Rc::new(move |cmd: TimelineCommand| {
            // Queued now, handled on the next tick: commands sent in the
            // same tick share one run and back-to-back refreshes merge
            if let Err(e) = service.enqueue(cmd) {
                tracing::error!(error = %e, "command rejected");
                return;
            }
            let service = service.clone();
            let snapshot = snapshot.clone();
            spawn_local(async move {
                service
                    .run_observed(|current| snapshot.set(current.clone()))
                    .await;
            });
        }) as Rc<dyn Fn(TimelineCommand)>
    };

    let dismiss_notice = {
        let notice_store = notice_store.clone();
        let notices = notices.clone();
        Rc::new(move |id: Uuid| {
            notice_store.borrow_mut().retain(|notice| notice.id != id);
            notices.set(notice_store.borrow().clone());
        }) as Rc<dyn Fn(Uuid)>
    };

    let register = {
        let service = service.clone();
        let snapshot = snapshot.clone();
        Rc::new(move |challenge_id: ChallengeId| {
            let service = service.clone();
            let snapshot = snapshot.clone();
            spawn_local(async move {
                if let Err(e) = service.register(challenge_id).await {
                    tracing::debug!(error = %e, "registration did not go through");
                }
                snapshot.set(service.snapshot());
            });
        }) as Rc<dyn Fn(ChallengeId)>
    };

    {
        let service = service.clone();
        let send_command = send_command.clone();
        let dismiss_notice = dismiss_notice.clone();
        let notice_store = notice_store.clone();
        let notices = notices.clone();

        use_effect_with((), move |_| {
            let mut receiver = service.subscribe();
            spawn_local(async move {
                while let Some(notice) = receiver.next().await {
                    let id = notice.id;
                    notice_store.borrow_mut().push(notice);
                    notices.set(notice_store.borrow().clone());

                    let dismiss_notice = dismiss_notice.clone();
                    spawn_local(async move {
                        TimeoutFuture::new(NOTICE_TIMEOUT_MS).await;
                        dismiss_notice(id);
                    });
                }
            });

            send_command(TimelineCommand::Load);
            || ()
        });
    }

    let context = TimelineContext {
        snapshot: (*snapshot).clone(),
        notices: (*notices).clone(),
        send_command,
        dismiss_notice,
        register,
        service,
    };

    html! {
        <ContextProvider<TimelineContext> {context}>
            {props.children.clone()}
        </ContextProvider<TimelineContext>>
    }
}
