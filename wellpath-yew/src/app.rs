use crate::pages::ProgressScreen;
use crate::providers::ProgressProvider;
use yew::prelude::*;

/// Query parameter carrying a challenge progress to open
pub const DEEP_LINK_PARAM: &str = "challengeId";

/// Extract the deep-linked challenge from the URL query parameters
fn get_challenge_id_from_url() -> Option<String> {
    let href = web_sys::window()?.location().href().ok()?;
    let url = web_sys::Url::new(&href).ok()?;
    let challenge_id = url
        .search_params()
        .get(DEEP_LINK_PARAM)
        .filter(|id| !id.trim().is_empty())?;
    tracing::info!(%challenge_id, "found deep link in URL");
    Some(challenge_id)
}

#[derive(Properties, PartialEq, Default)]
pub struct AppProps {
    /// Overrides the compiled-in backend URL
    #[prop_or_default]
    pub api_url: Option<AttrValue>,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let deep_link = use_state(|| get_challenge_id_from_url().map(AttrValue::from));

    html! {
        <div class="app">
            <ProgressProvider api_url={props.api_url.clone()} deep_link={(*deep_link).clone()}>
                <ProgressScreen />
            </ProgressProvider>
        </div>
    }
}
