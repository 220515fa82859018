mod catalog_steps;
mod deep_link_steps;
mod filter_steps;
mod loading_steps;
mod status_steps;
