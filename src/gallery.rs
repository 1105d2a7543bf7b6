use std::rc::Rc;

use web_sys::Element;
use yew::prelude::*;

use crate::app_core::{PortfolioCore, PortfolioSnapshot};
use folio_core::Work;

pub(crate) const ACTIVE_CLASS: &str = "active";

#[derive(Properties)]
pub(crate) struct PortfolioProps {
    pub(crate) core: Rc<PortfolioCore>,
}

impl PartialEq for PortfolioProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }
}

#[hook]
fn use_portfolio_snapshot(core: &Rc<PortfolioCore>) -> UseStateHandle<PortfolioSnapshot> {
    let snapshot = use_state(|| core.snapshot());
    {
        let core = core.clone();
        let snapshot = snapshot.clone();
        use_effect_with((), move |_| {
            let core_for_cb = core.clone();
            let snapshot_for_cb = snapshot.clone();
            let subscription = core.subscribe(Rc::new(move || {
                snapshot_for_cb.set(core_for_cb.snapshot());
            }));
            // catch anything that landed between first render and subscribe
            snapshot.set(core.snapshot());
            move || drop(subscription)
        });
    }
    snapshot
}

/// Ids are not trusted to be unique (a record without one decodes to 0), so
/// the position is part of the key.
pub(crate) fn work_figure(index: usize, work: &Work) -> Html {
    html! {
        <figure key={format!("{index}-{}", work.id)}>
            <img src={work.image_url.clone()} alt={work.title.clone()} />
            <figcaption>{ work.title.clone() }</figcaption>
        </figure>
    }
}

#[function_component(Gallery)]
pub(crate) fn gallery(props: &PortfolioProps) -> Html {
    let snapshot = use_portfolio_snapshot(&props.core);
    html! {
        <>
            { for snapshot.visible.iter().enumerate().map(|(index, work)| work_figure(index, work)) }
        </>
    }
}

#[function_component(FilterBar)]
pub(crate) fn filter_bar(props: &PortfolioProps) -> Html {
    let snapshot = use_portfolio_snapshot(&props.core);
    if !snapshot.loaded {
        return html! {};
    }
    let active = snapshot.filter.clone();
    let buttons = snapshot.choices().into_iter().map(|choice| {
        let is_active = choice == active;
        let label = choice.label().to_string();
        let onclick = {
            let core = props.core.clone();
            let choice = choice.clone();
            Callback::from(move |_: MouseEvent| {
                core.select_filter(choice.clone());
            })
        };
        html! {
            <button
                key={label.clone()}
                type="button"
                class={classes!("filter-button", is_active.then_some(ACTIVE_CLASS))}
                aria-pressed={if is_active { "true" } else { "false" }}
                {onclick}
            >
                { label }
            </button>
        }
    });
    html! {
        <>
            { for buttons }
        </>
    }
}

/// Mounts the gallery into `root`, dropping whatever static markup it held.
pub(crate) fn mount_gallery(root: Element, core: Rc<PortfolioCore>) -> yew::AppHandle<Gallery> {
    root.set_inner_html("");
    yew::Renderer::<Gallery>::with_root_and_props(root, PortfolioProps { core }).render()
}

pub(crate) fn mount_filter_bar(root: Element, core: Rc<PortfolioCore>) -> yew::AppHandle<FilterBar> {
    root.set_inner_html("");
    yew::Renderer::<FilterBar>::with_root_and_props(root, PortfolioProps { core }).render()
}
