use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_location;

use crate::descriptor::RouteDescriptor;
use crate::matcher::SegmentMatcher;
use crate::props::Props;
use crate::render::{render_routes, ChildRender, NoChildren, RenderOptions};
use crate::switch::{RouteOutput, RouteSwitch};

/// Renders a route table as a reactive view of the router's current location.
///
/// Must be called inside a `leptos_router` `<Router>`.
pub fn view_routes(
    routes: Option<&[Arc<RouteDescriptor<AnyView>>]>,
    options: &RenderOptions<AnyView>,
) -> AnyView {
    match render_routes(routes, options) {
        Some(switch) => switch_view(switch),
        None => ().into_any(),
    }
}

/// Mounts the entry of `switch` matching the router's location. Redirect
/// routes navigate through [`Redirect`]; a template error goes to the
/// nearest error boundary.
///
/// The view is rebuilt only when the matched entry or its match changes, so a
/// layout stays mounted while only its nested routes move.
pub fn switch_view(switch: RouteSwitch<AnyView>) -> AnyView {
    let pathname = use_location().pathname;
    let switch = Arc::new(switch);

    let matched = {
        let switch = Arc::clone(&switch);
        Memo::new(move |_| {
            let (index, route_match) = switch.matched_index(&pathname.get(), &SegmentMatcher)?;
            let key = switch.entries().get(index)?.key.clone();
            Some((key, index, route_match))
        })
    };

    (move || {
        let Some((key, index, route_match)) = matched.get() else {
            return Ok(().into_any());
        };
        let Some(entry) = switch.entries().get(index) else {
            return Ok(().into_any());
        };
        let pathname = pathname.get_untracked();
        log::debug!("mounting entry `{key}` for `{pathname}`");
        match entry.render(&route_match, switch.location(&pathname)) {
            Ok(RouteOutput::View(view)) => Ok(view),
            Ok(RouteOutput::Redirect { to, .. }) => Ok(view! { <Redirect path=to /> }.into_any()),
            Err(err) => {
                log::error!("failed to render `{pathname}`: {err}");
                Err(err)
            }
        }
    })
    .into_any()
}

impl ChildRender<AnyView> {
    /// Turns the child callback's result into a view. The `no_render_child`
    /// placeholder is only run here, by the consuming component.
    pub fn into_view(self) -> AnyView {
        match self {
            Self::Routes(Some(switch)) => switch_view(switch),
            Self::Routes(None) | Self::NoChildren(NoChildren::Disabled) => ().into_any(),
            Self::NoChildren(NoChildren::View(placeholder)) => placeholder.run(),
        }
    }
}

impl Props<AnyView> {
    /// Renders the nested routes exposed under `key`; nothing if the key holds
    /// no child callback.
    pub fn render_child_view(&self, key: &str, extra: Props<AnyView>) -> AnyView {
        match self.render_child(key) {
            Some(renderer) => renderer.render(extra).into_view(),
            None => ().into_any(),
        }
    }
}

/// Component form of [`view_routes`].
#[component]
pub fn RouteConfig(
    routes: Vec<Arc<RouteDescriptor<AnyView>>>,
    #[prop(optional)] options: Option<RenderOptions<AnyView>>,
) -> impl IntoView {
    view_routes(Some(routes.as_slice()), &options.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::descriptor::{route_table, ViewFn};
    use crate::matcher::RouteMatch;
    use crate::render::{component_props, DEFAULT_RENDER_CHILD_PROP};

    fn leaf(_props: Props<AnyView>) -> AnyView {
        ().into_any()
    }

    fn counting_placeholder(calls: &Arc<AtomicUsize>) -> NoChildren<AnyView> {
        let calls = Arc::clone(calls);
        NoChildren::View(ViewFn::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            ().into_any()
        }))
    }

    fn leaf_props(options: &RenderOptions<AnyView>) -> Props<AnyView> {
        let routes = route_table([RouteDescriptor::component("/leaf", leaf)]);
        component_props(&routes[0], options, &RouteMatch::root("/leaf"), "/leaf")
    }

    #[test]
    fn placeholder_runs_only_when_the_view_is_built() {
        let calls = Arc::new(AtomicUsize::new(0));
        let options = RenderOptions::default().with_no_render_child(counting_placeholder(&calls));
        let props = leaf_props(&options);

        let rendered = props
            .render_child(DEFAULT_RENDER_CHILD_PROP)
            .map(|renderer| renderer.render(Props::new()));
        assert!(matches!(rendered, Some(ChildRender::NoChildren(NoChildren::View(_)))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let _view = props.render_child_view(DEFAULT_RENDER_CHILD_PROP, Props::new());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_child_callback_renders_nothing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let options = RenderOptions::default()
            .with_no_render_child(counting_placeholder(&calls))
            .without_render_child();
        let props = leaf_props(&options);

        assert!(props.render_child(DEFAULT_RENDER_CHILD_PROP).is_none());
        let _view = props.render_child_view(DEFAULT_RENDER_CHILD_PROP, Props::new());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_child_results_become_empty_views() {
        let _disabled = ChildRender::<AnyView>::NoChildren(NoChildren::Disabled).into_view();
        let _no_switch = ChildRender::<AnyView>::Routes(None).into_view();
    }
}
