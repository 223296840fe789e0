use std::sync::Arc;

use leptos_route_config::prelude::*;

/// Plain-data stand-in for a rendered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Rendered {
        name: &'static str,
        parent: Option<String>,
        params: Vec<(String, String)>,
        child: Option<Box<Page>>,
    },
    Redirect(String),
    NoChildren,
    Placeholder,
    NotFound,
    Error(String),
}

impl Page {
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Page::Rendered { name, .. } => Some(*name),
            _ => None,
        }
    }

    pub fn child(&self) -> Option<&Page> {
        match self {
            Page::Rendered { child, .. } => child.as_deref(),
            _ => None,
        }
    }
}

/// A component that renders its nested routes, if any, at the current location.
pub fn page(name: &'static str) -> Component<Page> {
    Component::new(move |props: Props<Page>| {
        let location = props.text("location").unwrap_or("/").to_string();
        let params: Vec<(String, String)> = props
            .route_match()
            .map(|m| {
                m.params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .unwrap_or_default();
        let child = props.render_child(DEFAULT_RENDER_CHILD_PROP).map(|renderer| {
            let rendered = renderer.render(Props::new().with("parent", name));
            Box::new(resolve_child(rendered, &location))
        });

        Page::Rendered {
            name,
            parent: props.text("parent").map(str::to_string),
            params,
            child,
        }
    })
}

pub fn resolve(switch: &RouteSwitch<Page>, location: &str) -> Page {
    match switch.resolve(location, &SegmentMatcher) {
        None => Page::NotFound,
        Some(Ok(RouteOutput::View(page))) => page,
        Some(Ok(RouteOutput::Redirect { to, .. })) => Page::Redirect(to),
        Some(Err(err)) => Page::Error(err.to_string()),
    }
}

fn resolve_child(rendered: ChildRender<Page>, location: &str) -> Page {
    match rendered {
        ChildRender::Routes(Some(switch)) => resolve(&switch, location),
        ChildRender::Routes(None) => Page::NotFound,
        ChildRender::NoChildren(NoChildren::Disabled) => Page::NoChildren,
        ChildRender::NoChildren(NoChildren::View(placeholder)) => placeholder.run(),
    }
}

pub fn app_routes() -> Vec<Arc<RouteDescriptor<Page>>> {
    route_table([
        RouteDescriptor::component("/", page("home")).exact(),
        RouteDescriptor::redirect("/profile/:id", "/users/:id").exact(),
        RouteDescriptor::redirect("/legacy/:slug", "/docs/:missing"),
        RouteDescriptor::component("/users", page("users")).with_routes([
            RouteDescriptor::component("/users/:id", page("user")).exact(),
            RouteDescriptor::component("/users", page("user_list")).exact(),
        ]),
        RouteDescriptor::component("/admin", page("admin"))
            .with_key("admin")
            .with_forced_prop("parent", "forced")
            .with_route(
                RouteDescriptor::component("/admin/settings", page("settings"))
                    .with_route(RouteDescriptor::component("/admin/settings/:tab", page("tab"))),
            ),
        RouteDescriptor::component("/teams/:team", page("team"))
            .with_route(RouteDescriptor::component("/teams/:team/members", page("members")).exact())
            .with_route(RouteDescriptor::new(RouteKind::Redirect("/teams/:team/members".to_string()))),
        RouteDescriptor::new(RouteKind::Component(page("not_found"))),
    ])
}

pub fn render_at(options: &RenderOptions<Page>, location: &str) -> Page {
    let routes = app_routes();
    match render_routes(Some(routes.as_slice()), options) {
        Some(switch) => resolve(&switch, location),
        None => Page::NotFound,
    }
}
