use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{provide_meta_context, Meta, Title};
use leptos_route_config::prelude::{
    route_table, Component, Props, RouteConfig, RouteDescriptor, RouteKind, DEFAULT_RENDER_CHILD_PROP,
};
use leptos_router::components::{Router, A};

pub fn app_routes() -> Vec<Arc<RouteDescriptor<AnyView>>> {
    route_table([
        RouteDescriptor::component("/", home).exact(),
        RouteDescriptor::component("/asset", asset_layout).with_routes([
            RouteDescriptor::component("/asset/:id", asset_details).exact(),
            RouteDescriptor::component("/asset", asset_list).exact(),
        ]),
        // Old links keep working.
        RouteDescriptor::redirect("/assets/:id", "/asset/:id"),
        RouteDescriptor::component("/contact", contact).with_prop("email", "hello@example.com"),
        RouteDescriptor::new(RouteKind::Component(Component::new(not_found))),
    ])
}

fn home(_props: Props<AnyView>) -> AnyView {
    view! {
        <h1>"Welcome Home!"</h1>
    }
    .into_any()
}

fn asset_layout(props: Props<AnyView>) -> AnyView {
    let assets = props.render_child_view(
        DEFAULT_RENDER_CHILD_PROP,
        Props::new().with("section", "Assets"),
    );
    view! {
        <section>
            <h1>"Assets"</h1>
            {assets}
        </section>
    }
    .into_any()
}

fn asset_list(props: Props<AnyView>) -> AnyView {
    let section = props.text("section").unwrap_or_default().to_string();
    view! {
        <h2>{section} " / list"</h2>
        <ul>
            <li><A href="/asset/1">"Asset 1"</A></li>
            <li><A href="/asset/2">"Asset 2"</A></li>
        </ul>
    }
    .into_any()
}

fn asset_details(props: Props<AnyView>) -> AnyView {
    let title = match props.route_match().and_then(|m| m.params.value::<u64>("id").ok()) {
        Some(id) => format!("Asset #{id}"),
        None => "Unknown asset".to_string(),
    };
    view! {
        <h2>{title}</h2>
    }
    .into_any()
}

fn contact(props: Props<AnyView>) -> AnyView {
    let email = props.text("email").unwrap_or_default().to_string();
    view! {
        <h1>"Contact Us"</h1>
        <p>{email}</p>
    }
    .into_any()
}

fn not_found(props: Props<AnyView>) -> AnyView {
    let location = props.text("location").unwrap_or_default().to_string();
    view! {
        <h1>"404"</h1>
        <p>"Nothing lives at " {location}</p>
    }
    .into_any()
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    let routes = app_routes();

    view! {
        <Title text="Route Config Demo" />
        <Meta charset="UTF-8" />
        <Router>
            <nav>
                <A href="/">"Home"</A>
                <A href="/asset">"Assets"</A>
                <A href="/assets/7">"Asset 7 (old link)"</A>
                <A href="/contact">"Contact"</A>
            </nav>
            <main>
                <RouteConfig routes=routes />
            </main>
        </Router>
    }
}
