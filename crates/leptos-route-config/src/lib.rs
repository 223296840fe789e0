//! Render declarative route tables into nested, exclusive-match route
//! switches.
//!
//! A table of [`RouteDescriptor`](prelude::RouteDescriptor)s goes through
//! [`render_routes`](prelude::render_routes) and comes out as a
//! [`RouteSwitch`](prelude::RouteSwitch): the first entry matching the
//! location renders, either as a redirect or as the route's component with
//! merged props. Components that own nested routes receive a
//! [`ChildRenderer`](prelude::ChildRenderer) under `"renderChild"` to render
//! them wherever they like. The [`host`] module mounts all of this on top of
//! `leptos_router`.

mod descriptor;
pub mod host;
mod matcher;
mod params;
mod path;
mod props;
mod render;
mod switch;

pub mod prelude {
    pub use crate::descriptor::*;
    pub use crate::host::{switch_view, view_routes, RouteConfig, RouteConfigProps};
    pub use crate::matcher::*;
    pub use crate::params::*;
    pub use crate::path::{generate_path, parse_segments, PathError, Segment};
    pub use crate::props::*;
    pub use crate::render::*;
    pub use crate::switch::*;
}
