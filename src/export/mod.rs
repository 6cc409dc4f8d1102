mod cytoscape;
mod html;
mod inspect;

pub use cytoscape::view_json;
pub use html::render_html;
pub use inspect::inspect_view;
