use serde_json::{Map, Value, json};

use crate::error::ViewError;
use crate::network::{Attributed, ElementKind};
use crate::style::{StyleRule, resolve};
use crate::util::explorer_link;
use crate::view::View;

/// What the inspector panel shows for one selected element.
#[derive(Clone, Debug, PartialEq)]
pub struct Inspection {
    pub kind: ElementKind,
    pub attributes: Map<String, Value>,
    pub links: Vec<(String, String)>,
    pub style: Map<String, Value>,
}

impl Inspection {
    pub fn to_json(&self) -> Value {
        let links = self
            .links
            .iter()
            .map(|(field, url)| (field.clone(), Value::String(url.clone())))
            .collect::<Map<_, _>>();
        json!({
            "kind": self.kind.label(),
            "data": self.attributes,
            "links": links,
            "style": self.style,
        })
    }
}

fn link_fields(kind: ElementKind) -> &'static [&'static str] {
    match kind {
        ElementKind::Node => &["id"],
        ElementKind::Edge => &["source", "target"],
    }
}

pub fn inspect_element<T: Attributed>(
    kind: ElementKind,
    item: &T,
    rules: &[StyleRule],
    explorer_template: &str,
) -> Result<Inspection, ViewError> {
    let links = link_fields(kind)
        .iter()
        .filter_map(|field| {
            let address = item.attribute(field)?.as_str()?;
            Some((field.to_string(), explorer_link(explorer_template, address)))
        })
        .collect();

    Ok(Inspection {
        kind,
        attributes: item.attributes().clone(),
        links,
        style: resolve(rules, kind, item)?,
    })
}

/// Looks up an edge by `source:target`, then a node by id. Ids may themselves contain `:`.
pub fn inspect_view(
    view: &View,
    query: &str,
    explorer_template: &str,
) -> Result<Option<Inspection>, ViewError> {
    let edge = view.edges.iter().find(|edge| {
        query
            .strip_prefix(edge.source.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
            == Some(edge.target.as_str())
    });
    if let Some(edge) = edge {
        return inspect_element(ElementKind::Edge, edge, &view.rules, explorer_template).map(Some);
    }

    view.nodes
        .iter()
        .find(|node| node.id == query)
        .map(|node| inspect_element(ElementKind::Node, node, &view.rules, explorer_template))
        .transpose()
}
