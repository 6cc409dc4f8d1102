use serde_json::{Value, json};

use crate::network::{Attributed, SnapshotStatus};
use crate::style::{StyleRule, ValueRange};
use crate::view::View;

pub fn element_json<T: Attributed>(item: &T) -> Value {
    json!({ "data": item.attributes() })
}

pub fn stylesheet_json(rules: &[StyleRule]) -> Value {
    rules
        .iter()
        .map(|rule| {
            json!({
                "selector": rule.selector.to_string(),
                "style": rule.style_map(),
            })
        })
        .collect()
}

pub fn elements_json(view: &View) -> Value {
    json!({
        "nodes": view.nodes.iter().map(element_json).collect::<Vec<_>>(),
        "edges": view.edges.iter().map(element_json).collect::<Vec<_>>(),
    })
}

fn status_json(status: &SnapshotStatus) -> Value {
    match status {
        SnapshotStatus::Complete => json!({ "state": "complete" }),
        SnapshotStatus::Degraded { reason } => json!({ "state": "degraded", "reason": reason }),
    }
}

fn range_json(range: &ValueRange) -> Value {
    if range.is_empty() {
        Value::Null
    } else {
        json!([range.min(), range.max()])
    }
}

pub fn view_json(view: &View) -> Value {
    json!({
        "blockHeight": view.block_height,
        "status": status_json(&view.status),
        "scale": {
            "weight": range_json(&view.weight_range),
            "stake": range_json(&view.stake_range),
        },
        "elements": elements_json(view),
        "style": stylesheet_json(&view.rules),
    })
}
