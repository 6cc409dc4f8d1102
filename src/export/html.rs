use serde_json::Value;

use crate::network::SnapshotStatus;
use crate::view::View;

use super::cytoscape::{elements_json, stylesheet_json};

/// Keeps embedded JSON from closing the surrounding `<script>` element.
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// A self-contained page: graph canvas plus an inspector for tapped elements.
pub fn render_html(view: &View, explorer_template: &str) -> String {
    let elements = script_json(&elements_json(view));
    let stylesheet = script_json(&stylesheet_json(&view.rules));
    let explorer = script_json(&Value::String(explorer_template.to_string()));
    let block_height = view.block_height;
    let banner = match &view.status {
        SnapshotStatus::Complete => String::new(),
        SnapshotStatus::Degraded { reason } => format!(
            r#"<div id="degraded">Snapshot unavailable, showing an empty graph: {}</div>"#,
            escape_html(reason)
        ),
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>HOPR channels at block {block_height}</title>
    <script src="https://unpkg.com/cytoscape@3.28.1/dist/cytoscape.min.js"></script>
    <style>
        body {{ margin: 0; font-family: monospace; background-color: #f8f8ff; }}
        #graph {{ width: 100%; height: 90vh; }}
        #inspector {{
            width: 100%; height: 10vh; margin: 0; overflow-x: scroll;
            border: thin lightgrey solid; background-color: #fffea5;
        }}
        #degraded {{ padding: 6px; background: #ffd7d7; }}
    </style>
</head>
<body>
    {banner}
    <div id="graph"></div>
    <pre id="inspector"></pre>
    <script>
    const explorerTemplate = {explorer};
    const linkFields = {{ node: ["id"], edge: ["source", "target"] }};

    function explorerLink(address) {{
        const anchor = document.createElement("a");
        anchor.href = explorerTemplate.replace("{{address}}", address);
        anchor.target = "_blank";
        anchor.textContent = address;
        return anchor;
    }}

    function inspect(kind, data) {{
        const panel = document.getElementById("inspector");
        panel.textContent = "";
        for (const [key, value] of Object.entries(data)) {{
            panel.append(key + ": ");
            if (linkFields[kind].includes(key)) {{
                panel.append(explorerLink(String(value)));
            }} else {{
                panel.append(JSON.stringify(value));
            }}
            panel.append("\n");
        }}
    }}

    const cy = cytoscape({{
        container: document.getElementById("graph"),
        elements: {elements},
        style: {stylesheet},
        layout: {{ name: "cose", animate: false, nodeRepulsion: 100000 }}
    }});

    cy.on("tap", "node", (evt) => inspect("node", evt.target.data()));
    cy.on("tap", "edge", (evt) => inspect("edge", evt.target.data()));
    </script>
</body>
</html>
"##
    )
}
