//! The finished document: every module diagram in emission order.

use crate::config::{DiagramConfig, HtmlConfig};
use crate::convert::convert_module;
use crate::deps::resolve_order;
use crate::diagram::ModuleDiagram;
use crate::error::{DiagramError, Result};
use crate::netlist::Netlist;
use crate::ports::resolve_all;
use log::info;
use serde::Serialize;

/// A module name with its laid-out diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedDiagram {
    pub name: String,
    pub diagram: ModuleDiagram,
}

/// Library modules in dependency order, then the root module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub library: Vec<NamedDiagram>,
    pub root: NamedDiagram,
}

/// Run the whole pipeline over `netlist`.
///
/// Port maps are resolved for every module first, since a module's slots
/// are needed wherever it is instantiated. Modules are then converted and
/// laid out one at a time in emission order.
pub fn emit(netlist: &Netlist, config: &DiagramConfig) -> Result<Document> {
    let port_maps = resolve_all(netlist)?;
    let order = resolve_order(netlist)?;

    let build = |name: &str| -> Result<NamedDiagram> {
        let module = &netlist.modules[name];
        let mut diagram = convert_module(netlist, name, module, &port_maps)?;
        diagram.lay_out(name, &config.layout)?;
        Ok(NamedDiagram {
            name: name.to_string(),
            diagram,
        })
    };

    let library = order.library.iter().map(|name| build(name)).collect::<Result<Vec<_>>>()?;
    let root = build(&order.root)?;

    info!(
        "emitted `{}` with {} library module(s), {} device(s) in total",
        root.name,
        library.len(),
        library.iter().chain(std::iter::once(&root)).map(|m| m.diagram.devices.len()).sum::<usize>()
    );
    Ok(Document { library, root })
}

impl Document {
    /// Compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Standalone page that loads the viewer, registers every library module
    /// as a sub-circuit and mounts the root diagram.
    pub fn to_html(&self, html: &HtmlConfig) -> Result<String> {
        if !is_dotted_identifier(&html.viewer) {
            return Err(DiagramError::InvalidViewerName {
                viewer: html.viewer.clone(),
            });
        }
        // `</` inside a string would end the script element early.
        let json = self.to_json()?.replace("</", "<\\/");
        let title = html.title.as_deref().unwrap_or(&self.root.name);

        Ok(format!(
            r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="{style}">
<script type="text/javascript" src="{script}"></script>
</head>
<body>
<div id="paper"></div>
<script>
const doc = {json};
const subcircuits = {{}};
for (const entry of doc.library) {{
  subcircuits[entry.name] = entry.diagram;
}}
const circuit = new {viewer}.Circuit(Object.assign({{}}, doc.root.diagram, {{ subcircuits }}));
circuit.displayOn(document.getElementById("paper"));
</script>
</body>
</html>
"#,
            title = escape_html(title),
            style = escape_html(&html.style_url),
            script = escape_html(&html.script_url),
            viewer = html.viewer,
        ))
    }
}

/// `name` or `a.b.c`, each part an ASCII JavaScript identifier.
fn is_dotted_identifier(name: &str) -> bool {
    name.split('.').all(|part| {
        let mut chars = part.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    })
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
