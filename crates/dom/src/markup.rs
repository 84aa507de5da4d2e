use crate::document::Document;
use crate::node::{NodeData, NodeId};

impl Document {
    /// HTML-like serialization of `id` and its subtree.
    pub fn to_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    /// Markup of the body's children, without the `<body>` wrapper.
    pub fn body_markup(&self) -> String {
        let mut out = String::new();
        for &child in self.children(self.body()) {
            self.write_markup(child, &mut out);
        }
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };

        match node.data() {
            NodeData::Text(text) => escape_into(text, false, out),
            NodeData::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                if let Some(element_id) = &element.id {
                    out.push_str(" id=\"");
                    escape_into(element_id, true, out);
                    out.push('"');
                }
                if !element.classes.is_empty() {
                    out.push_str(" class=\"");
                    escape_into(&element.classes.join(" "), true, out);
                    out.push('"');
                }
                if !element.style.is_empty() {
                    out.push_str(" style=\"");
                    out.push_str(&element.style.to_css());
                    out.push('"');
                }
                out.push('>');

                for &child in node.children() {
                    self.write_markup(child, out);
                }

                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
