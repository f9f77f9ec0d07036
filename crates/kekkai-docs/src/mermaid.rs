//! Mermaid rendering of a dependency flow.

use kekkai_core::FlowGraph;

/// Text placed below the diagram when `docs.content` is unset.
pub const DEFAULT_CONTENT: &str = "
This project follows a **One-way Dependency Flow** principle:

- Each folder may only import modules that lie downstream along the arrow direction
- Upstream or reverse imports are not allowed

> This rule is also enforced via **ESLint**.
";

/// Renders `flow` as a fenced `flowchart TD` block, one line per edge in
/// insertion order.
#[must_use]
pub fn render_mermaid(flow: &FlowGraph) -> String {
    let mut lines = Vec::with_capacity(flow.edges().len() + 3);
    lines.push("```mermaid".to_string());
    lines.push("flowchart TD".to_string());
    for edge in flow.edges() {
        match edge.options.diagram_label() {
            Some(label) => lines.push(format!("  {} -- {} --> {}", edge.from, label, edge.to)),
            None => lines.push(format!("  {} --> {}", edge.from, edge.to)),
        }
    }
    lines.push("```".to_string());
    lines.join("\n")
}
