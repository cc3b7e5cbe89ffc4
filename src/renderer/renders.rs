use crate::parser::*;
use crate::renderer::components::*;
use crate::renderer::sections::build_sections;
use crate::renderer::traits::*;

impl Render for ApiNode {
    fn render(&self, context: &RenderContext) -> String {
        let toggles = &context.config.toggles;
        let mut blocks: Vec<String> = Vec::new();

        if !context.root || toggles.show_root_heading {
            let full_path = if context.root {
                toggles.show_root_full_path
            } else {
                toggles.show_object_full_path
            };
            let title = if full_path { &self.path } else { &self.name };
            blocks.push(heading(context.heading_level, title));
            blocks.push(anchor_tag(&self.path));
        }

        let formatter = SignatureFormatter::new(toggles);
        match &self.detail {
            NodeDetail::Function { parameters, returns } if toggles.show_signature => {
                let signature = formatter.format_signature(&self.name, parameters, returns.as_deref());
                blocks.push(formatter.format_code(&signature, "python"));
            }
            NodeDetail::Attribute { annotation, value } if toggles.show_signature => {
                let attribute =
                    formatter.format_attribute(&self.name, annotation.as_deref(), value.as_deref());
                blocks.push(formatter.format_code(&attribute, "python"));
            }
            NodeDetail::Class { bases } if toggles.show_bases && !bases.is_empty() => {
                blocks.push(render_bases(bases, context));
            }
            _ => {}
        }

        let docs = DocRenderer::new(toggles).render_docs(self.docstring.as_ref());
        if !docs.is_empty() {
            blocks.push(docs);
        }

        if self.is_container() {
            let sections = build_sections(self, context);
            if !sections.is_empty() {
                blocks.push(sections);
            }
        }

        blocks.join("\n\n")
    }
}

/// Bases line of a class. Bases rendered in the same document become links.
fn render_bases(bases: &[String], context: &RenderContext) -> String {
    let rendered: Vec<String> = bases
        .iter()
        .map(|base| {
            if context.known_paths.contains(base) {
                crossref(&inline_code(base), base)
            } else {
                inline_code(base)
            }
        })
        .collect();
    format!("Bases: {}", rendered.join(", "))
}
