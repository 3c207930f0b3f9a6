use super::{Envelope, Renderable, escape_markup};
use std::fmt::Write;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

pub(super) fn render<R: Renderable>(envelope: &Envelope<'_, R>) -> String {
    let mut document = String::new();
    // Writing into a `String` cannot fail.
    let _ = write_document(&mut document, envelope);
    document
}

fn write_document<R: Renderable>(
    out: &mut String,
    envelope: &Envelope<'_, R>,
) -> std::fmt::Result {
    writeln!(out, "{XML_DECLARATION}")?;
    writeln!(out, "<root>")?;
    if let Some(paging) = &envelope.paging {
        for (name, value) in paging {
            writeln!(out, "<{name}>{value}</{name}>")?;
        }
    }

    writeln!(out, "<data>")?;
    for item in &envelope.items {
        writeln!(out, "<{}>", R::XML_TAG)?;
        for field in item.fields() {
            writeln!(
                out,
                "<{name}>{value}</{name}>",
                name = field.name,
                value = escape_markup(&field.value)
            )?;
        }
        writeln!(out, "</{}>", R::XML_TAG)?;
    }
    writeln!(out, "</data>")?;

    writeln!(out, "<succeeded>{}</succeeded>", envelope.succeeded)?;
    writeln!(out, "<errors>{}</errors>", escape_markup(&envelope.errors))?;
    writeln!(out, "<message>{}</message>", escape_markup(envelope.message))?;
    writeln!(out, "</root>")
}
