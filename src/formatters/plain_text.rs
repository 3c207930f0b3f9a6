use super::{Envelope, Renderable};
use std::fmt::Write;

pub(super) fn render<R: Renderable>(envelope: &Envelope<'_, R>) -> String {
    let mut text = String::new();
    // Writing into a `String` cannot fail.
    let _ = write_text(&mut text, envelope);
    text
}

fn write_text<R: Renderable>(out: &mut String, envelope: &Envelope<'_, R>) -> std::fmt::Result {
    if let Some(paging) = &envelope.paging {
        for (name, value) in paging {
            writeln!(out, "{name} : {value}")?;
        }
        writeln!(out)?;
    }

    for item in &envelope.items {
        for field in item.fields() {
            if field.is_text {
                writeln!(out, "{} : \"{}\"", field.name, field.value)?;
            } else {
                writeln!(out, "{} : {}", field.name, field.value)?;
            }
        }
        writeln!(out)?;
    }

    writeln!(out, "succeeded : {}", envelope.succeeded)?;
    writeln!(out, "errors : {}", envelope.errors)?;
    writeln!(out, "message : {}", envelope.message)
}
