use super::{Envelope, Renderable, escape_markup};
use std::fmt::Write;

pub(super) fn render<R: Renderable>(envelope: &Envelope<'_, R>) -> String {
    let mut page = String::new();
    // Writing into a `String` cannot fail.
    let _ = write_page(&mut page, envelope);
    page
}

fn write_page<R: Renderable>(out: &mut String, envelope: &Envelope<'_, R>) -> std::fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html>")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">")?;
    writeln!(out, "<title>Just Another Blogsite</title>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;

    if let Some(paging) = &envelope.paging {
        for (name, value) in paging {
            writeln!(out, "<h3>{name} : {value}</h3>")?;
        }
        writeln!(out, "<br>")?;
    }

    for item in &envelope.items {
        writeln!(out, "<div>")?;
        for field in item.fields() {
            writeln!(out, "<p>{} : {}</p>", field.name, escape_markup(&field.value))?;
        }
        writeln!(out, "</div>")?;
        writeln!(out, "<br>")?;
    }

    writeln!(out, "<h3>succeeded : {}</h3>", envelope.succeeded)?;
    writeln!(out, "<h3>errors : {}</h3>", escape_markup(&envelope.errors))?;
    writeln!(out, "<h3>message : {}</h3>", escape_markup(envelope.message))?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}
