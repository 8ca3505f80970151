//! The nuspec package descriptor document.

use crate::package::NugetSpec;
use crate::render::xml_escape;

const NUSPEC_XMLNS: &str = "http://schemas.microsoft.com/packaging/2010/07/nuspec.xsd";

/// Render the `.nuspec` descriptor for a package spec. The ReSharper
/// extension feed requires the fixed `Wave` dependency entry.
pub fn render(spec: &NugetSpec) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str(&format!("<package xmlns=\"{NUSPEC_XMLNS}\">\n"));
    out.push_str("  <metadata>\n");
    element("id", &spec.id, &mut out);
    element("version", &spec.version, &mut out);
    element("title", &spec.title, &mut out);
    element("authors", &spec.authors, &mut out);
    element("owners", &spec.owners, &mut out);
    element("projectUrl", &spec.project_url, &mut out);
    element("iconUrl", &spec.icon_url, &mut out);
    element("description", &spec.description, &mut out);
    element("tags", &spec.tags, &mut out);
    out.push_str("    <dependencies>\n");
    out.push_str("      <dependency id=\"Wave\" version=\"[1.0,]\" />\n");
    out.push_str("    </dependencies>\n");
    out.push_str("  </metadata>\n");
    out.push_str("</package>\n");
    out
}

fn element(name: &str, value: &str, out: &mut String) {
    if value.is_empty() {
        out.push_str(&format!("    <{name} />\n"));
    } else {
        out.push_str(&format!("    <{name}>{}</{name}>\n", xml_escape(value)));
    }
}
