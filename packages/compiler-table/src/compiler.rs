use blockshelf_dom::{escape_text, walk_element_mut, Element, Node, VisitorMut};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

/// MIME type of the clipboard payload
pub const TABLE_MIME_TYPE: &str = "text/html";

/// Header background when the theme leaves it unset
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ff8012";

/// Header foreground when the theme leaves it unset
pub const DEFAULT_FOREGROUND_COLOR: &str = "#ffffff";

/// Images wider than this are scaled down to it
pub const MAX_IMAGE_WIDTH: f64 = 200.0;

const ICON_CLASS_PREFIX: &str = "icon-";

/// Header colors, read from the `--sk-table-bg-color` and
/// `--sk-table-fg-color` style variables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_fg_color: Option<String>,
}

impl ThemeColors {
    pub fn background(&self) -> &str {
        non_empty(&self.table_bg_color).unwrap_or(DEFAULT_BACKGROUND_COLOR)
    }

    pub fn foreground(&self) -> &str {
        non_empty(&self.table_fg_color).unwrap_or(DEFAULT_FOREGROUND_COLOR)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Table markup ready for the clipboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedTable {
    pub html: String,
    pub mime_type: &'static str,
}

impl SerializedTable {
    pub fn as_bytes(&self) -> &[u8] {
        self.html.as_bytes()
    }
}

struct Context {
    buffer: String,
}

impl Context {
    fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn open_cell(&mut self, colspan: Option<usize>, style: Option<&str>) {
        self.add("<td");
        if let Some(cols) = colspan {
            self.add(&format!(" colspan=\"{}\"", cols));
        }
        if let Some(style) = style {
            self.add(&format!(" style=\"{}\"", style));
        }
        self.add(">");
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Serialize a block into the authoring table format.
///
/// The block's element children are rows and each row's element children
/// are cells. The input is not modified; image and icon rewriting happen on
/// a private copy. Output is a pure function of the block, name, source
/// and theme.
#[instrument(skip(block, source, theme), fields(tag = %block.tag))]
pub fn compile_to_table(
    block: &Element,
    name: &str,
    source: &Url,
    theme: &ThemeColors,
) -> SerializedTable {
    let mut block = block.clone();

    ImageRewriter::new(source).visit_element_mut(&mut block);
    replace_icons(&mut block);

    let max_cols = column_count(&block);
    debug!(rows = block.element_child_count(), max_cols, "Compiling block table");

    let mut ctx = Context::new();
    ctx.add("<table border=\"1\">");

    let header_style = format!(
        "background-color: {}; color: {};  height:23px;",
        theme.background(),
        theme.foreground()
    );
    ctx.add("<tr>");
    ctx.open_cell(Some(max_cols), Some(&header_style));
    ctx.add(&escape_text(name));
    ctx.add("</td></tr>");

    for row in block.element_children() {
        let cols = row.element_child_count();
        let colspan = if cols < max_cols { Some(max_cols) } else { None };

        ctx.add("<tr>");
        for col in row.element_children() {
            ctx.open_cell(colspan, None);
            ctx.add(&col.inner_html());
            ctx.add("</td>");
        }
        ctx.add("</tr>");
    }

    ctx.add("</table>");

    SerializedTable {
        html: ctx.get_output(),
        mime_type: TABLE_MIME_TYPE,
    }
}

/// Maximum number of cells across the block's rows
pub fn column_count(block: &Element) -> usize {
    block
        .element_children()
        .map(Element::element_child_count)
        .max()
        .unwrap_or(0)
}

/// Points images at the source origin and shrinks wide ones
struct ImageRewriter {
    origin: String,
}

impl ImageRewriter {
    fn new(source: &Url) -> Self {
        Self {
            origin: source.origin().ascii_serialization(),
        }
    }

    fn rewrite_src(&self, img: &mut Element) {
        let Some(src) = img.attr("src") else {
            return;
        };
        if src.contains("data:") {
            return;
        }

        let without_query = src.split(['?', '#']).next().unwrap_or_default();
        let media = without_query.rsplit('/').next().unwrap_or_default();
        let rewritten = format!("{}/{}", self.origin, media);
        img.set_attr("src", rewritten);
    }

    fn scale(&self, img: &mut Element) {
        let Some(width) = dimension(img, "width") else {
            return;
        };
        if width <= MAX_IMAGE_WIDTH {
            return;
        }

        img.set_attr("width", format!("{}", MAX_IMAGE_WIDTH as u64));
        if let Some(height) = dimension(img, "height") {
            let scaled = (height * MAX_IMAGE_WIDTH / width).trunc() as u64;
            img.set_attr("height", scaled.to_string());
        }
    }
}

impl VisitorMut for ImageRewriter {
    fn visit_element_mut(&mut self, element: &mut Element) {
        if element.is("img") {
            self.rewrite_src(element);
            self.scale(element);
        }
        walk_element_mut(self, element);
    }
}

fn dimension(img: &Element, name: &str) -> Option<f64> {
    img.attr(name)?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Name of an icon marker element, taken from its first `icon-` class
pub fn icon_name(element: &Element) -> Option<&str> {
    if !element.is("span") {
        return None;
    }
    element
        .class_list()
        .find_map(|class| class.strip_prefix(ICON_CLASS_PREFIX))
        .filter(|name| !name.is_empty())
}

fn replace_icons(element: &mut Element) {
    for child in &mut element.children {
        let token = child
            .as_element()
            .and_then(icon_name)
            .map(|name| format!(":{}:", name));

        match token {
            Some(token) => *child = Node::text(token),
            None => {
                if let Some(child_element) = child.as_element_mut() {
                    replace_icons(child_element);
                }
            }
        }
    }
}
