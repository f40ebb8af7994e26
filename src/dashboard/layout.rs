//! Page structure of the dashboard, rendered to HTML on the server.

use super::{INPUT_STOCK, OUTPUT_SALES, OUTPUT_STOCK, UPLOAD_DATA};

pub const PAGE_TITLE: &str = "Stock and Sales Visualization";

const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const SCRIPT_SRC: &str = "/assets/dashboard.js";

#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Div { id: Option<String>, children: Vec<Component> },
    H1(String),
    H4(String),
    /// Text box whose changes are dispatched to a callback.
    Input { id: String, value: String },
    /// Single-file picker; the file is sent as a data URI.
    Upload { id: String, label: String },
    /// Region replaced by a callback's output.
    Output { id: String },
}

impl Component {
    pub fn render(&self, out: &mut String) {
        match self {
            Component::Div { id, children } => {
                match id {
                    Some(id) => out.push_str(&format!("<div id=\"{}\">", escape_html(id))),
                    None => out.push_str("<div>"),
                }
                for child in children {
                    child.render(out);
                }
                out.push_str("</div>");
            }
            Component::H1(text) => out.push_str(&format!("<h1>{}</h1>", escape_html(text))),
            Component::H4(text) => out.push_str(&format!("<h4>{}</h4>", escape_html(text))),
            Component::Input { id, value } => out.push_str(&format!(
                "<input id=\"{}\" type=\"text\" value=\"{}\" data-dash-input=\"value\">",
                escape_html(id),
                escape_html(value)
            )),
            Component::Upload { id, label } => out.push_str(&format!(
                "<div id=\"{id}\" data-dash-upload=\"contents\">\
                 <input type=\"file\" accept=\".csv,text/csv\" hidden>\
                 <button type=\"button\">{label}</button></div>",
                id = escape_html(id),
                label = escape_html(label)
            )),
            Component::Output { id } => {
                out.push_str(&format!("<div id=\"{}\" data-dash-output></div>", escape_html(id)))
            }
        }
    }

    /// Ids of every component in the tree, depth first.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids<'a>(&'a self, ids: &mut Vec<&'a str>) {
        match self {
            Component::Div { id, children } => {
                if let Some(id) = id {
                    ids.push(id);
                }
                for child in children {
                    child.collect_ids(ids);
                }
            }
            Component::Input { id, .. } | Component::Upload { id, .. } | Component::Output { id } => {
                ids.push(id)
            }
            Component::H1(_) | Component::H4(_) => {}
        }
    }
}

pub fn dashboard_layout(default_ticker: &str) -> Component {
    Component::Div {
        id: None,
        children: vec![
            Component::H1("Stock and Sales Visualization Dashboard".into()),
            Component::H4("Please enter the stock name (e.g., AAPL, MSFT)".into()),
            Component::Input { id: INPUT_STOCK.into(), value: default_ticker.into() },
            Component::Output { id: OUTPUT_STOCK.into() },
            Component::H4("Upload a CSV file for Sales Visualization".into()),
            Component::Upload { id: UPLOAD_DATA.into(), label: "Upload File".into() },
            Component::Output { id: OUTPUT_SALES.into() },
        ],
    }
}

pub fn render_page(layout: &Component) -> String {
    let mut body = String::new();
    layout.render(&mut body);

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <script src=\"{plotly}\"></script>\n\
         </head>\n<body>\n{body}\n\
         <script src=\"{script}\"></script>\n</body>\n</html>\n",
        title = escape_html(PAGE_TITLE),
        plotly = PLOTLY_SRC,
        body = body,
        script = SCRIPT_SRC,
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
