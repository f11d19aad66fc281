//! HTML templates using Askama.

use askama::Template;
use chrono::NaiveDate;

use crate::domain::simulator::TradeEvent;
use crate::ports::catalog_port::Instrument;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate<'a> {
    pub instruments: &'a [Instrument],
    pub default_start: &'a str,
}

impl DashboardTemplate<'_> {
    pub fn fragment(&self) -> String {
        let mut html = String::from("<div id=\"content\"><h1>MACD Evaluator</h1>");
        html.push_str("<form hx-post=\"/evaluate\" hx-target=\"#report\">");
        html.push_str("<label>Instrument <select name=\"code\">");
        for instrument in self.instruments {
            html.push_str(&format!(
                "<option value=\"{}\">{}</option>",
                instrument.code, instrument.name
            ));
        }
        html.push_str("</select></label>");
        html.push_str(&format!(
            "<label>Start date <input type=\"date\" name=\"start_date\" value=\"{}\"></label>",
            self.default_start
        ));
        html.push_str("<button type=\"submit\">Evaluate</button>");
        html.push_str("</form>");
        html.push_str("<div id=\"report\"></div>");
        html.push_str("</div>");
        html
    }
}

#[derive(Template)]
#[template(path = "report.html")]
pub struct ReportTemplate<'a> {
    pub code: &'a str,
    pub start_date: NaiveDate,
    pub svg: &'a str,
    pub buys: &'a [TradeEvent],
    pub sells: &'a [TradeEvent],
    pub total_gain: f64,
    pub final_cash: f64,
    pub shares_held: u64,
    pub actions: &'a [String],
}

impl ReportTemplate<'_> {
    pub fn fragment(&self) -> String {
        let mut html = String::from("<div id=\"report-content\">");
        html.push_str(&format!(
            "<h2>{} from {}</h2>",
            self.code, self.start_date
        ));
        html.push_str(&format!("<div class=\"chart\">{}</div>", self.svg));

        html.push_str("<h3>Summary</h3><table>");
        html.push_str(&format!(
            "<tr><td>Buys</td><td>{}</td></tr>",
            self.buys.len()
        ));
        html.push_str(&format!(
            "<tr><td>Sells</td><td>{}</td></tr>",
            self.sells.len()
        ));
        html.push_str(&format!(
            "<tr><td>Final cash</td><td>{:.2}</td></tr>",
            self.final_cash
        ));
        html.push_str(&format!(
            "<tr><td>Shares held</td><td>{}</td></tr>",
            self.shares_held
        ));
        html.push_str(&format!(
            "<tr><td>Total gain</td><td>{:.2}</td></tr>",
            self.total_gain
        ));
        html.push_str("</table>");

        if !self.actions.is_empty() {
            html.push_str("<h3>Actions</h3><ul>");
            for action in self.actions {
                html.push_str(&format!("<li>{action}</li>"));
            }
            html.push_str("</ul>");
        }

        html.push_str("</div>");
        html
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}

impl ErrorTemplate<'_> {
    pub fn fragment(&self) -> String {
        format!(
            "<div id=\"error\" class=\"error\"><h1>Error {}</h1><p>{}</p></div>",
            self.status, self.message
        )
    }
}
