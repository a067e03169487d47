//! HTML rendering
//!
//! Pages follow the layout of the classic lcov `genhtml` output so existing
//! stylesheets keep working: a header table, a `<pre class="source">` body
//! with a 12-column gutter, and an index table with coverage bars.

use super::FileReport;
use crate::annotate::{AnnotatedLine, CoverageTotals, FileAnnotation, Gutter, PerMille};
use std::fmt::Write;

/// File name of the shared stylesheet
pub const STYLESHEET_NAME: &str = "linecov.css";

/// Width of the gutter in characters
const GUTTER_WIDTH: usize = 12;

/// Append `s` to `out` with HTML metacharacters escaped.
///
/// Line terminators become spaces so a fragment never breaks the `<pre>`
/// layout.
pub fn write_escaped(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\r' | '\n' => out.push(' '),
            _ => out.push(c),
        }
    }
}

/// Escape `s` for HTML
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    write_escaped(&mut out, s);
    out
}

/// Wrap the final path component in `<span class="filename">`
#[must_use]
pub fn highlight_filename(name: &str) -> String {
    let split = name.rfind('/').map_or(0, |pos| pos + 1);
    let (dir, file) = name.split_at(split);
    format!(
        "{}<span class=\"filename\">{}</span>",
        escape_html(dir),
        escape_html(file)
    )
}

/// Data shown in the header of every page
#[derive(Debug, Clone, Copy)]
pub struct PageHeader<'a> {
    /// Instrumented binary, shown as the command
    pub command: &'a str,
    /// Profile timestamp
    pub timestamp: &'a str,
    /// Pretty file name, `None` on the index
    pub file: Option<&'a str>,
    /// Totals shown in the header
    pub totals: CoverageTotals,
    /// Show the search box
    pub search: bool,
}

fn write_header(out: &mut String, header: &PageHeader<'_>) {
    let percentage = header.totals.percentage();
    out.push_str(
        "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01 Transitional//EN\">\n\
         <html>\n<head>\n<title>Coverage - ",
    );
    write_escaped(out, header.command);
    if let Some(file) = header.file {
        out.push_str(" - ");
        write_escaped(out, file);
    }
    let _ = write!(
        out,
        "</title>\n\
         <link rel=\"stylesheet\" type=\"text/css\" href=\"{STYLESHEET_NAME}\"/>\n\
         </head>\n<body>\n\
         <table width=\"100%\" border=\"0\" cellspacing=\"0\" cellpadding=\"0\">\n\
         <tr><td class=\"title\">Coverage Report</td></tr>\n\
         <tr><td class=\"ruler\"></td></tr>\n\
         <tr>\n<td width=\"100%\">\n\
         <table cellpadding=\"1\" border=\"0\" width=\"100%\">\n\
         <tr>\n\
         <td class=\"headerItem\" width=\"20%\">Command:</td>\n\
         <td class=\"headerValue\" width=\"80%\" colspan=6>"
    );
    write_escaped(out, header.command);
    out.push_str(
        "</td>\n</tr>\n<tr>\n\
         <td class=\"headerItem\" width=\"20%\">Date:</td>\n\
         <td class=\"headerValue\" width=\"15%\">",
    );
    write_escaped(out, header.timestamp);
    let _ = write!(
        out,
        "</td>\n\
         <td width=\"5%\"></td>\n\
         <td class=\"headerItem\" width=\"20%\">Instrumented&nbsp;lines:</td>\n\
         <td class=\"headerValue\" width=\"10%\">{executable}</td>\n\
         </tr>\n<tr>\n\
         <td class=\"headerItem\" width=\"20%\">Code&nbsp;covered:</td>\n\
         <td class=\"headerValue\" width=\"15%\">{percentage} %</td>\n\
         <td width=\"5%\"></td>\n\
         <td class=\"headerItem\" width=\"20%\">Executed&nbsp;lines:</td>\n\
         <td class=\"headerValue\" width=\"10%\">{hit}</td>\n\
         </tr>\n",
        executable = header.totals.executable_lines,
        hit = header.totals.hit_lines,
    );
    if header.search {
        out.push_str(
            "<tr><td class=\"headerItem\" width=\"20%\">Search:</td>\
             <td width=\"80%\"><input type=\"text\" id=\"search\" value=\"\" /></td></tr>\n",
        );
    }
    out.push_str(
        "</table>\n</td>\n</tr>\n\
         <tr><td class=\"ruler\"></td></tr>\n\
         </table>\n",
    );
}

const SEARCH_SCRIPT: &str = r#"<script>
   const mainTable = document.getElementById("main");
   const files = {};
   for (const el of mainTable.getElementsByClassName("coverFile")) {
       const name = el.innerText.replace(/^\[\.\.\.\]\//, "").toLowerCase();
       files[name] = el.parentNode;
   }

   const search = (needle) => {
       const words = needle.toLowerCase().split(" ");
       for (const key in files) {
           const found = words.every((word) => key.includes(word));
           files[key].style.display = found ? "table-row" : "none";
       }
   };

   document.getElementById("search").addEventListener("input", (e) => {
       search(e.target.value);
   });
</script>
"#;

fn write_footer(out: &mut String, search: bool) {
    out.push_str(
        "<table width=\"100%\" border=\"0\" cellspacing=\"0\" cellpadding=\"0\">\n\
         <tr><td class=\"ruler\"></td></tr>\n\
         <tr><td class=\"versionInfo\">Generated by: linecov</td></tr>\n\
         </table>\n<br/>\n",
    );
    if search {
        out.push_str(SEARCH_SCRIPT);
    }
    out.push_str("</body>\n</html>\n");
}

/// Append one source line: gutter, separator and coloured fragments
pub fn write_line(out: &mut String, line: &AnnotatedLine) {
    let gutter = line.classification.gutter();
    let text = gutter.to_string();
    match gutter {
        Gutter::Blank => out.push_str(&" ".repeat(GUTTER_WIDTH)),
        Gutter::Count(_) => {
            let _ = write!(out, "<span class=\"lineNum\">{text:>GUTTER_WIDTH$}</span>");
        }
        Gutter::Partial { .. } => {
            let _ = write!(out, "<span class=\"linePartCov\">{text:>GUTTER_WIDTH$}</span>");
        }
        Gutter::Uncovered { .. } => {
            let _ = write!(out, "<span class=\"lineNoCov\">{text:>GUTTER_WIDTH$}</span>");
        }
    }
    out.push_str(" : ");
    for segment in &line.segments {
        match segment.class.css_class() {
            Some(class) => {
                let _ = write!(out, "<span class=\"{class}\">");
                write_escaped(out, &segment.text);
                out.push_str("</span>");
            }
            None => write_escaped(out, &segment.text),
        }
    }
    out.push('\n');
}

/// Render the page of one annotated file
#[must_use]
pub fn file_page(header: &PageHeader<'_>, annotation: &FileAnnotation) -> String {
    let mut out = String::new();
    write_header(&mut out, header);
    out.push_str("<pre class=\"source\">\n");
    for line in &annotation.lines {
        write_line(&mut out, line);
    }
    out.push_str("</pre>\n");
    write_footer(&mut out, header.search);
    out
}

/// `Hi`, `Med` or `Lo` for the coverage table cells
#[must_use]
pub fn quality_class(percentage: PerMille) -> &'static str {
    match percentage.value() {
        750.. => "Hi",
        350..=749 => "Med",
        _ => "Lo",
    }
}

/// A 100px bar showing `percentage`
#[must_use]
pub fn coverage_bar(percentage: PerMille) -> String {
    let color = match percentage.value() {
        750.. => "var(--highcov)",
        350..=749 => "var(--medcov)",
        _ => "var(--lowcov)",
    };
    let width = (percentage.value() + 5) / 10;
    match width {
        0 => "<div style=\"background-color:white;width:100px;height:10px\"></div>".to_string(),
        100.. => format!("<div style=\"background-color:{color};width:100px;height:10px\"></div>"),
        _ => format!(
            "<div style=\"display:inline-block;background-color:{color};width:{width}px;height:10px\"></div>\
             <div style=\"display:inline-block;background-color:white;width:{rest}px;height:10px\"></div>",
            rest = 100 - width
        ),
    }
}

/// Render the index page; `files` are listed in the given order
#[must_use]
pub fn index_page(header: &PageHeader<'_>, files: &[FileReport]) -> String {
    let mut out = String::new();
    write_header(&mut out, header);
    out.push_str(
        "<center>\n\
         <table id=\"main\" width=\"80%\" cellpadding=\"2\" cellspacing=\"1\" border=\"0\">\n\
         <tr>\n\
         <td width=\"50%\"><br/></td>\n\
         <td width=\"15%\"></td>\n\
         <td width=\"15%\"></td>\n\
         <td width=\"20%\"></td>\n\
         </tr>\n\
         <tr>\n\
         <td class=\"tableHead\">File</td>\n\
         <td class=\"tableHead\" colspan=\"3\">Coverage</td>\n\
         </tr>\n",
    );
    for file in files {
        let percentage = file.percentage;
        let quality = quality_class(percentage);
        let _ = write!(
            out,
            "<tr>\n\
             <td class=\"coverFile\"><a href=\"{page}\">{name}</a></td>\n\
             <td class=\"coverBar\" align=\"center\">\n\
             <table border=\"0\" cellspacing=\"0\" cellpadding=\"1\"><tr><td class=\"coverBarOutline\">{bar}</td></tr></table>\n\
             </td>\n\
             <td class=\"coverPer cover{quality}\">{percentage}&nbsp;%</td>\n\
             <td class=\"cover{quality}\">{hit}&nbsp;/&nbsp;{executable}&nbsp;lines</td>\n\
             </tr>\n",
            page = escape_html(&file.page),
            name = highlight_filename(&file.pretty_name),
            bar = coverage_bar(percentage),
            hit = file.totals.hit_lines,
            executable = file.totals.executable_lines,
        );
    }
    out.push_str("</table>\n</center>\n<br/>\n");
    write_footer(&mut out, header.search);
    out
}

/// Stylesheet shared by all pages; compatible with lcov styles
pub const STYLESHEET: &str = "\
/* Based upon the lcov CSS style, style files can be reused */
:root {--lowcov: #cc3232;--medcov: #e7b416;--highcov: #99c140;}
body { color: #000000; background-color: #FFFFFF; }
a:link { color: #284FA8; text-decoration: underline; }
a:visited { color: #00CB40; text-decoration: underline; }
a:active { color: #FF0040; text-decoration: underline; }
td.title { text-align: center; padding-bottom: 10px; font-size: 20pt; font-weight: bold; }
td.ruler { background-color: #6688D4; height: 3px; }
td.headerItem { text-align: right; padding-right: 6px; font-family: sans-serif; font-weight: bold; }
td.headerValue { text-align: left; color: #284FA8; font-family: sans-serif; font-weight: bold; }
td.versionInfo { text-align: center; padding-top:  2px; }
pre.source { font-family: monospace; white-space: pre; }
span.lineNum { background-color: #EFE383; }
span.lineCov { background-color: #CAD7FE; }
span.linePartCov { background-color: #FFEA20; }
span.lineNoCov { background-color: #FF6230; }
td.tableHead { text-align: center; color: #FFFFFF; background-color: #6688D4; font-family: sans-serif; font-size: 120%; font-weight: bold; }
td.coverFile { text-align: left; padding-left: 10px; padding-right: 20px; color: #284FA8; background-color: #DAE7FE; font-family: monospace; }
td.coverBar { padding-left: 10px; padding-right: 10px; background-color: #DAE7FE; }
td.coverBarOutline { background-color: #000000; }
td.coverPer { font-weight: bold; }
td.coverHi { text-align: right; padding-left: 10px; padding-right: 10px; background-color: var(--highcov); }
td.coverMed { text-align: right; padding-left: 10px; padding-right: 10px; background-color: var(--medcov); }
td.coverLo { text-align: right; padding-left: 10px; padding-right: 10px; background-color: var(--lowcov); color: white; }
span.progBar { display: inline-block; height: 10px }
span.filename { font-weight: bold; }
";
