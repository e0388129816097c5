// src/pages.rs
//
// 浏览页面的 HTML 渲染。所有插入的文本都要转义，链接中的路径段要做 URL 编码。

use crate::models::EntryHeader;
use std::fmt::Write;
use urlencoding::encode;

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(heading: &str, rows: &str) -> String {
    format!(
        "<html>\n<head>\n</head>\n<body>\n{heading}log available:\n<br>\n<table>\n{rows}</table>\n</body>\n</html>\n"
    )
}

/// 首页：所有项目
pub fn index(projects: &[String]) -> String {
    let mut rows = String::new();
    for project in projects {
        let _ = writeln!(
            rows,
            "<tr><td>&nbsp;</td><td><a href=\"/log/{}/\">{}</a></td></tr>",
            encode(project),
            escape_html(project)
        );
    }
    page("", &rows)
}

/// 项目页：项目下的所有主题
pub fn project(project: &str, subjects: &[String]) -> String {
    let mut rows = String::new();
    for subject in subjects {
        let _ = writeln!(
            rows,
            "<tr><td>&nbsp;</td><td><a href=\"/log/{}/{}/\">{}</a></td></tr>",
            encode(project),
            encode(subject),
            escape_html(subject)
        );
    }
    page(&format!("project: {}\n<br>\n<br>\n", escape_html(project)), &rows)
}

/// 主题页：日志头列表
pub fn subject(project: &str, subject: &str, headers: &[EntryHeader]) -> String {
    let mut rows = String::new();
    for header in headers {
        let _ = writeln!(
            rows,
            "<tr><td>&nbsp;</td><td><a href=\"/log/{}/{}/{}\">{}</a></td><td>{}</td></tr>",
            encode(project),
            encode(subject),
            header.id,
            header.id,
            escape_html(&header.date())
        );
    }
    page(
        &format!(
            "project: {}\n<br>\nsubject: {}\n<br>\n<br>\n",
            escape_html(project),
            escape_html(subject)
        ),
        &rows,
    )
}
