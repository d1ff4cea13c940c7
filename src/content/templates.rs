//! Deterministic article and landing-page templates.
//!
//! Output depends only on the request and the date passed in. Keywords are
//! title-cased in headings and left raw in machine-readable fields (front
//! matter, meta tags).

use crate::models::ContentRequest;
use crate::utils::title_case;
use chrono::{Datelike, NaiveDate};
use html_escape::encode_double_quoted_attribute as escape;
use itertools::Itertools;
use serde::Serialize;
use std::fmt::Write;

const LANDING_STYLE: &str = include_str!("landing.css");
const AUTHOR: &str = "AI Content Generator";

#[derive(Debug, Serialize)]
struct FrontMatter<'a> {
    title: String,
    date: &'a str,
    keywords: Vec<&'a str>,
    author: &'a str,
    description: String,
}

/// Render the YAML front matter block, `---` delimiters included.
fn front_matter(req: &ContentRequest, date: &str) -> String {
    let fm = FrontMatter {
        title: format!("The Ultimate Guide to {}", title_case(&req.keyword)),
        date,
        keywords: std::iter::once(req.keyword.as_str())
            .chain(req.related(5).iter().map(String::as_str))
            .collect(),
        author: AUTHOR,
        description: format!("Comprehensive guide about {}", req.keyword),
    };
    let yaml = serde_yaml::to_string(&fm).expect("front matter of plain strings serializes");
    format!("---\n{yaml}---\n")
}

/// Markdown article with front matter.
pub fn article(req: &ContentRequest, today: NaiveDate) -> String {
    let date = today.format("%B %-d, %Y").to_string();
    let heading = title_case(&req.keyword);
    let mut md = front_matter(req, &date);

    writeln!(md, "\n# The Ultimate Guide to {heading}\n").unwrap();
    writeln!(md, "*Last updated: {date}*\n").unwrap();

    writeln!(md, "## Introduction\n").unwrap();
    writeln!(
        md,
        "Understanding **{}** has become essential in today's digital landscape. This guide covers everything you need to know.\n",
        req.keyword
    )
    .unwrap();

    writeln!(md, "## Key Trends\n").unwrap();
    writeln!(
        md,
        "Based on latest data, important trends related to {}:\n",
        req.keyword
    )
    .unwrap();
    for (i, kw) in req.related(5).iter().enumerate() {
        writeln!(md, "{}. **{}**", i + 1, title_case(kw)).unwrap();
    }

    md.push_str(
        "\n## Why It Matters\n\n\
         - Drives innovation and growth\n\
         - Provides competitive advantages\n\
         - Enables better decision-making\n\
         - Shapes the future\n\n\
         ## Getting Started\n\n\
         1. **Research**: Understand fundamentals\n\
         2. **Plan**: Define goals\n\
         3. **Implement**: Take action\n\
         4. **Optimize**: Improve continuously\n\n\
         ## Best Practices\n",
    );
    for kw in req.related(3) {
        writeln!(md, "\n### {}\n", title_case(kw)).unwrap();
        writeln!(md, "Follow industry best practices for {kw}.").unwrap();
    }

    writeln!(md, "\n## Conclusion\n").unwrap();
    writeln!(md, "{heading} continues evolving. Stay informed to succeed.\n").unwrap();
    md.push_str("---\n\n*Generated with AI-powered trend analysis*\n");
    md
}

/// Standalone HTML landing page with inline styles.
///
/// Every keyword is entity-escaped, so quotes and angle brackets cannot break
/// out of attributes or inject markup.
pub fn landing_page(req: &ContentRequest, today: NaiveDate) -> String {
    let keyword = escape(&req.keyword);
    let heading = escape(&title_case(&req.keyword)).into_owned();
    let all = &req.related_keywords;

    let features = req
        .related(3)
        .iter()
        .map(|kw| {
            format!(
                "        <div class=\"feature\">\n            <h3>{}</h3>\n            <p>Discover insights about {}. Stay ahead with the latest trends.</p>\n        </div>",
                escape(&title_case(kw)),
                escape(kw)
            )
        })
        .join("\n");
    let tags = all
        .iter()
        .map(|kw| format!("            <span class=\"trend-tag\">{}</span>", escape(kw)))
        .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="description" content="{keyword}: {description}">
    <meta name="keywords" content="{keyword}, {meta_keywords}">
    <title>{heading} - Complete Guide</title>
    <style>
{LANDING_STYLE}    </style>
</head>
<body>
    <section class="hero">
        <h1>{heading}</h1>
        <p>Everything about {keyword}</p>
        <button class="cta-button" onclick="document.getElementById('features').scrollIntoView({{behavior:'smooth'}})">Learn More</button>
    </section>

    <section class="features" id="features">
{features}
    </section>

    <section class="trending">
        <h2>Trending Topics</h2>
        <div class="trending-grid">
{tags}
        </div>
    </section>

    <footer>
        <p>&copy; {year} {heading} Guide. AI-powered trend analysis.</p>
    </footer>
</body>
</html>"#,
        description = req.related(3).iter().map(|kw| escape(kw)).join(", "),
        meta_keywords = all.iter().map(|kw| escape(kw)).join(", "),
        year = today.year(),
    )
}
