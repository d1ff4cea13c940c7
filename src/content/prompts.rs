//! Prompts sent to the provider.

use crate::models::ContentRequest;
use itertools::Itertools;

pub fn article(req: &ContentRequest) -> String {
    format!(
        r#"Write a comprehensive, SEO-optimized blog article about "{keyword}".

Include these related keywords naturally: {related}

Requirements:
- Start with YAML frontmatter (title, date, keywords, author, description)
- Compelling title
- Hook the reader in introduction
- Cover key trends and insights
- Explain why this matters
- Provide practical advice
- Include best practices
- Strong conclusion
- 800-1200 words
- Use markdown with headers, lists, bold text

Output only the markdown document with frontmatter."#,
        keyword = req.keyword,
        related = req.related(8).iter().join(", "),
    )
}

pub fn landing_page(req: &ContentRequest) -> String {
    format!(
        r#"Create a modern, responsive HTML landing page for "{keyword}".

Include: {related}

Requirements:
- HTML5 with SEO meta tags
- Hero section with gradient and CTA button
- Features section (3 benefits)
- Trending topics as tags
- Modern CSS (gradients, animations, responsive)
- Mobile-first design
- Smooth scroll and hover effects
- Footer

Use inline CSS. Make it visually appealing.
Output only HTML, no explanations."#,
        keyword = req.keyword,
        related = req.related(5).iter().join(", "),
    )
}
