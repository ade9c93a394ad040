use crate::config::SiteSettings;
use crate::models::PostRecord;
use super::{escape_html, excerpt};

const CARD_EXCERPT_CHARS: usize = 120;

const INDEX_STYLE: &str = r#"
        :root {
            --bg: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            --surface: #ffffff;
            --card: #f8f9fa;
            --text: #333333;
            --muted: #6c757d;
            --accent: #667eea;
            --border: #e9ecef;
        }
        @media (prefers-color-scheme: dark) {
            :root {
                --bg: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%);
                --surface: #2d3748;
                --card: #1a202c;
                --text: #e9ecef;
                --muted: #a0aec0;
                --accent: #90cdf4;
                --border: #4a5568;
            }
        }
        body {
            font-family: 'Malgun Gothic', AppleSDGothicNeo, sans-serif;
            line-height: 1.6;
            margin: 0;
            padding: 20px;
            background: var(--bg);
            color: var(--text);
            min-height: 100vh;
        }
        .container {
            max-width: 1200px;
            margin: 0 auto;
            background: var(--surface);
            padding: 40px;
            border-radius: 15px;
            box-shadow: 0 10px 30px rgba(0, 0, 0, 0.2);
        }
        .header {
            text-align: center;
            border-bottom: 3px solid var(--accent);
            padding-bottom: 30px;
            margin-bottom: 40px;
        }
        .header h1 {
            font-size: 2.5em;
            margin-bottom: 10px;
        }
        .stats {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 25px;
            margin-bottom: 40px;
        }
        .stat-box {
            text-align: center;
            padding: 25px;
            background: linear-gradient(135deg, #f093fb 0%, #f5576c 100%);
            color: #ffffff;
            border-radius: 12px;
        }
        .stat-box h3 { margin: 0 0 10px 0; font-size: 1.2em; }
        .stat-box p { margin: 0; font-size: 2em; font-weight: bold; }
        .post-list {
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(320px, 1fr));
            gap: 20px;
        }
        .post-card {
            border: 2px solid var(--border);
            border-radius: 12px;
            background: var(--card);
            overflow: hidden;
            transition: transform 0.3s ease, border-color 0.3s ease;
        }
        .post-card:hover {
            border-color: var(--accent);
            transform: translateY(-5px);
        }
        .post-card a {
            color: inherit;
            text-decoration: none;
            display: block;
        }
        .post-card img {
            width: 100%;
            height: 180px;
            object-fit: cover;
        }
        .post-card .card-body { padding: 20px; }
        .post-card h2 { font-size: 1.15em; margin: 0 0 10px 0; word-break: keep-all; }
        .post-card p { color: var(--muted); margin: 0 0 10px 0; }
        .post-card time, .post-card .card-date { color: var(--muted); font-size: 0.85em; }
        .empty { text-align: center; color: var(--muted); }
        @media (max-width: 768px) {
            body { padding: 15px; }
            .container { padding: 25px; }
            .header h1 { font-size: 2em; }
        }
"#;

fn render_card(post: &PostRecord) -> String {
    let title = escape_html(&post.title);
    let mut card = format!(
        "            <article class=\"post-card\">\n                <a href=\"{}\">\n",
        escape_html(&post.filename)
    );
    if let Some(image) = &post.image {
        card.push_str(&format!(
            "                    <img src=\"{}\" alt=\"{}\" loading=\"lazy\">\n",
            escape_html(image),
            title
        ));
    }
    card.push_str("                    <div class=\"card-body\">\n");
    card.push_str(&format!("                        <h2>{}</h2>\n", title));
    let summary = excerpt(&post.body, CARD_EXCERPT_CHARS);
    if !summary.is_empty() {
        card.push_str(&format!("                        <p>{}</p>\n", escape_html(&summary)));
    }
    if let Some(date) = &post.date {
        card.push_str(&match date.parsed {
            Some(parsed) => format!(
                "                        <time datetime=\"{}\">{}</time>\n",
                parsed.format("%Y-%m-%d"),
                escape_html(&date.raw)
            ),
            None => format!(
                "                        <span class=\"card-date\">{}</span>\n",
                escape_html(&date.raw)
            ),
        });
    }
    card.push_str("                    </div>\n                </a>\n            </article>\n");
    card
}

pub fn render_index(posts: &[PostRecord], skipped: usize, site: &SiteSettings) -> String {
    let site_title = escape_html(&site.title);
    let cards = if posts.is_empty() {
        "            <p class=\"empty\">No posts yet.</p>\n".to_string()
    } else {
        posts.iter().map(render_card).collect::<String>()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="color-scheme" content="light dark">
    <meta name="description" content="{site_title}: {count} posts">
    <meta property="og:title" content="{site_title}">
    <meta property="og:type" content="website">
    <title>{site_title}</title>
    <style>{style}</style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>{site_title}</h1>
            <p>Archived copies of every post listed in the blog sitemap.</p>
        </div>

        <div class="stats">
            <div class="stat-box">
                <h3>Published</h3>
                <p>{count}</p>
            </div>
            <div class="stat-box">
                <h3>Skipped</h3>
                <p>{skipped}</p>
            </div>
        </div>

        <div class="post-list">
{cards}        </div>
    </div>
</body>
</html>
"#,
        lang = escape_html(&site.lang),
        site_title = site_title,
        count = posts.len(),
        skipped = skipped,
        style = INDEX_STYLE,
        cards = cards,
    )
}
