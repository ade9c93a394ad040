use crate::config::SiteSettings;
use crate::models::PostRecord;
use super::{escape_html, excerpt, format_body, DESCRIPTION_CHARS};

const PAGE_STYLE: &str = r#"
        :root {
            --bg: #f8f9fa;
            --surface: #ffffff;
            --text: #333333;
            --heading: #1a1a1a;
            --muted: #6c757d;
            --accent: #007bff;
            --accent-dark: #0056b3;
            --border: #e9ecef;
        }
        @media (prefers-color-scheme: dark) {
            :root {
                --bg: #1a1a1a;
                --surface: #2d3748;
                --text: #e9ecef;
                --heading: #f8f9fa;
                --muted: #a0aec0;
                --accent: #4dabf7;
                --accent-dark: #1c7ed6;
                --border: #4a5568;
            }
        }
        body {
            font-family: 'Malgun Gothic', AppleSDGothicNeo, 'Apple SD Gothic Neo', sans-serif;
            line-height: 1.7;
            margin: 0;
            padding: 20px;
            background-color: var(--bg);
            color: var(--text);
        }
        .container {
            max-width: 800px;
            margin: 0 auto;
            background: var(--surface);
            padding: 40px;
            border-radius: 12px;
            box-shadow: 0 4px 20px rgba(0, 0, 0, 0.08);
        }
        .post-header {
            border-bottom: 3px solid var(--accent);
            padding-bottom: 25px;
            margin-bottom: 35px;
        }
        .post-title {
            font-size: 2.4em;
            font-weight: 700;
            color: var(--heading);
            margin-bottom: 15px;
            line-height: 1.3;
            word-break: keep-all;
        }
        .post-meta {
            color: var(--muted);
            font-size: 0.95em;
            display: flex;
            align-items: center;
            flex-wrap: wrap;
            gap: 15px;
        }
        .post-meta span {
            background: var(--bg);
            padding: 5px 12px;
            border-radius: 20px;
            font-size: 0.9em;
        }
        .post-meta a {
            color: var(--accent);
            text-decoration: none;
        }
        .main-image {
            width: 100%;
            height: auto;
            border-radius: 8px;
            margin: 25px 0;
        }
        .post-content {
            font-size: 1.15em;
            line-height: 1.8;
            margin-bottom: 30px;
        }
        .post-content p {
            margin-bottom: 1.8em;
            word-break: keep-all;
        }
        .post-content h3 {
            color: var(--accent);
            font-size: 1.4em;
            margin: 30px 0 15px 0;
            padding-bottom: 8px;
            border-bottom: 2px solid var(--border);
        }
        .post-content .empty {
            color: var(--muted);
            font-style: italic;
        }
        .source-link {
            margin-top: 40px;
            padding: 25px;
            background: linear-gradient(135deg, var(--accent), var(--accent-dark));
            border-radius: 8px;
            text-align: center;
        }
        .source-link a {
            color: #ffffff;
            text-decoration: none;
            font-weight: bold;
            display: inline-block;
            padding: 10px 25px;
            background: rgba(255, 255, 255, 0.2);
            border-radius: 25px;
        }
        .back-link {
            display: inline-block;
            margin-bottom: 20px;
            color: var(--muted);
            text-decoration: none;
        }
        @media (max-width: 768px) {
            body { padding: 15px; }
            .container { padding: 25px; }
            .post-title { font-size: 2em; }
            .post-content { font-size: 1.1em; }
            .post-meta {
                flex-direction: column;
                align-items: flex-start;
                gap: 8px;
            }
        }
"#;

const PAGE_SCRIPT: &str = r##"
        document.querySelectorAll('a[href^="http"]').forEach(function (link) {
            if (!link.href.includes(window.location.hostname)) {
                link.target = '_blank';
                link.rel = 'noopener noreferrer';
            }
        });

        if ('IntersectionObserver' in window) {
            var imageObserver = new IntersectionObserver(function (entries) {
                entries.forEach(function (entry) {
                    if (entry.isIntersecting && entry.target.dataset.src) {
                        entry.target.src = entry.target.dataset.src;
                        imageObserver.unobserve(entry.target);
                    }
                });
            });
            document.querySelectorAll('img[data-src]').forEach(function (img) {
                imageObserver.observe(img);
            });
        }

        document.querySelectorAll('a[href^="#"]').forEach(function (anchor) {
            anchor.addEventListener('click', function (e) {
                var target = document.querySelector(this.getAttribute('href'));
                if (target) {
                    e.preventDefault();
                    target.scrollIntoView({ behavior: 'smooth', block: 'start' });
                }
            });
        });
"##;

pub fn description(post: &PostRecord) -> String {
    if post.body.trim().is_empty() {
        post.title.clone()
    } else {
        excerpt(&post.body, DESCRIPTION_CHARS)
    }
}

pub fn render_page(post: &PostRecord, site: &SiteSettings) -> String {
    let title = escape_html(&post.title);
    let url = escape_html(&post.url);
    let description = escape_html(&description(post));
    let site_title = escape_html(&site.title);

    let mut extra_meta = String::new();
    if let Some(image) = &post.image {
        extra_meta.push_str(&format!(
            "\n    <meta property=\"og:image\" content=\"{}\">",
            escape_html(image)
        ));
    }
    if let Some(parsed) = post.date.as_ref().and_then(|d| d.parsed) {
        extra_meta.push_str(&format!(
            "\n    <meta property=\"article:published_time\" content=\"{}\">",
            parsed.format("%Y-%m-%d")
        ));
    }
    if let Some(lastmod) = &post.lastmod {
        extra_meta.push_str(&format!(
            "\n    <meta property=\"article:modified_time\" content=\"{}\">",
            escape_html(lastmod)
        ));
    }
    if let Some(author) = &site.author {
        extra_meta.push_str(&format!(
            "\n    <meta name=\"author\" content=\"{}\">",
            escape_html(author)
        ));
    }

    let mut meta_items = Vec::new();
    if let Some(date) = &post.date {
        meta_items.push(match date.parsed {
            Some(parsed) => format!(
                "<span class=\"post-date\"><time datetime=\"{}\">{}</time></span>",
                parsed.format("%Y-%m-%d"),
                escape_html(&date.raw)
            ),
            None => format!("<span class=\"post-date\">{}</span>", escape_html(&date.raw)),
        });
    }
    if let Some(author) = &site.author {
        meta_items.push(format!("<span class=\"post-author\">{}</span>", escape_html(author)));
    }
    meta_items.push(format!(
        "<span class=\"post-source\"><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Original post</a></span>",
        url
    ));

    let image = post
        .image
        .as_ref()
        .map(|image| {
            format!(
                "\n        <img src=\"{}\" alt=\"{}\" class=\"main-image\" loading=\"lazy\">\n",
                escape_html(image),
                title
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="color-scheme" content="light dark">
    <meta name="description" content="{description}">
    <meta name="keywords" content="{site_title}, {title}">
    <meta property="og:title" content="{title}">
    <meta property="og:description" content="{description}">
    <meta property="og:type" content="article">
    <meta property="og:url" content="{url}">
    <meta property="og:site_name" content="{site_title}">{extra_meta}
    <link rel="canonical" href="{url}">
    <title>{title} | {site_title}</title>
    <style>{style}</style>
</head>
<body>
    <div class="container">
        <a class="back-link" href="index.html">&larr; {site_title}</a>
        <div class="post-header">
            <h1 class="post-title">{title}</h1>
            <div class="post-meta">
                {meta}
            </div>
        </div>
{image}
        <div class="post-content">
{content}
        </div>

        <div class="source-link">
            <a href="{url}" target="_blank" rel="noopener noreferrer">Read the full post on the original blog</a>
        </div>
    </div>
    <script>{script}</script>
</body>
</html>
"#,
        lang = escape_html(&site.lang),
        description = description,
        site_title = site_title,
        title = title,
        url = url,
        extra_meta = extra_meta,
        style = PAGE_STYLE,
        meta = meta_items.join("\n                "),
        image = image,
        content = format_body(&post.body),
        script = PAGE_SCRIPT,
    )
}
