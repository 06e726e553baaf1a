//! HTML pages.
//!
//! Titles and ids are escaped. Article content is trusted markup from the
//! editor and is inserted verbatim.

use axum::response::Html;

use crate::state::{Article, ViewArticle};

/// Escape text for use inside HTML element content and quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn layout(title: &str, head_extra: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  {head_extra}
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
    ))
}

/// Create form. `id` is the server-generated id the article will get; the
/// editor uploads images against it before the article exists.
pub fn create_page(id: &str) -> Html<String> {
    let id = escape(id);
    let head = format!(
        r#"<script src="/tinymce/tinymce.min.js" referrerpolicy="origin"></script>
  <script>
    tinymce.init({{
      selector: '#content',
      plugins: 'image link lists',
      images_upload_url: '/upload?id={id}',
      automatic_uploads: true
    }});
  </script>"#
    );

    let body = format!(
        r#"<h1>New article</h1>
<form method="post" action="/">
  <input type="hidden" name="id" value="{id}">
  <p><label>Title <input type="text" name="title" required></label></p>
  <p><textarea id="content" name="content"></textarea></p>
  <p><button type="submit">Publish</button></p>
</form>
<p><a href="/overview">All articles</a></p>"#
    );

    layout("New article", &head, &body)
}

pub fn article_page(article: &ViewArticle<'_>) -> Html<String> {
    let body = format!(
        r#"<article>
  <h1>{title}</h1>
  <p class="meta">Published {created_at}</p>
  <div class="content">
{content}
  </div>
</article>
<p><a href="/overview">All articles</a> | <a href="/">Write another</a></p>"#,
        title = escape(article.title),
        created_at = escape(&article.created_at),
        content = article.content,
    );

    layout(article.title, "", &body)
}

/// Overview list, in the order given.
pub fn overview_page(articles: &[Article]) -> Html<String> {
    let mut body = String::from("<h1>Articles</h1>\n");

    if articles.is_empty() {
        body.push_str("<p>No articles yet.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for article in articles {
            let view = ViewArticle::from(article);
            body.push_str(&format!(
                "  <li><a href=\"/article?id={id}\">{title}</a> <small>{created_at}</small></li>\n",
                id = escape(view.id),
                title = escape(view.title),
                created_at = escape(&view.created_at),
            ));
        }
        body.push_str("</ul>\n");
    }
    body.push_str(r#"<p><a href="/">Write an article</a></p>"#);

    layout("Articles", "", &body)
}
