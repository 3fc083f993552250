//! HTML rendering for the landing and upload/analysis views.
//!
//! Plain `format!` templates; every piece of user- or function-supplied text
//! goes through `html_escape`.

pub mod analyze;
pub mod landing;

pub use analyze::{render_analyze_page, AnalyzeView};
pub use landing::render_landing_page;

/// Shared page chrome: head, stylesheet, brand nav.
///
/// `nav_action` is the right-hand nav link, `extra_head` is injected verbatim.
pub fn base_template(title: &str, nav_action: &str, extra_head: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - StyleSense</title>
    {extra_head}
    <style>{css}</style>
</head>
<body>
    <nav id="main-nav">
        <a href="/" class="brand">Style<span class="gold">Sense</span></a>
        {nav_action}
    </nav>
    {content}
</body>
</html>"#,
        title = html_escape(title),
        extra_head = extra_head,
        css = CSS,
        nav_action = nav_action,
        content = content,
    )
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub(crate) fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

const CSS: &str = r#"
:root {
    --bg: #faf7f2;
    --fg: #1d1a16;
    --muted: #6f675d;
    --card: #ffffff;
    --border: #e6dfd4;
    --primary: #8a5a2b;
    --gold: #c9a24b;
}
* { box-sizing: border-box; }
body { margin: 0; background: var(--bg); color: var(--fg); font-family: "Helvetica Neue", Arial, sans-serif; }
h1, h2, h3, h4, .brand { font-family: Georgia, "Times New Roman", serif; }
a { color: inherit; }
#main-nav { position: sticky; top: 0; display: flex; justify-content: space-between; align-items: center; padding: 1rem 2rem; background: rgba(250,247,242,.9); border-bottom: 1px solid var(--border); }
.brand { font-size: 1.5rem; font-weight: bold; text-decoration: none; }
.gold { color: var(--gold); }
.accent { color: var(--primary); font-style: italic; }
.btn { display: inline-block; border: 0; border-radius: 999px; padding: .8rem 2rem; background: var(--primary); color: #fff; text-decoration: none; font-size: 1rem; cursor: pointer; }
.btn:disabled { opacity: .5; cursor: progress; }
.btn-outline { background: transparent; color: var(--fg); border: 1px solid var(--border); }
.btn-block { width: 100%; }
.container { max-width: 72rem; margin: 0 auto; padding: 3rem 1.5rem; }
.eyebrow { text-transform: uppercase; letter-spacing: .3em; font-size: .8rem; color: var(--primary); }
.muted { color: var(--muted); }
.center { text-align: center; }
.grid-2 { display: grid; grid-template-columns: repeat(auto-fit, minmax(20rem, 1fr)); gap: 2.5rem; }
.grid-features { display: grid; grid-template-columns: repeat(auto-fit, minmax(14rem, 1fr)); gap: 1.5rem; }
.card { background: var(--card); border: 1px solid var(--border); border-radius: 1rem; padding: 1.5rem; }
.chip { display: inline-block; padding: .25rem .75rem; margin: .15rem; border-radius: 999px; background: #f1ebe2; font-size: .8rem; }
.chip-primary { background: #f3e6d6; color: var(--primary); }
.dropzone { position: relative; border: 2px dashed var(--border); border-radius: 1rem; padding: 4rem 2rem; text-align: center; }
.dropzone.dragover { border-color: var(--primary); background: #f6eee3; }
.dropzone input[type=file] { position: absolute; inset: 0; opacity: 0; cursor: pointer; }
.preview { position: relative; border-radius: 1rem; overflow: hidden; border: 1px solid var(--border); }
.preview img { display: block; width: 100%; max-height: 500px; object-fit: cover; }
.preview form { position: absolute; top: .75rem; right: .75rem; }
.accessory { display: flex; gap: .75rem; margin-bottom: .75rem; }
.glyph { font-size: 1.6rem; }
.progress { width: 12rem; height: 4px; margin: 1.5rem auto 0; background: #eee4d6; border-radius: 999px; overflow: hidden; }
.progress div { width: 40%; height: 100%; background: var(--primary); animation: shimmer 1.2s infinite linear; }
@keyframes shimmer { from { transform: translateX(-100%); } to { transform: translateX(250%); } }
.toast { position: fixed; right: 1.5rem; bottom: 1.5rem; padding: .9rem 1.4rem; border-radius: .75rem; background: var(--fg); color: #fff; animation: fade 4s forwards; }
.toast-error { background: #a3372a; }
.toast-success { background: #2f6b3b; }
@keyframes fade { 0%, 80% { opacity: 1; } 100% { opacity: 0; visibility: hidden; } }
.hero { padding: 6rem 1.5rem; background: #201a14; color: #f4ede2; }
.hero h1 { font-size: 3.2rem; margin: .5rem 0 1rem; }
.step-number { font-size: 2.5rem; color: var(--gold); font-family: Georgia, serif; }
footer { padding: 2rem; border-top: 1px solid var(--border); text-align: center; }
"#;
