//! Upload/Analysis view.
//!
//! A pure function of `(image?, busy, result?)` plus the pending notification.
//! The results column shows exactly one display mode, picked busy > result > empty.
//! The image itself is never inlined; the page points at `IMAGE_PATH`.

use std::sync::Arc;

use super::{base_template, format_size, html_escape};
use crate::intake::multipart::IMAGE_FIELD;
use crate::models::analysis::{Accessory, AnalysisResult};
use crate::models::image::UploadedImage;
use crate::session::{NoticeLevel, Notification, UploadSession};

/// Serves the current session's image bytes.
pub const IMAGE_PATH: &str = "/analyze/image";

/// Seconds between re-polls while an analysis is in flight.
const BUSY_REFRESH_SECS: u32 = 2;

const FALLBACK_GLYPH: &str = "✨";

const CATEGORY_GLYPHS: &[(&str, &str)] = &[
    ("Jewelry", "💎"),
    ("Bag", "👜"),
    ("Shoes", "👠"),
    ("Hat", "🎩"),
    ("Belt", "🪢"),
    ("Scarf", "🧣"),
    ("Watch", "⌚"),
    ("Sunglasses", "🕶️"),
];

/// Display glyph for an accessory category; unknown categories get the fallback.
pub fn category_glyph(category: &str) -> &'static str {
    CATEGORY_GLYPHS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, glyph)| *glyph)
        .unwrap_or(FALLBACK_GLYPH)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Busy,
    Result,
    Empty,
}

pub fn display_mode(busy: bool, result: Option<&AnalysisResult>) -> DisplayMode {
    if busy {
        DisplayMode::Busy
    } else if result.is_some() {
        DisplayMode::Result
    } else {
        DisplayMode::Empty
    }
}

/// Everything the view needs, copied out of the session so rendering can run
/// after the store lock is released.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeView {
    pub image: Option<Arc<UploadedImage>>,
    pub busy: bool,
    pub result: Option<Arc<AnalysisResult>>,
    pub notification: Option<Notification>,
}

impl AnalyzeView {
    /// Consumes the session's pending notification.
    pub fn take_from(session: &mut UploadSession) -> Self {
        Self {
            image: session.image().cloned(),
            busy: session.is_busy(),
            result: session.result().cloned(),
            notification: session.take_notification(),
        }
    }

    pub fn mode(&self) -> DisplayMode {
        display_mode(self.busy, self.result.as_deref())
    }
}

pub fn render_analyze_page(view: &AnalyzeView) -> String {
    let mode = view.mode();

    let extra_head = if mode == DisplayMode::Busy {
        format!(r#"<meta http-equiv="refresh" content="{BUSY_REFRESH_SECS}">"#)
    } else {
        String::new()
    };

    let results = match mode {
        DisplayMode::Busy => render_busy(),
        DisplayMode::Result => view.result.as_deref().map(render_result).unwrap_or_default(),
        DisplayMode::Empty => render_empty(),
    };

    let content = format!(
        r#"
    <div class="container">
        <div class="center">
            <p class="eyebrow">AI Outfit Analysis</p>
            <h1>Find Your Perfect <span class="accent">Accessories</span></h1>
            <p class="muted">Upload a photo of your dress or outfit and our AI will recommend matching accessories, styling tips, and occasion pairings.</p>
        </div>
        <div class="grid-2">
            <div id="upload-area">{upload}</div>
            <div id="results-area" data-mode="{mode}">{results}</div>
        </div>
    </div>
    {toast}
    {script}"#,
        upload = render_upload_area(view),
        mode = mode_name(mode),
        results = results,
        toast = view.notification.as_ref().map(render_toast).unwrap_or_default(),
        script = DROP_SCRIPT,
    );

    base_template(
        "Analyze Your Outfit",
        r#"<a href="/" class="muted">&larr; Back Home</a>"#,
        &extra_head,
        &content,
    )
}

fn mode_name(mode: DisplayMode) -> &'static str {
    match mode {
        DisplayMode::Busy => "busy",
        DisplayMode::Result => "result",
        DisplayMode::Empty => "empty",
    }
}

fn render_upload_area(view: &AnalyzeView) -> String {
    let Some(image) = view.image.as_deref() else {
        return format!(
            r#"
            <form id="upload-form" method="post" action="/analyze/upload" enctype="multipart/form-data">
                <div class="dropzone" id="dropzone">
                    <input type="file" name="{IMAGE_FIELD}" accept="image/*" id="file-input">
                    <div class="glyph">⬆️</div>
                    <h3>Drop your outfit here</h3>
                    <p class="muted">or click to browse &bull; PNG, JPG up to 10MB</p>
                </div>
                <noscript><button type="submit" class="btn btn-block">Upload</button></noscript>
            </form>"#
        );
    };

    // The trigger is hidden once a result exists and disabled while busy.
    let trigger = if view.result.is_some() {
        String::new()
    } else if view.busy {
        r#"
            <button type="button" class="btn btn-block" disabled>⏳ Analyzing your outfit...</button>"#
            .to_string()
    } else {
        r#"
            <form method="post" action="/analyze/run">
                <button type="submit" class="btn btn-block">✨ Analyze &amp; Find Accessories</button>
            </form>"#
            .to_string()
    };

    format!(
        r#"
            <div class="preview">
                <img src="{IMAGE_PATH}?v={version}" alt="Uploaded outfit">
                <form method="post" action="/analyze/clear">
                    <button type="submit" class="btn btn-outline" title="Remove image">✕</button>
                </form>
            </div>
            <p class="muted">{name} &bull; {size}</p>{trigger}"#,
        version = image.id,
        name = html_escape(&image.file_name),
        size = format_size(image.size_bytes),
        trigger = trigger,
    )
}

fn render_busy() -> String {
    r#"
            <div class="center" id="busy">
                <div class="glyph">✨</div>
                <h3>Analyzing your style...</h3>
                <p class="muted">Our AI is finding the perfect accessories</p>
                <div class="progress"><div></div></div>
            </div>"#
        .to_string()
}

fn render_empty() -> String {
    r#"
            <div class="center" id="empty">
                <div class="glyph">✨</div>
                <h3>Ready to style you</h3>
                <p class="muted">Upload a photo of your dress or outfit and our AI will recommend the perfect matching accessories.</p>
            </div>"#
        .to_string()
}

fn render_result(result: &AnalysisResult) -> String {
    let palette: String = result
        .color_palette
        .iter()
        .map(|c| format!(r#"<span class="chip">{}</span>"#, html_escape(c)))
        .collect();

    let accessories: String = result.accessories.iter().map(render_accessory).collect();

    let tips: String = result
        .styling_tips
        .iter()
        .map(|t| format!("<li>{}</li>", html_escape(t)))
        .collect();

    let occasions: String = result
        .occasion_match
        .iter()
        .map(|o| format!(r#"<span class="chip chip-primary">{}</span>"#, html_escape(o)))
        .collect();

    format!(
        r#"
            <div id="result">
                <div class="card">
                    <h3>🏷️ {garment}</h3>
                    <span class="chip chip-primary">{style}</span>
                    <p>🎨 {palette}</p>
                </div>
                <h3>💎 Recommended Accessories</h3>
                <div id="accessories">{accessories}
                </div>
                <div class="grid-2">
                    <div class="card">
                        <h4>💡 Styling Tips</h4>
                        <ul>{tips}</ul>
                    </div>
                    <div class="card">
                        <h4>📅 Perfect For</h4>
                        <div>{occasions}</div>
                    </div>
                </div>
                <form method="post" action="/analyze/clear">
                    <button type="submit" class="btn btn-outline btn-block">Analyze Another Outfit</button>
                </form>
            </div>"#,
        garment = html_escape(&result.garment_description),
        style = html_escape(&result.style),
        palette = palette,
        accessories = accessories,
        tips = tips,
        occasions = occasions,
    )
}

fn render_accessory(accessory: &Accessory) -> String {
    format!(
        r#"
                    <div class="card accessory">
                        <span class="glyph">{glyph}</span>
                        <div>
                            <span class="eyebrow">{category}</span> &bull; <span class="muted">{color}</span>
                            <h4>{name}</h4>
                            <p class="muted">{description}</p>
                        </div>
                    </div>"#,
        glyph = category_glyph(&accessory.category),
        category = html_escape(&accessory.category),
        color = html_escape(&accessory.color_suggestion),
        name = html_escape(&accessory.name),
        description = html_escape(&accessory.description),
    )
}

fn render_toast(notification: &Notification) -> String {
    let class = match notification.level {
        NoticeLevel::Success => "toast-success",
        NoticeLevel::Error => "toast-error",
    };
    format!(
        r#"<div class="toast {class}" role="status">{}</div>"#,
        html_escape(&notification.message)
    )
}

/// Submits the form as soon as a file is picked or dropped.
const DROP_SCRIPT: &str = r#"<script>
(function () {
    var zone = document.getElementById("dropzone");
    var input = document.getElementById("file-input");
    var form = document.getElementById("upload-form");
    if (!zone || !input || !form) return;
    input.addEventListener("change", function () { if (input.files.length) form.submit(); });
    zone.addEventListener("dragover", function (e) { e.preventDefault(); zone.classList.add("dragover"); });
    zone.addEventListener("dragleave", function () { zone.classList.remove("dragover"); });
    zone.addEventListener("drop", function (e) {
        e.preventDefault();
        zone.classList.remove("dragover");
        if (e.dataTransfer.files.length) {
            input.files = e.dataTransfer.files;
            form.submit();
        }
    });
})();
</script>"#;
