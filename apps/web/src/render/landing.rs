use super::base_template;

struct Feature {
    icon: &'static str,
    title: &'static str,
    description: &'static str,
}

const FEATURES: &[Feature] = &[
    Feature {
        icon: "📷",
        title: "Image Analysis",
        description: "Upload a photo of your outfit and get AI-powered accessory recommendations instantly.",
    },
    Feature {
        icon: "✨",
        title: "AI Styling",
        description: "Our generative AI acts as your personal stylist, understanding your unique taste.",
    },
    Feature {
        icon: "👕",
        title: "Outfit Combos",
        description: "Receive complete outfit combinations tailored to your style and occasion.",
    },
    Feature {
        icon: "📈",
        title: "Trend Aware",
        description: "Stay ahead with recommendations informed by the latest fashion trends.",
    },
    Feature {
        icon: "💎",
        title: "Accessory Match",
        description: "Upload any dress and discover the perfect accessories to complete your look.",
    },
];

const STEPS: &[(&str, &str, &str)] = &[
    ("01", "Upload", "Take a photo or upload an image of your outfit or dress."),
    ("02", "Analyze", "Our AI analyzes colors, style, and fabric to understand your piece."),
    ("03", "Discover", "Get personalized accessory recommendations and styling tips."),
];

/// Static marketing page. Its only outbound action is the upload view.
pub fn render_landing_page() -> String {
    let features: String = FEATURES
        .iter()
        .map(|f| {
            format!(
                r#"
            <div class="card">
                <div class="glyph">{}</div>
                <h3>{}</h3>
                <p class="muted">{}</p>
            </div>"#,
                f.icon, f.title, f.description
            )
        })
        .collect();

    let steps: String = STEPS
        .iter()
        .map(|(number, title, desc)| {
            format!(
                r#"
            <div class="center">
                <div class="step-number">{number}</div>
                <h3>{title}</h3>
                <p class="muted">{desc}</p>
            </div>"#
            )
        })
        .collect();

    let content = format!(
        r##"
    <section class="hero">
        <div class="container">
            <p class="eyebrow gold">AI-Powered Fashion Intelligence</p>
            <h1>Your Personal<br><span class="accent gold">Virtual Stylist</span></h1>
            <p>Upload any outfit and discover the perfect accessories. StyleSense uses generative AI to deliver personalized fashion recommendations tailored to your unique style.</p>
            <p>
                <a href="/analyze" class="btn">Analyze Your Outfit &rarr;</a>
                <a href="#features" class="btn btn-outline" style="color:#f4ede2">Explore Features</a>
            </p>
        </div>
    </section>

    <section id="features" class="container">
        <h2 class="center">Intelligent Fashion <span class="accent">Guidance</span></h2>
        <div class="grid-features">{features}
        </div>
    </section>

    <section class="container">
        <h2 class="center">Three Simple <span class="accent">Steps</span></h2>
        <div class="grid-features">{steps}
        </div>
        <p class="center"><a href="/analyze" class="btn">Get Started Now &rarr;</a></p>
    </section>

    <footer>
        <a href="/" class="brand">Style<span class="gold">Sense</span></a>
        <p class="muted">AI-Powered Fashion Intelligence &bull; Your Virtual Stylist</p>
    </footer>"##
    );

    base_template(
        "Your Virtual Stylist",
        r#"<a href="/analyze" class="btn">Try Now</a>"#,
        "",
        &content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_links_to_upload_view() {
        let html = render_landing_page();
        assert!(html.contains(r#"href="/analyze""#));
        assert!(html.contains("Analyze Your Outfit"));
    }

    #[test]
    fn test_landing_lists_every_feature_and_step() {
        let html = render_landing_page();
        for feature in FEATURES {
            assert!(html.contains(feature.title));
        }
        assert_eq!(html.matches(r#"class="step-number""#).count(), STEPS.len());
    }
}
