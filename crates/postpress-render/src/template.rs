//! Overlay template composition: literal placeholder substitution plus an
//! optional base64-inlined background injected at the `<style>` anchor.

use base64::Engine;
use postpress_core::types::Post;

pub const TITLE_TOKEN: &str = "{{TITLE}}";
pub const SUBTITLE_TOKEN: &str = "{{SUBTITLE}}";
pub const AUTHOR_TOKEN: &str = "{{AUTHOR}}";
pub const COLOR_TOKEN: &str = "{{COLOR}}";

/// The template's opening `<style>` tag doubles as the injection anchor for
/// background styling.
const STYLE_ANCHOR: &str = "<style>";

/// Fill the display placeholders with the post's values (documented
/// defaults applied for absent optional fields).
pub fn substitute(template: &str, post: &Post) -> String {
    template
        .replace(TITLE_TOKEN, &post.title)
        .replace(SUBTITLE_TOKEN, post.subtitle())
        .replace(AUTHOR_TOKEN, post.author())
        .replace(COLOR_TOKEN, post.color())
}

/// Inline `png` as a data URI behind the page body and put a translucent,
/// blurred panel under the text card so the overlay stays legible.
///
/// The injected rules precede the template's own rules, so each declaration
/// is marked `!important` to win the cascade over the template defaults.
pub fn inject_background(html: &str, png: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(png);
    let block = format!(
        "<style>\n\
         body {{\n\
           background-image: url('data:image/png;base64,{b64}') !important;\n\
           background-size: cover !important;\n\
           background-position: center !important;\n\
         }}\n\
         .card {{\n\
           background: rgba(255, 255, 255, 0.88) !important;\n\
           backdrop-filter: blur(8px);\n\
         }}\n"
    );
    html.replacen(STYLE_ANCHOR, &block, 1)
}

/// Full composition for one post.
pub fn compose(template: &str, post: &Post, background: Option<&[u8]>) -> String {
    let html = substitute(template, post);
    match background {
        Some(png) => inject_background(&html, png),
        None => html,
    }
}
