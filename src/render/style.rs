//! Process-wide styling for generated decks: palette, font, and every layout
//! constant the layout engine positions things with. All values are in inches
//! (positions/sizes) or points (font sizes). The style sheet is an immutable
//! value passed into the renderer, never module-level state.

/// RGB color as an uppercase-insensitive hex triplet, e.g. "00adee".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub &'static str);

impl Color {
    pub fn hex(&self) -> &'static str {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    /// Page background and title-slide heading text.
    pub white: Color,
    /// Brand accent: bars, stripes, slide titles, bullet glyphs.
    pub accent: Color,
    /// Content-slide header bar fill.
    pub light_gray: Color,
    /// Body text.
    pub dark_text: Color,
    /// Footer and caption text.
    pub muted: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct FontSizes {
    pub deck_title: f32,
    pub slide_title: f32,
    pub description: f32,
    pub bullet_glyph: f32,
    pub caption: f32,
    pub body: f32,
    pub footer: f32,
}

/// Page geometry and text-flow constants, all in inches.
#[derive(Debug, Clone, Copy)]
pub struct Metrics {
    pub page_width: f32,
    pub page_height: f32,

    // Title slide
    pub title_bar_height: f32,
    pub title_text_top: f32,
    pub title_text_height: f32,
    pub description_top: f32,
    pub description_height: f32,
    pub caption_top: f32,
    pub caption_height: f32,
    pub title_margin_x: f32,

    // Content slide header
    pub header_height: f32,
    pub accent_stripe_width: f32,
    pub header_title_x: f32,
    pub header_title_top: f32,
    pub header_title_width: f32,
    pub header_title_height: f32,

    // Content flow
    pub content_x: f32,
    pub full_content_width: f32,
    pub split_content_width: f32,
    pub swapped_content_x: f32,
    pub content_top: f32,
    pub paragraph_step: f32,
    pub paragraph_height: f32,
    pub bullet_step: f32,
    pub bullet_height: f32,
    pub bullet_inset: f32,
    /// Text flow stops once the running offset passes this line.
    pub overflow_limit: f32,

    // Image box
    pub image_right_x: f32,
    pub image_left_x: f32,
    pub image_top: f32,
    pub image_width: f32,
    pub image_height: f32,

    // Footer
    pub footer_x: f32,
    pub footer_top: f32,
    pub footer_width: f32,
    pub footer_height: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct StyleSheet {
    pub font_face: &'static str,
    pub palette: Palette,
    pub sizes: FontSizes,
    pub metrics: Metrics,
}

impl Default for StyleSheet {
    fn default() -> Self {
        StyleSheet {
            font_face: "Calibri",
            palette: Palette {
                white: Color("FFFFFF"),
                accent: Color("00adee"),
                light_gray: Color("f8f9fa"),
                dark_text: Color("333333"),
                muted: Color("aaaaaa"),
            },
            sizes: FontSizes {
                deck_title: 36.0,
                slide_title: 22.0,
                description: 18.0,
                bullet_glyph: 13.0,
                caption: 12.0,
                body: 11.0,
                footer: 9.0,
            },
            metrics: Metrics {
                page_width: 10.0,
                page_height: 5.625,

                title_bar_height: 1.0,
                title_text_top: 0.1,
                title_text_height: 0.8,
                description_top: 1.5,
                description_height: 0.6,
                caption_top: 4.8,
                caption_height: 0.4,
                title_margin_x: 0.5,

                header_height: 0.55,
                accent_stripe_width: 0.08,
                header_title_x: 0.25,
                header_title_top: 0.08,
                header_title_width: 9.5,
                header_title_height: 0.39,

                content_x: 0.4,
                full_content_width: 9.2,
                split_content_width: 4.8,
                swapped_content_x: 4.8,
                content_top: 0.75,
                paragraph_step: 1.05,
                paragraph_height: 0.9,
                bullet_step: 0.55,
                bullet_height: 0.5,
                bullet_inset: 0.1,
                overflow_limit: 5.2,

                image_right_x: 5.5,
                image_left_x: 0.4,
                image_top: 0.7,
                image_width: 4.0,
                image_height: 4.5,

                footer_x: 8.5,
                footer_top: 5.3,
                footer_width: 1.2,
                footer_height: 0.2,
            },
        }
    }
}
