//! Binding template attributes onto deck slides.

use crate::deck::Deck;
use crate::error::{Error, Result};
use crate::types::{Color, SlideStyle, StyledSlide, TemplateDescriptor};
use std::sync::LazyLock;

/// Neutral dark gray used for body text on every template.
pub static BODY_COLOR: LazyLock<Color> = LazyLock::new(|| Color::parse("#333333").unwrap());

/// Bind a template's palette and font onto every slide of a deck.
///
/// Every slide gets the same style regardless of kind: background from
/// `palette[0]`, title color from `palette[1]`, the fixed [`BODY_COLOR`]
/// and the template font.
pub fn bind(deck: &Deck, template: &TemplateDescriptor) -> Result<Vec<StyledSlide>> {
    let style = slide_style(template)?;

    Ok(deck
        .slides()
        .iter()
        .map(|slide| StyledSlide {
            slide: slide.clone(),
            style: style.clone(),
        })
        .collect())
}

fn slide_style(template: &TemplateDescriptor) -> Result<SlideStyle> {
    match template.palette.as_slice() {
        [background, title, ..] => Ok(SlideStyle {
            background: background.clone(),
            title_color: title.clone(),
            body_color: BODY_COLOR.clone(),
            font: template.font.clone(),
        }),
        short => Err(Error::InsufficientPalette { found: short.len() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SlideKind, SlideUnit};

    fn color(hex: &str) -> Color {
        Color::parse(hex).unwrap()
    }

    fn sample_deck() -> Deck {
        let mut content = SlideUnit::new(SlideKind::Content, "Body");
        content.push_line("text");
        Deck::build(vec![
            SlideUnit::new(SlideKind::Title, "Intro"),
            SlideUnit::new(SlideKind::Section, "Part"),
            content,
        ])
        .unwrap()
    }

    #[test]
    fn test_bind_applies_palette() {
        let template = TemplateDescriptor::new(vec![color("#000080"), color("#FFFFFF")], "Arial");
        let styled = bind(&sample_deck(), &template).unwrap();

        assert_eq!(styled.len(), 3);
        for slide in &styled {
            assert_eq!(slide.style.background, color("#000080"));
            assert_eq!(slide.style.title_color, color("#FFFFFF"));
            assert_eq!(slide.style.body_color, color("#333333"));
            assert_eq!(slide.style.font, "Arial");
        }
        assert_eq!(styled[2].heading(), "Body");
        assert_eq!(styled[2].slide.position, 3);
    }

    #[test]
    fn test_single_color_palette_rejected() {
        let template = TemplateDescriptor::new(vec![color("#000080")], "Arial");
        let result = bind(&sample_deck(), &template);
        assert!(matches!(result, Err(Error::InsufficientPalette { found: 1 })));

        let template = TemplateDescriptor::new(Vec::new(), "Arial");
        let result = bind(&sample_deck(), &template);
        assert!(matches!(result, Err(Error::InsufficientPalette { found: 0 })));
    }

    #[test]
    fn test_bind_is_deterministic() {
        let template = TemplateDescriptor::default();
        let deck = sample_deck();
        assert_eq!(bind(&deck, &template).unwrap(), bind(&deck, &template).unwrap());
    }

    #[test]
    fn test_title_color_change_is_isolated() {
        let deck = sample_deck();
        let before = TemplateDescriptor::default();
        let mut after = before.clone();
        after.palette[1] = color("#ABCDEF");

        let a = bind(&deck, &before).unwrap();
        let b = bind(&deck, &after).unwrap();

        for (x, y) in a.iter().zip(&b) {
            assert_eq!(y.style.title_color, color("#ABCDEF"));
            assert_ne!(x.style.title_color, y.style.title_color);

            let mut restored = y.clone();
            restored.style.title_color = x.style.title_color.clone();
            assert_eq!(&restored, x);
        }
    }
}
