//! Typed block payloads.
//!
//! [`BlockContent`] is a tagged union: the `type` tag of a block and the
//! shape of its `content` travel together, so a block can never carry a
//! payload that disagrees with its type.
//!
//! The engine never interprets these payloads beyond [`BlockContent::text`]
//! (used for layer labels and inline edit) and
//! [`BlockContent::is_full_bleed`] (used by the section container). Drawing
//! them is the host renderer's job.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Text,
    Image,
    EmbeddedDocument,
    Button,
    Divider,
    Spacer,
    Cover,
    Testimonial,
    Faq,
    CallToAction,
    SocialLinks,
    PricingPackages,
    Shape,
    Icon,
    Box,
}

impl BlockType {
    /// Every block type, in palette order.
    pub const ALL: [BlockType; 15] = [
        Self::Text,
        Self::Image,
        Self::EmbeddedDocument,
        Self::Button,
        Self::Divider,
        Self::Spacer,
        Self::Cover,
        Self::Testimonial,
        Self::Faq,
        Self::CallToAction,
        Self::SocialLinks,
        Self::PricingPackages,
        Self::Shape,
        Self::Icon,
        Self::Box,
    ];

    /// Wire tag (matches the serde representation).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::EmbeddedDocument => "embedded-document",
            Self::Button => "button",
            Self::Divider => "divider",
            Self::Spacer => "spacer",
            Self::Cover => "cover",
            Self::Testimonial => "testimonial",
            Self::Faq => "faq",
            Self::CallToAction => "call-to-action",
            Self::SocialLinks => "social-links",
            Self::PricingPackages => "pricing-packages",
            Self::Shape => "shape",
            Self::Icon => "icon",
            Self::Box => "box",
        }
    }

    /// Human-readable name shown in the layers panel.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Image => "Image",
            Self::EmbeddedDocument => "Document",
            Self::Button => "Button",
            Self::Divider => "Divider",
            Self::Spacer => "Spacer",
            Self::Cover => "Cover",
            Self::Testimonial => "Testimonial",
            Self::Faq => "FAQ",
            Self::CallToAction => "Call to action",
            Self::SocialLinks => "Social links",
            Self::PricingPackages => "Pricing",
            Self::Shape => "Shape",
            Self::Icon => "Icon",
            Self::Box => "Box",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Block payload, tagged by block type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "kebab-case")]
pub enum BlockContent {
    Text(TextContent),
    Image(ImageContent),
    EmbeddedDocument(EmbeddedDocumentContent),
    Button(ButtonContent),
    Divider(DividerContent),
    Spacer(EmptyContent),
    Cover(CoverContent),
    Testimonial(TestimonialContent),
    Faq(FaqContent),
    CallToAction(CallToActionContent),
    SocialLinks(SocialLinksContent),
    PricingPackages(PricingPackagesContent),
    Shape(ShapeContent),
    Icon(IconContent),
    Box(EmptyContent),
}

impl BlockContent {
    /// The type tag for this payload.
    #[must_use]
    pub const fn block_type(&self) -> BlockType {
        match self {
            Self::Text(_) => BlockType::Text,
            Self::Image(_) => BlockType::Image,
            Self::EmbeddedDocument(_) => BlockType::EmbeddedDocument,
            Self::Button(_) => BlockType::Button,
            Self::Divider(_) => BlockType::Divider,
            Self::Spacer(_) => BlockType::Spacer,
            Self::Cover(_) => BlockType::Cover,
            Self::Testimonial(_) => BlockType::Testimonial,
            Self::Faq(_) => BlockType::Faq,
            Self::CallToAction(_) => BlockType::CallToAction,
            Self::SocialLinks(_) => BlockType::SocialLinks,
            Self::PricingPackages(_) => BlockType::PricingPackages,
            Self::Shape(_) => BlockType::Shape,
            Self::Icon(_) => BlockType::Icon,
            Self::Box(_) => BlockType::Box,
        }
    }

    /// Default payload for a block type.
    #[must_use]
    pub fn default_for(block_type: BlockType) -> Self {
        match block_type {
            BlockType::Text => Self::Text(TextContent {
                text: "Add your text here".into(),
            }),
            BlockType::Image => Self::Image(ImageContent::default()),
            BlockType::EmbeddedDocument => {
                Self::EmbeddedDocument(EmbeddedDocumentContent::default())
            }
            BlockType::Button => Self::Button(ButtonContent {
                label: "Book now".into(),
                href: None,
            }),
            BlockType::Divider => Self::Divider(DividerContent::default()),
            BlockType::Spacer => Self::Spacer(EmptyContent {}),
            BlockType::Cover => Self::Cover(CoverContent {
                title: "Your session proposal".into(),
                subtitle: None,
                image_src: None,
            }),
            BlockType::Testimonial => Self::Testimonial(TestimonialContent {
                quote: "Working together was a joy.".into(),
                author: "Happy client".into(),
                role: None,
                avatar_src: None,
            }),
            BlockType::Faq => Self::Faq(FaqContent {
                items: vec![FaqItem {
                    question: "How long until we receive the photos?".into(),
                    answer: "Galleries are delivered within three weeks.".into(),
                }],
            }),
            BlockType::CallToAction => Self::CallToAction(CallToActionContent {
                heading: "Ready to book?".into(),
                body: String::new(),
                button_label: "Reserve your date".into(),
                href: None,
            }),
            BlockType::SocialLinks => Self::SocialLinks(SocialLinksContent::default()),
            BlockType::PricingPackages => Self::PricingPackages(PricingPackagesContent::default()),
            BlockType::Shape => Self::Shape(ShapeContent::default()),
            BlockType::Icon => Self::Icon(IconContent {
                name: "camera".into(),
            }),
            BlockType::Box => Self::Box(EmptyContent {}),
        }
    }

    /// Primary text of the payload, if it has one.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(content) => Some(&content.text),
            Self::Button(content) => Some(&content.label),
            Self::Cover(content) => Some(&content.title),
            Self::Testimonial(content) => Some(&content.quote),
            Self::CallToAction(content) => Some(&content.heading),
            _ => None,
        }
    }

    /// Whether the payload takes over its section's height.
    #[must_use]
    pub const fn is_full_bleed(&self) -> bool {
        matches!(self, Self::EmbeddedDocument(doc) if doc.full_bleed)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    /// Rich text as sanitized HTML.
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
    Fill,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub fit: ImageFit,
}

/// An embedded multi-page document (contract PDF, brochure).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedDocumentContent {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub page_count: u32,
    /// Span the whole section and drive its height from the rendered pages.
    #[serde(default)]
    pub full_bleed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonContent {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividerContent {
    #[serde(default = "default_divider_thickness")]
    pub thickness: f64,
}

impl Default for DividerContent {
    fn default() -> Self {
        Self {
            thickness: default_divider_thickness(),
        }
    }
}

fn default_divider_thickness() -> f64 {
    1.0
}

/// Payload for blocks whose appearance lives entirely in `styles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyContent {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverContent {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialContent {
    #[serde(default)]
    pub quote: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_src: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqContent {
    #[serde(default)]
    pub items: Vec<FaqItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToActionContent {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub button_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinksContent {
    #[serde(default)]
    pub links: Vec<SocialLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingPackage {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub highlighted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingPackagesContent {
    #[serde(default)]
    pub packages: Vec<PricingPackage>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Ellipse,
    Triangle,
    Line,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeContent {
    #[serde(default)]
    pub shape: ShapeKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconContent {
    #[serde(default)]
    pub name: String,
}
