//! Prompt construction for the design and story workflows.
//!
//! Pure, deterministic mappings from caller input to prompt strings; no
//! side effects, no I/O. The formatting instructions embedded here come
//! from [`crate::format`], which the response parser consumes too.

use crate::format;
use karigari_core::{Platform, ProductKind};

/// Base instruction shared by every mockup prompt.
const MOCKUP_BASE: &str =
    "Create a photorealistic mockup of this traditional Indian design pattern";

/// Fixed quality/framing suffix appended to every mockup prompt.
const MOCKUP_SUFFIX: &str = "The final image should be high-resolution, well-lit, and showcase \
     the product from the most flattering angle.";

/// Per-product instruction fragment for mockup prompts.
///
/// Unknown product kinds fall back to a generic instruction.
fn product_fragment(product: &ProductKind) -> &'static str {
    match product {
        ProductKind::Bag => {
            "applied to a stylish handbag or tote bag. The design should be prominently \
             featured on the bag, maintaining the authentic artisanal quality while making \
             it appealing for modern consumers."
        }
        ProductKind::Scarf => {
            "applied to a luxurious silk scarf. The pattern should flow naturally across \
             the fabric, highlighting the intricate details of the traditional design."
        }
        ProductKind::Cushion => {
            "applied to a decorative cushion or pillow cover. The design should be centered \
             and scaled appropriately to showcase the craftsmanship."
        }
        ProductKind::WallArt => {
            "transformed into a framed wall art piece. The design should be the focal \
             point, with a complementary frame that enhances the traditional aesthetic."
        }
        ProductKind::Clothing => {
            "applied to contemporary clothing like a modern kurta or dress. The design \
             should be integrated tastefully into the garment while preserving its \
             cultural significance."
        }
        ProductKind::Other(_) => {
            "applied to a new product that maintains the authentic artisanal quality while \
             making it appealing for modern consumers."
        }
    }
}

/// Platform-specific tone guidance for platform caption prompts.
///
/// Unknown platforms get a generic tone fragment.
fn platform_tone(platform: &Platform) -> &'static str {
    match platform {
        Platform::Instagram => {
            "visual-focused, emotionally engaging, 3-5 sentences, with a question to \
             encourage engagement"
        }
        Platform::Facebook => {
            "story-focused, slightly longer (4-6 sentences), personal tone, with context \
             about the craft"
        }
        Platform::Twitter => "concise, impactful, under 280 characters, with a strong call-to-action",
        Platform::Other(_) => "engaging, shareable, with a call-to-action",
    }
}

/// Build the prompt for one product mockup.
///
/// # Examples
///
/// ```
/// use karigari_content::prompt::mockup_prompt;
/// use karigari_core::ProductKind;
///
/// let prompt = mockup_prompt(&ProductKind::Bag);
/// assert!(prompt.contains("tote bag"));
/// assert!(prompt.contains("high-resolution"));
/// ```
pub fn mockup_prompt(product: &ProductKind) -> String {
    format!("{} {} {}", MOCKUP_BASE, product_fragment(product), MOCKUP_SUFFIX)
}

/// The artisan's input to the story templates.
///
/// Empty product name and craft type fall back to generic phrasing inside
/// the templates, mirroring what callers see echoed back in the record.
#[derive(Debug, Clone, Copy)]
pub struct CraftBrief<'a> {
    /// The artisan's free-form input text
    pub text: &'a str,
    /// Product name (may be empty)
    pub product_name: &'a str,
    /// Craft type (may be empty)
    pub craft_type: &'a str,
}

impl<'a> CraftBrief<'a> {
    fn product_name_or_default(&self) -> &str {
        if self.product_name.trim().is_empty() {
            "Traditional handcrafted product"
        } else {
            self.product_name
        }
    }

    fn craft_type_or_default(&self) -> &str {
        if self.craft_type.trim().is_empty() {
            "Traditional Indian craft"
        } else {
            self.craft_type
        }
    }

    fn context_block(&self) -> String {
        format!(
            "Product Name: {}\nCraft Type: {}\nArtisan's Input: {}",
            self.product_name_or_default(),
            self.craft_type_or_default(),
            self.text
        )
    }
}

/// Build the product description prompt.
pub fn description_prompt(brief: &CraftBrief<'_>) -> String {
    format!(
        "You are an expert storyteller specializing in traditional Indian crafts and \
         artisanal products.\n\
         Create a rich, engaging product description (minimum 150 words) for the following \
         product based on the artisan's input.\n\n\
         The description should:\n\
         1. Highlight the cultural significance and heritage of the craft\n\
         2. Describe the craftsmanship and techniques used\n\
         3. Mention the materials and their quality\n\
         4. Explain what makes this product unique\n\
         5. Include a brief story about the artisan or the tradition\n\
         6. Use evocative language that appeals to conscious consumers\n\n\
         {}\n\n\
         Format the description in paragraphs with proper spacing. Do not include any \
         headings or bullet points.",
        brief.context_block()
    )
}

/// Build the generic social caption prompt.
///
/// The formatting instruction embedded here is the parser's contract; see
/// [`crate::format`].
pub fn captions_prompt(brief: &CraftBrief<'_>) -> String {
    format!(
        "You are a social media expert specializing in promoting traditional crafts and \
         artisanal products.\n\
         Create {} distinct social media captions based on the artisan's input about their \
         product.\n\n\
         Each caption should:\n\
         1. Be between 50-100 words\n\
         2. Highlight different aspects of the product or craft\n\
         3. Include a call-to-action\n\
         4. Be engaging and shareable\n\
         5. Appeal to conscious consumers who value authenticity and heritage\n\n\
         {}\n\n\
         {}\n\
         Do not include hashtags in these captions.",
        format::CAPTION_COUNT,
        brief.context_block(),
        format::caption_format_instruction()
    )
}

/// Build the hashtag prompt.
pub fn hashtags_prompt(brief: &CraftBrief<'_>) -> String {
    format!(
        "You are a social media expert specializing in promoting traditional Indian crafts \
         and artisanal products.\n\
         Create 10-15 relevant hashtags for the following product based on the artisan's \
         input.\n\n\
         The hashtags should:\n\
         1. Include a mix of popular and niche tags\n\
         2. Be relevant to the craft, materials, and cultural heritage\n\
         3. Include some location-based tags for India\n\
         4. Include tags related to sustainable and ethical shopping\n\
         5. Be formatted correctly for social media (no spaces, appropriate use of \
         CamelCase for longer tags)\n\n\
         {}\n\n\
         {}",
        brief.context_block(),
        format::HASHTAG_FORMAT_INSTRUCTION
    )
}

/// Build the platform-specific caption prompt.
///
/// Tone guidance is looked up by platform (case-insensitivity handled by
/// [`Platform::parse`]); unlike the generic caption prompt, this one asks
/// for inline hashtags, which the parser extracts per block.
pub fn platform_captions_prompt(brief: &CraftBrief<'_>, platform: &Platform) -> String {
    format!(
        "You are a social media expert specializing in promoting traditional Indian crafts \
         and artisanal products.\n\
         Create {} distinct {} captions based on the artisan's input about their product.\n\n\
         Each caption should be {}.\n\n\
         {}\n\n\
         {}\n\
         Include appropriate hashtags at the end of each caption.",
        format::CAPTION_COUNT,
        platform.key(),
        platform_tone(platform),
        brief.context_block(),
        format::caption_format_instruction()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn brief() -> CraftBrief<'static> {
        CraftBrief {
            text: "Handwoven cotton saree with natural dyes",
            product_name: "Cotton Saree",
            craft_type: "textile",
        }
    }

    #[test]
    fn mockup_prompts_are_deterministic_and_product_specific() {
        let bag = mockup_prompt(&ProductKind::Bag);
        assert_eq!(bag, mockup_prompt(&ProductKind::Bag));
        assert!(bag.starts_with(MOCKUP_BASE));
        assert!(bag.ends_with(MOCKUP_SUFFIX));

        let scarf = mockup_prompt(&ProductKind::Scarf);
        assert_ne!(bag, scarf);
    }

    #[test]
    fn unknown_products_get_the_generic_fragment() {
        let prompt = mockup_prompt(&ProductKind::parse("lampshade"));
        assert!(prompt.contains("a new product"));
    }

    #[test]
    fn empty_metadata_falls_back_to_generic_phrasing() {
        let brief = CraftBrief {
            text: "woven by hand",
            product_name: "",
            craft_type: "  ",
        };
        let prompt = description_prompt(&brief);
        assert!(prompt.contains("Traditional handcrafted product"));
        assert!(prompt.contains("Traditional Indian craft"));
        assert!(prompt.contains("woven by hand"));
    }

    #[test]
    fn platform_tone_lookup_is_case_insensitive() {
        let lower = platform_captions_prompt(&brief(), &Platform::parse("instagram"));
        let mixed = platform_captions_prompt(&brief(), &Platform::parse("Instagram"));
        assert_eq!(lower, mixed);
        assert!(lower.contains("question to"));

        let unknown = platform_captions_prompt(&brief(), &Platform::parse("Pinterest"));
        assert!(unknown.contains("engaging, shareable"));
    }

    #[test]
    fn caption_prompt_and_parser_agree_on_markers() {
        // The instruction asks for "Caption N:" blocks; a response that
        // follows it must be parseable.
        let prompt = captions_prompt(&brief());
        assert!(prompt.contains("Caption 1:"));

        let reply = "Caption 1: First\nCaption 2: Second\nCaption 3: Third";
        assert_eq!(parse::parse_captions(reply), ["First", "Second", "Third"]);
    }

    #[test]
    fn hashtag_prompt_and_parser_agree_on_tokens() {
        let prompt = hashtags_prompt(&brief());
        assert!(prompt.contains("each starting with #"));

        let reply = "#Handmade #IndianCraft #EthicalFashion";
        assert_eq!(
            parse::parse_hashtags(reply),
            ["#Handmade", "#IndianCraft", "#EthicalFashion"]
        );
    }
}
