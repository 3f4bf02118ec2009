use crate::browser::{PageElement, PageSession};
use crate::checks::ValidationResult;
use crate::error::Result;
use serde::{Deserialize, Serialize};

pub const H1_EXISTENCE: &str = "H1 Tag Existence";
pub const TAG_SEQUENCE: &str = "HTML Tag Sequence";
pub const IMAGE_ALT: &str = "Image Alt Attributes";

/// A heading element found on the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadingObservation {
    /// 1 through 6
    pub level: u8,

    /// Distance from the top of the document; defines heading order
    pub vertical_position: f64,
}

impl HeadingObservation {
    pub fn new(level: u8, vertical_position: f64) -> Self {
        Self { level, vertical_position }
    }

    pub fn tag(&self) -> String {
        format!("h{}", self.level)
    }
}

/// Sort observations top to bottom. Ties keep collection order.
pub fn sort_by_position(observations: &mut [HeadingObservation]) {
    observations.sort_by(|a, b| a.vertical_position.total_cmp(&b.vertical_position));
}

/// A sequence is invalid the first time a heading is shallower than the one before it.
///
/// Skipping levels downwards (h1 straight to h3) is accepted.
pub fn heading_sequence_is_valid(levels: &[u8]) -> bool {
    levels.windows(2).all(|pair| pair[1] >= pair[0])
}

fn render_tags(observations: &[HeadingObservation]) -> String {
    let tags: Vec<String> = observations.iter().map(HeadingObservation::tag).collect();
    format!("[{}]", tags.join(", "))
}

/// Heading presence, heading order and image alt completeness.
///
/// Each check yields exactly one result; a check that errors out records a failure
/// without affecting the other two.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralValidator;

impl StructuralValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn run<P: PageSession>(&self, page: &P, page_url: &str) -> Vec<ValidationResult> {
        vec![
            self.check_h1(page, page_url),
            self.check_heading_sequence(page, page_url),
            self.check_image_alts(page, page_url),
        ]
    }

    pub fn check_h1<P: PageSession>(&self, page: &P, page_url: &str) -> ValidationResult {
        match page.find_elements("h1") {
            Ok(h1s) if !h1s.is_empty() => ValidationResult::pass(page_url, H1_EXISTENCE, "H1 tag found"),
            Ok(_) => ValidationResult::fail(page_url, H1_EXISTENCE, "No H1 tag present"),
            Err(e) => ValidationResult::fail(page_url, H1_EXISTENCE, format!("Error checking H1: {}", e)),
        }
    }

    pub fn check_heading_sequence<P: PageSession>(&self, page: &P, page_url: &str) -> ValidationResult {
        let observations = match collect_headings(page) {
            Ok(observations) => observations,
            Err(e) => {
                return ValidationResult::fail(page_url, TAG_SEQUENCE, format!("Error checking tag sequence: {}", e));
            }
        };

        let levels: Vec<u8> = observations.iter().map(|o| o.level).collect();
        let rendered = render_tags(&observations);

        if heading_sequence_is_valid(&levels) {
            ValidationResult::pass(page_url, TAG_SEQUENCE, format!("Found tags in order: {}", rendered))
        } else {
            log::warn!("Invalid heading sequence on {}: {}", page_url, rendered);
            ValidationResult::fail(page_url, TAG_SEQUENCE, format!("Invalid sequence: {}", rendered))
        }
    }

    pub fn check_image_alts<P: PageSession>(&self, page: &P, page_url: &str) -> ValidationResult {
        let images = match page.find_elements("img") {
            Ok(images) => images,
            Err(e) => {
                return ValidationResult::fail(
                    page_url,
                    IMAGE_ALT,
                    format!("Error checking image alt attributes: {}", e),
                );
            }
        };

        let offenders = missing_alt_sources(&images);
        if offenders.is_empty() {
            ValidationResult::pass(page_url, IMAGE_ALT, "All images have alt attributes")
        } else {
            log::warn!("{} images without alt text on {}", offenders.len(), page_url);
            ValidationResult::fail(page_url, IMAGE_ALT, format!("Missing alt for: [{}]", offenders.join(", ")))
        }
    }
}

/// Every heading on the page, sorted by vertical position
pub fn collect_headings<P: PageSession>(page: &P) -> Result<Vec<HeadingObservation>> {
    let mut observations = Vec::new();

    for level in 1..=6u8 {
        for heading in page.find_elements(&format!("h{}", level))? {
            observations.push(HeadingObservation::new(level, heading.vertical_position()?));
        }
    }

    sort_by_position(&mut observations);
    Ok(observations)
}

/// Sources of images whose alt attribute is absent or empty.
///
/// An image that cannot be read is reported as an offender along with the error.
pub fn missing_alt_sources<E: PageElement>(images: &[E]) -> Vec<String> {
    images
        .iter()
        .enumerate()
        .filter_map(|(index, image)| match image.attribute("alt") {
            Ok(Some(alt)) if !alt.is_empty() => None,
            Ok(_) => Some(image.attribute("src").ok().flatten().unwrap_or_default()),
            Err(e) => Some(format!("image #{} ({})", index, e)),
        })
        .collect()
}
