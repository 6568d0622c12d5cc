//! The fixed contract rule set.
//!
//! Each [`ContractRule`] is a pure check over a [`ResponseDocument`]. The
//! [`RuleSet`] fixes their order, which matters because evaluation stops at
//! the first failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::ResponseDocument;
use crate::report::Outcome;

/// Required value of the top-level `Name` field.
pub const EXPECTED_NAME: &str = "Carbon credits";

/// `Name` of the promotion whose description is checked.
pub const GALLERY_PROMOTION: &str = "Gallery";

/// Substring the gallery description must contain.
pub const GALLERY_DESCRIPTION_FRAGMENT: &str = "Good position in category";

/// A single content check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContractRule {
    /// `Name` must equal [`EXPECTED_NAME`].
    Name,
    /// `CanRelist` must be the boolean `true`.
    Relistable,
    /// The first `Promotions` entry named [`GALLERY_PROMOTION`] must have a
    /// `Description` containing [`GALLERY_DESCRIPTION_FRAGMENT`].
    GalleryDescription,
}

impl ContractRule {
    pub fn name(&self) -> &'static str {
        match self {
            ContractRule::Name => "name",
            ContractRule::Relistable => "can_relist",
            ContractRule::GalleryDescription => "gallery_description",
        }
    }

    /// Evaluate this rule against a document.
    pub fn evaluate(&self, doc: &ResponseDocument) -> Outcome {
        match self {
            ContractRule::Name => check_name(doc),
            ContractRule::Relistable => check_relistable(doc),
            ContractRule::GalleryDescription => check_gallery_description(doc),
        }
    }
}

/// Ordered rules evaluated by the validator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<ContractRule>,
}

impl RuleSet {
    /// `Name`, then `Relistable`, then `GalleryDescription`.
    pub fn standard() -> Self {
        Self {
            rules: vec![
                ContractRule::Name,
                ContractRule::Relistable,
                ContractRule::GalleryDescription,
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContractRule> {
        self.rules.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.rules.len()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

fn describe(value: Option<&Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "nothing (field missing)".to_string(),
    }
}

fn check_name(doc: &ResponseDocument) -> Outcome {
    let rule = ContractRule::Name.name();
    let actual = doc.field("Name");
    if actual.and_then(Value::as_str) == Some(EXPECTED_NAME) {
        Outcome::pass(rule, format!("Name is \"{}\"", EXPECTED_NAME))
    } else {
        Outcome::fail(
            rule,
            format!(
                "Category Name incorrect, expected \"{}\", but got {} instead",
                EXPECTED_NAME,
                describe(actual)
            ),
        )
    }
}

fn check_relistable(doc: &ResponseDocument) -> Outcome {
    let rule = ContractRule::Relistable.name();
    let actual = doc.field("CanRelist");
    if actual == Some(&Value::Bool(true)) {
        Outcome::pass(rule, "CanRelist is true")
    } else {
        Outcome::fail(
            rule,
            format!(
                "Expected CanRelist to be true but got {} instead",
                describe(actual)
            ),
        )
    }
}

fn check_gallery_description(doc: &ResponseDocument) -> Outcome {
    let rule = ContractRule::GalleryDescription.name();

    let promotions = match doc.field("Promotions") {
        None | Some(Value::Null) => {
            return Outcome::fail(
                rule,
                format!(
                    "Expected to find a Promotions element but got {} instead",
                    describe(doc.field("Promotions"))
                ),
            );
        }
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Outcome::fail(
                rule,
                format!("Expected Promotions to be a list but got {}", other),
            );
        }
    };

    if let Some((index, entry)) = promotions.iter().enumerate().find(|(_, p)| !p.is_object()) {
        return Outcome::fail(
            rule,
            format!(
                "Expected Promotions to contain only objects but entry {} is {}",
                index, entry
            ),
        );
    }

    // Only the first Gallery entry counts; later ones are never inspected.
    let gallery = promotions
        .iter()
        .find(|promo| promo.get("Name").and_then(Value::as_str) == Some(GALLERY_PROMOTION));

    let Some(gallery) = gallery else {
        return Outcome::fail(
            rule,
            format!(
                "Expected to find a Promotion with the name \"{}\" but found none among {} promotion(s)",
                GALLERY_PROMOTION,
                promotions.len()
            ),
        );
    };

    let description = gallery.get("Description");
    match description.and_then(Value::as_str) {
        Some(text) if text.contains(GALLERY_DESCRIPTION_FRAGMENT) => Outcome::pass(
            rule,
            format!(
                "{} description contains \"{}\"",
                GALLERY_PROMOTION, GALLERY_DESCRIPTION_FRAGMENT
            ),
        ),
        Some(text) => Outcome::fail(
            rule,
            format!(
                "Expected to find \"{}\" in the {} description but got \"{}\"",
                GALLERY_DESCRIPTION_FRAGMENT, GALLERY_PROMOTION, text
            ),
        ),
        None => Outcome::fail(
            rule,
            format!(
                "{} promotion has no Description text, got {}",
                GALLERY_PROMOTION,
                describe(description)
            ),
        ),
    }
}
