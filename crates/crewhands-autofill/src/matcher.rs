//! Field matching strategies for unknown forms.

use async_trait::async_trait;
use tracing::trace;

use crewhands_protocols::{ElementHandle, Page, PageError};

/// Input types that never take typed text.
const NON_TEXT_INPUTS: &[&str] = &[
    "hidden", "file", "checkbox", "radio", "submit", "button", "image", "reset",
];

/// One way of locating a form field from a lowercase label pattern.
#[async_trait]
pub trait FieldMatcher: Send + Sync {
    fn name(&self) -> &'static str;

    async fn try_match(
        &self,
        page: &dyn Page,
        pattern: &str,
    ) -> Result<Option<ElementHandle>, PageError>;
}

/// `<label for=..>` whose text contains the pattern.
#[derive(Debug, Default, Clone, Copy)]
pub struct LabelMatcher;

/// Placeholder attribute containing the pattern.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderMatcher;

/// Name attribute containing the pattern with its spaces removed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NameMatcher;

/// Strategies from strictest to loosest.
pub fn default_matchers() -> Vec<Box<dyn FieldMatcher>> {
    vec![
        Box::new(LabelMatcher),
        Box::new(PlaceholderMatcher),
        Box::new(NameMatcher),
    ]
}

async fn is_text_field(page: &dyn Page, element: ElementHandle) -> Result<bool, PageError> {
    let input_type = page.attribute(element, "type").await?;
    Ok(!input_type
        .map(|t| NON_TEXT_INPUTS.contains(&t.to_lowercase().as_str()))
        .unwrap_or(false))
}

/// First candidate whose `attr` satisfies `accept`.
async fn first_by_attribute(
    page: &dyn Page,
    selector: &str,
    attr: &str,
    accept: impl Fn(&str) -> bool + Send,
) -> Result<Option<ElementHandle>, PageError> {
    for element in page.query_all(selector).await? {
        let Some(value) = page.attribute(element, attr).await? else {
            continue;
        };
        if accept(&value.to_lowercase()) && is_text_field(page, element).await? {
            return Ok(Some(element));
        }
    }
    Ok(None)
}

#[async_trait]
impl FieldMatcher for LabelMatcher {
    fn name(&self) -> &'static str {
        "label"
    }

    async fn try_match(
        &self,
        page: &dyn Page,
        pattern: &str,
    ) -> Result<Option<ElementHandle>, PageError> {
        for label in page.query_all("label[for]").await? {
            let text = page.text(label).await?.to_lowercase();
            if !text.contains(pattern) {
                continue;
            }
            let Some(id) = page.attribute(label, "for").await? else {
                continue;
            };
            if id.is_empty() || id.contains('"') {
                continue;
            }
            if let Some(target) = page.query(&format!(r#"[id="{}"]"#, id)).await? {
                if is_text_field(page, target).await? {
                    trace!(pattern, id = %id, "Matched field by label");
                    return Ok(Some(target));
                }
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl FieldMatcher for PlaceholderMatcher {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    async fn try_match(
        &self,
        page: &dyn Page,
        pattern: &str,
    ) -> Result<Option<ElementHandle>, PageError> {
        first_by_attribute(
            page,
            "input[placeholder], textarea[placeholder]",
            "placeholder",
            |placeholder| placeholder.contains(pattern),
        )
        .await
    }
}

#[async_trait]
impl FieldMatcher for NameMatcher {
    fn name(&self) -> &'static str {
        "name"
    }

    async fn try_match(
        &self,
        page: &dyn Page,
        pattern: &str,
    ) -> Result<Option<ElementHandle>, PageError> {
        let compact = pattern.replace(' ', "");
        first_by_attribute(
            page,
            "input[name], textarea[name], select[name]",
            "name",
            |name| name.contains(&compact),
        )
        .await
    }
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
