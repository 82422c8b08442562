//! Translation of extracted menu items
//!
//! The actual translation service is behind the [`Translator`] trait. The
//! adapter here fans every item out concurrently and isolates failures: one
//! item failing never costs the rest of the batch.

mod libre;

pub use libre::LibreTranslateClient;

use crate::error::MenuError;
use crate::menu::MenuItem;
use async_trait::async_trait;
use futures::future::join_all;

/// Placeholder stored on an item whose translation call failed
pub const TRANSLATION_FAILED: &str = "Translation failed";

/// A translation capability (remote API, test stub, ...)
#[async_trait]
pub trait Translator: Send + Sync {
    /// Identifier used in logs and `/info`
    fn name(&self) -> &str;

    /// Translate `text` into `target_language` (ISO-639-1, e.g. "en", "tr")
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, MenuError>;
}

/// Translate every item's description, all calls in flight at once.
///
/// The output has the same order and length as `items`.
pub async fn translate_items(
    translator: &dyn Translator,
    items: Vec<MenuItem>,
    target_language: &str,
) -> Vec<MenuItem> {
    let tasks = items.into_iter().map(|item| async move {
        let translated = match translator.translate(&item.description, target_language).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    "Translation of item {} via {} failed: {}",
                    item.id,
                    translator.name(),
                    e
                );
                TRANSLATION_FAILED.to_string()
            }
        };

        MenuItem {
            translated_description: Some(translated),
            ..item
        }
    });

    join_all(tasks).await
}
