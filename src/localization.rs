//! Fluent-backed user-facing texts.
//!
//! Resources are embedded at compile time so the bot needs no locale files at
//! runtime. Unknown languages fall back to English.

use anyhow::Result;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::sync::Arc;
use unic_langid::LanguageIdentifier;

const DEFAULT_LANGUAGE: &str = "en";

/// (locale, Fluent source) pairs shipped with the bot
const LOCALES: &[(&str, &str)] = &[("en", include_str!("../locales/en/main.ftl"))];

/// Localization manager for the quiz bot
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl std::fmt::Debug for LocalizationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalizationManager")
            .field("languages", &self.bundles.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl LocalizationManager {
    /// Create a new localization manager
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        for (locale_str, source) in LOCALES {
            let locale: LanguageIdentifier = locale_str.parse()?;
            let bundle = Self::create_bundle(&locale, source)?;
            bundles.insert(locale_str.to_string(), bundle);
        }

        Ok(Self { bundles })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(
        locale: &LanguageIdentifier,
        source: &str,
    ) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Telegram renders the Unicode isolation marks literally
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string()).map_err(|(_, errors)| {
            anyhow::anyhow!("Invalid Fluent resource for {}: {:?}", locale, errors)
        })?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow::anyhow!("Conflicting Fluent messages for {}: {:?}", locale, errors))?;

        Ok(bundle)
    }

    /// Get a localized message in a specific language
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let bundle = match self.bundles.get(language) {
            Some(bundle) => bundle,
            None => match self.bundles.get(DEFAULT_LANGUAGE) {
                Some(bundle) => bundle,
                None => return format!("Missing translation: {}", key),
            },
        };

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let fluent_args = args.map(|args| {
            FluentArgs::from_iter(
                args.iter()
                    .map(|(k, v)| (*k, FluentValue::from(*v))),
            )
        });

        let mut value = String::new();
        let _ = bundle.write_pattern(&mut value, pattern, fluent_args.as_ref(), &mut vec![]);
        value
    }

    /// Get a localized message with arguments in a specific language
    pub fn get_message_with_args_in_language(
        &self,
        key: &str,
        language: &str,
        args: &[(&str, &str)],
    ) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.get_message_in_language(key, language, Some(&args_map))
    }

    /// Check if a language is supported
    pub fn is_language_supported(&self, language: &str) -> bool {
        self.bundles.contains_key(language)
    }

    /// Map a Telegram language code ("en-US", "hi", ...) to a supported language
    pub fn detect_language(&self, language_code: Option<&str>) -> String {
        if let Some(code) = language_code {
            let lang = code.split('-').next().unwrap_or(DEFAULT_LANGUAGE);
            if self.is_language_supported(lang) {
                return lang.to_string();
            }
        }
        DEFAULT_LANGUAGE.to_string()
    }
}

/// Create the shared localization manager
pub fn create_localization_manager() -> Result<Arc<LocalizationManager>> {
    Ok(Arc::new(LocalizationManager::new()?))
}

/// Convenience function to get a localized message in user's language
pub fn t_lang(manager: &LocalizationManager, key: &str, language_code: Option<&str>) -> String {
    let language = manager.detect_language(language_code);
    manager.get_message_in_language(key, &language, None)
}

/// Convenience function to get a localized message with arguments in user's language
pub fn t_args_lang(
    manager: &LocalizationManager,
    key: &str,
    args: &[(&str, &str)],
    language_code: Option<&str>,
) -> String {
    let language = manager.detect_language(language_code);
    manager.get_message_with_args_in_language(key, &language, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_locales_load() {
        let manager = LocalizationManager::new().unwrap();
        assert!(manager.is_language_supported("en"));
    }

    #[test]
    fn test_placeables_have_no_isolation_marks() {
        let manager = LocalizationManager::new().unwrap();
        let text = t_args_lang(&manager, "limit-option", &[("max", "100")], Some("en"));
        assert_eq!(text, "- Option length: 100 characters");
    }

    #[test]
    fn test_detect_language_strips_region_and_falls_back() {
        let manager = LocalizationManager::new().unwrap();
        assert_eq!(manager.detect_language(Some("en-GB")), "en");
        assert_eq!(manager.detect_language(Some("ta")), "en");
        assert_eq!(manager.detect_language(None), "en");
    }
}
