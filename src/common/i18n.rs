// src/common/i18n.rs

use std::collections::HashMap;

// Catálogos embutidos no binário
const CATALOGS: &[(&str, &str)] = &[
    ("en", include_str!("../../locales/en.json")),
    ("pt", include_str!("../../locales/pt.json")),
];

pub const DEFAULT_LOCALE: &str = "en";

/// Guarda as mensagens traduzidas, por idioma e chave.
#[derive(Debug, Clone, Default)]
pub struct I18nStore {
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl I18nStore {
    pub fn load() -> anyhow::Result<Self> {
        let mut catalogs = HashMap::new();
        for (lang, raw) in CATALOGS {
            let messages: HashMap<String, String> = serde_json::from_str(raw)
                .map_err(|e| anyhow::anyhow!("Catálogo '{}' inválido: {}", lang, e))?;
            catalogs.insert(lang.to_string(), messages);
        }
        Ok(Self { catalogs })
    }

    /// Idioma pedido -> inglês -> a própria chave.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.catalogs
            .get(lang)
            .and_then(|c| c.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LOCALE).and_then(|c| c.get(key)))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Igual a `translate`, substituindo `{nome}` pelos parâmetros.
    pub fn translate_with(&self, lang: &str, key: &str, params: &[(&str, &str)]) -> String {
        params
            .iter()
            .fold(self.translate(lang, key), |msg, (name, value)| {
                msg.replace(&format!("{{{}}}", name), value)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_english_then_key() {
        let store = I18nStore::load().unwrap();
        assert_eq!(store.translate("de", "select_reason"), "Please select a reason");
        assert_eq!(store.translate("pt", "no_such_key"), "no_such_key");
    }

    #[test]
    fn portuguese_catalog_is_used_when_requested() {
        let store = I18nStore::load().unwrap();
        assert_eq!(store.translate("pt", "passwords_do_not_match"), "As senhas não coincidem");
    }

    #[test]
    fn substitutes_named_params() {
        let store = I18nStore::load().unwrap();
        let msg = store.translate_with("en", "resource_not_found", &[("resource", "Order")]);
        assert_eq!(msg, "Order not found.");
    }

    #[test]
    fn catalogs_have_the_same_keys() {
        let store = I18nStore::load().unwrap();
        let en = &store.catalogs["en"];
        let pt = &store.catalogs["pt"];
        for key in en.keys() {
            assert!(pt.contains_key(key), "missing pt translation for {}", key);
        }
    }
}
