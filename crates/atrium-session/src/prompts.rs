//! Saved prompts and built-in prompt templates.
//!
//! Templates are shipped with the console; prompts are user-saved and live
//! in the local state store as a JSON array under a fixed key.

use std::collections::HashMap;
use uuid::Uuid;

use atrium_core::defaults::KEY_SAVED_PROMPTS;
use atrium_core::{PromptTemplate, Result, SavedPrompt};

use crate::session::SharedStore;

/// Access to saved prompts and the built-in template catalog.
pub struct PromptLibrary {
    store: SharedStore,
}

impl PromptLibrary {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// All user-saved prompts, in saved order.
    pub fn saved(&self) -> Result<Vec<SavedPrompt>> {
        let store = self.store.lock().expect("state store poisoned");
        Ok(store.get_as(KEY_SAVED_PROMPTS)?.unwrap_or_default())
    }

    /// Save a prompt. An existing prompt with the same id is replaced.
    pub fn save(&self, prompt: SavedPrompt) -> Result<()> {
        let mut prompts = self.saved()?;
        match prompts.iter_mut().find(|p| p.id == prompt.id) {
            Some(existing) => *existing = prompt,
            None => prompts.push(prompt),
        }
        let mut store = self.store.lock().expect("state store poisoned");
        store.set(KEY_SAVED_PROMPTS, &prompts)
    }

    /// Delete a saved prompt by id. Deleting an unknown id is a no-op.
    pub fn delete(&self, id: Uuid) -> Result<()> {
        let mut prompts = self.saved()?;
        prompts.retain(|p| p.id != id);
        let mut store = self.store.lock().expect("state store poisoned");
        store.set(KEY_SAVED_PROMPTS, &prompts)
    }

    /// Built-in templates shipped with the console.
    pub fn templates() -> Vec<PromptTemplate> {
        vec![
            PromptTemplate {
                name: "qa_with_context".to_string(),
                content: "Answer the question using only the provided context.\n\nQuestion: {{question}}".to_string(),
                variables: vec!["question".to_string()],
            },
            PromptTemplate {
                name: "summarize".to_string(),
                content: "Summarize the following in {{length}} sentences:\n\n{{text}}".to_string(),
                variables: vec!["length".to_string(), "text".to_string()],
            },
            PromptTemplate {
                name: "extract_entities".to_string(),
                content: "List every {{entity_type}} mentioned in:\n\n{{text}}".to_string(),
                variables: vec!["entity_type".to_string(), "text".to_string()],
            },
        ]
    }

    /// Substitute `{{variable}}` placeholders. Unknown placeholders are
    /// left in place so the gap is visible to the user.
    pub fn render(content: &str, vars: &HashMap<String, String>) -> String {
        let mut out = content.to_string();
        for (name, value) in vars {
            out = out.replace(&format!("{{{{{}}}}}", name), value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StateStore;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn library() -> (TempDir, PromptLibrary) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(Mutex::new(StateStore::open(dir.path()).unwrap()));
        (dir, PromptLibrary::new(store))
    }

    fn prompt(name: &str) -> SavedPrompt {
        SavedPrompt {
            id: Uuid::new_v4(),
            name: name.to_string(),
            content: "Hello {{who}}".to_string(),
            variables: vec!["who".to_string()],
            kb_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_save_and_list() {
        let (_dir, lib) = library();
        lib.save(prompt("greeting")).unwrap();
        lib.save(prompt("other")).unwrap();
        let saved = lib.saved().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].name, "greeting");
    }

    #[test]
    fn test_save_same_id_replaces() {
        let (_dir, lib) = library();
        let mut p = prompt("v1");
        lib.save(p.clone()).unwrap();
        p.name = "v2".to_string();
        lib.save(p).unwrap();

        let saved = lib.saved().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].name, "v2");
    }

    #[test]
    fn test_delete() {
        let (_dir, lib) = library();
        let p = prompt("doomed");
        lib.save(p.clone()).unwrap();
        lib.delete(p.id).unwrap();
        assert!(lib.saved().unwrap().is_empty());
    }

    #[test]
    fn test_render_substitutes_known_vars() {
        let mut vars = HashMap::new();
        vars.insert("who".to_string(), "world".to_string());
        assert_eq!(PromptLibrary::render("Hello {{who}}", &vars), "Hello world");
    }

    #[test]
    fn test_render_leaves_unknown_vars() {
        let vars = HashMap::new();
        assert_eq!(PromptLibrary::render("Hello {{who}}", &vars), "Hello {{who}}");
    }

    #[test]
    fn test_templates_declare_their_variables() {
        for template in PromptLibrary::templates() {
            for var in &template.variables {
                assert!(
                    template.content.contains(&format!("{{{{{}}}}}", var)),
                    "template {} missing placeholder {}",
                    template.name,
                    var
                );
            }
        }
    }
}
