//! Playground request forms.
//!
//! Each form maps user input directly onto a request DTO. Validation is the
//! client-side schema check the original screens performed before
//! submission: it rejects locally with `Error::Validation` and never sends
//! a request for invalid input.

use uuid::Uuid;

use atrium_core::{defaults, Error, ExtractRequest, RagRequest, Result, SearchRequest};

/// Inputs of the search playground form.
#[derive(Debug, Clone)]
pub struct SearchForm {
    pub query: String,
    pub top_k: u32,
    pub kb_id: Option<Uuid>,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            query: String::new(),
            top_k: defaults::TOP_K,
            kb_id: None,
        }
    }
}

impl SearchForm {
    /// Validate and build the request DTO.
    pub fn to_request(&self) -> Result<SearchRequest> {
        validate_query(&self.query)?;
        validate_top_k(self.top_k)?;
        Ok(SearchRequest {
            query: self.query.trim().to_string(),
            top_k: self.top_k,
            kb_id: self.kb_id,
        })
    }
}

/// Inputs of the RAG playground form (also the base of comparison mode).
#[derive(Debug, Clone)]
pub struct RagForm {
    pub query: String,
    pub top_k: u32,
    pub model: String,
    pub temperature: f32,
    pub kb_id: Option<Uuid>,
}

impl Default for RagForm {
    fn default() -> Self {
        Self {
            query: String::new(),
            top_k: defaults::TOP_K,
            model: defaults::RAG_MODEL.to_string(),
            temperature: defaults::TEMPERATURE,
            kb_id: None,
        }
    }
}

impl RagForm {
    /// Validate and build the request DTO.
    pub fn to_request(&self) -> Result<RagRequest> {
        validate_query(&self.query)?;
        validate_top_k(self.top_k)?;
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Validation(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.model.trim().is_empty() {
            return Err(Error::Validation("model is required".to_string()));
        }
        Ok(RagRequest {
            query: self.query.trim().to_string(),
            top_k: self.top_k,
            model: self.model.clone(),
            temperature: self.temperature,
            kb_id: self.kb_id,
        })
    }
}

/// Inputs of the extraction playground form.
#[derive(Debug, Clone, Default)]
pub struct ExtractForm {
    pub text: String,
    pub fields: Vec<String>,
}

impl ExtractForm {
    /// Validate and build the request DTO.
    pub fn to_request(&self) -> Result<ExtractRequest> {
        if self.text.trim().is_empty() {
            return Err(Error::Validation("text to extract from is required".to_string()));
        }
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
        if fields.is_empty() {
            return Err(Error::Validation(
                "at least one field to extract is required".to_string(),
            ));
        }
        Ok(ExtractRequest {
            text: self.text.clone(),
            fields,
        })
    }
}

fn validate_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(Error::Validation("query must not be empty".to_string()));
    }
    Ok(())
}

fn validate_top_k(top_k: u32) -> Result<()> {
    if top_k == 0 || top_k > defaults::TOP_K_MAX {
        return Err(Error::Validation(format!(
            "top_k must be between 1 and {}, got {}",
            defaults::TOP_K_MAX,
            top_k
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_form_rejects_empty_query() {
        let form = SearchForm::default();
        match form.to_request() {
            Err(Error::Validation(msg)) => assert!(msg.contains("query")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_search_form_rejects_out_of_range_top_k() {
        let form = SearchForm {
            query: "ml".to_string(),
            top_k: 0,
            kb_id: None,
        };
        assert!(form.to_request().is_err());

        let form = SearchForm {
            query: "ml".to_string(),
            top_k: defaults::TOP_K_MAX + 1,
            kb_id: None,
        };
        assert!(form.to_request().is_err());
    }

    #[test]
    fn test_search_form_trims_query() {
        let form = SearchForm {
            query: "  embeddings  ".to_string(),
            ..SearchForm::default()
        };
        assert_eq!(form.to_request().unwrap().query, "embeddings");
    }

    #[test]
    fn test_rag_form_defaults_are_valid_once_query_set() {
        let form = RagForm {
            query: "What is machine learning?".to_string(),
            ..RagForm::default()
        };
        let req = form.to_request().unwrap();
        assert_eq!(req.model, defaults::RAG_MODEL);
        assert_eq!(req.top_k, defaults::TOP_K);
    }

    #[test]
    fn test_rag_form_rejects_bad_temperature() {
        let form = RagForm {
            query: "q".to_string(),
            temperature: 2.5,
            ..RagForm::default()
        };
        assert!(form.to_request().is_err());
    }

    #[test]
    fn test_extract_form_drops_blank_fields() {
        let form = ExtractForm {
            text: "name: Ada".to_string(),
            fields: vec!["name".to_string(), "  ".to_string()],
        };
        let req = form.to_request().unwrap();
        assert_eq!(req.fields, vec!["name".to_string()]);
    }

    #[test]
    fn test_extract_form_rejects_no_fields() {
        let form = ExtractForm {
            text: "something".to_string(),
            fields: vec![],
        };
        assert!(form.to_request().is_err());
    }
}
