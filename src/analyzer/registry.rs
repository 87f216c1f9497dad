//! Name-based selection of analyzer implementations

use super::{AnalyzerProvider, ReferenceProvider, TemplateProvider};

/// Set of implementations that can be graded, looked up by name
pub struct Registry {
    providers: Vec<Box<dyn AnalyzerProvider>>,
}

impl Registry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Registry with the implementations shipped in this crate
    pub fn builtin() -> Self {
        Self::new()
            .with(Box::new(ReferenceProvider))
            .with(Box::new(TemplateProvider))
    }

    /// Add an implementation. A later registration with the same name
    /// shadows an earlier one.
    pub fn with(mut self, provider: Box<dyn AnalyzerProvider>) -> Self {
        self.providers.insert(0, provider);
        self
    }

    /// Find an implementation by name or alias
    pub fn get(&self, name: &str) -> Option<&dyn AnalyzerProvider> {
        let name = name.trim();
        self.providers
            .iter()
            .find(|p| p.name() == name || p.aliases().iter().any(|a| *a == name))
            .map(|p| p.as_ref())
    }

    /// Registered names, in registration order
    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().rev().map(|p| p.name()).collect()
    }

    pub fn providers(&self) -> impl Iterator<Item = &dyn AnalyzerProvider> {
        self.providers.iter().rev().map(|p| p.as_ref())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{AnalyzerError, LoadRequest, MovieAnalyzer};

    struct Shadow;

    impl AnalyzerProvider for Shadow {
        fn name(&self) -> &'static str {
            "reference"
        }

        fn description(&self) -> &'static str {
            "shadow"
        }

        fn load(&self, _request: &LoadRequest) -> Result<Box<dyn MovieAnalyzer>, AnalyzerError> {
            Err(AnalyzerError::NotImplemented("load"))
        }
    }

    #[test]
    fn test_lookup_by_name_and_alias() {
        let registry = Registry::builtin();
        assert_eq!(registry.get("reference").unwrap().name(), "reference");
        assert_eq!(registry.get("example_solve").unwrap().name(), "reference");
        assert_eq!(registry.get(" template ").unwrap().name(), "template");
        assert!(registry.get("mock_solve").is_none());
    }

    #[test]
    fn test_names_in_registration_order() {
        assert_eq!(Registry::builtin().names(), vec!["reference", "template"]);
    }

    #[test]
    fn test_later_registration_shadows_earlier() {
        let registry = Registry::builtin().with(Box::new(Shadow));
        assert_eq!(registry.get("reference").unwrap().description(), "shadow");
    }
}
