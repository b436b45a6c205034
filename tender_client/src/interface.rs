//! Interface descriptions: which operations a remote service exposes and
//! the shape of their arguments and results.
//!
//! A description is either produced by `#[service]` from a trait or loaded
//! from the JSON artifact emitted alongside the backend build.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    service: String,
    #[serde(default)]
    operations: BTreeMap<String, Signature>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "unit_type")]
    pub output: String,
}

fn unit_type() -> String {
    "()".to_string()
}

impl Signature {
    pub fn new(args: &[&str], output: &str) -> Signature {
        Signature {
            args: args.iter().map(|arg| arg.to_string()).collect(),
            output: output.to_string(),
        }
    }
}

impl Interface {
    pub fn new(service: impl Into<String>) -> Interface {
        Interface {
            service: service.into(),
            operations: BTreeMap::new(),
        }
    }

    pub fn with_operation(mut self, name: impl Into<String>, signature: Signature) -> Interface {
        self.operations.insert(name.into(), signature);
        self
    }

    /// Adds every operation of `other`; entries of `other` win on name clashes.
    pub fn merge(mut self, other: Interface) -> Interface {
        self.operations.extend(other.operations);
        self
    }

    pub fn from_json(json: &str) -> Result<Interface, Error> {
        serde_json::from_str(json).map_err(Error::InvalidInterface)
    }

    pub fn load(path: &Path) -> Result<Interface, Error> {
        let json = std::fs::read_to_string(path).map_err(|source| Error::CannotReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Interface::from_json(&json)
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn operation(&self, name: &str) -> Option<&Signature> {
        self.operations.get(name)
    }

    pub fn operations(&self) -> impl Iterator<Item = (&str, &Signature)> {
        self.operations
            .iter()
            .map(|(name, signature)| (name.as_str(), signature))
    }

    pub fn require(&self, name: &str) -> Result<&Signature, Error> {
        self.operation(name).ok_or_else(|| Error::UnknownOperation {
            service: self.service.clone(),
            operation: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TENDER_MANAGEMENT: &str = r#"{
        "service": "tender_management",
        "operations": {
            "login": { "args": ["String", "String"], "output": "LoginResult" },
            "get_tenders": { "output": "Vec < Tender >" },
            "register": { "args": ["String", "String", "String"] }
        }
    }"#;

    #[test]
    fn parses_backend_artifact() -> Result<(), Error> {
        let interface = Interface::from_json(TENDER_MANAGEMENT)?;

        assert_eq!(interface.service(), "tender_management");
        assert_eq!(
            interface.operation("login"),
            Some(&Signature::new(&["String", "String"], "LoginResult"))
        );
        assert_eq!(interface.require("register")?.output, "()");
        assert!(interface.require("get_tenders")?.args.is_empty());
        Ok(())
    }

    #[test]
    fn missing_operation_is_reported() {
        let interface = Interface::new("tender_management");
        let err = interface.require("create_tender").unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownOperation { service, operation }
                if service == "tender_management" && operation == "create_tender"
        ));
    }

    #[test]
    fn merge_keeps_both_sides() {
        let auth = Interface::new("auth").with_operation("login", Signature::new(&[], "()"));
        let tenders =
            Interface::new("tenders").with_operation("get_tenders", Signature::new(&[], "()"));

        let merged = Interface::new("tender_management").merge(auth).merge(tenders);
        let names: Vec<&str> = merged.operations().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["get_tenders", "login"]);
        assert_eq!(merged.service(), "tender_management");
    }

    #[test]
    fn garbage_is_an_invalid_interface() {
        assert!(matches!(
            Interface::from_json("[1, 2]"),
            Err(Error::InvalidInterface(_))
        ));
    }
}
