use crate::error::Error;
use serde::Deserialize;
use std::path::PathBuf;

crate::enum_as_str! {
    #[derive(Copy, Clone, PartialEq, Eq, Debug, Deserialize)]
    pub enum Dialect {
        #[serde(rename = "pim2")]
        Pim2 "pim2",
        #[serde(rename = "pim3")]
        Pim3 "pim3",
        #[serde(rename = "pim4")]
        Pim4 "pim4",
    }
}

/// Dialect profile plus the option flags consumed by the front-end.
/// `variant_records` is the single flag that changes parse behavior,
/// the rest only change recognized lexemes or diagnostic policy.
#[derive(Copy, Clone)]
pub struct Config {
    pub dialect: Dialect,
    pub variant_records: bool,
    pub octal_literals: bool,
    pub synonyms: bool,
    pub escape_tab_and_newline: bool,
    pub errant_semicolon: bool,
    pub verbose: bool,
}

impl Config {
    pub fn new(dialect: Dialect) -> Config {
        Config {
            dialect,
            variant_records: true,
            octal_literals: true,
            synonyms: true,
            escape_tab_and_newline: false,
            errant_semicolon: true,
            verbose: false,
        }
    }

    /// Flags that differ from the profile defaults, named for the
    /// `(OPTIONS …)` terminal of the AST root. Empty means the root
    /// carries `(EMPTY)` instead.
    pub fn nondefault_options(&self) -> Vec<&'static str> {
        let defaults = Config::new(self.dialect);
        let flags = [
            (self.variant_records, defaults.variant_records, "variant_records"),
            (self.octal_literals, defaults.octal_literals, "octal_literals"),
            (self.synonyms, defaults.synonyms, "synonyms"),
            (
                self.escape_tab_and_newline,
                defaults.escape_tab_and_newline,
                "escape_tab_and_newline",
            ),
            (self.errant_semicolon, defaults.errant_semicolon, "errant_semicolon"),
        ];
        flags
            .iter()
            .filter(|(value, default, _)| value != default)
            .map(|(_, _, name)| *name)
            .collect()
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new(Dialect::Pim4)
    }
}

#[derive(Deserialize)]
pub struct Manifest {
    pub dialect: Option<Dialect>,          // table key `dialect`
    pub options: Option<OptionsManifest>,  // table key [options]
}

#[derive(Deserialize)]
pub struct OptionsManifest {
    pub variant_records: Option<bool>,
    pub octal_literals: Option<bool>,
    pub synonyms: Option<bool>,
    pub escape_tab_and_newline: Option<bool>,
    pub errant_semicolon: Option<bool>,
    pub verbose: Option<bool>,
}

pub const MANIFEST_FILE: &str = "mtc.toml";

pub fn manifest_deserialize(manifest: &str, manifest_path: &PathBuf) -> Result<Manifest, Error> {
    basic_toml::from_str(manifest)
        .map_err(|error| crate::errors::manifest_parse_failed(error.to_string(), manifest_path))
}

impl Manifest {
    pub fn resolve(self) -> Config {
        let mut config = Config::new(self.dialect.unwrap_or(Dialect::Pim4));
        if let Some(options) = self.options {
            if let Some(set) = options.variant_records {
                config.variant_records = set;
            }
            if let Some(set) = options.octal_literals {
                config.octal_literals = set;
            }
            if let Some(set) = options.synonyms {
                config.synonyms = set;
            }
            if let Some(set) = options.escape_tab_and_newline {
                config.escape_tab_and_newline = set;
            }
            if let Some(set) = options.errant_semicolon {
                config.errant_semicolon = set;
            }
            if let Some(set) = options.verbose {
                config.verbose = set;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_resolve() {
        let manifest_path = PathBuf::from(MANIFEST_FILE);
        let text = "dialect = \"pim3\"\n\n[options]\nvariant_records = false\nverbose = true\n";
        let manifest = manifest_deserialize(text, &manifest_path).unwrap();
        let config = manifest.resolve();
        assert_eq!(config.dialect, Dialect::Pim3);
        assert!(!config.variant_records);
        assert!(config.verbose);
        assert!(config.octal_literals);
        assert_eq!(config.nondefault_options(), vec!["variant_records"]);
    }

    #[test]
    fn default_profile_has_no_options() {
        let config = Config::default();
        assert!(config.nondefault_options().is_empty());
    }
}
