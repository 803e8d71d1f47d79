//! Build manifest describing what the packaging tool should bundle

use serde::{Deserialize, Serialize};

/// Modules that need their package data collected explicitly, not just imported.
pub const COLLECT_DATA_MODULES: [&str; 2] = ["dbdicom", "dipy"];

/// Module whose installed package directory must be bundled as data.
pub const ITK_MODULE: &str = "itk";

/// A non-code file or directory bundled alongside the executable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataMapping {
    /// Path on disk, relative to the working directory or absolute
    pub source: String,
    /// Location inside the bundle, relative to the bundle root
    pub destination: String,
}

impl DataMapping {
    /// Create a mapping from `source` to `destination`
    #[must_use]
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Bundle a folder under the same name it has in the working directory
    #[must_use]
    pub fn folder(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            source: name.clone(),
            destination: name,
        }
    }

    /// Render as a packager `--add-data` value.
    ///
    /// The destination is always anchored at the bundle root with `.` followed
    /// by the platform path separator, e.g. `assets:./assets` on POSIX.
    #[must_use]
    pub fn render(&self, data_separator: char, path_separator: char) -> String {
        format!(
            "{}{data_separator}.{path_separator}{}",
            self.source, self.destination
        )
    }
}

/// Everything the assembler needs to know about one build
///
/// Built once per invocation and not modified after the pipeline takes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildManifest {
    /// Entry-point file stem; also the name of the produced executable
    pub project: String,
    /// Produce a single self-extracting file instead of a directory
    pub single_file: bool,
    /// Keep a console window attached to the executable
    pub show_console: bool,
    /// Extra data bundled in order
    pub data_mappings: Vec<DataMapping>,
    /// Modules the packager fails to detect on its own, insertion ordered
    hidden_modules: Vec<String>,
}

impl BuildManifest {
    /// Create a manifest with the defaults: one file, no console, nothing extra
    #[must_use]
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            single_file: true,
            show_console: false,
            data_mappings: Vec::new(),
            hidden_modules: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_single_file(mut self, single_file: bool) -> Self {
        self.single_file = single_file;
        self
    }

    #[must_use]
    pub fn with_console(mut self, show_console: bool) -> Self {
        self.show_console = show_console;
        self
    }

    /// Append one folder mapping per name, keeping the given order
    #[must_use]
    pub fn with_data_folders<I, S>(mut self, folders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data_mappings
            .extend(folders.into_iter().map(DataMapping::folder));
        self
    }

    #[must_use]
    pub fn with_data_mapping(mut self, mapping: DataMapping) -> Self {
        self.data_mappings.push(mapping);
        self
    }

    /// Add hidden modules; duplicates are ignored
    #[must_use]
    pub fn with_hidden_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for module in modules {
            let module = module.into();
            if !self.hidden_modules.contains(&module) {
                self.hidden_modules.push(module);
            }
        }
        self
    }

    /// Hidden modules in insertion order
    #[must_use]
    pub fn hidden_modules(&self) -> &[String] {
        &self.hidden_modules
    }

    #[must_use]
    pub fn has_hidden_module(&self, name: &str) -> bool {
        self.hidden_modules.iter().any(|m| m == name)
    }

    /// Whether the ITK package directory has to be located and bundled
    #[must_use]
    pub fn needs_itk_data(&self) -> bool {
        self.has_hidden_module(ITK_MODULE)
    }

    /// Hidden modules that also need `--collect-datas`, in fixed order
    pub fn collect_data_modules(&self) -> impl Iterator<Item = &'static str> + '_ {
        COLLECT_DATA_MODULES
            .into_iter()
            .filter(|name| self.has_hidden_module(name))
    }

    /// File name of the entry-point script looked up in the working directory
    #[must_use]
    pub fn entry_script_name(&self) -> String {
        format!("{}.py", self.project)
    }

    /// Name of the spec file the packager writes next to the entry point
    #[must_use]
    pub fn spec_file_name(&self) -> String {
        format!("{}.spec", self.project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_defaults() {
        let manifest = BuildManifest::new("myapp");
        assert!(manifest.single_file);
        assert!(!manifest.show_console);
        assert!(manifest.data_mappings.is_empty());
        assert!(manifest.hidden_modules().is_empty());
        assert_eq!(manifest.entry_script_name(), "myapp.py");
        assert_eq!(manifest.spec_file_name(), "myapp.spec");
    }

    #[test]
    fn test_hidden_modules_keep_order_and_dedup() {
        let manifest = BuildManifest::new("app").with_hidden_modules([
            "matplotlib",
            "dipy",
            "matplotlib",
            "dbdicom",
        ]);
        assert_eq!(manifest.hidden_modules(), ["matplotlib", "dipy", "dbdicom"]);
    }

    #[test]
    fn test_collect_data_modules_fixed_order() {
        let manifest = BuildManifest::new("app").with_hidden_modules(["dipy", "dbdicom"]);
        let collected: Vec<_> = manifest.collect_data_modules().collect();
        assert_eq!(collected, vec!["dbdicom", "dipy"]);

        let manifest = BuildManifest::new("app").with_hidden_modules(["numpy"]);
        assert_eq!(manifest.collect_data_modules().count(), 0);
    }

    #[test]
    fn test_render_mapping() {
        let mapping = DataMapping::folder("assets");
        assert_eq!(mapping.render(':', '/'), "assets:./assets");
        assert_eq!(mapping.render(';', '\\'), "assets;.\\assets");
    }
}
