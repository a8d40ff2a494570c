use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Startup code handed to the interpreter to bring up the front-end
pub const BOOTSTRAP_EXPRESSION: &str = "import refl1d.main; refl1d.main.gui()";

pub const PYTHON: &str = "PYTHON";
pub const PYTHONHOME: &str = "PYTHONHOME";
pub const PYTHONPATH: &str = "PYTHONPATH";
pub const DYLD_LIBRARY_PATH: &str = "DYLD_LIBRARY_PATH";
pub const DYLD_FRAMEWORK_PATH: &str = "DYLD_FRAMEWORK_PATH";

/// Where the bundle keeps its pieces, relative to the bundle root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleLayout {
    pub interpreter: &'static str,
    pub home: &'static str,
    pub module_path: &'static str,
    pub library_path: &'static str,
    pub framework_path: &'static str,
}

impl BundleLayout {
    /// macOS application bundle layout
    pub const APP_BUNDLE: BundleLayout = BundleLayout {
        interpreter: "Contents/MacOS/python",
        home: "Contents/Resources",
        module_path: "Contents/Resources",
        library_path: "Contents/Frameworks",
        framework_path: "Contents/Frameworks",
    };
}

impl Default for BundleLayout {
    fn default() -> Self {
        BundleLayout::APP_BUNDLE
    }
}

/// The runtime environment the interpreter is started with
///
/// Every value is the bundle root joined with a fixed suffix from the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentBindings {
    python: PathBuf,
    python_home: PathBuf,
    python_path: PathBuf,
    library_path: PathBuf,
    framework_path: PathBuf,
}

impl EnvironmentBindings {
    pub fn new(root: &Path, layout: &BundleLayout) -> Self {
        Self {
            python: root.join(layout.interpreter),
            python_home: root.join(layout.home),
            python_path: root.join(layout.module_path),
            library_path: root.join(layout.library_path),
            framework_path: root.join(layout.framework_path),
        }
    }

    /// Path of the bundled interpreter
    pub fn interpreter(&self) -> &Path {
        &self.python
    }

    /// All bindings as (variable, value) pairs
    pub fn vars(&self) -> [(&'static str, &Path); 5] {
        [
            (PYTHON, self.python.as_path()),
            (PYTHONHOME, self.python_home.as_path()),
            (PYTHONPATH, self.python_path.as_path()),
            (DYLD_LIBRARY_PATH, self.library_path.as_path()),
            (DYLD_FRAMEWORK_PATH, self.framework_path.as_path()),
        ]
    }

    /// Layer the bindings over an inherited environment, bindings winning on conflict
    pub fn overlay<I>(&self, inherited: I) -> Vec<(OsString, OsString)>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut env: HashMap<OsString, OsString> = inherited.into_iter().collect();
        for (key, value) in self.vars() {
            env.insert(OsString::from(key), value.as_os_str().to_os_string());
        }
        env.into_iter().collect()
    }

    /// Layer the bindings over the launcher's own environment
    pub fn to_envp(&self) -> Vec<(OsString, OsString)> {
        self.overlay(std::env::vars_os())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool_app() -> EnvironmentBindings {
        EnvironmentBindings::new(Path::new("/Apps/Tool.app"), &BundleLayout::default())
    }

    fn lookup<'a>(env: &'a [(OsString, OsString)], key: &str) -> Option<&'a OsString> {
        env.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[test]
    fn app_bundle_interpreter_path() {
        let bindings = tool_app();
        assert_eq!(
            bindings.interpreter(),
            Path::new("/Apps/Tool.app/Contents/MacOS/python")
        );
    }

    #[test]
    fn every_value_is_root_plus_suffix() {
        let layout = BundleLayout::default();
        let suffixes = [
            layout.interpreter,
            layout.home,
            layout.module_path,
            layout.library_path,
            layout.framework_path,
        ];

        for root in ["/Apps/Tool.app", "/Users/someone/Desktop/Other Tool.app"] {
            let root = Path::new(root);
            let bindings = EnvironmentBindings::new(root, &layout);
            for ((_, value), suffix) in bindings.vars().iter().zip(suffixes) {
                assert!(value.is_absolute());
                assert!(value.starts_with(root));
                assert_eq!(value.strip_prefix(root).unwrap(), Path::new(suffix));
            }
        }
    }

    #[test]
    fn both_native_library_variables_are_set() {
        let bindings = tool_app();
        let names: Vec<&str> = bindings.vars().iter().map(|(name, _)| *name).collect();
        assert!(names.contains(&"DYLD_LIBRARY_PATH"));
        assert!(names.contains(&"DYLD_FRAMEWORK_PATH"));
    }

    #[test]
    fn overlay_replaces_conflicts_and_keeps_the_rest() {
        let bindings = tool_app();
        let inherited = vec![
            (OsString::from("PYTHONPATH"), OsString::from("/somewhere/else")),
            (OsString::from("HOME"), OsString::from("/Users/someone")),
        ];

        let env = bindings.overlay(inherited);

        assert_eq!(
            lookup(&env, "PYTHONPATH"),
            Some(&OsString::from("/Apps/Tool.app/Contents/Resources"))
        );
        assert_eq!(lookup(&env, "HOME"), Some(&OsString::from("/Users/someone")));
        assert_eq!(env.len(), 6);
    }
}
