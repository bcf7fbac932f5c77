use std::collections::HashMap;

/// Descriptor key holding the plugin classification.
pub const TYPE_KEY: &str = "type";
/// Descriptor key holding extra JVM arguments.
pub const JAVA_OPTS_KEY: &str = "java.opts";
/// `type` value that marks a plugin for the boot classpath.
pub const BOOTSTRAP_TYPE: &str = "bootstrap";

/// One installed plugin: its jars and the properties read from its descriptor.
///
/// Built once per launch and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginInfo {
    jar_paths: Vec<String>,
    properties: HashMap<String, String>,
}

impl PluginInfo {
    pub fn new(jar_paths: Vec<String>, properties: HashMap<String, String>) -> Self {
        Self {
            jar_paths,
            properties,
        }
    }

    pub fn jar_paths(&self) -> &[String] {
        &self.jar_paths
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn plugin_type(&self) -> Option<&str> {
        self.property(TYPE_KEY)
    }

    /// Exact, case-sensitive match on `type = bootstrap`.
    pub fn is_bootstrap(&self) -> bool {
        self.plugin_type() == Some(BOOTSTRAP_TYPE)
    }

    /// Raw `java.opts` value, `""` when absent.
    pub fn java_opts(&self) -> &str {
        self.property(JAVA_OPTS_KEY).unwrap_or("")
    }
}
