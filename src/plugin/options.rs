use crate::plugin::info::PluginInfo;

/// JVM flag that appends entries to the boot classpath.
pub const BOOTCLASSPATH_PREFIX: &str = "-Xbootclasspath/a:";
const CLASSPATH_SEPARATOR: &str = ":";

/// Builds the JVM arguments contributed by bootstrap plugins.
///
/// Every non-blank `java.opts` comes first, verbatim and in plugin order.
/// One `-Xbootclasspath/a:` entry follows when at least one bootstrap
/// plugin exists, listing all their jars in plugin order.
pub fn generate_options(plugins: &[PluginInfo]) -> Vec<String> {
    let bootstrap: Vec<&PluginInfo> = plugins.iter().filter(|p| p.is_bootstrap()).collect();

    let mut options: Vec<String> = bootstrap
        .iter()
        .map(|plugin| plugin.java_opts())
        .filter(|opts| !opts.trim().is_empty())
        .map(str::to_string)
        .collect();

    if !bootstrap.is_empty() {
        let jars: Vec<&str> = bootstrap
            .iter()
            .flat_map(|plugin| plugin.jar_paths().iter().map(String::as_str))
            .collect();
        options.push(format!(
            "{BOOTCLASSPATH_PREFIX}{}",
            jars.join(CLASSPATH_SEPARATOR)
        ));
    }

    tracing::debug!(
        plugins = plugins.len(),
        bootstrap = bootstrap.len(),
        "generated bootstrap jvm options"
    );

    options
}
