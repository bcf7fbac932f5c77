use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use thiserror::Error;

use crate::plugin::descriptor::{self, DESCRIPTOR_FILE_NAME, DescriptorError};
use crate::plugin::info::PluginInfo;
use crate::plugin::options::generate_options;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("plugins path {} must be a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to list {}: {source}", .path.display())]
    List {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Descriptor {
        path: PathBuf,
        #[source]
        source: DescriptorError,
    },
}

/// Discovers every plugin under `roots` and builds their bootstrap JVM options.
pub fn bootstrap_jvm_options(roots: &[PathBuf]) -> Result<Vec<String>, DiscoveryError> {
    let plugins = discover_all(roots)?;
    Ok(generate_options(&plugins))
}

pub fn discover_all(roots: &[PathBuf]) -> Result<Vec<PluginInfo>, DiscoveryError> {
    let mut plugins = Vec::new();
    for root in roots {
        plugins.extend(discover_plugins(root)?);
    }
    Ok(plugins)
}

/// Reads each direct subdirectory of `root` as one plugin, in file-name order.
pub fn discover_plugins(root: &Path) -> Result<Vec<PluginInfo>, DiscoveryError> {
    if !root.is_dir() {
        return Err(DiscoveryError::NotADirectory(root.to_path_buf()));
    }

    let mut plugins = Vec::new();
    for (path, is_dir) in list_children(root)? {
        if !is_dir {
            tracing::debug!("skipping non-directory entry {}", path.display());
            continue;
        }
        plugins.push(read_plugin(&path)?);
    }

    tracing::info!("discovered {} plugins in {}", plugins.len(), root.display());
    Ok(plugins)
}

fn read_plugin(plugin_dir: &Path) -> Result<PluginInfo, DiscoveryError> {
    let mut jar_paths = Vec::new();
    let mut properties = HashMap::new();

    for (path, is_dir) in list_children(plugin_dir)? {
        if is_dir {
            continue;
        }

        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_lowercase()) else {
            continue;
        };

        if name.ends_with(".jar") {
            jar_paths.push(path.to_string_lossy().into_owned());
        } else if name == DESCRIPTOR_FILE_NAME {
            properties = read_descriptor(&path)?;
        }
    }

    if properties.is_empty() {
        tracing::debug!("no descriptor properties in {}", plugin_dir.display());
    }

    Ok(PluginInfo::new(jar_paths, properties))
}

fn read_descriptor(path: &Path) -> Result<HashMap<String, String>, DiscoveryError> {
    let bytes = fs::read(path).map_err(|source| DiscoveryError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    descriptor::parse_properties(&descriptor::decode(&bytes)).map_err(|source| DiscoveryError::Descriptor {
        path: path.to_path_buf(),
        source,
    })
}

/// Direct children of `dir` sorted by file name, paired with a directory flag.
fn list_children(dir: &Path) -> Result<Vec<(PathBuf, bool)>, DiscoveryError> {
    let mut entries = Vec::new();

    for entry in WalkBuilder::new(dir)
        .max_depth(Some(1))
        .standard_filters(false)
        .follow_links(true)
        .build()
    {
        let entry = entry.map_err(|source| DiscoveryError::List {
            path: dir.to_path_buf(),
            source,
        })?;

        if entry.depth() == 0 {
            continue;
        }

        let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
        entries.push((entry.into_path(), is_dir));
    }

    entries.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));
    Ok(entries)
}
