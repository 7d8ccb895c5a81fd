//! `portico config` subcommands.
//!
//! Reads go through [`ConfigManager::load`], so they report the settings
//! the server would actually run with, environment overrides included.
//! Writes edit the file's raw TOML tree and reach disk only once the edited
//! tree still deserializes and passes [`ConfigManager::check`].

use std::path::{Path, PathBuf};

use crate::cli::ConfigAction;
use crate::config::{ConfigManager, PorticoConfig};
use crate::{Error, Result};

/// Run a config subcommand against [`PorticoConfig`].
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => show_path::<PorticoConfig>(config_path),
        ConfigAction::Get { key } => show_key::<PorticoConfig>(config_path, &key),
        ConfigAction::Set { key, value } => set_key::<PorticoConfig>(config_path, &key, &value),
        ConfigAction::Init { file, force } => {
            init_file::<PorticoConfig>(file.as_deref().or(config_path), force)
        }
        ConfigAction::Export { docker_env } => {
            let config = PorticoConfig::load(config_path)?;
            for line in env_lines(&config, docker_env)? {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn config_file<C: ConfigManager>(explicit: Option<&str>) -> Result<PathBuf> {
    C::resolve_config_path(explicit)
        .ok_or_else(|| Error::config("no config directory on this platform; pass --config"))
}

/// Print the config file location, noting when it has not been created.
pub fn show_path<C: ConfigManager>(explicit: Option<&str>) -> Result<()> {
    let path = config_file::<C>(explicit)?;
    println!("{}", path.display());
    if !path.exists() {
        eprintln!(
            "note: not created yet; `{} config init` writes the defaults there",
            C::project_name()
        );
    }
    Ok(())
}

/// Print one effective setting.
pub fn show_key<C: ConfigManager>(explicit: Option<&str>, key: &str) -> Result<()> {
    let tree = toml::Value::try_from(C::load(explicit)?)
        .map_err(|e| Error::config(format!("cannot render settings: {e}")))?;
    let value =
        lookup(&tree, key).ok_or_else(|| Error::config(format!("no setting named '{key}'")))?;
    println!("{}", render(value));
    Ok(())
}

/// Change one setting in the config file.
pub fn set_key<C: ConfigManager>(explicit: Option<&str>, key: &str, raw: &str) -> Result<()> {
    let path = config_file::<C>(explicit)?;
    let mut document = ConfigDocument::open(&path, C::project_name())?;
    assign(&mut document.tree, key, coerce(raw))?;
    document.save::<C>(key)?;
    println!("{key} = {raw} ({})", path.display());
    Ok(())
}

/// Write the default configuration to `file` or the platform location.
pub fn init_file<C: ConfigManager>(file: Option<&str>, force: bool) -> Result<()> {
    let path = match file {
        Some(file) => PathBuf::from(file),
        None => C::default_config_path()
            .ok_or_else(|| Error::config("no config directory on this platform; pass a file"))?,
    };
    if path.exists() && !force {
        return Err(Error::config(format!(
            "{} already exists; pass --force to replace it",
            path.display()
        )));
    }
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| Error::io_with_path(e, dir))?;
    }
    std::fs::write(&path, C::default().to_toml_string()?)
        .map_err(|e| Error::io_with_path(e, &path))?;
    println!("wrote defaults to {}", path.display());
    Ok(())
}

/// `KEY=value` lines for the overridable settings, or `--env KEY=value`
/// arguments for `docker run`.
pub fn env_lines<C: ConfigManager>(config: &C, docker_env: bool) -> Result<Vec<String>> {
    let prefix = if docker_env { "--env " } else { "" };
    Ok(config
        .to_env_vars()?
        .into_iter()
        .map(|(key, value)| format!("{prefix}{key}={value}"))
        .collect())
}

/// A config file held as a raw TOML tree while it is edited.
struct ConfigDocument {
    path: PathBuf,
    tree: toml::Value,
}

impl ConfigDocument {
    fn open(path: &Path, project: &str) -> Result<Self> {
        if !path.exists() {
            return Err(Error::config(format!(
                "{} is missing; create it with `{project} config init`",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let tree = toml::from_str(&text)
            .map_err(|e| Error::config(format!("{} is not valid TOML: {e}", path.display())))?;
        Ok(Self {
            path: path.to_path_buf(),
            tree,
        })
    }

    fn save<C: ConfigManager>(&self, key: &str) -> Result<()> {
        let rejected = |reason: String| Error::config(format!("'{key}' rejected: {reason}"));
        let text = toml::to_string_pretty(&self.tree).map_err(|e| rejected(e.to_string()))?;
        let config: C = toml::from_str(&text).map_err(|e| rejected(e.to_string()))?;
        config.check().map_err(|e| rejected(e.to_string()))?;
        std::fs::write(&self.path, text).map_err(|e| Error::io_with_path(e, &self.path))
    }
}

/// Follow a dotted key such as `session.ttl_secs` through nested tables.
pub fn lookup<'a>(tree: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.')
        .try_fold(tree, |node, part| node.as_table()?.get(part))
}

/// Store `value` under a dotted key, adding missing tables on the way.
pub fn assign(tree: &mut toml::Value, key: &str, value: toml::Value) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|part| part.is_empty()) {
        return Err(Error::config(format!("'{key}' is not a dotted key")));
    }
    let (leaf, parents) = parts
        .split_last()
        .ok_or_else(|| Error::config(format!("'{key}' is not a dotted key")))?;
    let not_a_table =
        || Error::config(format!("'{key}' passes through a value that is not a table"));

    let mut node = tree;
    for part in parents {
        node = node
            .as_table_mut()
            .ok_or_else(not_a_table)?
            .entry(*part)
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    }
    node.as_table_mut()
        .ok_or_else(not_a_table)?
        .insert((*leaf).to_string(), value);
    Ok(())
}

/// Read a command-line value as a bool, integer, or finite float, and as
/// a string when it is none of those.
pub fn coerce(raw: &str) -> toml::Value {
    if let Ok(flag) = raw.parse::<bool>() {
        return toml::Value::Boolean(flag);
    }
    if let Ok(number) = raw.parse::<i64>() {
        return toml::Value::Integer(number);
    }
    match raw.parse::<f64>() {
        Ok(number) if number.is_finite() => toml::Value::Float(number),
        _ => toml::Value::String(raw.to_string()),
    }
}

/// Strings print bare and tables print as TOML sections; everything else
/// uses its inline TOML form.
pub fn render(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Table(table) => {
            toml::to_string_pretty(table).unwrap_or_else(|_| value.to_string())
        }
        other => other.to_string(),
    }
}
