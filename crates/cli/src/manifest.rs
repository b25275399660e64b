use anyhow::{Context, Result, bail};
use argsense::{Schema, suggest::DEFAULT_SEARCH_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MANIFEST_NAME: &str = "argsense.json";

/// On-disk description of a program's options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,

    /// Program name shown in the usage line.
    pub program: String,

    /// Budget for the did-you-mean search on unknown keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion_timeout_ms: Option<u64>,

    #[serde(default)]
    pub options: Vec<OptionManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OptionManifest {
    Flag {
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        short: Option<char>,
        #[serde(default)]
        desc: String,
    },
    Value {
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        short: Option<char>,
        #[serde(default)]
        desc: String,
        min: usize,
        #[serde(default)]
        max: usize,
        #[serde(default)]
        optional: bool,
    },
    Switch {
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        short: Option<char>,
        #[serde(default)]
        desc: String,
        min: usize,
        #[serde(default)]
        max: usize,
        #[serde(default)]
        optional: bool,
        allowed: Vec<String>,
    },
}

impl Manifest {
    /// Build a [`Schema`] through the regular builders so every schema rule applies.
    pub fn to_schema(&self) -> Result<Schema> {
        let mut schema = Schema::new(self.program.clone());
        for option in &self.options {
            let added = match option {
                OptionManifest::Flag { key, short, desc } => {
                    schema.add_flag(key.clone(), *short, desc.clone())
                }
                OptionManifest::Value {
                    key,
                    short,
                    desc,
                    min,
                    max,
                    optional,
                } => schema.add_value(*min, *max, key.clone(), *short, desc.clone(), *optional),
                OptionManifest::Switch {
                    key,
                    short,
                    desc,
                    min,
                    max,
                    optional,
                    allowed,
                } => schema.add_switch(
                    *min,
                    *max,
                    key.clone(),
                    *short,
                    allowed.iter().cloned(),
                    desc.clone(),
                    *optional,
                ),
            };
            added.with_context(|| format!("invalid option in manifest: '{}'", option.key()))?;
        }
        Ok(schema)
    }

    pub fn suggestion_timeout(&self) -> Duration {
        self.suggestion_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SEARCH_TIMEOUT)
    }

    /// The demo program: a required path, a required open-ended list,
    /// a version switch and two flags.
    pub fn demo(program: impl Into<String>) -> Self {
        Self {
            schema_version: Some(1),
            program: program.into(),
            suggestion_timeout_ms: None,
            options: vec![
                OptionManifest::Value {
                    key: "path".to_string(),
                    short: Some('p'),
                    desc: "file path".to_string(),
                    min: 1,
                    max: 1,
                    optional: false,
                },
                OptionManifest::Value {
                    key: "something".to_string(),
                    short: None,
                    desc: "something else".to_string(),
                    min: 1,
                    max: 0,
                    optional: false,
                },
                OptionManifest::Switch {
                    key: "version".to_string(),
                    short: Some('v'),
                    desc: "file version".to_string(),
                    min: 1,
                    max: 1,
                    optional: true,
                    allowed: vec!["1".to_string(), "2".to_string(), "3".to_string()],
                },
                OptionManifest::Flag {
                    key: "foo".to_string(),
                    short: None,
                    desc: "foo description".to_string(),
                },
                OptionManifest::Flag {
                    key: "bar".to_string(),
                    short: Some('b'),
                    desc: "bar description".to_string(),
                },
            ],
        }
    }
}

impl OptionManifest {
    pub fn key(&self) -> &str {
        match self {
            Self::Flag { key, .. } | Self::Value { key, .. } | Self::Switch { key, .. } => key,
        }
    }
}

/// Read a manifest from `manifest_path`, or from `argsense.json` in the current directory.
pub fn load_manifest(manifest_path: Option<&Path>) -> Result<Manifest> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let path = match manifest_path {
        Some(p) => resolve_against(&cwd, p),
        None => cwd.join(DEFAULT_MANIFEST_NAME),
    };

    if !path.exists() {
        bail!("manifest not found: {}", path.display());
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read manifest: {}", path.display()))?;
    let manifest: Manifest = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse manifest JSON: {}", path.display()))?;
    tracing::debug!(path = %path.display(), options = manifest.options.len(), "loaded manifest");
    Ok(manifest)
}

pub fn write_default_manifest(project_dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let dest = project_dir.join(DEFAULT_MANIFEST_NAME);
    if dest.exists() && !overwrite {
        bail!(
            "{} already exists (use --force to overwrite)",
            dest.display()
        );
    }

    let program = guess_program_name(project_dir).unwrap_or_else(|| "my-cli".to_string());
    let manifest = Manifest::demo(program);

    let bytes = serde_json::to_vec_pretty(&manifest).context("failed to serialize manifest")?;
    let mut out = String::from_utf8(bytes).context("manifest is not valid UTF-8")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if overwrite && dest.exists() {
        fs::remove_file(&dest).with_context(|| format!("failed to remove {}", dest.display()))?;
    }
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn guess_program_name(project_dir: &Path) -> Option<String> {
    // For `.` or other non-meaningful paths, try the current directory name.
    let file_name = project_dir.file_name().and_then(|s| s.to_str());
    let direct = file_name.filter(|s| !s.is_empty() && *s != "." && *s != "..");
    if let Some(name) = direct {
        return Some(name.to_string());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .map(|s| s.to_string())
}
