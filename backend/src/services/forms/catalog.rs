//! Template folders on disk, reconciled with machine assignments.
//!
//! Each folder under the forms root is one template; its name is the template
//! id. An optional `meta.json` in the folder describes it. Nothing is cached:
//! every listing walks the directory again, which keeps results current and
//! is fine for the handful of templates a plant has.

use crate::error::ApiError;
use common::model::form::{
    AvailableForm, MachineAssignment, TemplateListing, TemplateMeta, UNKNOWN_MACHINE,
};
use log::warn;
use regex::Regex;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

const META_FILE: &str = "meta.json";
const INVALID_META: &str = "Invalid meta.json";

static TEMPLATE_ID_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[^\s/\\](?:[^/\\]*[^\s/\\])?$"));

/// A template folder name that is safe to store and to join onto the forms
/// root: non-empty, no surrounding whitespace, no path separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateId(String);

impl TemplateId {
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        if !Self::is_well_formed(raw)? {
            return Err(ApiError::BadRequest(format!(
                "Invalid template id '{}'",
                raw
            )));
        }
        Ok(TemplateId(raw.to_string()))
    }

    fn is_well_formed(raw: &str) -> Result<bool, ApiError> {
        let pattern = TEMPLATE_ID_PATTERN
            .as_ref()
            .map_err(|e| ApiError::Internal(format!("Regex error: {}", e)))?;
        Ok(raw != "." && raw != ".." && pattern.is_match(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One template folder and its sidecar, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub id: String,
    pub meta: Option<TemplateMeta>,
}

impl Template {
    pub fn listing(&self) -> TemplateListing {
        TemplateListing {
            folder_name: self.id.clone(),
            meta: self.meta.clone(),
            has_meta: self.meta.is_some(),
            url: format!("/form/{}", self.id),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FormCatalog {
    root: Arc<PathBuf>,
}

impl FormCatalog {
    pub fn new(root: impl AsRef<Path>) -> Self {
        FormCatalog {
            root: Arc::new(root.as_ref().to_path_buf()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn template_exists(&self, id: &TemplateId) -> bool {
        self.root.join(id.as_str()).is_dir()
    }

    /// Every usable template folder, sorted by id. Blocking.
    ///
    /// Folders whose name is not a valid [`TemplateId`] (surrounding
    /// whitespace, backslashes) are skipped with a warning. A missing root
    /// yields an empty list.
    pub fn templates(&self) -> Result<Vec<Template>, ApiError> {
        let entries = match fs::read_dir(self.root.as_ref()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Forms directory {} does not exist", self.root.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut templates = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!("Skipping template folder with non UTF-8 name {:?}", raw);
                    continue;
                }
            };
            if !TemplateId::is_well_formed(&name)? {
                warn!("Skipping template folder {:?}: not a valid template id", name);
                continue;
            }
            let meta = read_meta(&entry.path(), &name);
            templates.push(Template { id: name, meta });
        }
        templates.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(templates)
    }
}

/// Loads `meta.json` from a template folder. An unreadable or malformed file
/// does not fail the listing; it comes back as metadata carrying an error.
fn read_meta(dir: &Path, id: &str) -> Option<TemplateMeta> {
    let path = dir.join(META_FILE);
    if !path.is_file() {
        return None;
    }
    let parsed = fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str::<Value>(&text).map_err(|e| e.to_string()));
    match parsed {
        Ok(value @ Value::Object(_)) => Some(meta_from_json(&value)),
        Ok(_) => {
            warn!("Error reading meta.json for {}: not a JSON object", id);
            Some(invalid_meta())
        }
        Err(e) => {
            warn!("Error reading meta.json for {}: {}", id, e);
            Some(invalid_meta())
        }
    }
}

fn invalid_meta() -> TemplateMeta {
    TemplateMeta {
        error: Some(INVALID_META.to_string()),
        ..TemplateMeta::default()
    }
}

/// Picks the fields the server reads out of a sidecar. Strings are taken as
/// they are, numbers as their text; other shapes are ignored.
pub fn meta_from_json(value: &Value) -> TemplateMeta {
    let text = |key: &str| match value.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    TemplateMeta {
        checksheet_name: text("checksheet_name"),
        department: text("department"),
        model: text("model"),
        as_group: text("as_group"),
        version: text("version"),
        error: None,
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

/// Flattens templates and assignments into the list of fillable forms.
///
/// A template with N assignments yields N machine-specific entries; one with
/// none yields a single generic entry whose machine is [`UNKNOWN_MACHINE`].
pub fn resolve_forms(
    templates: &[Template],
    assignments: &[MachineAssignment],
) -> Result<Vec<AvailableForm>, ApiError> {
    let mut forms = Vec::new();
    for template in templates {
        let meta = template.meta.clone().unwrap_or_default();
        let name = non_blank(&meta.checksheet_name).unwrap_or_else(|| template.id.clone());
        let assigned: Vec<&MachineAssignment> = assignments
            .iter()
            .filter(|a| a.assigned_form == template.id)
            .collect();

        if assigned.is_empty() {
            let label = match non_blank(&meta.model) {
                Some(model) => format!("{} - {}", name, model),
                None => name.clone(),
            };
            forms.push(AvailableForm {
                id: template.id.clone(),
                label,
                path: format!("/{}", template.id),
                machine_no: UNKNOWN_MACHINE.to_string(),
                model: meta.model.clone(),
                department: meta.department.clone(),
                as_group: meta.as_group.clone(),
                version: meta.version.clone(),
                name,
            });
            continue;
        }

        for machine in assigned {
            let model = if machine.model.trim().is_empty() {
                non_blank(&meta.model)
            } else {
                Some(machine.model.clone())
            };
            let department = non_blank(&machine.department).or_else(|| meta.department.clone());

            let mut query = vec![("machine_no", machine.machine_no.as_str())];
            if let Some(model) = model.as_deref() {
                query.push(("model", model));
            }
            let query = serde_urlencoded::to_string(&query)
                .map_err(|e| ApiError::Internal(format!("cannot encode form path: {}", e)))?;

            forms.push(AvailableForm {
                id: template.id.clone(),
                name: name.clone(),
                label: format!("{} ({})", name, machine.machine_no),
                path: format!("/{}?{}", template.id, query),
                machine_no: machine.machine_no.clone(),
                model,
                department,
                as_group: meta.as_group.clone(),
                version: meta.version.clone(),
            });
        }
    }
    Ok(forms)
}

/// Keeps the entries of one department; `None` keeps everything.
pub fn filter_by_department(forms: Vec<AvailableForm>, scope: Option<&str>) -> Vec<AvailableForm> {
    match scope {
        None => forms,
        Some(department) => forms
            .into_iter()
            .filter(|form| form.department.as_deref() == Some(department))
            .collect(),
    }
}
