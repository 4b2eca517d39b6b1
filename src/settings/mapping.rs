use serde::Serialize;
use serde_json::{
    Map,
    Value,
};

use super::{
    Data,
    Dedupe,
    Prep,
    PrepRound,
    Prescreen,
    Project,
    Script,
    Settings,
    Source,
};
use crate::core::LitrevError;

/// Builds the typed settings from a raw backend document. Missing or mistyped
/// fields default silently; list entries keep their document order.
pub fn settings_from_raw(raw: &Map<String, Value>) -> Settings {
    Settings {
        project: project_from_raw(section(raw, "project")),
        sources: sources_from_raw(raw.get("sources")),
        prep: prep_from_raw(section(raw, "prep")),
        dedupe: dedupe_from_raw(section(raw, "dedupe")),
        prescreen: prescreen_from_raw(section(raw, "prescreen")),
        data: data_from_raw(section(raw, "data")),
    }
}

/// Rebuilds the full raw document for a write: each mapped section is a patch
/// shallow-merged over its previously loaded form, so raw fields the typed
/// model does not carry stay untouched.
pub fn save_document(
    settings: &Settings,
    last_raw: &Map<String, Value>,
) -> Result<Map<String, Value>, LitrevError> {
    let mut document = last_raw.clone();

    merge_section(&mut document, "project", section_patch(&settings.project)?);
    merge_section(&mut document, "prep", section_patch(&settings.prep)?);
    merge_section(&mut document, "dedupe", section_patch(&settings.dedupe)?);
    merge_section(&mut document, "prescreen", section_patch(&settings.prescreen)?);
    merge_section(&mut document, "data", section_patch(&settings.data)?);

    // Sources are rebuilt wholesale: raw entries that are not represented in
    // the typed list do not survive.
    document.insert("sources".to_string(), serde_json::to_value(&settings.sources)?);

    Ok(document)
}

fn section<'a>(raw: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    raw.get(key).and_then(Value::as_object)
}

fn project_from_raw(section: Option<&Map<String, Value>>) -> Project {
    let section = match section {
        Some(section) => section,
        None => return Project::default(),
    };

    Project {
        review_type: text(section, "review_type"),
        id_pattern: text(section, "id_pattern"),
        share_stat_req: text(section, "share_stat_req"),
        delay_automated_processing: flag(section, "delay_automated_processing"),
        curation_url: optional_text(section, "curation_url"),
        curated_masterdata: flag(section, "curated_masterdata"),
        curated_fields: text_list(section, "curated_fields"),
    }
}

fn sources_from_raw(raw: Option<&Value>) -> Vec<Source> {
    let entries = match raw.and_then(Value::as_array) {
        Some(entries) => entries,
        None => return Vec::new(),
    };

    entries.iter().map(source_from_raw).collect()
}

fn source_from_raw(raw: &Value) -> Source {
    let entry = match raw.as_object() {
        Some(entry) => entry,
        None => return Source::default(),
    };

    Source {
        filename: text(entry, "filename"),
        search_type: text(entry, "search_type"),
        source_name: text(entry, "source_name"),
        source_identifier: text(entry, "source_identifier"),
        search_parameters: text(entry, "search_parameters"),
        search_script: Script::from_raw(entry.get("search_script").unwrap_or(&Value::Null)),
        conversion_script: Script::from_raw(entry.get("conversion_script").unwrap_or(&Value::Null)),
        source_prep_scripts: scripts_from_raw(entry.get("source_prep_scripts")),
        comment: optional_text(entry, "comment"),
    }
}

fn prep_from_raw(section: Option<&Map<String, Value>>) -> Prep {
    let section = match section {
        Some(section) => section,
        None => return Prep::default(),
    };

    let prep_rounds = section
        .get("prep_rounds")
        .and_then(Value::as_array)
        .map(|rounds| rounds.iter().map(prep_round_from_raw).collect())
        .unwrap_or_default();

    Prep {
        fields_to_keep: text_list(section, "fields_to_keep"),
        prep_rounds,
        man_prep_scripts: scripts_from_raw(section.get("man_prep_scripts")),
    }
}

fn prep_round_from_raw(raw: &Value) -> PrepRound {
    let entry = match raw.as_object() {
        Some(entry) => entry,
        None => return PrepRound::default(),
    };

    PrepRound {
        name: text(entry, "name"),
        similarity: number(entry, "similarity"),
        scripts: scripts_from_raw(entry.get("scripts")),
    }
}

fn dedupe_from_raw(section: Option<&Map<String, Value>>) -> Dedupe {
    let section = match section {
        Some(section) => section,
        None => return Dedupe::default(),
    };

    Dedupe {
        same_source_merges: text(section, "same_source_merges"),
        scripts: scripts_from_raw(section.get("scripts")),
    }
}

fn prescreen_from_raw(section: Option<&Map<String, Value>>) -> Prescreen {
    let section = match section {
        Some(section) => section,
        None => return Prescreen::default(),
    };

    Prescreen {
        explanation: text(section, "explanation"),
        scripts: scripts_from_raw(section.get("scripts")),
    }
}

fn data_from_raw(section: Option<&Map<String, Value>>) -> Data {
    let section = match section {
        Some(section) => section,
        None => return Data::default(),
    };

    Data { scripts: scripts_from_raw(section.get("scripts")) }
}

fn scripts_from_raw(raw: Option<&Value>) -> Vec<Script> {
    raw.and_then(Value::as_array)
        .map(|entries| entries.iter().map(Script::from_raw).collect())
        .unwrap_or_default()
}

fn section_patch<T: Serialize>(section: &T) -> Result<Map<String, Value>, LitrevError> {
    match serde_json::to_value(section)? {
        Value::Object(patch) => Ok(patch),
        _ => Ok(Map::new()),
    }
}

fn merge_section(document: &mut Map<String, Value>, key: &str, patch: Map<String, Value>) {
    let mut merged = document.get(key).and_then(Value::as_object).cloned().unwrap_or_default();
    merged.extend(patch);
    document.insert(key.to_string(), Value::Object(merged));
}

fn text(section: &Map<String, Value>, key: &str) -> String {
    section.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn optional_text(section: &Map<String, Value>, key: &str) -> Option<String> {
    section.get(key).and_then(Value::as_str).map(str::to_string)
}

fn flag(section: &Map<String, Value>, key: &str) -> bool {
    section.get(key).and_then(Value::as_bool).unwrap_or_default()
}

fn number(section: &Map<String, Value>, key: &str) -> f64 {
    section.get(key).and_then(Value::as_f64).unwrap_or_default()
}

fn text_list(section: &Map<String, Value>, key: &str) -> Vec<String> {
    section
        .get(key)
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}
