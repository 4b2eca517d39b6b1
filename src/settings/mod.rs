use std::fmt;

use serde::Serialize;

pub mod api;
pub mod mapping;
pub mod options;
pub mod scripts;


pub use scripts::Script;

// Project

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Project {
    pub review_type: String,
    pub id_pattern: String,
    pub share_stat_req: String,
    pub delay_automated_processing: bool,
    pub curation_url: Option<String>,
    pub curated_masterdata: bool,
    pub curated_fields: Vec<String>,
}

// Sources

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Source {
    pub filename: String,
    pub search_type: String,
    pub source_name: String,
    pub source_identifier: String,
    pub search_parameters: String,
    pub search_script: Script,
    pub conversion_script: Script,
    pub source_prep_scripts: Vec<Script>,
    pub comment: Option<String>,
}

// Prep

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Prep {
    pub fields_to_keep: Vec<String>,
    pub prep_rounds: Vec<PrepRound>,
    pub man_prep_scripts: Vec<Script>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PrepRound {
    pub name: String,
    pub similarity: f64,
    pub scripts: Vec<Script>,
}

// Dedupe

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Dedupe {
    pub same_source_merges: String,
    pub scripts: Vec<Script>,
}

// Prescreen

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Prescreen {
    pub explanation: String,
    pub scripts: Vec<Script>,
}

// Data

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Data {
    pub scripts: Vec<Script>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub project: Project,
    pub sources: Vec<Source>,
    pub prep: Prep,
    pub dedupe: Dedupe,
    pub prescreen: Prescreen,
    pub data: Data,
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Review ({})", self.review_type)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} (type: {}, filename: {})",
            self.source_name, self.search_type, self.filename
        )?;
        writeln!(f, "   identifier:        {}", self.source_identifier)?;
        writeln!(f, "   parameters:        {}", self.search_parameters)?;
        writeln!(f, "   search script:     {}", self.search_script)?;
        writeln!(f, "   conversion script: {}", self.conversion_script)?;
        write!(f, "   prep scripts:      {}", join_endpoints(&self.source_prep_scripts))?;
        if let Some(comment) = &self.comment {
            write!(f, "\n   comment:           {}", comment)?;
        }
        Ok(())
    }
}

impl fmt::Display for PrepRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut endpoints: Vec<&str> = self.scripts.iter().map(Script::endpoint).take(3).collect();
        if self.scripts.len() > 3 {
            endpoints.push("...");
        }
        write!(f, "{} ({})", self.name, endpoints.join(","))
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.project)?;
        writeln!(f, "Sources")?;
        for source in &self.sources {
            writeln!(f, " - {}", source)?;
        }
        writeln!(f, "Prep")?;
        writeln!(f, " - fields to keep: {}", self.prep.fields_to_keep.join(", "))?;
        for round in &self.prep.prep_rounds {
            writeln!(f, " - {}", round)?;
        }
        writeln!(f, "Dedupe")?;
        writeln!(f, " - same source merges: {}", self.dedupe.same_source_merges)?;
        writeln!(f, " - {}", join_endpoints(&self.dedupe.scripts))?;
        writeln!(f, "Prescreen")?;
        writeln!(f, " - {}", join_endpoints(&self.prescreen.scripts))?;
        writeln!(f, "Data")?;
        write!(f, " - {}", join_endpoints(&self.data.scripts))
    }
}

fn join_endpoints(scripts: &[Script]) -> String {
    scripts.iter().map(Script::endpoint).collect::<Vec<_>>().join(",")
}
