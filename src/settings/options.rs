// Valid values for the plain-string settings fields, for UI dropdowns. The
// typed model does not enforce them, so unknown values pass through a
// load/save cycle untouched.

pub const REVIEW_TYPES: &[&str] = &[
    "curated_masterdata",
    "realtime",
    "literature_review",
    "narrative_review",
    "descriptive_review",
    "scoping_review",
    "critical_review",
    "theoretical_review",
    "conceptual_review",
    "qualitative_systematic_review",
    "meta_analysis",
    "scientometric",
    "peer_review",
];

pub const ID_PATTERNS: &[&str] = &["FIRST_AUTHOR_YEAR", "THREE_AUTHORS_YEAR"];

pub const SEARCH_TYPES: &[&str] =
    &["DB", "TOC", "BACKWARD_SEARCH", "FORWARD_SEARCH", "PDFS", "OTHER"];

pub const SAME_SOURCE_MERGE_POLICIES: &[&str] = &["prevent", "apply"];
