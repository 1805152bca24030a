#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdictStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableLocation {
    pub path: String,
    pub line: Option<u32>,
}

/// A violation or advisory. `message` already names `Owner(member)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableEntry {
    pub code: String,
    pub message: String,
    pub location: Option<RenderableLocation>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableOutcome {
    pub policy: String,
    pub severity: RenderableSeverity,
    pub ok: bool,
    pub summary: String,
    pub violations: Vec<RenderableEntry>,
    pub advisories: Vec<RenderableEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderableData {
    pub profile: String,
    pub files_scanned: u32,
    pub expressions_scanned: u32,
    pub expressions_valid: u32,
    pub expressions_invalid: u32,
    pub violations_total: u32,
    pub advisories_total: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdictStatus,
    pub outcomes: Vec<RenderableOutcome>,
    pub data: RenderableData,
}
