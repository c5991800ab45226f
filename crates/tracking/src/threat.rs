use serde::Serialize;

/// Coarse severity assigned to a honeypot trigger based on which trap was
/// hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
}

impl ThreatLevel {
    /// Wire/storage form (`"low"`, `"medium"`, `"high"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatLevel::Low => "low",
            ThreatLevel::Medium => "medium",
            ThreatLevel::High => "high",
        }
    }
}

impl std::fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a trap identifier to its severity.
///
/// Probing for admin panels, environment files, or database consoles means
/// a targeted scanner; the fake API and the invisible links catch broad
/// crawlers. Unknown or future trap types default to low rather than
/// failing.
pub fn classify(trap_type: &str) -> ThreatLevel {
    match trap_type {
        "admin" | "env" | "sql" => ThreatLevel::High,
        "api" | "hidden-link" => ThreatLevel::Medium,
        _ => ThreatLevel::Low,
    }
}
