//! The append-only log of probes made while resolving an instruction.

use std::fmt;

use fhatos_furi::Furi;

use crate::Obj;

/// One probe: the id probed from, the id probed, and what was found there.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub source: Furi,
    pub probe: Furi,
    pub result: Obj,
}

impl Step {
    /// Pass markers carry an empty probe id.
    pub fn is_marker(&self) -> bool {
        self.probe.empty()
    }
}

/// An ordered probe log, used only to explain a resolution.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Derivation {
    steps: Vec<Step>,
}

impl Derivation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, source: &Furi, probe: &Furi, result: &Obj) {
        self.steps.push(Step {
            source: source.clone(),
            probe: probe.clone(),
            result: result.clone(),
        });
    }

    /// Start a new pass rooted at `source`.
    pub fn mark_pass(&mut self, source: &Furi) {
        self.steps.push(Step {
            source: source.clone(),
            probe: Furi::default(),
            result: Obj::noobj(),
        });
    }

    /// Probes only, without pass markers.
    pub fn probes(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(|s| !s.is_marker())
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn extend(&mut self, other: Derivation) {
        self.steps.extend(other.steps);
    }
}

/// Renders as an aligned table. Depth arrows grow with each probe and restart after a marker.
impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<(String, String, String)> = self
            .steps
            .iter()
            .map(|s| (s.source.to_string(), s.probe.to_string(), s.result.to_string()))
            .collect();
        let width = |pick: fn(&(String, String, String)) -> usize| {
            rows.iter().map(pick).max().unwrap_or(0)
        };
        let w0 = width(|r| r.0.len());
        let w1 = width(|r| r.1.len());
        let w2 = width(|r| r.2.len());
        write!(
            f,
            "\n\t{:>8} {:<w0$}  {:<w1$}    {:<w2$}",
            "   ", "lhs id", "inst id", "resolve obj"
        )?;
        let mut counter = 0;
        for (step, (source, probe, result)) in self.steps.iter().zip(rows.iter()) {
            counter = if step.is_marker() { 0 } else { counter + 1 };
            if counter == 0 {
                continue;
            }
            let indent = format!("{}>", "-".repeat(counter));
            write!(
                f,
                "\n\t{:>8}[{:<w0$}] {:<w1$} => {:<w2$}",
                indent, source, probe, result
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhatos_furi::furi;

    #[test]
    fn markers_are_not_probes() {
        let mut log = Derivation::new();
        log.mark_pass(&furi!("/x"));
        log.record(&furi!("/x"), &furi!("/x/::/plus"), &Obj::noobj());
        assert_eq!(log.len(), 2);
        assert_eq!(log.probes().count(), 1);
        assert!(log.steps()[0].is_marker());
    }

    #[test]
    fn renders_depth_arrows() {
        let mut log = Derivation::new();
        log.record(&furi!("/x"), &furi!("/x/::/plus"), &Obj::noobj());
        log.record(&furi!("/int"), &furi!("/int/::/plus"), &Obj::int(1));
        log.mark_pass(&furi!("/mmadt/obj"));
        log.record(&furi!("/mmadt/obj"), &furi!("plus"), &Obj::noobj());
        let text = log.to_string();
        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("lhs id"));
        assert!(lines[0].contains("resolve obj"));
        assert!(lines[1].contains("->[/x"));
        assert!(lines[2].contains("-->[/int"));
        assert!(lines[2].contains("=> 1"));
        assert!(lines[3].contains("->[/mmadt/obj]"));
        assert!(!lines[3].contains("-->"));
    }

    #[test]
    fn empty_log_renders_header_only() {
        let text = Derivation::new().to_string();
        assert_eq!(text.lines().filter(|l| !l.trim().is_empty()).count(), 1);
    }
}
